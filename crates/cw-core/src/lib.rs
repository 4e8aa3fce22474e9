//! # cw-core
//!
//! Core types for Causeway.
//!
//! This crate provides:
//! - The error taxonomy shared by every Causeway crate.
//! - [`TrialData`], the validated binary-column dataset of an
//!   encouragement-design trial (instrument, treatment, outcome).
//!
//! It deliberately contains no I/O and no numerics; file loading lives in
//! `cw-cli` and estimation in `cw-inference`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod error;

pub use dataset::TrialData;
pub use error::{Error, Result};
