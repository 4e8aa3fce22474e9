//! # cw-inference
//!
//! Estimators for the Causeway encouragement-design walkthrough.
//!
//! This crate provides:
//! - **Cross-tabulation** of two binary columns (compliance tables).
//! - **Compliance-type shares** (always-taker / never-taker / complier)
//!   derived from the assignment × treatment table under monotonicity.
//! - **OLS** with intercept, classical standard errors, t / F statistics and
//!   p-values.
//! - **IV / 2SLS** for the just-identified single-instrument case, with
//!   first-stage diagnostics and the Wald-ratio cross-check.
//! - **Seeded simulations**: an encouragement-trial data generator and a
//!   weak-instrument contrast experiment.
//!
//! Everything is single-threaded, synchronous and deterministic given a seed.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Compliance-type shares under monotonicity.
pub mod compliance;
/// 2×2 contingency tables for binary columns.
pub mod crosstab;
/// Ordinary least squares with classical inference statistics.
pub mod ols;
/// Seeded data generation: encouragement trials and weak-instrument demos.
pub mod simulate;
/// Two-stage least squares and the Wald ratio.
pub mod two_stage;

pub use compliance::{compliance_shares, ComplianceShares};
pub use crosstab::{crosstab, CrossTab};
pub use ols::{ols_fit, simple_ols, OlsFit};
pub use simulate::{
    generate_encouragement, weak_instrument_contrast, EncouragementConfig, RelevanceRun,
    WeakIvConfig, WeakIvContrast,
};
pub use two_stage::{iv_2sls, wald_ratio, FirstStage, TwoStageResult, STRONG_INSTRUMENT_F};
