//! # cw-viz
//!
//! Visualization data artifacts for Causeway.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects), plus a
//! small self-contained SVG renderer for the one plot the walkthrough needs.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Jittered assignment × net-use scatter artifact.
pub mod scatter;

/// SVG rendering of scatter artifacts.
pub mod svg;

pub use scatter::{compliance_scatter, ScatterArtifact, ScatterMeta, SCATTER_SCHEMA_VERSION};
pub use svg::render_scatter_svg;
