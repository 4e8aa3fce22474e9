//! Jittered scatter artifact for the compliance picture.
//!
//! Both axes are binary, so raw points would stack on four spots. Seeded
//! uniform jitter spreads them into visible clouds; the group array carries
//! malaria status for coloring. The unjittered values are recoverable by
//! rounding, so the artifact is numbers-complete on its own.

use cw_core::{Error, Result, TrialData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Schema tag for scatter artifacts.
pub const SCATTER_SCHEMA_VERSION: &str = "cw-viz-scatter/1";

/// Provenance metadata for a scatter artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterMeta {
    /// Producing tool name.
    pub tool: String,
    /// Producing tool version.
    pub tool_version: String,
    /// Jitter RNG seed.
    pub seed: u64,
    /// Half-width of the uniform jitter.
    pub jitter: f64,
}

/// Plot-friendly jittered scatter of assignment against net use.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterArtifact {
    /// Schema tag, [`SCATTER_SCHEMA_VERSION`].
    pub schema_version: String,
    /// Provenance metadata.
    pub meta: ScatterMeta,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Group (color) label.
    pub group_label: String,
    /// Jittered x values (assignment).
    pub x: Vec<f64>,
    /// Jittered y values (net use).
    pub y: Vec<f64>,
    /// Group value per point (malaria status, exact 0/1).
    pub group: Vec<f64>,
}

/// Build the jittered compliance scatter for a trial dataset.
///
/// `jitter` is the half-width of the uniform displacement and must lie in
/// `(0, 0.5)` so the four clouds stay separated.
pub fn compliance_scatter(data: &TrialData, seed: u64, jitter: f64) -> Result<ScatterArtifact> {
    if !(jitter > 0.0 && jitter < 0.5) {
        return Err(Error::Validation(format!(
            "jitter must be in (0, 0.5), got {}",
            jitter
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let n = data.n();
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        x.push(data.sms()[i] + rng.random_range(-jitter..jitter));
        y.push(data.net_use()[i] + rng.random_range(-jitter..jitter));
    }

    Ok(ScatterArtifact {
        schema_version: SCATTER_SCHEMA_VERSION.to_string(),
        meta: ScatterMeta {
            tool: "causeway".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            seed,
            jitter,
        },
        x_label: "sms (assigned encouragement)".to_string(),
        y_label: "net_use (treatment received)".to_string(),
        group_label: "malaria".to_string(),
        x,
        y,
        group: data.malaria().to_vec(),
    })
}
