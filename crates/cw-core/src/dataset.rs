//! Encouragement-trial dataset model.
//!
//! One row per surveyed individual, three binary columns:
//!
//! - `sms`: assignment to the SMS encouragement arm (instrument Z).
//! - `net_use`: whether a mosquito net was actually used (treatment D).
//! - `malaria`: malaria diagnosis (outcome Y).
//!
//! Columns are stored as `f64` so they can feed regression designs directly,
//! but construction enforces strict 0/1 values. The dataset is read-only
//! after construction.

use crate::{Error, Result};

/// Validated three-column binary dataset of an encouragement trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialData {
    sms: Vec<f64>,
    net_use: Vec<f64>,
    malaria: Vec<f64>,
}

fn check_binary(name: &str, values: &[f64]) -> Result<()> {
    for (i, &v) in values.iter().enumerate() {
        if v != 0.0 && v != 1.0 {
            return Err(Error::Validation(format!(
                "column '{}' must be binary (0/1): row {} has value {}",
                name, i, v
            )));
        }
    }
    Ok(())
}

impl TrialData {
    /// Build a dataset from three equal-length binary columns.
    pub fn new(sms: Vec<f64>, net_use: Vec<f64>, malaria: Vec<f64>) -> Result<Self> {
        let n = sms.len();
        if n == 0 {
            return Err(Error::Validation("dataset must be non-empty".into()));
        }
        if net_use.len() != n || malaria.len() != n {
            return Err(Error::Validation(format!(
                "column lengths differ: sms={}, net_use={}, malaria={}",
                n,
                net_use.len(),
                malaria.len()
            )));
        }
        check_binary("sms", &sms)?;
        check_binary("net_use", &net_use)?;
        check_binary("malaria", &malaria)?;
        Ok(Self { sms, net_use, malaria })
    }

    /// Number of observations.
    pub fn n(&self) -> usize {
        self.sms.len()
    }

    /// Instrument column (SMS encouragement assignment).
    pub fn sms(&self) -> &[f64] {
        &self.sms
    }

    /// Treatment column (actual net use).
    pub fn net_use(&self) -> &[f64] {
        &self.net_use
    }

    /// Outcome column (malaria diagnosis).
    pub fn malaria(&self) -> &[f64] {
        &self.malaria
    }

    /// Share of units with the given column equal to 1.
    pub fn share(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}
