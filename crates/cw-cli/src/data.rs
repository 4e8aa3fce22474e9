//! CSV input/output for trial datasets.
//!
//! The expected layout is one row per surveyed individual with headers
//! `sms`, `net_use`, `malaria` (extra columns are ignored). Values must
//! parse as 0/1; `TrialData` construction enforces the binary invariant.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use cw_core::TrialData;

const COLUMNS: [&str; 3] = ["sms", "net_use", "malaria"];

/// Read a trial dataset from a headered CSV file.
pub fn load_trial_csv(path: &PathBuf) -> Result<TrialData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> =
        rdr.headers().context("failed to read CSV headers")?.iter().map(String::from).collect();

    let mut indices = [0usize; 3];
    for (slot, name) in indices.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("missing required column '{}' in {}", name, path.display()))?;
    }

    let mut columns: [Vec<f64>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to read CSV row {}", row + 1))?;
        for (k, &idx) in indices.iter().enumerate() {
            let field = record
                .get(idx)
                .with_context(|| format!("row {} is missing column '{}'", row + 1, COLUMNS[k]))?;
            let value: f64 = field.trim().parse().with_context(|| {
                format!("row {}, column '{}': cannot parse '{}'", row + 1, COLUMNS[k], field)
            })?;
            columns[k].push(value);
        }
    }

    let [sms, net_use, malaria] = columns;
    let data = TrialData::new(sms, net_use, malaria)
        .with_context(|| format!("invalid dataset in {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = data.n(), "dataset loaded");
    Ok(data)
}

/// Write a trial dataset as a headered CSV file.
pub fn write_trial_csv(path: &Path, data: &TrialData) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record(COLUMNS)?;
    for i in 0..data.n() {
        wtr.write_record(&[
            format!("{}", data.sms()[i] as u8),
            format!("{}", data.net_use()[i] as u8),
            format!("{}", data.malaria()[i] as u8),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
