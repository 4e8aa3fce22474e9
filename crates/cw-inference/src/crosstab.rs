//! 2×2 contingency tables for binary columns.
//!
//! The compliance table of an encouragement design is the crosstab of
//! assignment (rows) against treatment received (columns). Counts always sum
//! to the number of observations; row percentages are reported alongside.

use cw_core::{Error, Result};
use serde::Serialize;

/// A 2×2 contingency table of two binary columns.
///
/// `counts[r][c]` is the number of rows with row-variable `r` and
/// column-variable `c` (values 0 and 1). `row_pct[r][c]` is the share of
/// row `r` falling in column `c`, or NaN for an empty row.
#[derive(Debug, Clone, Serialize)]
pub struct CrossTab {
    /// Name of the row variable.
    pub row_name: String,
    /// Name of the column variable.
    pub col_name: String,
    /// Cell counts, indexed `[row_value][col_value]`.
    pub counts: [[u64; 2]; 2],
    /// Row percentages (shares within each row), same indexing.
    pub row_pct: [[f64; 2]; 2],
    /// Total number of observations.
    pub n: usize,
}

impl CrossTab {
    /// Marginal count for a row value.
    pub fn row_total(&self, r: usize) -> u64 {
        self.counts[r][0] + self.counts[r][1]
    }

    /// Share of column value 1 within a row, NaN for an empty row.
    pub fn row_share(&self, r: usize) -> f64 {
        let total = self.row_total(r);
        if total == 0 {
            f64::NAN
        } else {
            self.counts[r][1] as f64 / total as f64
        }
    }
}

/// Cross-tabulate two equal-length binary columns.
pub fn crosstab(rows: &[f64], cols: &[f64], row_name: &str, col_name: &str) -> Result<CrossTab> {
    let n = rows.len();
    if n == 0 {
        return Err(Error::Validation("crosstab input must be non-empty".into()));
    }
    if cols.len() != n {
        return Err(Error::Validation(format!(
            "crosstab column lengths differ: {} vs {}",
            n,
            cols.len()
        )));
    }

    let mut counts = [[0u64; 2]; 2];
    for (i, (&r, &c)) in rows.iter().zip(cols).enumerate() {
        let ri = match r {
            v if v == 0.0 => 0,
            v if v == 1.0 => 1,
            v => {
                return Err(Error::Validation(format!(
                    "'{}' must be binary (0/1): row {} has value {}",
                    row_name, i, v
                )))
            }
        };
        let ci = match c {
            v if v == 0.0 => 0,
            v if v == 1.0 => 1,
            v => {
                return Err(Error::Validation(format!(
                    "'{}' must be binary (0/1): row {} has value {}",
                    col_name, i, v
                )))
            }
        };
        counts[ri][ci] += 1;
    }

    let mut row_pct = [[f64::NAN; 2]; 2];
    for r in 0..2 {
        let total = (counts[r][0] + counts[r][1]) as f64;
        if total > 0.0 {
            row_pct[r][0] = counts[r][0] as f64 / total;
            row_pct[r][1] = counts[r][1] as f64 / total;
        }
    }

    Ok(CrossTab {
        row_name: row_name.to_string(),
        col_name: col_name.to_string(),
        counts,
        row_pct,
        n,
    })
}
