//! Compliance-type shares under monotonicity.
//!
//! With a binary instrument Z and binary treatment D, the population splits
//! into always-takers, never-takers, compliers and defiers. Ruling out
//! defiers (monotonicity), the type shares are identified from the
//! assignment × treatment table:
//!
//! - always-taker share = P(D=1 | Z=0)
//! - never-taker share  = P(D=0 | Z=1)
//! - complier share     = P(D=1 | Z=1) − P(D=1 | Z=0)
//!
//! # References
//!
//! - Angrist, Imbens & Rubin (1996), "Identification of causal effects using
//!   instrumental variables."

use cw_core::{Error, Result};
use serde::Serialize;

use crate::crosstab::CrossTab;

/// Estimated population shares of the three compliance types.
///
/// The complier share is the sampling-based difference of two proportions and
/// can be slightly negative in small samples; it is reported as computed.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceShares {
    /// P(D=1 | Z=0): units treated regardless of assignment.
    pub always_taker: f64,
    /// P(D=0 | Z=1): units untreated regardless of assignment.
    pub never_taker: f64,
    /// P(D=1 | Z=1) − P(D=1 | Z=0): units whose treatment follows assignment.
    pub complier: f64,
}

/// Derive compliance-type shares from an assignment (rows) × treatment
/// (columns) crosstab.
///
/// Errors if either assignment arm is empty, since both conditional
/// treatment rates are needed.
pub fn compliance_shares(tab: &CrossTab) -> Result<ComplianceShares> {
    if tab.row_total(0) == 0 || tab.row_total(1) == 0 {
        return Err(Error::Computation(format!(
            "cannot estimate compliance shares: '{}' arm with no observations",
            tab.row_name
        )));
    }
    let p_treated_unassigned = tab.row_share(0);
    let p_treated_assigned = tab.row_share(1);
    Ok(ComplianceShares {
        always_taker: p_treated_unassigned,
        never_taker: 1.0 - p_treated_assigned,
        complier: p_treated_assigned - p_treated_unassigned,
    })
}
