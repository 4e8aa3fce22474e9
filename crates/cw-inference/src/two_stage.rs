//! Two-stage least squares and the Wald ratio.
//!
//! Just-identified IV for the encouragement design: one binary instrument,
//! one endogenous treatment, intercept only. In this case the 2SLS slope and
//! the Wald ratio Cov(Y,Z)/Cov(D,Z) coincide algebraically; both are
//! reported so the cross-check is visible in the output.
//!
//! Identification rests on the four IV assumptions (relevance, exogeneity,
//! exclusion, monotonicity); under them the estimand is the LATE, the
//! average treatment effect among compliers.
//!
//! # References
//!
//! - Imbens & Angrist (1994), "Identification and estimation of local
//!   average treatment effects."
//! - Wooldridge, *Econometric Analysis of Cross Section and Panel Data*, Ch. 5.

use cw_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::ols::simple_ols;

/// Rule-of-thumb first-stage F threshold below which an instrument is
/// considered weak (Staiger–Stock).
pub const STRONG_INSTRUMENT_F: f64 = 10.0;

/// First-stage (relevance) diagnostics: OLS of treatment on instrument.
#[derive(Debug, Clone, Serialize)]
pub struct FirstStage {
    /// Slope of treatment on instrument.
    pub coefficient: f64,
    /// Standard error of the slope.
    pub se: f64,
    /// First-stage F statistic.
    pub f_stat: f64,
    /// First-stage R².
    pub r_squared: f64,
    /// Whether `f_stat` clears [`STRONG_INSTRUMENT_F`].
    pub is_strong: bool,
}

/// Result of a just-identified 2SLS fit.
#[derive(Debug, Clone, Serialize)]
pub struct TwoStageResult {
    /// Second-stage intercept.
    pub intercept: f64,
    /// Standard error of the intercept.
    pub intercept_se: f64,
    /// LATE estimate: second-stage slope on the (instrumented) treatment.
    pub late: f64,
    /// 2SLS standard error of the LATE (residuals from the original
    /// treatment, variance from the projected design).
    pub se: f64,
    /// Wald ratio Cov(Y,Z)/Cov(D,Z); equals `late` up to rounding.
    pub wald_ratio: f64,
    /// First-stage diagnostics.
    pub first_stage: FirstStage,
    /// Number of observations.
    pub n_obs: usize,
}

fn validate_columns(y: &[f64], d: &[f64], z: &[f64]) -> Result<usize> {
    let n = y.len();
    if n == 0 {
        return Err(Error::Validation("y must be non-empty".into()));
    }
    if d.len() != n || z.len() != n {
        return Err(Error::Validation(format!(
            "column lengths differ: y={}, d={}, z={}",
            n,
            d.len(),
            z.len()
        )));
    }
    if n < 3 {
        return Err(Error::Validation(format!("need at least 3 observations, got {}", n)));
    }
    Ok(n)
}

fn sample_cov(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    a.iter().zip(b).map(|(&x, &y)| (x - ma) * (y - mb)).sum::<f64>() / (n - 1.0)
}

/// Wald ratio Cov(Y,Z)/Cov(D,Z).
///
/// Errors when the instrument is uncorrelated with the treatment in-sample
/// (the ratio is undefined; relevance fails outright).
pub fn wald_ratio(y: &[f64], d: &[f64], z: &[f64]) -> Result<f64> {
    validate_columns(y, d, z)?;
    let cov_dz = sample_cov(d, z);
    if cov_dz == 0.0 {
        return Err(Error::Computation(
            "Wald ratio undefined: instrument has zero covariance with treatment".into(),
        ));
    }
    Ok(sample_cov(y, z) / cov_dz)
}

/// Two-stage least squares of `y` on `d`, instrumented by `z`.
///
/// Stage 1 regresses the treatment on the instrument; stage 2 regresses the
/// outcome on the stage-1 fitted values. Standard errors follow the 2SLS
/// convention: residuals are taken against the *original* treatment while
/// the covariance uses the projected design.
pub fn iv_2sls(y: &[f64], d: &[f64], z: &[f64]) -> Result<TwoStageResult> {
    let n = validate_columns(y, d, z)?;

    let stage1 = simple_ols(d, z, "instrument")?;
    let first_stage = FirstStage {
        coefficient: stage1.slope(),
        se: stage1.slope_se(),
        f_stat: stage1.f_stat,
        r_squared: stage1.r_squared,
        is_strong: stage1.f_stat > STRONG_INSTRUMENT_F,
    };

    if stage1.slope() == 0.0 {
        return Err(Error::Computation(
            "2SLS undefined: first-stage slope is exactly zero".into(),
        ));
    }

    // Stage-1 fitted treatment
    let g0 = stage1.coefficients[0];
    let g1 = stage1.slope();
    let d_hat: Vec<f64> = z.iter().map(|&zi| g0 + g1 * zi).collect();

    // Stage 2: y on [1, d_hat]
    let mut x2_data = Vec::with_capacity(n * 2);
    for &dh in &d_hat {
        x2_data.push(1.0);
        x2_data.push(dh);
    }
    let x2 = DMatrix::from_row_slice(n, 2, &x2_data);
    let y_vec = DVector::from_column_slice(y);

    let xtx2 = x2.transpose() * &x2;
    let xtx2_inv = xtx2
        .try_inverse()
        .ok_or_else(|| Error::Computation("X'X singular in 2SLS second stage".into()))?;
    let beta2 = &xtx2_inv * (x2.transpose() * &y_vec);
    let intercept = beta2[0];
    let late = beta2[1];

    // Residuals against the original treatment, not the projection
    let rss: f64 = y
        .iter()
        .zip(d)
        .map(|(&yi, &di)| {
            let r = yi - intercept - late * di;
            r * r
        })
        .sum();
    let dof = (n - 2) as f64;
    let sigma2 = rss / dof;
    let intercept_se = (sigma2 * xtx2_inv[(0, 0)]).max(0.0).sqrt();
    let se = (sigma2 * xtx2_inv[(1, 1)]).max(0.0).sqrt();

    let wald = wald_ratio(y, d, z)?;

    Ok(TwoStageResult {
        intercept,
        intercept_se,
        late,
        se,
        wald_ratio: wald,
        first_stage,
        n_obs: n,
    })
}
