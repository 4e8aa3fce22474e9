//! Ordinary least squares with classical inference statistics.
//!
//! Closed-form OLS on a dense row-major design with an intercept always
//! prepended. Reports coefficients, standard errors, t statistics with
//! two-sided p-values, R², the overall F statistic with its p-value, RSS and
//! residual degrees of freedom. Singular normal equations are a
//! `Computation` error; nothing is regularized away.
//!
//! # References
//!
//! - Wooldridge, *Introductory Econometrics*, Ch. 2–4.

use cw_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Result of an OLS fit.
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    /// Parameter names, `intercept` first.
    pub names: Vec<String>,
    /// Coefficient estimates, intercept first.
    pub coefficients: Vec<f64>,
    /// Classical (homoskedastic) standard errors.
    pub se: Vec<f64>,
    /// t statistics (coefficient / SE).
    pub t_stats: Vec<f64>,
    /// Two-sided p-values for the t statistics.
    pub p_values: Vec<f64>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Overall regression F statistic (all slopes jointly zero).
    pub f_stat: f64,
    /// p-value of the overall F statistic.
    pub f_p_value: f64,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub n_obs: usize,
    /// Residual degrees of freedom (n − p − 1).
    pub dof_resid: usize,
}

fn two_sided_t_pvalue(t: f64, dof: f64) -> f64 {
    if !t.is_finite() || dof <= 0.0 {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => f64::NAN,
    }
}

fn f_pvalue(f: f64, df1: f64, df2: f64) -> f64 {
    if !f.is_finite() || df1 <= 0.0 || df2 <= 0.0 {
        return f64::NAN;
    }
    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => 1.0 - dist.cdf(f),
        Err(_) => f64::NAN,
    }
}

/// Fit `y = b0 + X b` by least squares.
///
/// # Arguments
///
/// - `y`: dependent variable (length n).
/// - `x`: regressors, row-major (n × p), intercept excluded.
/// - `p`: number of regressor columns.
/// - `names`: names for the p regressors.
pub fn ols_fit(y: &[f64], x: &[f64], p: usize, names: &[String]) -> Result<OlsFit> {
    let n = y.len();
    if n == 0 {
        return Err(Error::Validation("y must be non-empty".into()));
    }
    if p == 0 {
        return Err(Error::Validation("must have at least 1 regressor".into()));
    }
    if x.len() != n * p {
        return Err(Error::Validation(format!("x length ({}) != n*p ({})", x.len(), n * p)));
    }
    if names.len() != p {
        return Err(Error::Validation(format!(
            "names length ({}) != p ({})",
            names.len(),
            p
        )));
    }
    let k = p + 1; // intercept included
    if n <= k {
        return Err(Error::Validation(format!(
            "need more than {} observations to fit {} parameters, got {}",
            k, k, n
        )));
    }
    if y.iter().any(|v| !v.is_finite()) || x.iter().any(|v| !v.is_finite()) {
        return Err(Error::Validation("x/y must contain only finite values".into()));
    }

    // Design with intercept column
    let mut design = Vec::with_capacity(n * k);
    for i in 0..n {
        design.push(1.0);
        design.extend_from_slice(&x[i * p..(i + 1) * p]);
    }
    let x_mat = DMatrix::from_row_slice(n, k, &design);
    let y_vec = DVector::from_column_slice(y);

    let xtx = x_mat.transpose() * &x_mat;
    let xty = x_mat.transpose() * &y_vec;
    let xtx_inv = xtx
        .try_inverse()
        .ok_or_else(|| Error::Computation("X'X is singular (collinear regressors)".into()))?;

    let beta = &xtx_inv * &xty;
    let coefficients: Vec<f64> = beta.iter().copied().collect();

    let resid = &y_vec - &x_mat * &beta;
    let rss: f64 = resid.iter().map(|r| r * r).sum();

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let tss: f64 = y.iter().map(|&v| (v - y_mean).powi(2)).sum();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };

    let dof_resid = n - k;
    let sigma2 = rss / dof_resid as f64;
    let se: Vec<f64> = (0..k).map(|j| (sigma2 * xtx_inv[(j, j)]).max(0.0).sqrt()).collect();

    let t_stats: Vec<f64> = coefficients
        .iter()
        .zip(&se)
        .map(|(&b, &s)| if s > 0.0 { b / s } else { f64::NAN })
        .collect();
    let p_values: Vec<f64> =
        t_stats.iter().map(|&t| two_sided_t_pvalue(t, dof_resid as f64)).collect();

    let f_stat = if rss > 0.0 {
        ((tss - rss) / p as f64) / (rss / dof_resid as f64)
    } else {
        f64::NAN
    };
    let f_p_value = f_pvalue(f_stat, p as f64, dof_resid as f64);

    let mut all_names = Vec::with_capacity(k);
    all_names.push("intercept".to_string());
    all_names.extend_from_slice(names);

    Ok(OlsFit {
        names: all_names,
        coefficients,
        se,
        t_stats,
        p_values,
        r_squared,
        f_stat,
        f_p_value,
        rss,
        n_obs: n,
        dof_resid,
    })
}

/// Fit a single-regressor model `y = b0 + b1·x`.
pub fn simple_ols(y: &[f64], x: &[f64], name: &str) -> Result<OlsFit> {
    ols_fit(y, x, 1, &[name.to_string()])
}

impl OlsFit {
    /// Slope on the single regressor of a [`simple_ols`] fit.
    pub fn slope(&self) -> f64 {
        self.coefficients[1]
    }

    /// Standard error of the [`slope`](Self::slope).
    pub fn slope_se(&self) -> f64 {
        self.se[1]
    }
}
