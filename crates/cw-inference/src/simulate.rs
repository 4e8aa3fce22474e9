//! Seeded data generation for the walkthrough.
//!
//! Two generators, both deterministic given a seed:
//!
//! - [`generate_encouragement`] draws an encouragement trial: compliance
//!   types, Bernoulli assignment, treatment per type, and a malaria risk with
//!   a type-correlated confound (always-takers are unusually
//!   health-conscious). This is how the shipped example dataset was built.
//! - [`weak_instrument_contrast`] draws a correlated latent pair (X*, C),
//!   an exogenous instrument Z and a regressor X = s·Z + X* + share·C, then
//!   runs the relevance regression at full strength and again with the
//!   instrument contribution attenuated, showing the first-stage F collapse.

use cw_core::{Error, Result, TrialData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::ols::simple_ols;

/// Configuration for the encouragement-trial generator.
#[derive(Debug, Clone)]
pub struct EncouragementConfig {
    /// Number of surveyed individuals.
    pub n: usize,
    /// RNG seed.
    pub seed: u64,
    /// Probability of assignment to the SMS arm.
    pub assignment_rate: f64,
    /// Population share of always-takers.
    pub p_always: f64,
    /// Population share of compliers (never-takers get the rest).
    pub p_complier: f64,
    /// Malaria risk for an untreated unit of neutral type.
    pub base_risk: f64,
    /// Risk reduction from using a net.
    pub net_effect: f64,
    /// Additive risk shift for always-takers (typically negative).
    pub always_risk_shift: f64,
    /// Additive risk shift for never-takers (typically positive).
    pub never_risk_shift: f64,
}

impl Default for EncouragementConfig {
    fn default() -> Self {
        Self {
            n: 800,
            seed: 7,
            assignment_rate: 0.5,
            p_always: 0.20,
            p_complier: 0.50,
            base_risk: 0.45,
            net_effect: 0.25,
            always_risk_shift: -0.12,
            never_risk_shift: 0.08,
        }
    }
}

fn check_probability(name: &str, v: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(Error::Validation(format!("{} must be in [0, 1], got {}", name, v)));
    }
    Ok(())
}

/// Draw an encouragement trial with imperfect two-sided compliance.
///
/// Compliance type is drawn first (always/complier/never), then assignment,
/// then treatment follows the type. Malaria risk is clamped to [0, 1] after
/// the type shifts, so extreme configurations stay well-defined.
pub fn generate_encouragement(config: &EncouragementConfig) -> Result<TrialData> {
    if config.n == 0 {
        return Err(Error::Validation("n must be >= 1".into()));
    }
    check_probability("assignment_rate", config.assignment_rate)?;
    check_probability("p_always", config.p_always)?;
    check_probability("p_complier", config.p_complier)?;
    if config.p_always + config.p_complier > 1.0 {
        return Err(Error::Validation(format!(
            "p_always + p_complier must be <= 1, got {}",
            config.p_always + config.p_complier
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut sms = Vec::with_capacity(config.n);
    let mut net_use = Vec::with_capacity(config.n);
    let mut malaria = Vec::with_capacity(config.n);

    for _ in 0..config.n {
        let u_type: f64 = rng.random();
        let z = if rng.random::<f64>() < config.assignment_rate { 1.0 } else { 0.0 };

        let (d, risk_shift) = if u_type < config.p_always {
            (1.0, config.always_risk_shift)
        } else if u_type < config.p_always + config.p_complier {
            (z, 0.0)
        } else {
            (0.0, config.never_risk_shift)
        };

        let risk = (config.base_risk - config.net_effect * d + risk_shift).clamp(0.0, 1.0);
        let y = if rng.random::<f64>() < risk { 1.0 } else { 0.0 };

        sms.push(z);
        net_use.push(d);
        malaria.push(y);
    }

    TrialData::new(sms, net_use, malaria)
}

/// Configuration for the weak-instrument contrast experiment.
#[derive(Debug, Clone)]
pub struct WeakIvConfig {
    /// Number of synthetic draws.
    pub n: usize,
    /// RNG seed.
    pub seed: u64,
    /// Correlation between the latent regressor X* and the confound C.
    pub latent_correlation: f64,
    /// Weight of the confound inside the regressor.
    pub confound_share: f64,
    /// Attenuation factor applied to the instrument in the weak arm.
    pub attenuation: f64,
    /// Effect of X on the outcome.
    pub outcome_effect: f64,
    /// Effect of C on the outcome (the endogeneity source).
    pub confound_effect: f64,
    /// Outcome noise standard deviation.
    pub noise_sd: f64,
    /// Direct effect of Z on the outcome. Zero keeps the exclusion
    /// restriction intact; a nonzero value violates it deliberately.
    pub direct_effect: f64,
}

impl Default for WeakIvConfig {
    fn default() -> Self {
        Self {
            n: 2000,
            seed: 42,
            latent_correlation: 0.6,
            confound_share: 0.5,
            attenuation: 0.08,
            outcome_effect: 1.5,
            confound_effect: 1.0,
            noise_sd: 1.0,
            direct_effect: 0.0,
        }
    }
}

/// One arm of the contrast: relevance regression of the synthetic regressor
/// on the instrument, plus the 2SLS effect estimate in that world.
#[derive(Debug, Clone, Serialize)]
pub struct RelevanceRun {
    /// Instrument strength used to build the regressor.
    pub instrument_strength: f64,
    /// Slope of X on Z.
    pub coefficient: f64,
    /// First-stage F statistic.
    pub f_stat: f64,
    /// First-stage R².
    pub r_squared: f64,
    /// 2SLS estimate of the effect of X on Y using Z.
    pub iv_estimate: f64,
}

/// Paired strong/attenuated relevance runs on identical latent draws.
#[derive(Debug, Clone, Serialize)]
pub struct WeakIvContrast {
    /// Run with the instrument at full strength (1.0).
    pub strong: RelevanceRun,
    /// Run with the instrument scaled by `attenuation`.
    pub weak: RelevanceRun,
    /// The attenuation factor.
    pub attenuation: f64,
    /// Number of draws.
    pub n: usize,
    /// Seed used for the draws.
    pub seed: u64,
}

/// One standard-normal draw (Box–Muller).
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>(); // (0, 1], keeps ln finite
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn relevance_run(z: &[f64], x: &[f64], y: &[f64], strength: f64) -> Result<RelevanceRun> {
    let fit = simple_ols(x, z, "instrument")?;
    let iv = crate::two_stage::iv_2sls(y, x, z)?;
    Ok(RelevanceRun {
        instrument_strength: strength,
        coefficient: fit.slope(),
        f_stat: fit.f_stat,
        r_squared: fit.r_squared,
        iv_estimate: iv.late,
    })
}

/// Run the weak-instrument contrast experiment.
///
/// Both arms reuse the same latent draws, so the only difference between
/// them is the instrument's contribution to the regressor.
pub fn weak_instrument_contrast(config: &WeakIvConfig) -> Result<WeakIvContrast> {
    if config.n < 3 {
        return Err(Error::Validation(format!("n must be >= 3, got {}", config.n)));
    }
    if !(-1.0..=1.0).contains(&config.latent_correlation) {
        return Err(Error::Validation(format!(
            "latent_correlation must be in [-1, 1], got {}",
            config.latent_correlation
        )));
    }
    if config.attenuation <= 0.0 || config.attenuation >= 1.0 {
        return Err(Error::Validation(format!(
            "attenuation must be in (0, 1), got {}",
            config.attenuation
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let rho = config.latent_correlation;
    let ortho = (1.0 - rho * rho).sqrt();

    let mut z = Vec::with_capacity(config.n);
    let mut x_star = Vec::with_capacity(config.n);
    let mut c = Vec::with_capacity(config.n);
    let mut noise = Vec::with_capacity(config.n);
    for _ in 0..config.n {
        let n1 = standard_normal(&mut rng);
        let n2 = standard_normal(&mut rng);
        x_star.push(n1);
        c.push(rho * n1 + ortho * n2);
        z.push(standard_normal(&mut rng));
        noise.push(standard_normal(&mut rng));
    }

    // Build one arm: same latent draws, instrument contribution scaled.
    let build_arm = |strength: f64| -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..config.n)
            .map(|i| strength * z[i] + x_star[i] + config.confound_share * c[i])
            .collect();
        let y: Vec<f64> = (0..config.n)
            .map(|i| {
                config.outcome_effect * x[i]
                    + config.confound_effect * c[i]
                    + config.direct_effect * z[i]
                    + config.noise_sd * noise[i]
            })
            .collect();
        (x, y)
    };

    let (x_strong, y_strong) = build_arm(1.0);
    let strong = relevance_run(&z, &x_strong, &y_strong, 1.0)?;
    let (x_weak, y_weak) = build_arm(config.attenuation);
    let weak = relevance_run(&z, &x_weak, &y_weak, config.attenuation)?;

    Ok(WeakIvContrast {
        strong,
        weak,
        attenuation: config.attenuation,
        n: config.n,
        seed: config.seed,
    })
}
