//! Causeway CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use cw_inference::{
    compliance_shares, crosstab, generate_encouragement, iv_2sls, simple_ols,
    weak_instrument_contrast, EncouragementConfig, WeakIvConfig, STRONG_INSTRUMENT_F,
};

mod data;
mod report;

#[derive(Parser)]
#[command(name = "causeway")]
#[command(about = "Causeway - instrumental-variables walkthrough for encouragement designs")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compliance table: assignment × net use, with compliance-type shares
    Crosstab {
        /// Input dataset (CSV with sms, net_use, malaria columns)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Instrument relevance check: OLS of net_use on sms
    FirstStage {
        /// Input dataset (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Naive OLS of malaria on net_use (biased, for contrast)
    Naive {
        /// Input dataset (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Intent-to-treat: OLS of malaria on sms
    Itt {
        /// Input dataset (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// LATE via 2SLS: malaria on net_use, instrumented by sms
    Late {
        /// Input dataset (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Weak-instrument demo: attenuate the instrument, watch the F collapse
    SimulateWeak {
        /// Number of synthetic draws
        #[arg(long, default_value = "2000")]
        n: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Attenuation factor for the weak arm
        #[arg(long, default_value = "0.08")]
        attenuation: f64,

        /// Direct effect of Z on Y (nonzero breaks the exclusion restriction)
        #[arg(long, default_value = "0.0")]
        direct_effect: f64,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a simulated encouragement trial as CSV
    Generate {
        /// Number of surveyed individuals
        #[arg(long, default_value = "800")]
        n: usize,

        /// RNG seed
        #[arg(long, default_value = "7")]
        seed: u64,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Visualization artifacts (plot-friendly JSON)
    Viz {
        #[command(subcommand)]
        command: VizCommands,
    },

    /// Full walkthrough: every table and estimate in one document
    Report {
        /// Input dataset (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON document. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render the walkthrough as Markdown to this path.
        #[arg(long)]
        markdown: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum VizCommands {
    /// Jittered assignment × net-use scatter
    Scatter {
        /// Input dataset (CSV)
        #[arg(short, long)]
        input: PathBuf,

        /// Jitter RNG seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Half-width of the uniform jitter
        #[arg(long, default_value = "0.12")]
        jitter: f64,

        /// Output file for the artifact (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render the artifact as SVG to this path.
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Crosstab { input, output } => cmd_crosstab(&input, output.as_ref()),
        Commands::FirstStage { input, output } => cmd_first_stage(&input, output.as_ref()),
        Commands::Naive { input, output } => cmd_naive(&input, output.as_ref()),
        Commands::Itt { input, output } => cmd_itt(&input, output.as_ref()),
        Commands::Late { input, output } => cmd_late(&input, output.as_ref()),
        Commands::SimulateWeak { n, seed, attenuation, direct_effect, output } => {
            cmd_simulate_weak(n, seed, attenuation, direct_effect, output.as_ref())
        }
        Commands::Generate { n, seed, output } => cmd_generate(n, seed, &output),
        Commands::Viz { command } => match command {
            VizCommands::Scatter { input, seed, jitter, output, svg } => {
                cmd_viz_scatter(&input, seed, jitter, output.as_ref(), svg.as_ref())
            }
        },
        Commands::Report { input, output, markdown } => {
            cmd_report(&input, output.as_ref(), markdown.as_ref())
        }
        Commands::Version => {
            println!("causeway {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

fn cmd_crosstab(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let tab = crosstab(data.sms(), data.net_use(), "sms", "net_use")?;
    let shares = compliance_shares(&tab)?;
    write_json(
        output,
        json!({
            "crosstab": tab,
            "compliance_shares": shares,
        }),
    )
}

fn cmd_first_stage(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let fit = simple_ols(data.net_use(), data.sms(), "sms")?;
    tracing::info!(f_stat = fit.f_stat, "first stage complete");
    let is_strong = fit.f_stat > STRONG_INSTRUMENT_F;
    write_json(
        output,
        json!({
            "fit": report::fit_json(&fit),
            "f_threshold": STRONG_INSTRUMENT_F,
            "is_strong": is_strong,
        }),
    )
}

fn cmd_naive(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let fit = simple_ols(data.malaria(), data.net_use(), "net_use")?;
    write_json(output, report::fit_json(&fit))
}

fn cmd_itt(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let fit = simple_ols(data.malaria(), data.sms(), "sms")?;
    write_json(output, report::fit_json(&fit))
}

fn cmd_late(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let res = iv_2sls(data.malaria(), data.net_use(), data.sms())?;
    tracing::info!(late = res.late, wald = res.wald_ratio, "2SLS complete");
    write_json(
        output,
        json!({
            "estimate": res.late,
            "se": res.se,
            "intercept": res.intercept,
            "intercept_se": res.intercept_se,
            "wald_ratio": res.wald_ratio,
            "first_stage": res.first_stage,
            "n_obs": res.n_obs,
        }),
    )
}

fn cmd_simulate_weak(
    n: usize,
    seed: u64,
    attenuation: f64,
    direct_effect: f64,
    output: Option<&PathBuf>,
) -> Result<()> {
    let config = WeakIvConfig { n, seed, attenuation, direct_effect, ..Default::default() };
    let contrast = weak_instrument_contrast(&config)?;
    tracing::info!(
        strong_f = contrast.strong.f_stat,
        weak_f = contrast.weak.f_stat,
        "weak-instrument contrast complete"
    );
    write_json(
        output,
        json!({
            "strong": contrast.strong,
            "weak": contrast.weak,
            "attenuation": contrast.attenuation,
            "n": contrast.n,
            "seed": contrast.seed,
        }),
    )
}

fn cmd_generate(n: usize, seed: u64, output: &PathBuf) -> Result<()> {
    let config = EncouragementConfig { n, seed, ..Default::default() };
    let data = generate_encouragement(&config)?;
    data::write_trial_csv(output, &data)?;
    tracing::info!(path = %output.display(), rows = data.n(), "dataset written");
    Ok(())
}

fn cmd_viz_scatter(
    input: &PathBuf,
    seed: u64,
    jitter: f64,
    output: Option<&PathBuf>,
    svg: Option<&PathBuf>,
) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let artifact = cw_viz::compliance_scatter(&data, seed, jitter)?;
    if let Some(path) = svg {
        let rendered = cw_viz::render_scatter_svg(&artifact, 480.0, 360.0);
        std::fs::write(path, rendered)?;
        tracing::info!(path = %path.display(), "scatter SVG written");
    }
    write_json(output, serde_json::to_value(&artifact)?)
}

fn cmd_report(
    input: &PathBuf,
    output: Option<&PathBuf>,
    markdown: Option<&PathBuf>,
) -> Result<()> {
    let data = data::load_trial_csv(input)?;
    let analysis = report::run_analysis(&data)?;
    if let Some(path) = markdown {
        std::fs::write(path, report::report_markdown(&analysis, &data))?;
        tracing::info!(path = %path.display(), "markdown report written");
    }
    let doc = report::report_json(&analysis, &data, input)?;
    write_json(output, doc)
}
