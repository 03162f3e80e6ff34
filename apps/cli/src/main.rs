#![deny(warnings)]

//! Headless CLI that runs a batch of seeded random craft attempts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use craft_runtime::{run_batch, BatchReport, RunConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CRAFT_SIM_GIT_SHA"),
    " ",
    env!("CRAFT_SIM_COMMIT_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "craft-sim")]
#[command(about = "Run seeded crafting attempts and summarize the outcomes", long_about = None)]
#[command(version = VERSION)]
struct Args {
    /// YAML run config; command-line values take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of attempts
    #[arg(long)]
    attempts: Option<u32>,

    /// Turn limit per attempt
    #[arg(long)]
    max_turns: Option<u32>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_yaml::from_str::<RunConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RunConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    if let Some(attempts) = args.attempts {
        config.attempts = attempts;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    Ok(config)
}

fn print_summary(report: &BatchReport) {
    let pct = |n: u32| f64::from(n) * 100.0 / f64::from(report.attempts);
    println!(
        "Batch | seed: {} | attempts: {}",
        report.rng_seed, report.attempts
    );
    println!(
        "Outcomes | completed: {} ({:.1}%) | broken: {} ({:.1}%) | out of cp: {} ({:.1}%) | turn limit: {} ({:.1}%)",
        report.completed,
        pct(report.completed),
        report.broken,
        pct(report.broken),
        report.out_of_cp,
        pct(report.out_of_cp),
        report.turn_limit,
        pct(report.turn_limit)
    );
    match (report.best_quality, report.best_attempt) {
        (Some(quality), Some(index)) => println!(
            "Quality | best: {} (attempt {}) | mean: {:.1} | mean turns: {:.1}",
            quality, index, report.mean_quality, report.mean_turns
        ),
        _ => println!(
            "Quality | best: n/a | mean: {:.1} | mean turns: {:.1}",
            report.mean_quality, report.mean_turns
        ),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(?config, "starting craft-sim");

    let report = run_batch(&config).context("running batch")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}
