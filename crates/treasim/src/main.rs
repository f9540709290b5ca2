//! Command-line front end for the treasury simulation engine.
//!
//! Thin glue only: loads scenario/history files, runs the engine, prints
//! tables. All algorithmic content lives in `treasim_core`.

mod load;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use treasim_core::config::SimulationConfig;
use treasim_core::model::{BucketMap, TargetWeights};
use treasim_core::rolling::{RollingConfig, optimize_rolling};
use treasim_core::simulation::monte_carlo_simulate;
use treasim_core::stress::{evaluate_scenarios, standard_catalogue};

#[derive(Parser, Debug)]
#[command(name = "treasim")]
#[command(version, about = "Treasury portfolio simulation and optimization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the Monte Carlo simulation and print the risk summary
    Simulate {
        /// YAML scenario file; the reference scenario when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },
    /// Fit rolling-window weights on a CSV return history
    Optimize {
        /// CSV history with columns Date,short_term,medium_term,long_term
        history: PathBuf,

        /// YAML optimizer configuration; built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Apply the shock catalogue to an allocation snapshot
    Stress {
        /// Portfolio value to stress
        #[arg(long, default_value_t = 2000.0)]
        value: f64,

        /// Weights as short,medium,long fractions summing to 1
        #[arg(long, default_value = "0.70,0.15,0.15")]
        weights: String,
    },
}

fn init_logging(level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("treasim={level},treasim_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
    Ok(())
}

fn parse_weights(raw: &str) -> color_eyre::Result<TargetWeights> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| eyre!("bad weight in {raw:?}: {e}"))?;
    let [short_term, medium_term, long_term] = parts[..] else {
        return Err(eyre!(
            "expected three comma-separated weights, got {}",
            parts.len()
        ));
    };
    TargetWeights::new(BucketMap::new(short_term, medium_term, long_term)).map_err(Into::into)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Simulate { scenario } => {
            let config = match scenario {
                Some(path) => load::load_scenario(&path)?,
                None => SimulationConfig::default(),
            };
            info!(
                trials = config.n_simulations,
                horizon = config.horizon_years,
                "running Monte Carlo simulation"
            );
            let result = monte_carlo_simulate(&config)?;
            report::print_summary(&result.summary);
        }
        Commands::Optimize { history, config } => {
            let rolling = match config {
                Some(path) => load::load_rolling_config(&path)?,
                None => RollingConfig::default(),
            };
            let history = load::load_history(&history)?;
            info!(
                periods = history.len(),
                window = rolling.window_len,
                "running rolling-window optimization"
            );
            let run = optimize_rolling(&history, &rolling)?;
            report::print_optimizer_run(&run);
        }
        Commands::Stress { value, weights } => {
            let weights = parse_weights(&weights)?;
            let report = evaluate_scenarios(&weights, value, &standard_catalogue())?;
            report::print_stress_report(&report);
        }
    }

    Ok(())
}
