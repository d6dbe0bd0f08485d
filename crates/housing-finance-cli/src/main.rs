mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::financing::FinancingArgs;
use commands::tracking::TrackPaymentsArgs;

/// Housing purchase financing simulations
#[derive(Parser)]
#[command(
    name = "hfin",
    version,
    about = "Housing purchase financing simulations",
    long_about = "A CLI for housing purchase financing with decimal precision. \
                  Computes the credit left after down payment, subsidy, severance-fund \
                  and bonus contributions, prices it as a fixed-rate monthly annuity, \
                  compares terms, builds amortization schedules and tracks payments."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file overriding the default financing policy (caps, allowed terms)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "hfin=trace"
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the financing calculator on values as given
    Financing(FinancingArgs),
    /// Clamp values to the policy limits, then run the calculator
    Simulate(FinancingArgs),
    /// Compare every allowed term for the same purchase
    CompareTerms(FinancingArgs),
    /// Month-by-month amortization schedule of the financed credit
    Schedule(FinancingArgs),
    /// Compare recorded payments with a financing plan
    TrackPayments(TrackPaymentsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> =
        config::load_policy(cli.policy.as_deref())
            .map_err(Into::into)
            .and_then(|policy| match cli.command {
                Commands::Financing(args) => commands::financing::run_financing(args),
                Commands::Simulate(args) => commands::financing::run_simulate(args, policy),
                Commands::CompareTerms(args) => {
                    commands::financing::run_compare_terms(args, policy)
                }
                Commands::Schedule(args) => commands::schedule::run_schedule(args),
                Commands::TrackPayments(args) => commands::tracking::run_track_payments(args),
                Commands::Version => Ok(serde_json::json!({
                    "name": "hfin",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            });

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
