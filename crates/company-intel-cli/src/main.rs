mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use std::process;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::analysis::{AnalysisArgs, ReportArgs};
use config::CliConfig;

/// Company analytics over annual financial filings
#[derive(Parser)]
#[command(
    name = "cintel",
    version,
    about = "Company analytics over annual financial filings",
    long_about = "Loads a snapshot of company filings (JSON record array or wide CSV export) \
                  and computes growth trends, health scores, segmentation, county roll-ups, \
                  revenue forecasts with bankruptcy risk, and fraud-pattern risk scores."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to the config file value, then json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Log debug events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// YAML file with default input, output and log level
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank companies by revenue CAGR, COVID impact and profit
    Trends(AnalysisArgs),
    /// Compute the 0-100 financial health score
    Health(AnalysisArgs),
    /// Size class, specialisation and business-model segmentation
    Segments(AnalysisArgs),
    /// County roll-ups and market concentration
    Geography(AnalysisArgs),
    /// Revenue forecast, revenue anomalies and bankruptcy risk
    Forecast(AnalysisArgs),
    /// Sector benchmarks and per-company fraud-pattern risk
    Fraud(AnalysisArgs),
    /// Run every analysis and bundle the results
    Report(ReportArgs),
    /// Load and validate a snapshot, reporting its coverage
    Validate(AnalysisArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to install logger: {}", "warning".yellow(), e);
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(CliConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    init_tracing(&config.log_level(cli.verbose));
    let format = config.output_format(cli.output);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Trends(args) => commands::analysis::run_trends(args, &config),
        Commands::Health(args) => commands::analysis::run_health(args, &config),
        Commands::Segments(args) => commands::analysis::run_segments(args, &config),
        Commands::Geography(args) => commands::analysis::run_geography(args, &config),
        Commands::Forecast(args) => commands::analysis::run_forecast(args, &config),
        Commands::Fraud(args) => commands::analysis::run_fraud(args, &config),
        Commands::Report(args) => commands::analysis::run_report(args, &config),
        Commands::Validate(args) => commands::validate::run_validate(args, &config),
        Commands::Version => {
            println!("cintel {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
