mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use std::process;

use bot_provisioning_core::parse_evaluation_date;

use commands::classification::{ClassifyLoanArgs, ClassifyPortfolioArgs};
use commands::compliance::CheckComplianceArgs;
use commands::RunContext;
use config::Settings;

/// Bank of Tanzania loan classification and provisioning
#[derive(Parser)]
#[command(
    name = "botp",
    version,
    about = "Bank of Tanzania loan classification and provisioning",
    long_about = "Classifies microfinance loans into BOT risk categories by days past due, \
                  computes required provisions, and aggregates portfolio NPL ratio, \
                  PAR30/PAR90 and provision coverage. Reads JSON or YAML loan records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format [default: from config, else json]
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Evaluation date, YYYY-MM-DD or RFC 3339 [default: now]
    #[arg(long, global = true)]
    as_of: Option<String>,

    /// Settings file [default: <config dir>/bot-provisioning/config.toml]
    #[arg(long, global = true)]
    config: Option<String>,

    /// Classify without rejecting malformed loan records
    #[arg(long, global = true)]
    skip_validation: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single loan and compute its provision
    ClassifyLoan(ClassifyLoanArgs),
    /// Classify a list of loans and aggregate portfolio statistics
    ClassifyPortfolio(ClassifyPortfolioArgs),
    /// Check a stored classification against a fresh one
    CheckCompliance(CheckComplianceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("botp {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let (format, ctx) = match resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => fail(e),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::ClassifyLoan(args) => commands::classification::run_classify_loan(args, &ctx),
        Commands::ClassifyPortfolio(args) => {
            commands::classification::run_classify_portfolio(args, &ctx)
        }
        Commands::CheckCompliance(args) => commands::compliance::run_check_compliance(args, &ctx),
        Commands::Version => return,
    };

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

/// Merge flags over the settings file.
fn resolve(cli: &Cli) -> Result<(OutputFormat, RunContext), Box<dyn std::error::Error>> {
    let settings = Settings::load(cli.config.as_deref())?;
    let as_of = cli
        .as_of
        .as_deref()
        .map(parse_evaluation_date)
        .transpose()?;

    let format = cli.output.clone().unwrap_or(settings.output);
    let ctx = RunContext {
        as_of,
        compliance_tolerance: settings.compliance_tolerance,
        validate_input: settings.validate_input && !cli.skip_validation,
    };
    Ok((format, ctx))
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
