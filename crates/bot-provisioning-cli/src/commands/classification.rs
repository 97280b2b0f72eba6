use chrono::Utc;
use clap::Args;
use serde_json::Value;

use bot_provisioning_core::loan_classification::classification::{self, LoanInput};
use bot_provisioning_core::loan_classification::portfolio::{self, PortfolioInput};
use bot_provisioning_core::{validation, LoanRecord};

use super::RunContext;
use crate::input;

#[derive(Args)]
pub struct ClassifyLoanArgs {
    /// Path to a JSON or YAML loan record, or `{ "loan": {...}, "as_of": ... }`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ClassifyPortfolioArgs {
    /// Path to a JSON or YAML list of loans, or `{ "loans": [...], "as_of": ... }`
    #[arg(long)]
    pub input: Option<String>,
}

/// A bare loan record, or a `{ "loan", "as_of" }` wrapper.
fn loan_input(value: Value) -> Result<LoanInput, serde_json::Error> {
    match value {
        Value::Object(ref map) if map.contains_key("loan") => serde_json::from_value(value),
        other => Ok(LoanInput {
            loan: serde_json::from_value(other)?,
            as_of: None,
        }),
    }
}

/// A bare list of loans, or a full `{ "loans", "as_of" }` object.
fn portfolio_input(value: Value) -> Result<PortfolioInput, Box<dyn std::error::Error>> {
    match value {
        Value::Array(_) => {
            let loans: Vec<LoanRecord> = serde_json::from_value(value)?;
            Ok(PortfolioInput { loans, as_of: None })
        }
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Err("portfolio input must be a list of loans or an object with \"loans\"".into()),
    }
}

pub fn run_classify_loan(
    args: ClassifyLoanArgs,
    ctx: &RunContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = loan_input(input::load(args.input.as_deref())?)?;
    if ctx.validate_input {
        validation::validate_loan(&loan_input.loan)?;
    }
    let as_of = ctx.as_of.or(loan_input.as_of).unwrap_or_else(Utc::now);
    let result = classification::classify_loan(&loan_input.loan, as_of);
    Ok(serde_json::to_value(result)?)
}

pub fn run_classify_portfolio(
    args: ClassifyPortfolioArgs,
    ctx: &RunContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut portfolio_input = portfolio_input(input::load(args.input.as_deref())?)?;
    if ctx.validate_input {
        validation::validate_portfolio(&portfolio_input.loans)?;
    }
    if ctx.as_of.is_some() {
        portfolio_input.as_of = ctx.as_of;
    }
    log::info!("classifying {} loans", portfolio_input.loans.len());
    let result = portfolio::classify_portfolio_with_metadata(&portfolio_input)?;
    Ok(serde_json::to_value(result)?)
}
