use chrono::Utc;
use clap::Args;
use serde_json::Value;

use bot_provisioning_core::loan_classification::compliance::{self, ComplianceInput};
use bot_provisioning_core::validation;

use super::RunContext;
use crate::input;

#[derive(Args)]
pub struct CheckComplianceArgs {
    /// Path to JSON/YAML `{ "loan": {...}, "classification": {...} }`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_check_compliance(
    args: CheckComplianceArgs,
    ctx: &RunContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: ComplianceInput = input::load(args.input.as_deref())?;
    if ctx.validate_input {
        validation::validate_loan(&input_data.loan)?;
    }
    let as_of = ctx.as_of.or(input_data.as_of).unwrap_or_else(Utc::now);
    let tolerance = input_data.tolerance.unwrap_or(ctx.compliance_tolerance);

    let check = compliance::check_compliance(
        &input_data.loan,
        &input_data.classification,
        as_of,
        tolerance,
    );
    if !check.compliant {
        log::warn!(
            "loan {} classification is stale: {}",
            check.loan_id,
            check.mismatches.join("; ")
        );
    }
    Ok(serde_json::to_value(check)?)
}
