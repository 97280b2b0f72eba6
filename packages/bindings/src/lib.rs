use chrono::Utc;
use napi::Result as NapiResult;
use napi_derive::napi;

use bot_provisioning_core::loan_classification::{
    classification, compliance, portfolio, ComplianceInput, LoanInput, PortfolioInput,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// `{ "loan": {...}, "as_of"?: "..." }` -> ClassificationResult JSON.
#[napi]
pub fn classify_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = input.as_of.unwrap_or_else(Utc::now);
    let output = classification::classify_loan(&input.loan, as_of);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `{ "loans": [...], "as_of"?: "..." }` -> enveloped PortfolioClassification JSON.
#[napi]
pub fn classify_portfolio(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        portfolio::classify_portfolio_with_metadata(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Compliance
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_bot_compliance(input_json: String) -> NapiResult<bool> {
    let input: ComplianceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = input.as_of.unwrap_or_else(Utc::now);
    Ok(compliance::validate_bot_compliance(
        &input.loan,
        &input.classification,
        as_of,
    ))
}

#[napi]
pub fn check_compliance(input_json: String) -> NapiResult<String> {
    let input: ComplianceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let as_of = input.as_of.unwrap_or_else(Utc::now);
    let tolerance = input
        .tolerance
        .unwrap_or(compliance::DEFAULT_RATE_TOLERANCE);
    let output =
        compliance::check_compliance(&input.loan, &input.classification, as_of, tolerance);
    serde_json::to_string(&output).map_err(to_napi_error)
}
