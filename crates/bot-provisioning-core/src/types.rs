use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ProvisioningError;
use crate::ProvisioningResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Portfolio ratios expressed in percentage points (37.5 = 37.5%).
pub type Percent = Decimal;

/// Selects which day-past-due bucket table applies to a loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    #[default]
    #[serde(alias = "General")]
    General,
    #[serde(alias = "HousingMicrofinance", alias = "housing")]
    HousingMicrofinance,
}

/// A loan as supplied by the caller for classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    /// Basis for provisioning.
    pub outstanding_amount: Money,
    #[serde(default)]
    pub principal_amount: Money,
    #[serde(default)]
    pub interest_rate: Rate,
    #[serde(default)]
    pub loan_type: LoanType,
    #[serde(default, deserialize_with = "lenient_date")]
    pub disbursement_date: Option<NaiveDate>,
    /// Anchor for days past due. Missing or unparseable values read as `None`.
    #[serde(default, deserialize_with = "lenient_date")]
    pub maturity_date: Option<NaiveDate>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse an evaluation instant. A bare date is taken as midnight UTC.
pub fn parse_evaluation_date(raw: &str) -> ProvisioningResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| {
        ProvisioningError::DateError(format!(
            "'{}' is not a YYYY-MM-DD date or RFC 3339 timestamp: {}",
            raw, e
        ))
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| ProvisioningError::DateError(format!("'{}' has no midnight", raw)))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_date(&s),
        _ => None,
    })
}
