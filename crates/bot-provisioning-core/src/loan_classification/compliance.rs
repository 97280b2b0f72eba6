//! Detection of stale or manually overridden classifications.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::classification::{classify_loan, ClassificationResult, LoanCategory};
use crate::types::{LoanRecord, Rate};

/// Allowed absolute difference between recorded and expected provision rates.
pub const DEFAULT_RATE_TOLERANCE: Decimal = dec!(0.001);

/// A stored classification paired with the loan it was computed for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceInput {
    pub loan: LoanRecord,
    pub classification: ClassificationResult,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tolerance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub loan_id: String,
    pub compliant: bool,
    pub expected_category: LoanCategory,
    pub recorded_category: LoanCategory,
    pub expected_provision_rate: Rate,
    pub recorded_provision_rate: Rate,
    pub expected_days_past_due: u32,
    pub mismatches: Vec<String>,
}

/// Recompute the classification and compare it with `recorded`.
pub fn check_compliance(
    loan: &LoanRecord,
    recorded: &ClassificationResult,
    as_of: DateTime<Utc>,
    tolerance: Decimal,
) -> ComplianceCheck {
    let expected = classify_loan(loan, as_of);
    let mut mismatches = Vec::new();

    if expected.category != recorded.category {
        mismatches.push(format!(
            "category is {} but {} days past due requires {}",
            recorded.category, expected.days_past_due, expected.category
        ));
    }
    if (expected.provision_rate - recorded.provision_rate).abs() > tolerance {
        mismatches.push(format!(
            "provision rate is {} but {} requires {}",
            recorded.provision_rate, expected.category, expected.provision_rate
        ));
    }

    ComplianceCheck {
        loan_id: loan.id.clone(),
        compliant: mismatches.is_empty(),
        expected_category: expected.category,
        recorded_category: recorded.category,
        expected_provision_rate: expected.provision_rate,
        recorded_provision_rate: recorded.provision_rate,
        expected_days_past_due: expected.days_past_due,
        mismatches,
    }
}

/// True when `classification` matches a fresh classification on category and rate.
pub fn validate_bot_compliance(
    loan: &LoanRecord,
    classification: &ClassificationResult,
    as_of: DateTime<Utc>,
) -> bool {
    check_compliance(loan, classification, as_of, DEFAULT_RATE_TOLERANCE).compliant
}
