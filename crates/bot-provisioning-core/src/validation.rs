//! Caller-side checks on loan records.
//!
//! Classification itself never rejects input; these are for callers that want
//! to refuse malformed batches before classifying them.

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::ProvisioningError;
use crate::types::LoanRecord;
use crate::ProvisioningResult;

pub fn validate_loan(loan: &LoanRecord) -> ProvisioningResult<()> {
    if loan.id.trim().is_empty() {
        return Err(ProvisioningError::InvalidInput {
            field: "id".into(),
            reason: "Loan id must not be empty.".into(),
        });
    }
    if loan.outstanding_amount < Decimal::ZERO {
        return Err(ProvisioningError::InvalidInput {
            field: "outstanding_amount".into(),
            reason: format!("Loan '{}' has negative outstanding amount.", loan.id),
        });
    }
    if loan.principal_amount < Decimal::ZERO {
        return Err(ProvisioningError::InvalidInput {
            field: "principal_amount".into(),
            reason: format!("Loan '{}' has negative principal amount.", loan.id),
        });
    }
    if loan.interest_rate < Decimal::ZERO {
        return Err(ProvisioningError::InvalidInput {
            field: "interest_rate".into(),
            reason: format!("Loan '{}' has negative interest rate.", loan.id),
        });
    }
    if let (Some(disbursed), Some(matures)) = (loan.disbursement_date, loan.maturity_date) {
        if matures < disbursed {
            return Err(ProvisioningError::DateError(format!(
                "Loan '{}' matures ({}) before it was disbursed ({}).",
                loan.id, matures, disbursed
            )));
        }
    }
    Ok(())
}

/// Validate every loan and require ids to be unique within the batch.
pub fn validate_portfolio(loans: &[LoanRecord]) -> ProvisioningResult<()> {
    let mut seen = HashSet::with_capacity(loans.len());
    for loan in loans {
        validate_loan(loan)?;
        if !seen.insert(loan.id.as_str()) {
            return Err(ProvisioningError::DuplicateLoanId(loan.id.clone()));
        }
    }
    Ok(())
}
