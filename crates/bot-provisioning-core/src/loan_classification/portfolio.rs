//! Portfolio-level BOT classification statistics.
//!
//! Covers:
//! 1. **Category buckets** -- count, outstanding and provision per category.
//! 2. **NPL ratio** -- Substandard + Doubtful + Loss share of outstanding.
//! 3. **PAR30 / PAR90** -- share of loan *count* past a day threshold.
//! 4. **Provision coverage** -- required provision over outstanding.
//!
//! Ratios are in percentage points. All arithmetic uses `rust_decimal::Decimal`
//! with checked operations; a sum or ratio that leaves the representable range
//! saturates at `Decimal::MAX` / `Decimal::MIN` and sets `saturated`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::classification::{classify_loan, ClassificationResult, LoanCategory};
use crate::types::{with_metadata, ComputationOutput, LoanRecord, Money, Percent};
use crate::ProvisioningResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Totals for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub count: u64,
    /// Summed outstanding amount.
    pub amount: Money,
    /// Summed provision amount.
    pub provision: Money,
}

impl CategoryBucket {
    /// Returns false when either running sum saturated.
    fn add(&mut self, outstanding: Money, result: &ClassificationResult) -> bool {
        self.count += 1;
        let amount_ok = accumulate(&mut self.amount, outstanding);
        let provision_ok = accumulate(&mut self.provision, result.provision_amount);
        amount_ok && provision_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioBuckets {
    pub current: CategoryBucket,
    pub esm: CategoryBucket,
    pub substandard: CategoryBucket,
    pub doubtful: CategoryBucket,
    pub loss: CategoryBucket,
}

impl PortfolioBuckets {
    pub fn bucket(&self, category: LoanCategory) -> &CategoryBucket {
        match category {
            LoanCategory::Current => &self.current,
            LoanCategory::EspeciallyMentioned => &self.esm,
            LoanCategory::Substandard => &self.substandard,
            LoanCategory::Doubtful => &self.doubtful,
            LoanCategory::Loss => &self.loss,
        }
    }

    pub fn bucket_mut(&mut self, category: LoanCategory) -> &mut CategoryBucket {
        match category {
            LoanCategory::Current => &mut self.current,
            LoanCategory::EspeciallyMentioned => &mut self.esm,
            LoanCategory::Substandard => &mut self.substandard,
            LoanCategory::Doubtful => &mut self.doubtful,
            LoanCategory::Loss => &mut self.loss,
        }
    }

    /// Buckets in category order, best to worst.
    pub fn iter(&self) -> impl Iterator<Item = (LoanCategory, &CategoryBucket)> {
        LoanCategory::ALL.into_iter().map(move |c| (c, self.bucket(c)))
    }
}

/// Input for an enveloped portfolio run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub loans: Vec<LoanRecord>,
    /// Evaluation instant; defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Output of portfolio classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioClassification {
    pub buckets: PortfolioBuckets,
    pub loan_count: u64,
    pub total_outstanding: Money,
    pub total_provision_required: Money,
    pub npl_ratio: Percent,
    pub par30: Percent,
    pub par90: Percent,
    pub provision_coverage_ratio: Percent,
    /// Loans classified without a usable maturity date.
    pub missing_maturity_count: u64,
    /// A total or ratio overflowed and was clamped to the Decimal range.
    #[serde(default)]
    pub saturated: bool,
    /// Per-loan results in input order.
    pub loans: Vec<ClassificationResult>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Classify every loan and aggregate into portfolio statistics.
pub fn classify_portfolio(loans: &[LoanRecord], as_of: DateTime<Utc>) -> PortfolioClassification {
    let mut buckets = PortfolioBuckets::default();
    let mut results = Vec::with_capacity(loans.len());
    let mut total_outstanding = Decimal::ZERO;
    let mut total_provision_required = Decimal::ZERO;
    let mut npl_outstanding = Decimal::ZERO;
    let mut missing_maturity_count = 0u64;
    let mut in_range = true;

    for loan in loans {
        let result = classify_loan(loan, as_of);
        in_range &= buckets
            .bucket_mut(result.category)
            .add(loan.outstanding_amount, &result);

        in_range &= accumulate(&mut total_outstanding, loan.outstanding_amount);
        in_range &= accumulate(&mut total_provision_required, result.provision_amount);
        if result.category.is_non_performing() {
            in_range &= accumulate(&mut npl_outstanding, loan.outstanding_amount);
        }
        if result.maturity_date_missing {
            missing_maturity_count += 1;
        }
        results.push(result);
    }

    let (npl_ratio, npl_ok) = checked_percent_of(npl_outstanding, total_outstanding);
    let (provision_coverage_ratio, coverage_ok) =
        checked_percent_of(total_provision_required, total_outstanding);
    let par30 = portfolio_at_risk(&results, 30);
    let par90 = portfolio_at_risk(&results, 90);
    let saturated = !(in_range && npl_ok && coverage_ok);
    if saturated {
        log::warn!("portfolio totals or ratios overflowed and were saturated");
    }

    log::debug!(
        "classified {} loans as of {}: outstanding={} provision={} npl={}%",
        results.len(),
        as_of.date_naive(),
        total_outstanding,
        total_provision_required,
        npl_ratio
    );

    PortfolioClassification {
        buckets,
        loan_count: results.len() as u64,
        total_outstanding,
        total_provision_required,
        npl_ratio,
        par30,
        par90,
        provision_coverage_ratio,
        missing_maturity_count,
        saturated,
        loans: results,
    }
}

/// Percentage of loans (by count) strictly more than `threshold_days` past due.
pub fn portfolio_at_risk(results: &[ClassificationResult], threshold_days: u32) -> Percent {
    let at_risk = results
        .iter()
        .filter(|r| r.days_past_due > threshold_days)
        .count();
    checked_percent_of(Decimal::from(at_risk), Decimal::from(results.len())).0
}

/// Portfolio classification wrapped in the standard output envelope.
pub fn classify_portfolio_with_metadata(
    input: &PortfolioInput,
) -> ProvisioningResult<ComputationOutput<PortfolioClassification>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let as_of = input.as_of.unwrap_or_else(Utc::now);

    let output = classify_portfolio(&input.loans, as_of);

    if input.loans.is_empty() {
        warnings.push("Portfolio is empty; all ratios reported as zero.".into());
    }

    let missing: Vec<&str> = input
        .loans
        .iter()
        .filter(|l| l.maturity_date.is_none())
        .map(|l| l.id.as_str())
        .collect();
    if !missing.is_empty() {
        log::warn!(
            "{} loan(s) without a usable maturity date classified as Current",
            missing.len()
        );
        warnings.push(format!(
            "{} loan(s) have no usable maturity date and were classified as Current with 0 days past due: {}.",
            missing.len(),
            missing.join(", ")
        ));
    }

    let negative: Vec<&str> = input
        .loans
        .iter()
        .filter(|l| l.outstanding_amount < Decimal::ZERO)
        .map(|l| l.id.as_str())
        .collect();
    if !negative.is_empty() {
        warnings.push(format!(
            "Negative outstanding amount on loan(s) {}; provisions computed mechanically.",
            negative.join(", ")
        ));
    }

    if output.saturated {
        warnings.push(
            "Portfolio totals or ratios exceeded the Decimal range and were saturated; \
             offsetting or extreme outstanding amounts are the usual cause."
                .into(),
        );
    }

    let assumptions = serde_json::json!({
        "as_of": as_of,
        "loan_count": input.loans.len(),
        "npl_categories": ["substandard", "doubtful", "loss"],
        "par_basis": "loan count",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "BOT loan classification and provisioning",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bound for an out-of-range result with the given sign.
fn saturate(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// `acc += value`, clamped to the Decimal range. Returns false on saturation.
fn accumulate(acc: &mut Decimal, value: Decimal) -> bool {
    match acc.checked_add(value) {
        Some(sum) => {
            *acc = sum;
            true
        }
        None => {
            *acc = saturate(value.is_sign_negative());
            false
        }
    }
}

/// `part / whole * 100`, zero when `whole` is zero. The flag is false when
/// the quotient had to be saturated.
fn checked_percent_of(part: Decimal, whole: Decimal) -> (Percent, bool) {
    if whole.is_zero() {
        return (Decimal::ZERO, true);
    }
    match part
        .checked_div(whole)
        .and_then(|q| q.checked_mul(dec!(100)))
    {
        Some(pct) => (pct, true),
        None => (
            saturate(part.is_sign_negative() != whole.is_sign_negative()),
            false,
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
