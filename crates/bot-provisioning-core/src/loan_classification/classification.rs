//! Bank of Tanzania loan classification.
//!
//! Covers:
//! 1. **Days past due** -- whole calendar days since maturity, clamped at zero.
//! 2. **Bucket tables** -- day-past-due intervals per loan type.
//! 3. **Provision rates** -- fixed regulatory rate per category.
//! 4. **Review scheduling** -- quarterly for Current, monthly otherwise.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{LoanRecord, LoanType, Money, Rate};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Regulatory risk category, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    #[serde(alias = "Current")]
    Current,
    #[serde(alias = "Especially Mentioned", alias = "EspeciallyMentioned")]
    EspeciallyMentioned,
    #[serde(alias = "Substandard")]
    Substandard,
    #[serde(alias = "Doubtful")]
    Doubtful,
    #[serde(alias = "Loss")]
    Loss,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 5] = [
        LoanCategory::Current,
        LoanCategory::EspeciallyMentioned,
        LoanCategory::Substandard,
        LoanCategory::Doubtful,
        LoanCategory::Loss,
    ];

    /// Provision rate as a fraction of outstanding.
    pub fn provision_rate(self) -> Rate {
        match self {
            LoanCategory::Current => dec!(0.01),
            LoanCategory::EspeciallyMentioned => dec!(0.05),
            LoanCategory::Substandard => dec!(0.25),
            LoanCategory::Doubtful => dec!(0.50),
            LoanCategory::Loss => Decimal::ONE,
        }
    }

    pub fn review_interval_months(self) -> u32 {
        match self {
            LoanCategory::Current => 3,
            _ => 1,
        }
    }

    /// Substandard, Doubtful and Loss count towards NPL.
    pub fn is_non_performing(self) -> bool {
        matches!(
            self,
            LoanCategory::Substandard | LoanCategory::Doubtful | LoanCategory::Loss
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanCategory::Current => "Current",
            LoanCategory::EspeciallyMentioned => "Especially Mentioned",
            LoanCategory::Substandard => "Substandard",
            LoanCategory::Doubtful => "Doubtful",
            LoanCategory::Loss => "Loss",
        }
    }
}

impl fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Bucket tables
// ---------------------------------------------------------------------------

/// Closed day-past-due interval. `max_days == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub category: LoanCategory,
    pub min_days: u32,
    pub max_days: Option<u32>,
}

impl DayBucket {
    pub fn contains(&self, days: u32) -> bool {
        days >= self.min_days && self.max_days.map_or(true, |max| days <= max)
    }
}

const fn bucket(category: LoanCategory, min_days: u32, max_days: Option<u32>) -> DayBucket {
    DayBucket {
        category,
        min_days,
        max_days,
    }
}

static GENERAL_BUCKETS: [DayBucket; 5] = [
    bucket(LoanCategory::Current, 0, Some(5)),
    bucket(LoanCategory::EspeciallyMentioned, 6, Some(30)),
    bucket(LoanCategory::Substandard, 31, Some(60)),
    bucket(LoanCategory::Doubtful, 61, Some(90)),
    bucket(LoanCategory::Loss, 91, None),
];

// Housing microfinance has no Especially Mentioned band.
static HOUSING_BUCKETS: [DayBucket; 4] = [
    bucket(LoanCategory::Current, 0, Some(90)),
    bucket(LoanCategory::Substandard, 91, Some(180)),
    bucket(LoanCategory::Doubtful, 181, Some(360)),
    bucket(LoanCategory::Loss, 361, None),
];

/// Bucket table for a loan type, in ascending day order.
pub fn bucket_table(loan_type: LoanType) -> &'static [DayBucket] {
    match loan_type {
        LoanType::General => &GENERAL_BUCKETS,
        LoanType::HousingMicrofinance => &HOUSING_BUCKETS,
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// A single loan with an optional evaluation instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan: LoanRecord,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Classification of a single loan at an evaluation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub loan_id: String,
    pub category: LoanCategory,
    pub days_past_due: u32,
    pub provision_rate: Rate,
    /// outstanding_amount x provision_rate, unrounded.
    pub provision_amount: Money,
    pub classification_date: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
    /// True when the loan had no usable maturity date and was treated as not yet due.
    #[serde(default)]
    pub maturity_date_missing: bool,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Whole calendar days from maturity to `as_of`, never negative.
///
/// Counts date boundaries crossed, not 24-hour periods: the time of day of
/// the evaluation instant is dropped before subtracting, so a loan that
/// matured on the 25th is 5 days past due at any time on the 30th.
pub fn days_past_due(maturity_date: Option<NaiveDate>, as_of: NaiveDate) -> u32 {
    let Some(maturity) = maturity_date else {
        return 0;
    };
    let days = (as_of - maturity).num_days();
    if days <= 0 {
        0
    } else {
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

/// Map days past due onto the loan type's bucket table.
pub fn categorize(loan_type: LoanType, days_past_due: u32) -> LoanCategory {
    bucket_table(loan_type)
        .iter()
        .find(|b| b.contains(days_past_due))
        .map(|b| b.category)
        .unwrap_or(LoanCategory::Loss)
}

/// `as_of` plus the category's review interval.
pub fn next_review_date(category: LoanCategory, as_of: DateTime<Utc>) -> DateTime<Utc> {
    as_of
        .checked_add_months(Months::new(category.review_interval_months()))
        .unwrap_or(as_of)
}

/// Classify one loan as of `as_of`. Total for every input.
pub fn classify_loan(loan: &LoanRecord, as_of: DateTime<Utc>) -> ClassificationResult {
    let days_past_due = days_past_due(loan.maturity_date, as_of.date_naive());
    let category = categorize(loan.loan_type, days_past_due);
    let provision_rate = category.provision_rate();

    ClassificationResult {
        loan_id: loan.id.clone(),
        category,
        days_past_due,
        provision_rate,
        provision_amount: loan.outstanding_amount * provision_rate,
        classification_date: as_of,
        next_review_date: next_review_date(category, as_of),
        maturity_date_missing: loan.maturity_date.is_none(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
