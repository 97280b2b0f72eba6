//! Bank of Tanzania loan classification and provisioning.

pub mod classification;
pub mod portfolio;

#[cfg(feature = "compliance")]
pub mod compliance;

pub use classification::{
    bucket_table, categorize, classify_loan, days_past_due, ClassificationResult, DayBucket,
    LoanCategory, LoanInput,
};
pub use portfolio::{
    classify_portfolio, classify_portfolio_with_metadata, portfolio_at_risk, CategoryBucket,
    PortfolioBuckets, PortfolioClassification, PortfolioInput,
};

#[cfg(feature = "compliance")]
pub use compliance::{check_compliance, validate_bot_compliance, ComplianceCheck, ComplianceInput};
