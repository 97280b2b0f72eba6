pub mod classification;
pub mod compliance;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Settings resolved from flags and the config file, shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// `--as-of`, if given. Commands fall back to the input's own date, then now.
    pub as_of: Option<DateTime<Utc>>,
    pub compliance_tolerance: Decimal,
    pub validate_input: bool,
}
