pub mod error;
pub mod loan_classification;
pub mod types;
pub mod validation;

pub use error::ProvisioningError;
pub use types::*;

/// Standard result type for all provisioning operations
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
