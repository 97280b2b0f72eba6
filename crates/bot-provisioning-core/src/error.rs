use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Duplicate loan id: {0}")]
    DuplicateLoanId(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProvisioningError {
    fn from(e: serde_json::Error) -> Self {
        ProvisioningError::SerializationError(e.to_string())
    }
}
