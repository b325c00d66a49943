use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    /// Input rejected before it reached the ledger store
    #[error("Invalid input for field `{0}`: {1}")]
    Validation(String, FieldError),

    /// Remote call failed, timed out or returned an unexpected shape
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),

    /// Balances do not sum to zero; settlement generation refuses to run
    #[error("Inconsistent ledger: balances sum to {residual} instead of 0")]
    InconsistentLedger { residual: Decimal },

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Auth id {0} already registered")]
    AlreadyRegistered(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl LedgerError {
    pub fn validation(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        LedgerError::Validation(field.to_string(), FieldError::new(field, title, description))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(..))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LedgerError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
