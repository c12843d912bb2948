use std::result::Result as StdResult;

use thiserror::Error;

/// Faults raised at the library boundary.
///
/// User-facing validation problems never surface here; they land in the
/// [`ErrorMap`](crate::form::ErrorMap) and the workflow's alert queue instead.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Step must be between 1 and 4, got {0}")]
    InvalidStep(String),
    #[error("`{value}` is not a valid choice for {field} (expected one of: {options})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        options: String,
    },
    #[error("`{value}` is not a valid value for {field} (expected {format})")]
    InvalidPick {
        field: &'static str,
        value: String,
        format: &'static str,
    },
    #[error("{0} does not accept this kind of input")]
    UnsupportedInput(&'static str),
    #[error("Payment verification needs a running async runtime")]
    RuntimeUnavailable,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, WizardError>;
