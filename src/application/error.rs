//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, ValidationError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("storage unavailable for key '{key}'")]
    StorageUnavailable {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored data under '{key}' could not be restored: {reason}")]
    CorruptStoredState { key: String, reason: String },

    #[error("cannot import {source_name}: {failure}")]
    ImportParse {
        source_name: String,
        failure: ImportFailure,
    },

    #[error("no file selected")]
    NoFileSelected,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Per-field errors, if this error carries any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ApplicationError::Domain(DomainError::Validation(v)) => Some(v),
            ApplicationError::ImportParse {
                failure: ImportFailure::Invalid(v),
                ..
            } => Some(v),
            _ => None,
        }
    }
}

/// Why an import was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportFailure {
    #[error("not valid JSON: {0}")]
    Syntax(String),

    #[error("{0}")]
    Invalid(ValidationError),
}

impl From<ValidationError> for ApplicationError {
    fn from(e: ValidationError) -> Self {
        ApplicationError::Domain(DomainError::Validation(e))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
