//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("index {index} out of range for {collection} (length {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why a single field was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorReason {
    #[error("missing required field")]
    Missing,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unrecognized value '{value}' (expected one of PENDING, PAID, DELIVERED)")]
    UnknownVariant { value: String },

    #[error("must not be empty")]
    Empty,

    #[error("unknown field")]
    UnknownField,
}

/// A rejected field and where it lives in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// e.g. `students[2].friends[0].state`
    pub path: String,
    pub reason: FieldErrorReason,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Structural mismatch against the document shape, one entry per offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid document: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// First error reported for `path`, if any.
    pub fn at(&self, path: &str) -> Option<&FieldErrorReason> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.reason)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
