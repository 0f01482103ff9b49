//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod validate;

pub use entities::*;
pub use error::{DomainError, DomainResult, FieldError, FieldErrorReason, ValidationError};
pub use validate::{validate, validate_document, ValidationMode};
