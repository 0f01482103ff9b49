//! Errors raised outside the services
//!
//! Service failures pass through unchanged. The remaining I/O happens in the
//! command layer: locating the working directory, resolving the storage slot
//! for `config path` and writing the template for `config init`.

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// `context` names the step, e.g. `write ./.partyguests.toml`.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl InfraError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_failed_config_write_when_displayed_then_names_step_and_cause() {
        let err = InfraError::io(
            "write ./.partyguests.toml",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only directory"),
        );

        assert_eq!(
            err.to_string(),
            "write ./.partyguests.toml: read-only directory"
        );
    }

    #[test]
    fn given_no_file_selected_when_wrapped_then_message_unchanged() {
        let err = InfraError::from(ApplicationError::NoFileSelected);

        assert_eq!(err.to_string(), ApplicationError::NoFileSelected.to_string());
    }
}
