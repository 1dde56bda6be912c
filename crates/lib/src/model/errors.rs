//! Errors collected by the user record adapter

use thiserror::Error;

use crate::Error;

/// An error recorded by a create or update call.
///
/// The adapter never returns these; it collects them so callers can inspect
/// them after each operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// One message of a structured error reported by the account store.
    #[error("{message}")]
    Platform { code: String, message: String },

    /// `update` was called before any user was loaded or created.
    #[error("No item to update")]
    NoItemToUpdate,
}

impl ModelError {
    /// The platform error code, if this came from the account store.
    pub fn code(&self) -> Option<&str> {
        match self {
            ModelError::Platform { code, .. } => Some(code),
            ModelError::NoItemToUpdate => None,
        }
    }

    /// Check if this error was reported by the account store.
    pub fn is_platform_error(&self) -> bool {
        matches!(self, ModelError::Platform { .. })
    }

    /// Check if this error is a violated precondition of the adapter itself.
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, ModelError::NoItemToUpdate)
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Error::Model(err)
    }
}
