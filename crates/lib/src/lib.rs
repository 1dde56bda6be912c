//!
//! userbridge: maps form field sets onto platform user accounts and per-user metadata.
//!
//! ## Core Concepts
//!
//! * **Field sets (`fields::FieldSet`)**: Ordered name/value maps submitted by a form framework.
//! * **Policies (`policy::FieldPolicy`)**: Decide which submitted fields are accepted and which of them are account columns.
//! * **Platform (`platform`)**: The account store, metadata store, and hook registry the adapter talks to, as traits.
//!     * **InMemoryPlatform (`platform::InMemoryPlatform`)**: A complete in-process implementation with JSON persistence.
//! * **UserRecordAdapter (`model::UserRecordAdapter`)**: Creates, updates, and reads users from field sets, collecting errors instead of failing.
//! * **Hook suspension (`hooks::HookSuspension`)**: Keeps the adapter's own callback quiet while it writes accounts.

pub mod clock;
pub mod constants;
pub mod fields;
pub mod hooks;
pub mod model;
pub mod platform;
pub mod policy;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use fields::FieldSet;
pub use model::{ModelError, UserRecordAdapter};
pub use platform::{
    AccountApi, HandlerRef, HookRegistry, InMemoryPlatform, MetadataApi, PlatformError, UserId,
    UserRecord,
};
pub use policy::{ConfigError, FieldPolicy, ModelConfig, ModelPolicy};

/// Result type used throughout the userbridge library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the userbridge library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors reported by an account store
    #[error(transparent)]
    Platform(platform::PlatformError),

    /// Errors collected by the user record adapter
    #[error(transparent)]
    Model(model::ModelError),

    /// Model configuration loading errors
    #[error(transparent)]
    Config(policy::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Platform(_) => "platform",
            Error::Model(_) => "model",
            Error::Config(_) => "policy",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Platform(platform_err) => platform_err.is_not_found(),
            Error::Config(config_err) => config_err.is_not_found(),
            Error::Io(io_err) => io_err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Platform(platform_err) => platform_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error is a (de)serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Config(config_err) => config_err.is_parse_error(),
            _ => false,
        }
    }

    /// Check if this error is a violated adapter precondition.
    pub fn is_precondition_error(&self) -> bool {
        match self {
            Error::Model(model_err) => model_err.is_precondition_error(),
            _ => false,
        }
    }
}
