//! Contracts of the host platform the adapter talks to.
//!
//! The adapter never owns user data. Accounts live behind [`AccountApi`],
//! per-user metadata behind [`MetadataApi`], and post-write notifications are
//! dispatched by a [`HookRegistry`]. [`in_memory::InMemoryPlatform`] implements
//! all three for tests, demos, and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    DISPLAY_NAME, ID_COLUMN, USER_ACTIVATION_KEY, USER_EMAIL, USER_LOGIN, USER_NICENAME,
    USER_PASS, USER_REGISTERED, USER_STATUS, USER_URL,
};
use crate::fields::FieldSet;

pub mod errors;
pub mod in_memory;

pub use errors::PlatformError;
pub use in_memory::InMemoryPlatform;

/// Identifier of an account record.
pub type UserId = u64;

/// A user account as persisted by the account store.
///
/// `user_pass` holds whatever the store persisted (a hash for the in-memory
/// store); readers that expose fields to forms must never hand it out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "ID")]
    pub id: UserId,
    pub user_login: String,
    pub user_pass: String,
    pub user_nicename: String,
    pub user_email: String,
    pub user_url: String,
    pub user_registered: String,
    pub user_activation_key: String,
    pub user_status: i64,
    pub display_name: String,
}

impl UserRecord {
    /// Read a column by name.
    ///
    /// The identifier is addressed by its canonical column name `ID`. Unknown
    /// names yield `None`.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        let value = match name {
            ID_COLUMN => Value::from(self.id),
            USER_LOGIN => Value::from(self.user_login.as_str()),
            USER_PASS => Value::from(self.user_pass.as_str()),
            USER_NICENAME => Value::from(self.user_nicename.as_str()),
            USER_EMAIL => Value::from(self.user_email.as_str()),
            USER_URL => Value::from(self.user_url.as_str()),
            USER_REGISTERED => Value::from(self.user_registered.as_str()),
            USER_ACTIVATION_KEY => Value::from(self.user_activation_key.as_str()),
            USER_STATUS => Value::from(self.user_status),
            DISPLAY_NAME => Value::from(self.display_name.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

/// Name under which a callback is registered in a [`HookRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for HandlerRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Account store operations.
pub trait AccountApi: Send + Sync {
    /// Fetch a full record, or `None` if the id does not resolve.
    fn fetch_user(&self, id: UserId) -> Option<UserRecord>;

    /// Create an account from built-in fields and return its new id.
    fn create_user(&self, fields: &FieldSet) -> Result<UserId, PlatformError>;

    /// Update the account named by the `ID` field and return its id.
    fn update_user(&self, fields: &FieldSet) -> Result<UserId, PlatformError>;
}

/// Per-user key/value metadata operations.
///
/// Storage failures are not modeled at this layer.
pub trait MetadataApi: Send + Sync {
    /// Read the single value stored under `key`, if any.
    fn get_meta(&self, owner: UserId, key: &str) -> Option<Value>;

    /// Insert or replace the value stored under `key`.
    fn set_meta(&self, owner: UserId, key: &str, value: Value);

    /// Remove the value stored under `key`.
    fn delete_meta(&self, owner: UserId, key: &str);
}

/// Suspension control over registered hook callbacks.
///
/// Calls come in matched pairs; see [`crate::hooks::HookSuspension`].
pub trait HookRegistry: Send + Sync {
    /// Stop dispatching `event` to `handler` until resumed.
    fn suspend(&self, event: &str, handler: &HandlerRef);

    /// Undo one prior [`HookRegistry::suspend`] for the same pair.
    fn resume(&self, event: &str, handler: &HandlerRef);
}
