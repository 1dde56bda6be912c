//! In-memory platform implementation
//!
//! [`InMemoryPlatform`] keeps accounts and metadata in process memory and
//! dispatches hook events through a [`HookBus`]. It can be saved to and loaded
//! from a JSON file.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::clock::{Clock, SystemClock};
use crate::platform::{HandlerRef, HookRegistry, MetadataApi, UserId, UserRecord};

mod accounts;
pub mod crypto;
mod hooks;
mod persistence;

use accounts::AccountTable;
pub use hooks::{HookBus, HookCallback};

/// Metadata entries grouped by owning user.
pub(crate) type MetaTable = BTreeMap<UserId, BTreeMap<String, Value>>;

/// A simple in-memory platform holding accounts, metadata, and hooks.
pub struct InMemoryPlatform {
    pub(crate) accounts: RwLock<AccountTable>,
    pub(crate) meta: RwLock<MetaTable>,
    pub(crate) hooks: HookBus,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlatform {
    /// Creates a new, empty platform using the system clock.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(AccountTable::default()),
            meta: RwLock::new(MetaTable::new()),
            hooks: HookBus::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to stamp registration dates.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The hook bus events are dispatched on.
    pub fn hooks(&self) -> &HookBus {
        &self.hooks
    }

    /// Number of stored accounts.
    pub fn user_count(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .len()
    }

    /// All stored accounts, ordered by id.
    pub fn users(&self) -> Vec<UserRecord> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .values()
            .cloned()
            .collect()
    }

    /// Look an account up by login name (case-insensitive).
    pub fn find_by_login(&self, login: &str) -> Option<UserRecord> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find_by_login(login)
            .cloned()
    }

    /// Check `password` against the stored hash of account `id`.
    pub fn check_password(&self, id: UserId, password: &str) -> bool {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        accounts
            .users
            .get(&id)
            .is_some_and(|user| crypto::verify_password(password, &user.user_pass))
    }

    /// Every metadata entry stored for `owner`.
    pub fn all_meta(&self, owner: UserId) -> BTreeMap<String, Value> {
        self.meta
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&owner)
            .cloned()
            .unwrap_or_default()
    }

    /// Saves the platform state to a JSON file.
    ///
    /// Registered hook callbacks are not part of the saved state.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path)
    }

    /// Loads platform state from a JSON file.
    ///
    /// If the file does not exist, a new, empty platform is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path)
    }
}

impl MetadataApi for InMemoryPlatform {
    fn get_meta(&self, owner: UserId, key: &str) -> Option<Value> {
        self.meta
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&owner)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    fn set_meta(&self, owner: UserId, key: &str, value: Value) {
        debug!(owner, key, "set meta");
        self.meta
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(owner)
            .or_default()
            .insert(key.to_string(), value);
    }

    fn delete_meta(&self, owner: UserId, key: &str) {
        debug!(owner, key, "delete meta");
        let mut meta = self.meta.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = meta.get_mut(&owner) {
            entries.remove(key);
            if entries.is_empty() {
                meta.remove(&owner);
            }
        }
    }
}

impl HookRegistry for InMemoryPlatform {
    fn suspend(&self, event: &str, handler: &HandlerRef) {
        self.hooks.suspend(event, handler);
    }

    fn resume(&self, event: &str, handler: &HandlerRef) {
        self.hooks.resume(event, handler);
    }
}
