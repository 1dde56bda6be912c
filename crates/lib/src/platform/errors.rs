//! Structured errors reported by account stores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Error;

/// Structured error list returned by an account store on create or update.
///
/// Each error code carries one or more human-readable messages, e.g.
/// `existing_user_login -> ["Sorry, that username already exists!"]`.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", summarize(.errors))]
pub struct PlatformError {
    errors: BTreeMap<String, Vec<String>>,
}

fn summarize(errors: &BTreeMap<String, Vec<String>>) -> String {
    if errors.is_empty() {
        return "unknown platform error".to_string();
    }
    errors
        .iter()
        .flat_map(|(code, messages)| {
            messages
                .iter()
                .map(move |message| format!("{code}: {message}"))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl PlatformError {
    /// Create an error with a single code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.add(code, message);
        err
    }

    /// Append a message under `code`.
    pub fn add(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(code.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All error codes, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Whether this error carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.contains_key(code)
    }

    /// Messages recorded under `code`.
    pub fn messages(&self, code: &str) -> &[String] {
        self.errors.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// Flattened `(code, message)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().flat_map(|(code, messages)| {
            messages
                .iter()
                .map(move |message| (code.as_str(), message.as_str()))
        })
    }

    /// Check if this error indicates the targeted user does not exist.
    pub fn is_not_found(&self) -> bool {
        self.has_code(codes::INVALID_USER_ID)
    }

    /// Check if this error indicates a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        self.has_code(codes::EXISTING_USER_LOGIN) || self.has_code(codes::EXISTING_USER_EMAIL)
    }
}

/// Error codes produced by the in-memory account store.
pub mod codes {
    pub const EMPTY_USER_LOGIN: &str = "empty_user_login";
    pub const USER_LOGIN_TOO_LONG: &str = "user_login_too_long";
    pub const EXISTING_USER_LOGIN: &str = "existing_user_login";
    pub const EXISTING_USER_EMAIL: &str = "existing_user_email";
    pub const INVALID_USER_ID: &str = "invalid_user_id";
    pub const PASSWORD_HASH_FAILED: &str = "password_hash_failed";
}

impl From<PlatformError> for Error {
    fn from(err: PlatformError) -> Self {
        Error::Platform(err)
    }
}
