//! Account operations of the in-memory platform.
//!
//! Mirrors what a hosting platform does on its side of a user write: login
//! sanitization, uniqueness checks, derived columns, registration stamping,
//! password hashing, and the post-write event.

use std::collections::BTreeMap;
use std::sync::PoisonError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::InMemoryPlatform;
use super::crypto::hash_password;
use crate::constants::{
    DISPLAY_NAME, ID_COLUMN, MAX_LOGIN_LENGTH, MAX_NICENAME_LENGTH, PROFILE_UPDATE_EVENT,
    USER_ACTIVATION_KEY, USER_EMAIL, USER_LOGIN, USER_NICENAME, USER_PASS, USER_REGISTER_EVENT,
    USER_REGISTERED, USER_STATUS, USER_URL,
};
use crate::fields::{FieldSet, as_text};
use crate::platform::errors::codes;
use crate::platform::{AccountApi, PlatformError, UserId, UserRecord};

/// Account records keyed by id, with the last id handed out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct AccountTable {
    pub(crate) users: BTreeMap<UserId, UserRecord>,
    pub(crate) last_id: UserId,
}

impl AccountTable {
    fn login_taken(&self, login: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.user_login.eq_ignore_ascii_case(login))
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.user_email.eq_ignore_ascii_case(email))
    }

    pub(crate) fn find_by_login(&self, login: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|u| u.user_login.eq_ignore_ascii_case(login))
    }
}

/// Strip characters outside `[A-Za-z0-9 _.@-]` and collapse whitespace.
pub(crate) fn sanitize_login(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '@'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase slug: runs of non-alphanumerics become a single `-`.
pub(crate) fn nicename(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    slug.chars().take(MAX_NICENAME_LENGTH).collect()
}

fn text(fields: &FieldSet, name: &str) -> Option<String> {
    fields.get(name).and_then(as_text)
}

fn trimmed_text(fields: &FieldSet, name: &str) -> Option<String> {
    text(fields, name).map(|s| s.trim().to_string())
}

fn integer(fields: &FieldSet, name: &str) -> Option<i64> {
    match fields.get(name)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn user_id(fields: &FieldSet) -> Option<UserId> {
    match fields.get(ID_COLUMN)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn invalid_user_id() -> PlatformError {
    PlatformError::new(codes::INVALID_USER_ID, "Invalid user ID.")
}

fn existing_login() -> PlatformError {
    PlatformError::new(
        codes::EXISTING_USER_LOGIN,
        "Sorry, that username already exists!",
    )
}

fn existing_email() -> PlatformError {
    PlatformError::new(
        codes::EXISTING_USER_EMAIL,
        "Sorry, that email address is already used!",
    )
}

/// Hash a submitted password; an absent or empty one leaves no usable password.
fn password_hash(fields: &FieldSet) -> Result<Option<String>, PlatformError> {
    match text(fields, USER_PASS).filter(|p| !p.is_empty()) {
        Some(password) => hash_password(password).map(Some),
        None => Ok(None),
    }
}

impl AccountApi for InMemoryPlatform {
    fn fetch_user(&self, id: UserId) -> Option<UserRecord> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .get(&id)
            .cloned()
    }

    fn create_user(&self, fields: &FieldSet) -> Result<UserId, PlatformError> {
        let login = text(fields, USER_LOGIN)
            .map(|raw| sanitize_login(&raw))
            .unwrap_or_default();
        if login.is_empty() {
            return Err(PlatformError::new(
                codes::EMPTY_USER_LOGIN,
                "Cannot create a user with an empty login name.",
            ));
        }
        if login.chars().count() > MAX_LOGIN_LENGTH {
            return Err(PlatformError::new(
                codes::USER_LOGIN_TOO_LONG,
                format!("Username may not be longer than {MAX_LOGIN_LENGTH} characters."),
            ));
        }

        let email = trimmed_text(fields, USER_EMAIL).unwrap_or_default();
        let user_pass = password_hash(fields)?.unwrap_or_default();

        let id = {
            let mut accounts = self
                .accounts
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if accounts.login_taken(&login, None) {
                return Err(existing_login());
            }
            if !email.is_empty() && accounts.email_taken(&email, None) {
                return Err(existing_email());
            }

            let id = accounts.last_id + 1;
            let record = UserRecord {
                id,
                user_nicename: text(fields, USER_NICENAME)
                    .map(|raw| nicename(&raw))
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| nicename(&login)),
                display_name: trimmed_text(fields, DISPLAY_NAME)
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| login.clone()),
                user_email: email,
                user_url: trimmed_text(fields, USER_URL).unwrap_or_default(),
                user_registered: trimmed_text(fields, USER_REGISTERED)
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| self.clock.now_registered()),
                user_activation_key: text(fields, USER_ACTIVATION_KEY).unwrap_or_default(),
                user_status: integer(fields, USER_STATUS).unwrap_or(0),
                user_pass,
                user_login: login,
            };
            info!(id, login = %record.user_login, "user created");
            accounts.users.insert(id, record);
            accounts.last_id = id;
            id
        };

        self.hooks.fire(USER_REGISTER_EVENT, id);
        Ok(id)
    }

    fn update_user(&self, fields: &FieldSet) -> Result<UserId, PlatformError> {
        let id = user_id(fields).ok_or_else(invalid_user_id)?;
        let new_pass = password_hash(fields)?;

        {
            let mut accounts = self
                .accounts
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut record = accounts.users.get(&id).cloned().ok_or_else(invalid_user_id)?;

            if let Some(login) = text(fields, USER_LOGIN)
                && sanitize_login(&login) != record.user_login
            {
                debug!(id, "login names cannot be changed, ignoring submitted login");
            }
            if let Some(email) = trimmed_text(fields, USER_EMAIL) {
                if !email.is_empty() && accounts.email_taken(&email, Some(id)) {
                    return Err(existing_email());
                }
                record.user_email = email;
            }
            if let Some(slug) = text(fields, USER_NICENAME).map(|raw| nicename(&raw))
                && !slug.is_empty()
            {
                record.user_nicename = slug;
            }
            if let Some(name) = trimmed_text(fields, DISPLAY_NAME) {
                record.display_name = name;
            }
            if let Some(url) = trimmed_text(fields, USER_URL) {
                record.user_url = url;
            }
            if let Some(registered) = trimmed_text(fields, USER_REGISTERED)
                && !registered.is_empty()
            {
                record.user_registered = registered;
            }
            if let Some(key) = text(fields, USER_ACTIVATION_KEY) {
                record.user_activation_key = key;
            }
            if let Some(status) = integer(fields, USER_STATUS) {
                record.user_status = status;
            }
            if let Some(hash) = new_pass {
                record.user_pass = hash;
            }

            accounts.users.insert(id, record);
        }

        info!(id, "user updated");
        self.hooks.fire(PROFILE_UPDATE_EVENT, id);
        Ok(id)
    }
}
