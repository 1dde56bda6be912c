//! Constants used throughout the userbridge library.
//!
//! This module provides central definitions for the account-record column names,
//! guarded field names, and hook event names shared by the adapter and the
//! in-memory platform.

/// Login name column.
pub const USER_LOGIN: &str = "user_login";

/// URL-safe login slug column.
pub const USER_NICENAME: &str = "user_nicename";

/// Email column.
pub const USER_EMAIL: &str = "user_email";

/// Website column.
pub const USER_URL: &str = "user_url";

/// Password-reset activation key column.
pub const USER_ACTIVATION_KEY: &str = "user_activation_key";

/// Account status column.
pub const USER_STATUS: &str = "user_status";

/// Display name column.
pub const DISPLAY_NAME: &str = "display_name";

/// Registration timestamp column.
pub const USER_REGISTERED: &str = "user_registered";

/// Field name under which forms address the record identifier.
pub const ID_FIELD: &str = "id";

/// Password column. Accepted on write, never exposed on read.
pub const USER_PASS: &str = "user_pass";

/// Canonical identifier column of an account record.
///
/// The account API expects the identifier under this name on update.
pub const ID_COLUMN: &str = "ID";

/// The closed set of field names backed by account-record columns.
///
/// Every other field name is stored as per-user metadata.
pub const BUILTIN_FIELDS: &[&str] = &[
    USER_LOGIN,
    USER_NICENAME,
    USER_EMAIL,
    USER_URL,
    USER_ACTIVATION_KEY,
    USER_STATUS,
    DISPLAY_NAME,
    USER_REGISTERED,
    ID_FIELD,
    USER_PASS,
];

/// Field names that are always stripped from caller input.
pub const GUARDED_FIELDS: &[&str] = &[ID_FIELD];

/// Event fired by the account store after a user is created.
pub const USER_REGISTER_EVENT: &str = "user_register";

/// Event fired by the account store after a user is updated.
pub const PROFILE_UPDATE_EVENT: &str = "profile_update";

/// Handler reference used when no other is configured.
pub const DEFAULT_HANDLER: &str = "userbridge::responders::users";

/// Maximum length of a login name accepted by the in-memory account store.
pub const MAX_LOGIN_LENGTH: usize = 60;

/// Maximum length of a derived nicename.
pub const MAX_NICENAME_LENGTH: usize = 50;

/// Format of `user_registered` timestamps.
pub const REGISTERED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
