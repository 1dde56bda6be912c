//! Persistence operations for the in-memory platform
//!
//! This module handles serialization and file I/O for saving/loading
//! the platform state to/from JSON files.

use std::{io::ErrorKind, path::Path, sync::PoisonError};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::{InMemoryPlatform, MetaTable, accounts::AccountTable};
use crate::Result;

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Serializable snapshot of the platform state.
#[derive(Serialize, Deserialize)]
struct SerializablePlatform {
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    #[serde(default)]
    accounts: AccountTable,
    #[serde(default)]
    meta: MetaTable,
}

/// Save the platform state to a JSON file.
pub(crate) fn save_to_file<P: AsRef<Path>>(platform: &InMemoryPlatform, path: P) -> Result<()> {
    let snapshot = SerializablePlatform {
        version: PERSISTENCE_VERSION,
        accounts: platform
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
        meta: platform
            .meta
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    };

    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path.as_ref(), json)?;
    debug!(path = %path.as_ref().display(), "platform state saved");
    Ok(())
}

/// Load the platform state from a JSON file, or start empty if it is missing.
pub(crate) fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemoryPlatform> {
    let json = match std::fs::read_to_string(path.as_ref()) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.as_ref().display(), "no saved state, starting empty");
            return Ok(InMemoryPlatform::new());
        }
        Err(e) => return Err(e.into()),
    };

    let snapshot: SerializablePlatform = serde_json::from_str(&json)?;
    let platform = InMemoryPlatform::new();
    *platform
        .accounts
        .write()
        .unwrap_or_else(PoisonError::into_inner) = snapshot.accounts;
    *platform.meta.write().unwrap_or_else(PoisonError::into_inner) = snapshot.meta;
    Ok(platform)
}
