//! Field policy: which submitted fields are accepted and where they go.
//!
//! The adapter does not decide on its own which fields a caller may set or
//! which of them are account columns. It asks a [`FieldPolicy`], injected at
//! construction. [`ModelPolicy`] is the standard policy, optionally built from
//! a JSON [`ModelConfig`].

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{BUILTIN_FIELDS, GUARDED_FIELDS};
use crate::fields::FieldSet;
use crate::platform::HandlerRef;

pub mod errors;

pub use errors::ConfigError;

/// Screening and routing rules for submitted fields.
pub trait FieldPolicy: Send + Sync {
    /// Remove every field the caller is not allowed to set.
    fn screen(&self, fields: FieldSet) -> FieldSet;

    /// Whether `name` is backed by an account column.
    fn is_builtin(&self, name: &str) -> bool;

    /// Split into `(builtin, metadata)` subsets, preserving order.
    fn partition(&self, fields: FieldSet) -> (FieldSet, FieldSet) {
        fields.split_by(|name| self.is_builtin(name))
    }

    /// Only the fields stored as metadata.
    fn meta_fields(&self, fields: FieldSet) -> FieldSet {
        self.partition(fields).1
    }

    /// Values applied under submitted fields on create.
    fn defaults(&self) -> &FieldSet;

    /// Values applied over submitted fields on every write.
    fn statics(&self) -> &FieldSet;
}

/// Serializable model configuration.
///
/// ```
/// use userbridge::ModelConfig;
///
/// let config = ModelConfig::from_json_str(r#"{
///     "defaults": {"role": "subscriber"},
///     "statics": {"source": "signup-form"},
///     "fillable": ["user_login", "user_email", "role"]
/// }"#).unwrap();
/// assert_eq!(config.fillable.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Applied under submitted fields on create.
    pub defaults: FieldSet,
    /// Applied over submitted fields on create and update.
    pub statics: FieldSet,
    /// Field names stripped from input in addition to `id`.
    pub guard: Vec<String>,
    /// When non-empty, only these field names are accepted from input.
    pub fillable: Vec<String>,
    /// Name of the adapter's own hook callback.
    pub handler: Option<HandlerRef>,
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Read a config from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }
}

/// The standard field policy.
///
/// Built-in names are the fixed account columns. Guarded names always include
/// `id`; more can be added but none can be removed.
#[derive(Clone, Debug)]
pub struct ModelPolicy {
    guard: BTreeSet<String>,
    fillable: Option<BTreeSet<String>>,
    defaults: FieldSet,
    statics: FieldSet,
}

impl Default for ModelPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelPolicy {
    pub fn new() -> Self {
        Self {
            guard: GUARDED_FIELDS.iter().map(|name| name.to_string()).collect(),
            fillable: None,
            defaults: FieldSet::new(),
            statics: FieldSet::new(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        let mut policy = Self::new()
            .with_defaults(config.defaults.clone())
            .with_statics(config.statics.clone());
        for name in &config.guard {
            policy = policy.with_guarded(name);
        }
        if !config.fillable.is_empty() {
            policy = policy.with_fillable(config.fillable.iter().map(String::as_str));
        }
        policy
    }

    pub fn with_defaults(mut self, defaults: FieldSet) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_statics(mut self, statics: FieldSet) -> Self {
        self.statics = statics;
        self
    }

    /// Also strip `name` from caller input.
    pub fn with_guarded(mut self, name: impl Into<String>) -> Self {
        self.guard.insert(name.into());
        self
    }

    /// Accept only the given names from caller input.
    pub fn with_fillable<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.fillable = Some(names.into_iter().map(str::to_string).collect());
        self
    }

    pub fn is_guarded(&self, name: &str) -> bool {
        self.guard.contains(name)
    }
}

impl FieldPolicy for ModelPolicy {
    fn screen(&self, mut fields: FieldSet) -> FieldSet {
        fields.retain(|name, _| {
            if self.guard.contains(name) {
                debug!(field = name, "dropping guarded field");
                return false;
            }
            match &self.fillable {
                Some(fillable) if !fillable.contains(name) => {
                    debug!(field = name, "dropping field outside fillable list");
                    false
                }
                _ => true,
            }
        });
        fields
    }

    fn is_builtin(&self, name: &str) -> bool {
        BUILTIN_FIELDS.contains(&name)
    }

    fn defaults(&self) -> &FieldSet {
        &self.defaults
    }

    fn statics(&self) -> &FieldSet {
        &self.statics
    }
}
