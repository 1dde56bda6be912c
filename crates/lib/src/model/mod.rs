//! The user record adapter.
//!
//! [`UserRecordAdapter`] sits between a form framework and the platform's user
//! accounts. Submitted field sets are screened, merged with configured values,
//! and split into account columns (written through [`AccountApi`]) and
//! metadata (written through [`MetadataApi`]). Reads go the other way: a field
//! name resolves to a column of the cached record or to a metadata entry.
//!
//! Operations are fluent and never fail outright. Problems are collected and
//! exposed through [`UserRecordAdapter::errors`], and account and metadata
//! writes are not transactional with each other.
//!
//! ```
//! use std::sync::Arc;
//!
//! use userbridge::{FieldSet, InMemoryPlatform, UserRecordAdapter};
//!
//! let platform = Arc::new(InMemoryPlatform::new());
//! let mut model = UserRecordAdapter::on_platform(platform.clone());
//! model.create(
//!     FieldSet::new()
//!         .with("user_login", "ada")
//!         .with("favorite_color", " teal "),
//! );
//! assert!(!model.has_errors());
//!
//! let mut reader = UserRecordAdapter::on_platform(platform);
//! reader.load_by_id(model.id().unwrap());
//! assert_eq!(reader.base_field_value("user_login"), Some("ada".into()));
//! assert_eq!(reader.base_field_value("favorite_color"), Some("teal".into()));
//! ```

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::{
    DEFAULT_HANDLER, ID_COLUMN, ID_FIELD, PROFILE_UPDATE_EVENT, USER_PASS, USER_REGISTER_EVENT,
};
use crate::fields::{
    FieldSet, is_empty_string, is_unset, resolve_path, split_path, trimmed, value_or_null,
};
use crate::hooks::with_suspended;
use crate::platform::{
    AccountApi, HandlerRef, HookRegistry, MetadataApi, PlatformError, UserId, UserRecord,
};
use crate::policy::{FieldPolicy, ModelConfig, ModelPolicy};

pub mod errors;

pub use errors::ModelError;

/// What saving one metadata field does to the stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaAction {
    Write,
    Delete,
    Keep,
}

/// Decide how to persist `new` given the currently stored value.
///
/// A missing stored value compares like the empty string.
fn meta_action(new: &Value, current: Option<&Value>) -> MetaAction {
    let differs = match current {
        Some(current) => current != new,
        None => !is_empty_string(new),
    };
    let current_blank = current.is_none_or(|v| is_unset(v) || is_empty_string(v));

    if !is_unset(new) && differs {
        MetaAction::Write
    } else if is_unset(new) || (is_empty_string(new) && current_blank) {
        MetaAction::Delete
    } else {
        MetaAction::Keep
    }
}

/// Adapts platform user accounts and their metadata to form field sets.
pub struct UserRecordAdapter {
    accounts: Arc<dyn AccountApi>,
    meta: Arc<dyn MetadataApi>,
    hooks: Arc<dyn HookRegistry>,
    policy: Arc<dyn FieldPolicy>,
    handler: HandlerRef,
    id: Option<UserId>,
    user: Option<UserRecord>,
    errors: Vec<ModelError>,
}

impl UserRecordAdapter {
    /// Create an adapter over separate account, metadata, and hook services.
    ///
    /// Uses the standard [`ModelPolicy`] and the default handler reference.
    pub fn new(
        accounts: Arc<dyn AccountApi>,
        meta: Arc<dyn MetadataApi>,
        hooks: Arc<dyn HookRegistry>,
    ) -> Self {
        Self {
            accounts,
            meta,
            hooks,
            policy: Arc::new(ModelPolicy::new()),
            handler: HandlerRef::new(DEFAULT_HANDLER),
            id: None,
            user: None,
            errors: Vec::new(),
        }
    }

    /// Create an adapter over a platform that provides all three services.
    pub fn on_platform<P>(platform: Arc<P>) -> Self
    where
        P: AccountApi + MetadataApi + HookRegistry + 'static,
    {
        Self::new(platform.clone(), platform.clone(), platform)
    }

    pub fn with_policy(mut self, policy: Arc<dyn FieldPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Name of the callback suspended around account writes.
    pub fn with_handler(mut self, handler: impl Into<HandlerRef>) -> Self {
        self.handler = handler.into();
        self
    }

    /// Apply a [`ModelConfig`]: its policy, and its handler if one is set.
    pub fn configured(self, config: &ModelConfig) -> Self {
        let adapter = self.with_policy(Arc::new(ModelPolicy::from_config(config)));
        match &config.handler {
            Some(handler) => adapter.with_handler(handler.clone()),
            None => adapter,
        }
    }

    /// Id of the current user, once loaded or created.
    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// The cached user record.
    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    /// Errors collected by the most recent create or update.
    pub fn errors(&self) -> &[ModelError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Point the adapter at user `id` and cache its record.
    ///
    /// An id that does not resolve is kept but leaves nothing cached.
    pub fn load_by_id(&mut self, id: UserId) -> &mut Self {
        self.id = Some(id);
        self.refresh();
        self
    }

    /// Create a user from a submitted field set.
    ///
    /// Submitted fields are screened, then layered as defaults < submitted <
    /// statics. Account columns go to the account store with this adapter's
    /// `user_register` handler suspended; metadata is saved afterwards,
    /// whatever the outcome of the account write.
    pub fn create(&mut self, fields: FieldSet) -> &mut Self {
        self.errors.clear();

        let submitted = self.policy.screen(fields);
        let merged = FieldSet::layered([self.policy.defaults(), &submitted, self.policy.statics()]);
        let (builtin, meta) = self.policy.partition(merged);

        if !builtin.is_empty() {
            let result = with_suspended(
                self.hooks.as_ref(),
                USER_REGISTER_EVENT,
                &self.handler,
                || self.accounts.create_user(&builtin),
            );
            match result {
                Ok(id) => {
                    info!(id, "user created");
                    self.id = Some(id);
                    self.refresh();
                }
                Err(err) => {
                    warn!(error = %err, "user creation failed");
                    self.collect(err);
                }
            }
        }

        self.save_meta(meta);
        self
    }

    /// Update the current user with a partial field set.
    ///
    /// Without a current user this records [`ModelError::NoItemToUpdate`] and
    /// writes nothing. Defaults are not applied; statics are. The account write
    /// always targets the current id, whatever the caller submitted.
    pub fn update(&mut self, fields: FieldSet) -> &mut Self {
        self.errors.clear();

        let Some(id) = self.id else {
            warn!("update called without a current user");
            self.errors.push(ModelError::NoItemToUpdate);
            return self;
        };

        let submitted = self.policy.screen(fields);
        let merged = FieldSet::layered([&submitted, self.policy.statics()]);
        let (mut builtin, meta) = self.policy.partition(merged);

        if !builtin.is_empty() {
            builtin.insert(ID_COLUMN, id);
            let result = with_suspended(
                self.hooks.as_ref(),
                PROFILE_UPDATE_EVENT,
                &self.handler,
                || self.accounts.update_user(&builtin),
            );
            match result {
                Ok(_) => info!(id, "user updated"),
                Err(err) => {
                    warn!(id, error = %err, "user update failed");
                    self.collect(err);
                }
            }
            self.refresh();
        }

        self.save_meta(meta);
        self
    }

    /// Persist the metadata subset of `fields` for the current user.
    ///
    /// Only changed values are written; see [`meta_action`].
    fn save_meta(&self, fields: FieldSet) {
        let fields = self.policy.meta_fields(fields);
        if fields.is_empty() {
            return;
        }
        let Some(id) = self.id else {
            debug!(count = fields.len(), "no current user, skipping metadata");
            return;
        };

        for (key, value) in fields {
            let value = trimmed(value);
            let current = self.meta.get_meta(id, &key);
            match meta_action(&value, current.as_ref()) {
                MetaAction::Write => {
                    debug!(id, key = %key, "writing metadata");
                    self.meta.set_meta(id, &key, value);
                }
                MetaAction::Delete => {
                    debug!(id, key = %key, "deleting metadata");
                    self.meta.delete_meta(id, &key);
                }
                MetaAction::Keep => {}
            }
        }
    }

    /// Current value of a field, for display.
    ///
    /// Account columns are read from the cached record: `id` reads the
    /// canonical `ID` and `user_pass` is never exposed. Other names are read
    /// from metadata. Null and the empty string both come back as `None`.
    pub fn base_field_value(&self, name: &str) -> Option<Value> {
        let data = if self.policy.is_builtin(name) {
            self.user.as_ref().and_then(|user| match name {
                ID_FIELD => user.attribute(ID_COLUMN),
                USER_PASS => None,
                _ => user.attribute(name),
            })
        } else {
            self.id.and_then(|id| self.meta.get_meta(id, name))
        };
        value_or_null(data)
    }

    /// Value at a dotted path such as `address.city` or `tags.0`.
    ///
    /// The first segment is resolved with [`Self::base_field_value`]; the rest
    /// descend into objects by key and arrays by index.
    pub fn field_value(&self, path: &str) -> Option<Value> {
        let (base, segments) = split_path(path);
        let value = self.base_field_value(base)?;
        value_or_null(resolve_path(&value, &segments).cloned())
    }

    fn refresh(&mut self) {
        self.user = self.id.and_then(|id| self.accounts.fetch_user(id));
        if self.user.is_none() {
            warn!(id = ?self.id, "user record not found");
        }
    }

    fn collect(&mut self, err: PlatformError) {
        if err.is_empty() {
            self.errors.push(ModelError::Platform {
                code: "unknown".to_string(),
                message: err.to_string(),
            });
            return;
        }
        self.errors
            .extend(err.entries().map(|(code, message)| ModelError::Platform {
                code: code.to_string(),
                message: message.to_string(),
            }));
    }
}
