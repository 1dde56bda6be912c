use std::sync::{Arc, Mutex};

use serde_json::Value;
use userbridge::{
    AccountApi, FieldSet, FixedClock, HandlerRef, HookRegistry, InMemoryPlatform, MetadataApi,
    PlatformError, UserId, UserRecord, UserRecordAdapter,
};

// ==========================
// CORE TEST FACTORIES
// ==========================

/// Creates an empty in-memory platform with a [`FixedClock`], so registration
/// dates are always `2024-01-01 00:00:00`.
pub fn test_platform() -> Arc<InMemoryPlatform> {
    Arc::new(InMemoryPlatform::new().with_clock(Arc::new(FixedClock::default())))
}

/// Builds a field set from a JSON object literal.
///
/// # Panics
/// Panics if `value` is not a JSON object.
pub fn fields(value: Value) -> FieldSet {
    FieldSet::try_from(value).expect("field sets must be JSON objects")
}

/// Creates an account directly on the platform, bypassing any adapter.
pub fn seed_user(platform: &InMemoryPlatform, login: &str) -> UserId {
    platform
        .create_user(&FieldSet::new().with("user_login", login))
        .expect("Failed to seed user")
}

// ==========================
// RECORDING PLATFORM
// ==========================

/// A call made by the adapter against its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchUser(UserId),
    CreateUser(FieldSet),
    UpdateUser(FieldSet),
    GetMeta(UserId, String),
    SetMeta(UserId, String, Value),
    DeleteMeta(UserId, String),
    Suspend(String, String),
    Resume(String, String),
}

impl Call {
    /// Whether this call changes stored state.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreateUser(_) | Call::UpdateUser(_) | Call::SetMeta(..) | Call::DeleteMeta(..)
        )
    }

    pub fn is_meta_write(&self) -> bool {
        matches!(self, Call::SetMeta(..) | Call::DeleteMeta(..))
    }
}

/// How the recording platform answers account writes.
#[derive(Debug, Clone)]
enum AccountMode {
    Delegate,
    Fail(PlatformError),
    Panic,
}

/// Wraps an [`InMemoryPlatform`] and journals every call made through the
/// collaborator traits.
pub struct RecordingPlatform {
    pub inner: Arc<InMemoryPlatform>,
    calls: Mutex<Vec<Call>>,
    mode: AccountMode,
}

impl RecordingPlatform {
    pub fn new() -> Arc<Self> {
        Self::with_mode(AccountMode::Delegate)
    }

    /// Account writes return `err` instead of reaching the store.
    pub fn failing(err: PlatformError) -> Arc<Self> {
        Self::with_mode(AccountMode::Fail(err))
    }

    /// Account writes panic.
    pub fn panicking() -> Arc<Self> {
        Self::with_mode(AccountMode::Panic)
    }

    fn with_mode(mode: AccountMode) -> Arc<Self> {
        Arc::new(Self {
            inner: test_platform(),
            calls: Mutex::new(Vec::new()),
            mode,
        })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the state-changing calls.
    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    /// Only the metadata writes and deletes.
    pub fn meta_writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_meta_write).collect()
    }

    /// Suspend and resume calls, in order.
    pub fn hook_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Suspend(..) | Call::Resume(..)))
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn account_write(
        &self,
        fields: &FieldSet,
        write: impl FnOnce(&InMemoryPlatform, &FieldSet) -> Result<UserId, PlatformError>,
    ) -> Result<UserId, PlatformError> {
        match &self.mode {
            AccountMode::Delegate => write(self.inner.as_ref(), fields),
            AccountMode::Fail(err) => Err(err.clone()),
            AccountMode::Panic => panic!("account store unavailable"),
        }
    }
}

impl AccountApi for RecordingPlatform {
    fn fetch_user(&self, id: UserId) -> Option<UserRecord> {
        self.record(Call::FetchUser(id));
        self.inner.fetch_user(id)
    }

    fn create_user(&self, fields: &FieldSet) -> Result<UserId, PlatformError> {
        self.record(Call::CreateUser(fields.clone()));
        self.account_write(fields, |inner, fields| inner.create_user(fields))
    }

    fn update_user(&self, fields: &FieldSet) -> Result<UserId, PlatformError> {
        self.record(Call::UpdateUser(fields.clone()));
        self.account_write(fields, |inner, fields| inner.update_user(fields))
    }
}

impl MetadataApi for RecordingPlatform {
    fn get_meta(&self, owner: UserId, key: &str) -> Option<Value> {
        self.record(Call::GetMeta(owner, key.to_string()));
        self.inner.get_meta(owner, key)
    }

    fn set_meta(&self, owner: UserId, key: &str, value: Value) {
        self.record(Call::SetMeta(owner, key.to_string(), value.clone()));
        self.inner.set_meta(owner, key, value);
    }

    fn delete_meta(&self, owner: UserId, key: &str) {
        self.record(Call::DeleteMeta(owner, key.to_string()));
        self.inner.delete_meta(owner, key);
    }
}

impl HookRegistry for RecordingPlatform {
    fn suspend(&self, event: &str, handler: &HandlerRef) {
        self.record(Call::Suspend(event.to_string(), handler.to_string()));
        self.inner.suspend(event, handler);
    }

    fn resume(&self, event: &str, handler: &HandlerRef) {
        self.record(Call::Resume(event.to_string(), handler.to_string()));
        self.inner.resume(event, handler);
    }
}

// ==========================
// ADAPTER HELPERS
// ==========================

/// Creates an adapter over a recording platform.
pub fn recording_adapter() -> (Arc<RecordingPlatform>, UserRecordAdapter) {
    let platform = RecordingPlatform::new();
    let adapter = UserRecordAdapter::on_platform(platform.clone());
    (platform, adapter)
}

/// Creates a recording platform holding one user, and an adapter loaded on it.
///
/// The call journal is cleared before returning.
pub fn adapter_with_user(login: &str) -> (Arc<RecordingPlatform>, UserRecordAdapter, UserId) {
    let (platform, mut adapter) = recording_adapter();
    let id = seed_user(&platform.inner, login);
    adapter.load_by_id(id);
    platform.clear();
    (platform, adapter, id)
}

/// Assert that the adapter collected no errors.
pub fn assert_no_errors(adapter: &UserRecordAdapter) {
    assert!(
        !adapter.has_errors(),
        "unexpected errors: {:?}",
        adapter.errors()
    );
}
