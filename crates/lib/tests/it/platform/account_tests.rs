//! Account store rules as seen through the adapter

use std::sync::Arc;

use serde_json::json;
use userbridge::{FixedClock, InMemoryPlatform, UserRecordAdapter};

use crate::helpers::*;

#[test]
fn test_missing_login_is_reported() {
    let (_platform, mut adapter) = recording_adapter();

    adapter.create(fields(json!({"user_email": "ada@example.com"})));

    assert_eq!(adapter.errors().len(), 1);
    assert_eq!(adapter.errors()[0].code(), Some("empty_user_login"));
    assert_eq!(adapter.id(), None);
}

#[test]
fn test_login_is_sanitized() {
    let (_platform, mut adapter) = recording_adapter();

    adapter.create(fields(json!({"user_login": "<b>ada</b>"})));

    assert_no_errors(&adapter);
    assert_eq!(adapter.base_field_value("user_login"), Some(json!("badab")));
}

#[test]
fn test_registration_date_comes_from_clock() {
    let clock = Arc::new(FixedClock::default());
    let platform = Arc::new(InMemoryPlatform::new().with_clock(clock.clone()));
    let mut adapter = UserRecordAdapter::on_platform(platform.clone());

    clock.advance(90_061_000);
    adapter.create(fields(json!({"user_login": "ada"})));

    assert_eq!(
        adapter.base_field_value("user_registered"),
        Some(json!("2024-01-02 01:01:01"))
    );
}

#[test]
fn test_submitted_registration_date_is_kept() {
    let (_platform, mut adapter) = recording_adapter();

    adapter.create(fields(json!({
        "user_login": "ada",
        "user_registered": "1843-10-01 12:00:00",
    })));

    assert_eq!(
        adapter.base_field_value("user_registered"),
        Some(json!("1843-10-01 12:00:00"))
    );
}
