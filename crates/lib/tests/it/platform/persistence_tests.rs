//! Saving and loading platform state

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use userbridge::{InMemoryPlatform, UserRecordAdapter};

use crate::helpers::*;

#[test]
fn test_adapter_writes_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let platform = test_platform();
    let mut adapter = UserRecordAdapter::on_platform(platform.clone());
    adapter.create(fields(json!({
        "user_login": "ada",
        "user_email": "ada@example.com",
        "user_pass": "s3cret",
        "address": {"city": "London"},
    })));
    assert_no_errors(&adapter);
    let id = adapter.id().unwrap();
    platform.save_to_file(&path).unwrap();

    let reloaded = Arc::new(InMemoryPlatform::load_from_file(&path).unwrap());
    let mut reader = UserRecordAdapter::on_platform(reloaded.clone());
    reader.load_by_id(id);

    assert_eq!(reader.base_field_value("user_login"), Some(json!("ada")));
    assert_eq!(
        reader.base_field_value("user_email"),
        Some(json!("ada@example.com"))
    );
    assert_eq!(reader.field_value("address.city"), Some(json!("London")));
    assert!(reloaded.check_password(id, "s3cret"));
}

#[test]
fn test_ids_continue_after_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let platform = test_platform();
    seed_user(&platform, "ada");
    seed_user(&platform, "grace");
    platform.save_to_file(&path).unwrap();

    let reloaded = Arc::new(InMemoryPlatform::load_from_file(&path).unwrap());
    let mut adapter = UserRecordAdapter::on_platform(reloaded.clone());
    adapter.create(fields(json!({"user_login": "edsger"})));

    assert_eq!(adapter.id(), Some(3));
    assert_eq!(reloaded.user_count(), 3);
}

#[test]
fn test_reloaded_state_keeps_uniqueness_rules() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let platform = test_platform();
    seed_user(&platform, "ada");
    platform.save_to_file(&path).unwrap();

    let reloaded = Arc::new(InMemoryPlatform::load_from_file(&path).unwrap());
    let mut adapter = UserRecordAdapter::on_platform(reloaded);
    adapter.create(fields(json!({"user_login": "ADA"})));

    assert_eq!(adapter.errors().len(), 1);
    assert_eq!(adapter.errors()[0].code(), Some("existing_user_login"));
}

#[test]
fn test_deleted_metadata_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let platform = test_platform();
    let id = seed_user(&platform, "ada");
    let mut adapter = UserRecordAdapter::on_platform(platform.clone());
    adapter.load_by_id(id);
    adapter.update(fields(json!({"color": "teal"})));
    adapter.update(fields(json!({"color": null})));
    platform.save_to_file(&path).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(!saved.contains("color"));
    let reloaded = InMemoryPlatform::load_from_file(&path).unwrap();
    assert!(reloaded.all_meta(id).is_empty());
}
