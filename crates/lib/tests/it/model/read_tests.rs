//! Field value resolution for display

use serde_json::json;
use userbridge::{MetadataApi, UserRecordAdapter};

use crate::helpers::*;

#[test]
fn test_id_reads_canonical_id() {
    let (_platform, adapter, id) = adapter_with_user("ada");
    assert_eq!(adapter.base_field_value("id"), Some(json!(id)));
    assert_eq!(adapter.field_value("id"), Some(json!(id)));
}

#[test]
fn test_password_is_never_exposed() {
    let (platform, mut adapter) = recording_adapter();
    adapter.create(fields(json!({"user_login": "ada", "user_pass": "s3cret"})));
    assert_no_errors(&adapter);
    let id = adapter.id().unwrap();

    assert!(!adapter.user().unwrap().user_pass.is_empty());
    assert_eq!(adapter.base_field_value("user_pass"), None);
    assert_eq!(adapter.field_value("user_pass"), None);
    assert!(platform.inner.check_password(id, "s3cret"));
}

#[test]
fn test_empty_columns_read_as_none() {
    let (_platform, adapter, _id) = adapter_with_user("ada");
    assert_eq!(adapter.base_field_value("user_email"), None);
    assert_eq!(adapter.base_field_value("user_activation_key"), None);
    assert_eq!(adapter.base_field_value("user_status"), Some(json!(0)));
}

#[test]
fn test_columns_read_from_cache_not_store() {
    let (platform, adapter, _id) = adapter_with_user("ada");

    assert_eq!(
        adapter.base_field_value("display_name"),
        Some(json!("ada"))
    );
    assert!(platform.calls().is_empty());
}

#[test]
fn test_metadata_reads_go_to_store() {
    let (platform, adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "color", json!("teal"));
    platform.inner.set_meta(id, "blank", json!(""));

    assert_eq!(adapter.base_field_value("color"), Some(json!("teal")));
    assert_eq!(adapter.base_field_value("blank"), None);
    assert_eq!(adapter.base_field_value("missing"), None);
    assert_eq!(
        platform.calls(),
        vec![
            Call::GetMeta(id, "color".to_string()),
            Call::GetMeta(id, "blank".to_string()),
            Call::GetMeta(id, "missing".to_string()),
        ]
    );
}

#[test]
fn test_without_user_everything_is_none() {
    let (platform, adapter) = recording_adapter();
    assert_eq!(adapter.base_field_value("id"), None);
    assert_eq!(adapter.base_field_value("user_login"), None);
    assert_eq!(adapter.base_field_value("color"), None);
    assert!(platform.calls().is_empty());
}

#[test]
fn test_unknown_id_caches_nothing() {
    let platform = test_platform();
    let mut adapter = UserRecordAdapter::on_platform(platform.clone());
    adapter.load_by_id(7);

    assert_eq!(adapter.id(), Some(7));
    assert!(adapter.user().is_none());
    assert_eq!(adapter.base_field_value("user_login"), None);
    platform.set_meta(7, "orphan", json!("still readable"));
    assert_eq!(
        adapter.base_field_value("orphan"),
        Some(json!("still readable"))
    );
}

#[test]
fn test_dotted_paths_descend_into_values() {
    let (platform, adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(
        id,
        "address",
        json!({"city": "London", "lines": ["12 St James's Sq", ""], "zip": null}),
    );

    assert_eq!(adapter.field_value("address.city"), Some(json!("London")));
    assert_eq!(
        adapter.field_value("address.lines.0"),
        Some(json!("12 St James's Sq"))
    );
    assert_eq!(adapter.field_value("address.lines.1"), None);
    assert_eq!(adapter.field_value("address.zip"), None);
    assert_eq!(adapter.field_value("address.country"), None);
    assert_eq!(adapter.field_value("address.lines.9"), None);
    assert_eq!(adapter.field_value("user_login.length"), None);
    assert_eq!(
        adapter.field_value("address"),
        adapter.base_field_value("address")
    );
}
