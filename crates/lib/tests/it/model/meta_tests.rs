//! Metadata diffing through create and update

use serde_json::{Value, json};
use userbridge::{FieldSet, MetadataApi};

use crate::helpers::*;

#[test]
fn test_resubmitting_same_values_writes_nothing() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    let submission = fields(json!({"color": "teal", "tags": ["a", "b"], "age": 36}));

    adapter.update(submission.clone());
    assert_eq!(platform.meta_writes().len(), 3);
    platform.clear();

    adapter.update(submission);
    assert_no_errors(&adapter);
    assert!(platform.meta_writes().is_empty());
    assert_eq!(platform.inner.all_meta(id).len(), 3);
}

#[test]
fn test_values_are_trimmed_before_comparison() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "color", json!("teal"));

    adapter.update(fields(json!({"color": "  teal\n"})));

    assert!(platform.meta_writes().is_empty());
    assert_eq!(platform.inner.get_meta(id, "color"), Some(json!("teal")));
}

#[test]
fn test_empty_string_over_missing_value_writes_nothing() {
    let (platform, mut adapter, id) = adapter_with_user("ada");

    adapter.update(fields(json!({"nickname": ""})));

    assert_eq!(platform.inner.get_meta(id, "nickname"), None);
    assert!(
        !platform
            .meta_writes()
            .iter()
            .any(|c| matches!(c, Call::SetMeta(..)))
    );
}

#[test]
fn test_whitespace_over_stored_empty_deletes() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "nickname", json!(""));

    adapter.update(fields(json!({"nickname": "   "})));

    assert_eq!(
        platform.meta_writes(),
        vec![Call::DeleteMeta(id, "nickname".to_string())]
    );
    assert_eq!(platform.inner.get_meta(id, "nickname"), None);
}

#[test]
fn test_null_deletes_stored_value() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "color", json!("teal"));

    adapter.update(FieldSet::new().with("color", Value::Null));

    assert_eq!(
        platform.meta_writes(),
        vec![Call::DeleteMeta(id, "color".to_string())]
    );
    assert_eq!(platform.inner.get_meta(id, "color"), None);
}

#[test]
fn test_empty_string_over_stored_value_is_written() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "color", json!("teal"));

    adapter.update(fields(json!({"color": ""})));

    assert_eq!(
        platform.meta_writes(),
        vec![Call::SetMeta(id, "color".to_string(), json!(""))]
    );
    assert_eq!(adapter.base_field_value("color"), None);
}

#[test]
fn test_changed_value_overwrites() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "color", json!("teal"));

    adapter.update(fields(json!({"color": "plum", "shape": "round"})));

    assert_eq!(
        platform.meta_writes(),
        vec![
            Call::SetMeta(id, "color".to_string(), json!("plum")),
            Call::SetMeta(id, "shape".to_string(), json!("round")),
        ]
    );
}

#[test]
fn test_type_change_counts_as_difference() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    platform.inner.set_meta(id, "age", json!("36"));

    adapter.update(fields(json!({"age": 36})));

    assert_eq!(
        platform.meta_writes(),
        vec![Call::SetMeta(id, "age".to_string(), json!(36))]
    );
}

#[test]
fn test_metadata_is_scoped_to_current_user() {
    let (platform, mut adapter, id) = adapter_with_user("ada");
    let other = seed_user(&platform.inner, "grace");
    platform.inner.set_meta(other, "color", json!("teal"));

    adapter.update(fields(json!({"color": "plum"})));

    assert_eq!(platform.inner.get_meta(id, "color"), Some(json!("plum")));
    assert_eq!(platform.inner.get_meta(other, "color"), Some(json!("teal")));
}
