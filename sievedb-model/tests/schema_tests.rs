//! Tests for schema lookups and property filtering.

use pretty_assertions::assert_eq;
use serde_json::json;
use sievedb_model::{Attribute, ModelSchema, PropertyMap};

fn person_schema() -> ModelSchema {
    ModelSchema::new(
        "person",
        vec![Attribute::integer("id"), Attribute::text("name")],
    )
}

fn props(value: serde_json::Value) -> PropertyMap {
    value.as_object().cloned().unwrap()
}

// ── Lookups ──────────────────────────────────────────────────────

#[test]
fn schema_has_record_type() {
    assert_eq!(person_schema().record_type, "person");
}

#[test]
fn declares_known_attribute() {
    let s = person_schema();
    assert!(s.declares("id"));
    assert!(s.declares("name"));
}

#[test]
fn does_not_declare_unknown_attribute() {
    assert!(!person_schema().declares("extra"));
}

#[test]
fn attribute_lookup() {
    let s = person_schema();
    assert_eq!(s.attribute("name").unwrap().name, "name");
    assert!(s.attribute("missing").is_none());
}

#[test]
fn attribute_names_in_declaration_order() {
    let schema = person_schema();
    let names: Vec<&str> = schema.attribute_names().collect();
    assert_eq!(names, vec!["id", "name"]);
}

// ── filter_properties ────────────────────────────────────────────

#[test]
fn filter_keeps_declared_properties_only() {
    let filtered = person_schema().filter_properties(Some(&props(json!({
        "name": "x",
        "extra": 1,
    }))));
    assert_eq!(filtered, props(json!({"name": "x"})));
}

#[test]
fn filter_absent_input_yields_empty_map() {
    assert!(person_schema().filter_properties(None).is_empty());
}

#[test]
fn filter_empty_object_yields_empty_map() {
    let filtered = person_schema().filter_properties(Some(&props(json!({}))));
    assert!(filtered.is_empty());
}

#[test]
fn filter_passes_values_through_unmodified() {
    let schema = ModelSchema::new("doc", vec![Attribute::json("payload")]);
    let payload = json!({"nested": {"deep": [1, 2, {"x": null}]}});
    let filtered = schema.filter_properties(Some(&props(json!({"payload": payload}))));
    assert_eq!(filtered.get("payload"), Some(&payload));
}

#[test]
fn filter_keeps_declared_null_values() {
    let filtered = person_schema().filter_properties(Some(&props(json!({"name": null}))));
    assert_eq!(filtered, props(json!({"name": null})));
}

#[test]
fn filter_does_not_mutate_input() {
    let object = props(json!({"id": 1, "extra": true}));
    let _ = person_schema().filter_properties(Some(&object));
    assert_eq!(object, props(json!({"id": 1, "extra": true})));
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn schema_serde_roundtrip() {
    let original = person_schema();
    let json = serde_json::to_string(&original).unwrap();
    let parsed: ModelSchema = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.record_type, original.record_type);
    assert_eq!(parsed.attributes, original.attributes);
}

#[test]
fn schema_deserializes_from_json_contract() {
    let json = r#"{
        "record_type": "task",
        "attributes": [
            {"name": "id", "kind": "integer"},
            {"name": "title", "kind": "text"},
            {"name": "done", "kind": "boolean"},
            {"name": "due_date", "kind": "date_time"}
        ]
    }"#;

    let schema: ModelSchema = serde_json::from_str(json).unwrap();
    assert_eq!(schema.record_type, "task");
    assert_eq!(schema.attributes.len(), 4);
    assert!(schema.declares("due_date"));
}

// ── Edge cases ───────────────────────────────────────────────────

#[test]
fn schema_with_no_attributes_filters_everything_away() {
    let schema = ModelSchema::new("blob", vec![]);
    let filtered = schema.filter_properties(Some(&props(json!({"anything": 1}))));
    assert!(filtered.is_empty());
}

#[test]
fn schema_clone_is_independent() {
    let original = person_schema();
    let mut cloned = original.clone();
    cloned.record_type = "different".to_string();
    cloned.attributes.pop();

    assert_eq!(original.record_type, "person");
    assert_eq!(original.attributes.len(), 2);
    assert_eq!(cloned.attributes.len(), 1);
}
