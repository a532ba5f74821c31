//! Schema Invariant Tests
//!
//! Tests for schema construction rules:
//! - Paths are non-empty dotted paths, unique per schema
//! - Getters only sit where they can run
//! - Variant names and values are unique per discriminator
//! - Variant schemas merge base fields

use std::sync::Arc;

use lean_getters::schema::{FieldDef, GetterResult, Schema, SchemaErrorCode};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn identity(v: Option<Value>, _: &Value) -> GetterResult<Option<Value>> {
    Ok(v)
}

fn child() -> Schema {
    Schema::builder("child")
        .field(FieldDef::scalar("name").get(identity))
        .build()
        .unwrap()
}

// =============================================================================
// Path Tests
// =============================================================================

/// Empty paths and empty segments are rejected.
#[test]
fn test_invalid_paths_rejected() {
    for path in ["", "a..b", ".a", "a."] {
        let err = Schema::builder("paths")
            .field(FieldDef::scalar(path))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::LeanSchemaInvalidPath, "{:?}", path);
        assert_eq!(err.schema(), Some("paths"));
    }
}

/// The same path cannot be declared twice.
#[test]
fn test_duplicate_path_rejected() {
    let err = Schema::builder("dupes")
        .field(FieldDef::scalar("name"))
        .field(FieldDef::scalar("name").get(identity))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaDuplicatePath);
    assert_eq!(err.subject(), Some("name"));
}

// =============================================================================
// Getter Placement Tests
// =============================================================================

/// Element getters belong to scalar arrays only.
#[test]
fn test_element_getter_on_scalar_rejected() {
    let err = Schema::builder("misplaced")
        .field(FieldDef::scalar("name").element_get(identity))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaMisplacedGetter);
}

/// Embedded fields take their getters from the child schema.
#[test]
fn test_getter_on_embedded_rejected() {
    let err = Schema::builder("misplaced")
        .field(FieldDef::embedded("child", child()).get(identity))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaMisplacedGetter);

    let err = Schema::builder("misplaced")
        .field(FieldDef::embedded_array("children", child()).element_get(identity))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaMisplacedGetter);
}

/// Scalar arrays accept both kinds of getters.
#[test]
fn test_scalar_array_getters_accepted() {
    let schema = Schema::builder("arrays")
        .field(
            FieldDef::scalar_array("tags")
                .get(identity)
                .element_get(identity),
        )
        .build()
        .unwrap();
    let tags = schema.field("tags").unwrap();
    assert_eq!(tags.getters().len(), 1);
    assert_eq!(tags.element_getters().len(), 1);
}

// =============================================================================
// Discriminator Tests
// =============================================================================

/// An empty discriminator key is rejected.
#[test]
fn test_empty_discriminator_key_rejected() {
    let err = Schema::builder("events")
        .discriminator_key("")
        .build()
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaInvalidDiscriminator);
}

/// Names and values are unique among variants.
#[test]
fn test_duplicate_variants_rejected() {
    let base = Schema::builder("events").build().unwrap();
    base.register_variant("Click", child(), None).unwrap();

    let err = base.register_variant("Click", child(), Some(json!("other"))).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaDuplicateVariant);

    let err = base.register_variant("Tap", child(), Some(json!("Click"))).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaDuplicateVariant);

    assert_eq!(base.discriminator().variant_names(), vec!["Click".to_string()]);
}

/// Variant values must be strings or numbers.
#[test]
fn test_variant_value_type() {
    let base = Schema::builder("events").build().unwrap();
    let err = base
        .register_variant("Bad", child(), Some(json!({"x": 1})))
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LeanSchemaInvalidDiscriminator);
    assert!(base.register_variant("Numbered", child(), Some(json!(7))).is_ok());
}

/// A variant keeps base fields it does not redeclare, base fields first.
#[test]
fn test_variant_merges_base_fields() {
    let base = Arc::new(
        Schema::builder("events")
            .field(FieldDef::scalar("time"))
            .field(FieldDef::scalar("name"))
            .build()
            .unwrap(),
    );
    let variant = base
        .register_variant(
            "Click",
            Schema::builder("click")
                .field(FieldDef::scalar("name").get(identity))
                .field(FieldDef::scalar("url"))
                .build()
                .unwrap(),
            None,
        )
        .unwrap();

    let paths: Vec<&str> = variant.fields().iter().map(|f| f.path()).collect();
    assert_eq!(paths, vec!["time", "name", "url"]);
    assert!(variant.field("name").unwrap().has_getters());
    assert_eq!(variant.discriminator_key(), base.discriminator_key());

    let doc = json!({"__t": "Click"});
    assert_eq!(base.variant_for(&doc).unwrap().name(), "Click");
    assert!(base.variant_for(&json!({"__t": "Other"})).is_none());
}
