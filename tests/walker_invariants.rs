//! Walker Invariant Tests
//!
//! Properties of getter application on plain results:
//! - Disabled walks leave results untouched
//! - Idempotent getters walk idempotently
//! - Results are mutated in place and handed back
//! - Fields without getters are never touched or added
//! - Projected-out paths never reach a getter
//! - Discriminator dispatch with base fallback
//! - Each nested getter runs exactly once per document
//! - Getter errors surface unchanged
//! - Shared schemas are safe across threads

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use lean_getters::projection::Projection;
use lean_getters::schema::{FieldDef, GetterError, GetterResult, Schema};
use lean_getters::walker::{apply_getters, WalkContext};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn upper(v: Option<Value>, _: &Value) -> GetterResult<Option<Value>> {
    Ok(v.map(|v| match v {
        Value::String(s) => Value::String(s.to_uppercase()),
        other => other,
    }))
}

fn counting(calls: &Arc<AtomicUsize>) -> impl Fn(Option<Value>, &Value) -> GetterResult<Option<Value>> {
    let calls = Arc::clone(calls);
    move |v, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        upper(v, &Value::Null)
    }
}

fn walk(schema: &Schema, doc: &mut Value, projection: &Projection) -> GetterResult<()> {
    apply_getters(schema, doc, &WalkContext::enabled(projection)).map(|_| ())
}

fn users() -> Schema {
    Schema::builder("users")
        .field(FieldDef::scalar("name").get(upper))
        .field(FieldDef::scalar("email"))
        .build()
        .unwrap()
}

// =============================================================================
// No-Op Tests
// =============================================================================

/// Disabled walks never change a result, whatever its shape.
#[test]
fn test_disabled_walk_is_noop() {
    let schema = users();
    let projection = Projection::none();
    let ctx = WalkContext::disabled(&projection);

    for original in [
        json!({"name": "a", "email": "b"}),
        json!([{"name": "a"}, {"name": "b"}]),
        json!(null),
        json!({}),
    ] {
        let mut doc = original.clone();
        apply_getters(&schema, &mut doc, &ctx).unwrap();
        assert_eq!(doc, original);
    }
}

/// Null results pass through with getters enabled.
#[test]
fn test_null_result_passes_through() {
    let mut doc = Value::Null;
    walk(&users(), &mut doc, &Projection::none()).unwrap();
    assert!(doc.is_null());
}

/// A schema without getters leaves every result equal to its input.
#[test]
fn test_schema_without_getters_is_noop() {
    let schema = Schema::builder("plain")
        .field(FieldDef::scalar("a"))
        .field(FieldDef::scalar_array("tags"))
        .build()
        .unwrap();
    let original = json!({"a": 1, "tags": ["x"], "extra": true});
    let mut doc = original.clone();
    walk(&schema, &mut doc, &Projection::none()).unwrap();
    assert_eq!(doc, original);
}

/// Declared fields a record does not carry are never added.
#[test]
fn test_absent_fields_not_synthesized() {
    let schema = Schema::builder("synth")
        .field(FieldDef::scalar("name").get(|_, _| Ok(Some(json!("always")))))
        .field(FieldDef::scalar("nested.value").get(|_, _| Ok(Some(json!("always")))))
        .build()
        .unwrap();
    let mut doc = json!({"other": 1});
    walk(&schema, &mut doc, &Projection::none()).unwrap();
    assert_eq!(doc, json!({"other": 1}));
}

/// Walking an already-walked result with idempotent getters changes nothing.
#[test]
fn test_idempotent_getters_walk_idempotently() {
    let child = Schema::builder("child")
        .field(FieldDef::scalar("name").get(upper))
        .build()
        .unwrap();
    let schema = Schema::builder("root")
        .field(FieldDef::scalar("name").get(upper))
        .field(FieldDef::scalar_array("tags").element_get(upper))
        .field(FieldDef::embedded_array("children", child))
        .build()
        .unwrap();

    let mut once = json!({"name": "a", "tags": ["x", "y"], "children": [{"name": "c"}]});
    walk(&schema, &mut once, &Projection::none()).unwrap();
    let mut twice = once.clone();
    walk(&schema, &mut twice, &Projection::none()).unwrap();

    assert_eq!(once, twice);
    assert_eq!(
        once,
        json!({"name": "A", "tags": ["X", "Y"], "children": [{"name": "C"}]})
    );
}

// =============================================================================
// Identity Tests
// =============================================================================

/// The reference returned is the reference passed in.
#[test]
fn test_same_reference_returned() {
    let schema = users();
    let projection = Projection::none();
    let ctx = WalkContext::enabled(&projection);

    let mut list = json!([{"name": "a"}, {"name": "b"}]);
    let before: *const Value = &list;
    let returned = apply_getters(&schema, &mut list, &ctx).unwrap();
    assert!(std::ptr::eq(before, returned));
    assert_eq!(list, json!([{"name": "A"}, {"name": "B"}]));
}

// =============================================================================
// Projection Tests
// =============================================================================

/// Excluded and unselected paths never reach their getters.
#[test]
fn test_projected_out_getters_not_called() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = Schema::builder("projected")
        .field(FieldDef::scalar("secret").get(counting(&calls)))
        .field(FieldDef::scalar("name").get(upper))
        .build()
        .unwrap();

    let mut doc = json!({"secret": "s", "name": "n"});
    walk(&schema, &mut doc, &Projection::parse("-secret").unwrap()).unwrap();
    assert_eq!(doc, json!({"secret": "s", "name": "N"}));

    let mut doc = json!({"secret": "s", "name": "n"});
    walk(&schema, &mut doc, &Projection::parse("name").unwrap()).unwrap();
    assert_eq!(doc["name"], json!("N"));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Excluding a parent path excludes everything below it.
#[test]
fn test_excluded_parent_covers_children() {
    let calls = Arc::new(AtomicUsize::new(0));
    let child = Schema::builder("child")
        .field(FieldDef::scalar("name").get(counting(&calls)))
        .build()
        .unwrap();
    let schema = Schema::builder("parent")
        .field(FieldDef::embedded("child", child))
        .build()
        .unwrap();

    let mut doc = json!({"child": {"name": "x"}});
    walk(&schema, &mut doc, &Projection::parse("-child").unwrap()).unwrap();
    assert_eq!(doc, json!({"child": {"name": "x"}}));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Discriminator Tests
// =============================================================================

/// Each element uses its own variant; unmatched values use the base schema.
#[test]
fn test_discriminator_dispatch_with_fallback() {
    let base = Arc::new(
        Schema::builder("shape")
            .field(FieldDef::scalar("label").get(upper))
            .build()
            .unwrap(),
    );
    base.register_variant(
        "circle",
        Schema::builder("circle")
            .field(FieldDef::scalar("radius").get(|v, _| {
                Ok(v.and_then(|v| v.as_f64()).map(|r| json!(r * 2.0)))
            }))
            .build()
            .unwrap(),
        None,
    )
    .unwrap();
    base.register_variant(
        "square",
        Schema::builder("square")
            .field(FieldDef::scalar("label").get(|v, _| {
                Ok(v.map(|v| json!(format!("[{}]", v.as_str().unwrap_or_default()))))
            }))
            .build()
            .unwrap(),
        Some(json!(4)),
    )
    .unwrap();

    let mut list = json!([
        {"__t": "circle", "label": "c", "radius": 1.5},
        {"__t": 4, "label": "s"},
        {"__t": "triangle", "label": "t", "radius": 1.5},
        {"label": "plain"}
    ]);
    walk(&base, &mut list, &Projection::none()).unwrap();

    assert_eq!(
        list,
        json!([
            {"__t": "circle", "label": "C", "radius": 3.0},
            {"__t": 4, "label": "[s]"},
            {"__t": "triangle", "label": "T", "radius": 1.5},
            {"label": "PLAIN"}
        ])
    );
}

// =============================================================================
// Nesting Tests
// =============================================================================

/// Root, embedded array, embedded array: every getter runs exactly once.
#[test]
fn test_three_levels_each_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let leaf = Schema::builder("leaf")
        .field(FieldDef::scalar("v").get(counting(&calls)))
        .build()
        .unwrap();
    let middle = Schema::builder("middle")
        .field(FieldDef::scalar("v").get(counting(&calls)))
        .field(FieldDef::embedded_array("leaves", leaf))
        .build()
        .unwrap();
    let root = Schema::builder("root")
        .field(FieldDef::scalar("v").get(counting(&calls)))
        .field(FieldDef::embedded_array("middles", middle))
        .build()
        .unwrap();

    let mut doc = json!({
        "v": "r",
        "middles": [
            {"v": "m", "leaves": [{"v": "a"}, {"v": "b"}]},
            {"v": "n", "leaves": [{"v": "c"}]}
        ]
    });
    walk(&root, &mut doc, &Projection::none()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert_eq!(
        doc,
        json!({
            "v": "R",
            "middles": [
                {"v": "M", "leaves": [{"v": "A"}, {"v": "B"}]},
                {"v": "N", "leaves": [{"v": "C"}]}
            ]
        })
    );
}

/// The owner argument is the document that directly holds the field.
#[test]
fn test_getter_sees_direct_owner() {
    let child = Schema::builder("child")
        .field(FieldDef::scalar("name").get(|v, owner| {
            let unit = owner.get("unit").and_then(Value::as_str).unwrap_or("?");
            Ok(v.map(|v| json!(format!("{} {}", v, unit))))
        }))
        .build()
        .unwrap();
    let schema = Schema::builder("parent")
        .field(FieldDef::embedded_array("items", child))
        .build()
        .unwrap();

    let mut doc = json!({"unit": "outer", "items": [{"name": 1, "unit": "kg"}]});
    walk(&schema, &mut doc, &Projection::none()).unwrap();
    assert_eq!(doc["items"][0]["name"], json!("1 kg"));
}

// =============================================================================
// Shape Deviation Tests
// =============================================================================

/// Non-arrays where arrays are declared, and nulls, are not errors.
#[test]
fn test_shape_deviations_tolerated() {
    let child = Schema::builder("child")
        .field(FieldDef::scalar("name").get(upper))
        .build()
        .unwrap();
    let schema = Schema::builder("loose")
        .field(FieldDef::embedded_array("children", Arc::new(child)))
        .field(FieldDef::scalar_array("tags").element_get(upper))
        .build()
        .unwrap();

    for original in [
        json!({"children": "oops", "tags": "single"}),
        json!({"children": null, "tags": null}),
        json!({"children": [null, 3], "tags": []}),
    ] {
        let mut doc = original.clone();
        walk(&schema, &mut doc, &Projection::none()).unwrap();
        assert_eq!(doc, original);
    }
}

// =============================================================================
// Error Tests
// =============================================================================

/// The getter's own error reaches the caller.
#[test]
fn test_getter_error_propagates() {
    let schema = Schema::builder("failing")
        .field(FieldDef::scalar("first").get(upper))
        .field(FieldDef::scalar("second").get(|_, _| Err(GetterError::new("bad value"))))
        .build()
        .unwrap();

    let mut doc = json!({"first": "a", "second": "b"});
    let err = walk(&schema, &mut doc, &Projection::none()).unwrap_err();
    assert_eq!(err.message(), "bad value");
}

// =============================================================================
// Concurrency Tests
// =============================================================================

/// One schema serves many threads walking their own results.
#[test]
fn test_concurrent_walks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = Arc::new(
        Schema::builder("shared")
            .field(FieldDef::scalar("name").get(counting(&calls)))
            .build()
            .unwrap(),
    );
    let projection = Projection::none();

    thread::scope(|s| {
        for t in 0..8 {
            let schema = Arc::clone(&schema);
            let projection = &projection;
            s.spawn(move || {
                for i in 0..50 {
                    let mut doc = json!({"name": format!("t{}-{}", t, i)});
                    walk(&schema, &mut doc, projection).unwrap();
                    assert_eq!(doc["name"], json!(format!("T{}-{}", t, i)));
                }
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 400);
}
