//! Schema-driven document walker
//!
//! Walk order per document:
//! 1. Null documents are skipped, arrays recurse element-wise
//! 2. The effective schema is resolved from the discriminator
//! 3. Fields are visited in declaration order
//! 4. Projection and presence decide whether a field is touched
//! 5. Getters are applied and written back in place
//!
//! Shape deviations (missing keys, nulls, non-arrays where arrays were
//! declared, unknown discriminator values) are never errors. Getter errors
//! are returned as-is.

use serde_json::Value;

use super::context::WalkContext;
use crate::document::{get_path, get_path_mut, has_path, join_path, remove_path, set_path};
use crate::schema::{FieldDef, FieldKind, GetterResult, Schema};

/// Applies getters to a query result in place.
///
/// `result` may be a single document or an array of documents. The same
/// reference is handed back, so callers keep the identity they passed in.
pub fn apply_getters<'r>(
    schema: &Schema,
    result: &'r mut Value,
    ctx: &WalkContext<'_>,
) -> GetterResult<&'r mut Value> {
    if result.is_null() || !ctx.getters_enabled() {
        return Ok(result);
    }

    if let Value::Array(items) = &mut *result {
        for item in items.iter_mut() {
            apply_to_document(schema, item, ctx, "")?;
        }
    } else {
        apply_to_document(schema, result, ctx, "")?;
    }
    Ok(result)
}

/// Applies getters to one document whose fields live under `prefix`.
pub fn apply_to_document(
    schema: &Schema,
    doc: &mut Value,
    ctx: &WalkContext<'_>,
    prefix: &str,
) -> GetterResult<()> {
    match doc {
        Value::Null => return Ok(()),
        Value::Array(items) => {
            for item in items.iter_mut() {
                apply_to_document(schema, item, ctx, prefix)?;
            }
            return Ok(());
        }
        _ => {}
    }

    let variant = schema.variant_for(doc);
    let effective: &Schema = variant.as_deref().unwrap_or(schema);

    for field in effective.fields() {
        let full_path = join_path(prefix, field.path());
        if !ctx.projection().admits(&full_path) {
            continue;
        }
        if !has_path(doc, field.path()) {
            continue;
        }

        match field.kind() {
            FieldKind::Embedded(child) => {
                if let Some(nested) = get_path_mut(doc, field.path()) {
                    apply_to_document(child, nested, ctx, &full_path)?;
                }
            }
            FieldKind::EmbeddedArray(child) => {
                if let Some(Value::Array(items)) = get_path_mut(doc, field.path()) {
                    for item in items.iter_mut() {
                        apply_to_document(child, item, ctx, &full_path)?;
                    }
                }
            }
            FieldKind::ScalarArray => apply_scalar_array(field, doc)?,
            FieldKind::Scalar => apply_scalar(field, doc)?,
        }
    }

    Ok(())
}

fn apply_scalar(field: &FieldDef, doc: &mut Value) -> GetterResult<()> {
    if field.getters().is_empty() {
        return Ok(());
    }

    let raw = get_path(doc, field.path()).cloned();
    let value = field.getters().apply(raw, doc)?;
    write_back(doc, field.path(), value);
    Ok(())
}

// A whole-array getter may collapse the array to a scalar or to undefined.
// Element getters only run when the result is still an array.
fn apply_scalar_array(field: &FieldDef, doc: &mut Value) -> GetterResult<()> {
    if !field.has_getters() {
        return Ok(());
    }

    let raw = get_path(doc, field.path()).cloned();
    let value = match field.getters().apply(raw, doc)? {
        Some(Value::Array(items)) if !field.element_getters().is_empty() => {
            let mut mapped = Vec::with_capacity(items.len());
            for item in items {
                let out = field.element_getters().apply(Some(item), doc)?;
                mapped.push(out.unwrap_or(Value::Null));
            }
            Some(Value::Array(mapped))
        }
        other => other,
    };
    write_back(doc, field.path(), value);
    Ok(())
}

fn write_back(doc: &mut Value, path: &str, value: Option<Value>) {
    match value {
        Some(value) => {
            set_path(doc, path, value);
        }
        None => {
            remove_path(doc, path);
        }
    }
}
