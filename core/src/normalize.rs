//! Structural normalization of metadata schemas.
//!
//! Schema-level query analysis only asks whether a *shape* is plausible, so
//! before a plugin-supplied metadata schema is compiled it is rewritten:
//!
//! - property names are upper-cased, matching the engine's case-insensitive
//!   key lookup;
//! - `required` and dependency constraints are stripped, replaced by a
//!   coarse `minProperties: 1` so "any one of several keys" definitions
//!   still demand a non-empty object;
//! - every primitive type is collapsed to the `"null"` placeholder, since
//!   canonical instances carry `null` leaves and values are never checked at
//!   the schema level;
//! - value-level keywords (`enum`, `const`, bounds, patterns, formats) are
//!   dropped entirely.
//!
//! A second, fully relaxed variant additionally drops length/property
//! minimums; existence-only checks validate against it so that `{}` and `[]`
//! leaves pass schemas declaring `minItems` or `minProperties`.

use serde_json::{Map, Value};

/// Keywords whose subschema values are rewritten recursively.
const SUBSCHEMA_KEYS: &[&str] = &[
    "additionalProperties",
    "additionalItems",
    "contains",
    "items",
    "not",
    "propertyNames",
];

/// Keywords holding arrays of subschemas.
const SUBSCHEMA_LIST_KEYS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// Keywords holding maps of subschemas (keys left untouched).
const SUBSCHEMA_MAP_KEYS: &[&str] = &["definitions", "$defs", "patternProperties"];

/// Required-property and dependency keywords, stripped during normalization.
const REQUIREMENT_KEYS: &[&str] = &[
    "required",
    "dependencies",
    "dependentRequired",
    "dependentSchemas",
];

/// Value-level keywords, meaningless for structural checks.
const VALUE_KEYS: &[&str] = &[
    "const",
    "enum",
    "exclusiveMaximum",
    "exclusiveMinimum",
    "format",
    "maxLength",
    "maximum",
    "minLength",
    "minimum",
    "multipleOf",
    "pattern",
    "uniqueItems",
];

/// Length/property minimums, additionally stripped in the relaxed variant.
const MINIMUM_KEYS: &[&str] = &["minItems", "minProperties"];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Standard,
    Relaxed,
}

/// Normalizes a metadata schema for structural validation.
///
/// # Examples
///
/// ```
/// use vfind_core::normalize_meta_schema;
/// use serde_json::json;
///
/// let schema = json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": { "name": { "type": "string", "minLength": 1 } }
/// });
/// assert_eq!(
///     normalize_meta_schema(&schema),
///     json!({
///         "type": "object",
///         "minProperties": 1,
///         "properties": { "NAME": { "type": "null" } }
///     })
/// );
/// ```
pub fn normalize_meta_schema(schema: &Value) -> Value {
    rewrite(schema, Mode::Standard)
}

/// Normalizes a metadata schema with length/property minimums removed.
///
/// Existence-only key sequences validate their `{}`/`[]` leaves against this
/// variant so that only structural plausibility is checked.
pub fn relax_meta_schema(schema: &Value) -> Value {
    rewrite(schema, Mode::Relaxed)
}

fn rewrite(schema: &Value, mode: Mode) -> Value {
    let Some(object) = schema.as_object() else {
        // Boolean schemas (and anything else) pass through unchanged.
        return schema.clone();
    };

    let had_requirements = REQUIREMENT_KEYS.iter().any(|k| object.contains_key(*k));
    let mut out = Map::with_capacity(object.len());

    for (key, value) in object {
        let key = key.as_str();
        if REQUIREMENT_KEYS.contains(&key) || VALUE_KEYS.contains(&key) {
            continue;
        }
        if mode == Mode::Relaxed && MINIMUM_KEYS.contains(&key) {
            continue;
        }

        let rewritten = if key == "type" {
            collapse_type(value)
        } else if key == "properties" {
            rewrite_properties(value, mode)
        } else if SUBSCHEMA_KEYS.contains(&key) {
            // `items` may also be the tuple form, an array of subschemas.
            match value {
                Value::Array(items) => {
                    Value::Array(items.iter().map(|v| rewrite(v, mode)).collect())
                }
                other => rewrite(other, mode),
            }
        } else if SUBSCHEMA_LIST_KEYS.contains(&key) {
            match value {
                Value::Array(items) => {
                    Value::Array(items.iter().map(|v| rewrite(v, mode)).collect())
                }
                other => other.clone(),
            }
        } else if SUBSCHEMA_MAP_KEYS.contains(&key) {
            match value {
                Value::Object(map) => Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), rewrite(v, mode)))
                        .collect(),
                ),
                other => other.clone(),
            }
        } else {
            value.clone()
        };

        out.insert(key.to_string(), rewritten);
    }

    if mode == Mode::Standard && had_requirements {
        out.insert("minProperties".to_string(), Value::from(1));
    }

    Value::Object(out)
}

/// Upper-cases property names. Two sibling keys differing only by case
/// collapse to one; which survives is unspecified, matching the documented
/// ambiguity of case-insensitive lookup.
fn rewrite_properties(value: &Value, mode: Mode) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_uppercase(), rewrite(v, mode)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn collapse_type(value: &Value) -> Value {
    match value {
        Value::String(name) => Value::String(placeholder(name).to_string()),
        Value::Array(names) => {
            let mut collapsed: Vec<Value> = Vec::with_capacity(names.len());
            for name in names {
                let mapped = match name.as_str() {
                    Some(s) => Value::String(placeholder(s).to_string()),
                    None => name.clone(),
                };
                if !collapsed.contains(&mapped) {
                    collapsed.push(mapped);
                }
            }
            Value::Array(collapsed)
        }
        other => other.clone(),
    }
}

fn placeholder(type_name: &str) -> &str {
    match type_name {
        "object" => "object",
        "array" => "array",
        // string/number/integer/boolean/null all collapse to the null
        // placeholder; canonical instances carry null leaves.
        _ => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_types_collapse_to_null() {
        let schema = json!({"type": "string"});
        assert_eq!(normalize_meta_schema(&schema), json!({"type": "null"}));

        let multi = json!({"type": ["string", "integer", "object"]});
        assert_eq!(
            normalize_meta_schema(&multi),
            json!({"type": ["null", "object"]})
        );
    }

    #[test]
    fn test_required_becomes_min_properties() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": { "a": {"type": "boolean"}, "b": {"type": "number"} }
        });
        let normalized = normalize_meta_schema(&schema);
        assert_eq!(normalized["minProperties"], json!(1));
        assert!(normalized.get("required").is_none());
        assert_eq!(normalized["properties"]["A"], json!({"type": "null"}));
    }

    #[test]
    fn test_value_keywords_stripped() {
        let schema = json!({
            "type": "number",
            "minimum": 0,
            "maximum": 10,
            "enum": [1, 2, 3]
        });
        assert_eq!(normalize_meta_schema(&schema), json!({"type": "null"}));
    }

    #[test]
    fn test_relaxed_drops_minimums() {
        let schema = json!({
            "type": "array",
            "minItems": 2,
            "items": {"type": "object", "minProperties": 3}
        });
        assert_eq!(
            relax_meta_schema(&schema),
            json!({"type": "array", "items": {"type": "object"}})
        );
        // Standard normalization keeps them.
        let normalized = normalize_meta_schema(&schema);
        assert_eq!(normalized["minItems"], json!(2));
    }

    #[test]
    fn test_nested_combinators_rewritten() {
        let schema = json!({
            "anyOf": [
                {"type": "object", "properties": {"x": {"type": "string"}}},
                {"type": "boolean"}
            ]
        });
        assert_eq!(
            normalize_meta_schema(&schema),
            json!({
                "anyOf": [
                    {"type": "object", "properties": {"X": {"type": "null"}}},
                    {"type": "null"}
                ]
            })
        );
    }
}
