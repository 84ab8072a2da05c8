use serde_json::{Map, Value};

use crate::model::{is_blank, SchemaEntity, RESERVED_KEYS};

/// An object left with nothing but `@type`/`@context` carries no data
fn is_hollow(fields: &Map<String, Value>) -> bool {
    fields.keys().all(|k| k == "@type" || k == "@context")
}

/// Cleaned copy of a nested value, or `None` when nothing meaningful remains
fn clean_value(value: Value) -> Option<Value> {
    match value {
        Value::Object(fields) => {
            let cleaned: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, value)| {
                    if RESERVED_KEYS.contains(&key.as_str()) {
                        return Some((key, value));
                    }
                    clean_value(value).map(|v| (key, v))
                })
                .collect();
            if is_hollow(&cleaned) {
                None
            } else {
                Some(Value::Object(cleaned))
            }
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items.into_iter().filter_map(clean_value).collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Array(cleaned))
            }
        }
        other if is_blank(&other) => None,
        other => Some(other),
    }
}

/// Recursively drops null, empty string, empty list and empty object fields.
/// Reserved keys and the top-level `keep` fields are retained as-is.
pub fn clean_entity(entity: &mut SchemaEntity, keep: &[String]) {
    let fields = std::mem::take(entity.fields_mut());
    let cleaned: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(key, value)| {
            if RESERVED_KEYS.contains(&key.as_str()) || keep.contains(&key) {
                return Some((key, value));
            }
            clean_value(value).map(|v| (key, v))
        })
        .collect();
    *entity.fields_mut() = cleaned;
}
