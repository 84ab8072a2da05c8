use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{SchemaKind, SchemaTypeName, SCHEMA_CONTEXT};

/// One JSON-LD entity. Keys follow JSON-LD (`@type`, `@id`, `@context`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaEntity {
    fields: Map<String, Value>,
}

/// Identity key used by the assembler: the sorted list of an entity's types
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeSignature(pub Vec<SchemaTypeName>);

impl TypeSignature {
    pub fn of(types: &[SchemaTypeName]) -> Self {
        let mut sorted = types.to_vec();
        sorted.sort();
        sorted.dedup();
        TypeSignature(sorted)
    }
}

impl std::fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl SchemaEntity {
    /// Bare entity carrying only `@context` and `@type`
    pub fn new(schema_type: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("@context".to_string(), Value::String(SCHEMA_CONTEXT.to_string()));
        fields.insert("@type".to_string(), Value::String(schema_type.to_string()));
        Self { fields }
    }

    /// Accepts JSON objects only
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.fields.insert(key.to_string(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `@type` value as a list, whether stored as a string or an array
    pub fn types(&self) -> Vec<SchemaTypeName> {
        match self.fields.get("@type") {
            Some(Value::String(t)) => vec![t.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn primary_type(&self) -> Option<SchemaTypeName> {
        self.types().into_iter().next()
    }

    pub fn kind(&self) -> Option<SchemaKind> {
        self.primary_type().map(|t| SchemaKind::parse(&t))
    }

    pub fn has_type(&self, schema_type: &str) -> bool {
        self.types().iter().any(|t| t == schema_type)
    }

    /// Single types are stored as a string, merged types as an array
    pub fn set_types(&mut self, types: &[SchemaTypeName]) {
        let value = if types.len() == 1 {
            Value::String(types[0].clone())
        } else {
            Value::Array(types.iter().cloned().map(Value::String).collect())
        };
        self.fields.insert("@type".to_string(), value);
    }

    pub fn signature(&self) -> TypeSignature {
        TypeSignature::of(&self.types())
    }

    pub fn id(&self) -> Option<&str> {
        self.fields
            .get("@id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: String) {
        self.fields.insert("@id".to_string(), Value::String(id));
    }

    /// Points `property` at another entity by id
    pub fn set_reference(&mut self, property: &str, target_id: &str) {
        let mut reference = Map::new();
        reference.insert("@id".to_string(), Value::String(target_id.to_string()));
        self.fields.insert(property.to_string(), Value::Object(reference));
    }

    /// The `@id` a reference-valued property points at, if any
    pub fn reference(&self, property: &str) -> Option<&str> {
        self.fields
            .get(property)
            .and_then(|v| v.get("@id"))
            .and_then(|v| v.as_str())
    }

    /// Copy suitable for nesting inside a parent: no `@context`, `@id` or `itemReviewed`
    pub fn as_embedded(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.remove("@context");
        fields.remove("@id");
        fields.remove("itemReviewed");
        Value::Object(fields)
    }
}

/// Missing keys index to `null`, mirroring `serde_json::Value`
impl std::ops::Index<&str> for SchemaEntity {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(key).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_types_accepts_string_and_list() {
        let single = SchemaEntity::new("Organization");
        assert_eq!(single.types(), vec!["Organization".to_string()]);

        let mut merged = SchemaEntity::new("LocalBusiness");
        merged.set_types(&["Organization".to_string(), "LocalBusiness".to_string()]);
        assert_eq!(merged.get("@type"), Some(&json!(["Organization", "LocalBusiness"])));
        assert!(merged.has_type("Organization"));
        assert_eq!(merged.primary_type().as_deref(), Some("Organization"));
    }

    #[test]
    fn test_signature_is_order_independent() {
        let mut a = SchemaEntity::new("LocalBusiness");
        a.set_types(&["Organization".to_string(), "LocalBusiness".to_string()]);
        let mut b = SchemaEntity::new("LocalBusiness");
        b.set_types(&["LocalBusiness".to_string(), "Organization".to_string()]);

        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), SchemaEntity::new("LocalBusiness").signature());
        assert_eq!(a.signature().to_string(), "(LocalBusiness, Organization)");
    }

    #[test]
    fn test_signature_collapses_repeated_types() {
        let signature = TypeSignature::of(&["Store".to_string(), "Store".to_string()]);
        assert_eq!(signature.0, vec!["Store".to_string()]);
    }

    #[test]
    fn test_empty_id_is_treated_as_missing() {
        let mut entity = SchemaEntity::new("Person");
        entity.insert("@id", json!(""));
        assert_eq!(entity.id(), None);
        entity.set_id("https://example.com#person".to_string());
        assert_eq!(entity.id(), Some("https://example.com#person"));
    }

    #[test]
    fn test_as_embedded_drops_top_level_keys() {
        let mut rating = SchemaEntity::new("AggregateRating");
        rating.set_id("https://example.com#aggregaterating".to_string());
        rating.insert("ratingValue", json!("4.8"));
        rating.insert("itemReviewed", json!({"@type": "Service"}));

        let embedded = rating.as_embedded();
        assert_eq!(embedded, json!({"@type": "AggregateRating", "ratingValue": "4.8"}));
    }

    #[test]
    fn test_reference_helpers() {
        let mut review = SchemaEntity::new("Review");
        review.set_reference("itemReviewed", "https://example.com#service");
        assert_eq!(review.reference("itemReviewed"), Some("https://example.com#service"));
        assert_eq!(review.reference("author"), None);
    }
}
