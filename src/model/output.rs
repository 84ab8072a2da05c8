use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::{SchemaEntity, SCHEMA_CONTEXT};

/// Ordered, deduplicated entities with resolved identifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledOutput {
    pub entities: Vec<SchemaEntity>,
}

impl AssembledOutput {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn find_by_type(&self, schema_type: &str) -> Option<&SchemaEntity> {
        self.entities.iter().find(|e| e.has_type(schema_type))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SchemaEntity> {
        self.entities.iter().find(|e| e.id() == Some(id))
    }

    /// One entity is emitted as-is; several are wrapped in a `@graph`
    pub fn to_json_ld(&self) -> Value {
        match self.entities.as_slice() {
            [] => Value::Null,
            [single] => {
                let mut entity = single.clone();
                if !entity.contains_key("@context") {
                    entity.insert("@context", Value::String(SCHEMA_CONTEXT.to_string()));
                }
                entity.into_value()
            }
            many => {
                let graph = many
                    .iter()
                    .map(|entity| {
                        let mut entity = entity.clone();
                        entity.remove("@context");
                        entity.into_value()
                    })
                    .collect();
                let mut document = Map::new();
                document.insert("@context".to_string(), Value::String(SCHEMA_CONTEXT.to_string()));
                document.insert("@graph".to_string(), Value::Array(graph));
                Value::Object(document)
            }
        }
    }

    /// Minified JSON-LD wrapped for insertion into an HTML page
    pub fn to_script_tag(&self) -> Result<String> {
        if self.entities.is_empty() {
            return Ok(String::new());
        }
        let minified = serde_json::to_string(&self.to_json_ld())?;
        Ok(format!(
            "<script type=\"application/ld+json\">\n{}\n</script>",
            minified
        ))
    }
}
