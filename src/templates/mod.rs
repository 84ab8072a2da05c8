mod data;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Result, SchemaError};
use crate::model::{SchemaEntity, SchemaTypeName};

/// Reference card for one template, served by the documentation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDocumentation {
    #[serde(rename = "type")]
    pub schema_type: SchemaTypeName,
    pub required_fields: Vec<String>,
    pub recommended_fields: Vec<String>,
    pub all_fields: Vec<String>,
    pub template: Value,
}

/// Read-only mapping from type name to its default JSON-LD shape
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: HashMap<SchemaTypeName, Value>,
    order: Vec<SchemaTypeName>,
    required: HashMap<SchemaTypeName, Vec<String>>,
    recommended: HashMap<SchemaTypeName, Vec<String>>,
}

static STANDARD_TEMPLATES: OnceLock<TemplateStore> = OnceLock::new();

fn owned_table(
    table: Vec<(&'static str, &'static [&'static str])>,
) -> HashMap<SchemaTypeName, Vec<String>> {
    table
        .into_iter()
        .map(|(name, fields)| {
            (
                name.to_string(),
                fields.iter().map(|f| f.to_string()).collect(),
            )
        })
        .collect()
}

impl TemplateStore {
    pub fn shared() -> &'static TemplateStore {
        STANDARD_TEMPLATES.get_or_init(TemplateStore::standard)
    }

    pub fn standard() -> Self {
        let mut templates = HashMap::new();
        let mut order = Vec::new();
        for (name, template) in data::all_templates() {
            order.push(name.to_string());
            templates.insert(name.to_string(), template);
        }

        Self {
            templates,
            order,
            required: owned_table(data::required_fields()),
            recommended: owned_table(data::recommended_fields()),
        }
    }

    pub fn contains(&self, schema_type: &str) -> bool {
        self.templates.contains_key(schema_type)
    }

    /// Fresh copy of the template; callers own and mutate it
    pub fn get_template(&self, schema_type: &str) -> Option<SchemaEntity> {
        self.templates
            .get(schema_type)
            .cloned()
            .and_then(SchemaEntity::from_value)
    }

    /// Template types in declaration order
    pub fn available_types(&self) -> &[SchemaTypeName] {
        &self.order
    }

    pub fn required_fields(&self, schema_type: &str) -> &[String] {
        self.required
            .get(schema_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn recommended_fields(&self, schema_type: &str) -> &[String] {
        self.recommended
            .get(schema_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Union of required fields over a (possibly merged) type list
    pub fn required_fields_for(&self, types: &[SchemaTypeName]) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for field in types.iter().flat_map(|t| self.required_fields(t)) {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }

    pub fn documentation(&self, schema_type: &str) -> Result<TemplateDocumentation> {
        let template = self
            .templates
            .get(schema_type)
            .ok_or_else(|| SchemaError::UnknownType(schema_type.to_string()))?;

        let all_fields = template
            .as_object()
            .map(|fields| {
                fields
                    .keys()
                    .filter(|k| !k.starts_with('@'))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(TemplateDocumentation {
            schema_type: schema_type.to_string(),
            required_fields: self.required_fields(schema_type).to_vec(),
            recommended_fields: self.recommended_fields(schema_type).to_vec(),
            all_fields,
            template: template.clone(),
        })
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::standard()
    }
}
