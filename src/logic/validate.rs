use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::model::{is_blank, AssembledOutput, SchemaEntity};
use crate::templates::TemplateStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub entity_count: usize,
    pub validated_entities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub entity: String,
    pub error_type: ValidationErrorType,
    pub message: String,
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub entity: String,
    pub warning_type: ValidationWarningType,
    pub message: String,
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationErrorType {
    MissingType,
    MissingRequiredProperty,
    InvalidItemReviewed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationWarningType {
    MissingRecommendedProperty,
    UnknownType,
}

/// Structural checks on generated JSON-LD: required and recommended fields
/// per type, and a concrete `Review.itemReviewed`. Not a vocabulary validator.
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn validate_output(templates: &TemplateStore, output: &AssembledOutput) -> ValidationResult {
        Self::validate_entities(templates, &output.entities)
    }

    /// Accepts a single entity or a `{"@graph": [...]}` document
    pub fn validate_document(templates: &TemplateStore, document: &Value) -> Result<ValidationResult> {
        let entities = match document.get("@graph") {
            Some(Value::Array(graph)) => graph
                .iter()
                .map(|item| {
                    SchemaEntity::from_value(item.clone()).ok_or_else(|| {
                        SchemaError::InvalidDocument("@graph items must be objects".to_string())
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(SchemaError::InvalidDocument(
                    "@graph must be an array".to_string(),
                ))
            }
            None => {
                let entity = SchemaEntity::from_value(document.clone()).ok_or_else(|| {
                    SchemaError::InvalidDocument("expected a JSON-LD object".to_string())
                })?;
                vec![entity]
            }
        };
        Ok(Self::validate_entities(templates, &entities))
    }

    fn validate_entities(templates: &TemplateStore, entities: &[SchemaEntity]) -> ValidationResult {
        let mut result = ValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            entity_count: entities.len(),
            validated_entities: Vec::new(),
        };

        for entity in entities {
            let label = entity
                .id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| entity.signature().to_string());
            Self::validate_entity(templates, entity, &label, &mut result);
            result.validated_entities.push(label);
        }

        result.valid = result.errors.is_empty();
        result
    }

    fn validate_entity(
        templates: &TemplateStore,
        entity: &SchemaEntity,
        label: &str,
        result: &mut ValidationResult,
    ) {
        let types = entity.types();
        if types.is_empty() {
            result.errors.push(ValidationError {
                entity: label.to_string(),
                error_type: ValidationErrorType::MissingType,
                message: "Entity has no @type".to_string(),
                property_name: Some("@type".to_string()),
            });
            return;
        }

        let present = |field: &str| entity.get(field).map(|v| !is_blank(v)).unwrap_or(false);

        for schema_type in &types {
            if !templates.contains(schema_type) {
                result.warnings.push(ValidationWarning {
                    entity: label.to_string(),
                    warning_type: ValidationWarningType::UnknownType,
                    message: format!("No field rules for type '{}'", schema_type),
                    property_name: None,
                });
                continue;
            }

            for field in templates.required_fields(schema_type) {
                if !present(field) {
                    result.errors.push(ValidationError {
                        entity: label.to_string(),
                        error_type: ValidationErrorType::MissingRequiredProperty,
                        message: format!("{} requires '{}'", schema_type, field),
                        property_name: Some(field.clone()),
                    });
                }
            }
            for field in templates.recommended_fields(schema_type) {
                if !present(field) {
                    result.warnings.push(ValidationWarning {
                        entity: label.to_string(),
                        warning_type: ValidationWarningType::MissingRecommendedProperty,
                        message: format!("{} should have '{}'", schema_type, field),
                        property_name: Some(field.clone()),
                    });
                }
            }
        }

        if entity.has_type("Review") && !has_concrete_item(entity.get("itemReviewed")) {
            result.errors.push(ValidationError {
                entity: label.to_string(),
                error_type: ValidationErrorType::InvalidItemReviewed,
                message: "itemReviewed must reference an entity or name a type other than Thing"
                    .to_string(),
                property_name: Some("itemReviewed".to_string()),
            });
        }
    }
}

fn has_concrete_item(item: Option<&Value>) -> bool {
    let Some(item) = item else {
        return false;
    };
    let non_empty = |key: &str| {
        item.get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    };
    non_empty("@id").is_some() || non_empty("@type").map(|t| t != "Thing").unwrap_or(false)
}
