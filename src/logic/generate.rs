use log::warn;
use serde_json::{json, Value};

use crate::logic::clean::clean_entity;
use crate::logic::fill::{fill_entity, review_item_type, FillContext};
use crate::model::{is_blank, SchemaEntity, SchemaKind};
use crate::templates::TemplateStore;

/// Builds one filled entity per type from the template store
#[derive(Debug, Clone, Copy)]
pub struct SchemaGenerator<'a> {
    templates: &'a TemplateStore,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(templates: &'a TemplateStore) -> Self {
        Self { templates }
    }

    /// `None` when the store has no template for `schema_type`
    pub fn generate(
        &self,
        schema_type: &str,
        ctx: &FillContext,
        include_optional: bool,
    ) -> Option<SchemaEntity> {
        let mut entity = self.templates.get_template(schema_type)?;
        let kind = SchemaKind::parse(schema_type);

        fill_entity(&mut entity, &kind, ctx);

        if kind == SchemaKind::Review {
            ensure_review_item_type(&mut entity, ctx);
        }

        let required = self.templates.required_fields(schema_type);
        if !include_optional {
            clean_entity(&mut entity, required);
        }

        let missing: Vec<&str> = required
            .iter()
            .filter(|field| entity.get(field).map(is_blank).unwrap_or(true))
            .map(|field| field.as_str())
            .collect();
        if !missing.is_empty() {
            warn!(
                "{} is missing required fields: {}",
                schema_type,
                missing.join(", ")
            );
        }

        Some(entity)
    }
}

/// `itemReviewed` must name a concrete type, never `Thing`
fn ensure_review_item_type(entity: &mut SchemaEntity, ctx: &FillContext) {
    let current = entity
        .get("itemReviewed")
        .and_then(|item| item.get("@type"))
        .and_then(|t| t.as_str())
        .unwrap_or("");
    if !current.is_empty() && current != "Thing" {
        return;
    }

    let item_type = review_item_type(ctx);
    match entity.get_mut("itemReviewed").and_then(|v| v.as_object_mut()) {
        Some(item) => {
            item.insert("@type".to_string(), Value::String(item_type));
        }
        None => {
            entity.insert("itemReviewed", json!({"@type": item_type}));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BusinessData, ClientInfo, SchemaTypeName};
    use chrono::{TimeZone, Utc};

    fn generate(schema_type: &str, include_optional: bool) -> Option<SchemaEntity> {
        let client = ClientInfo {
            company_name: "Acme".to_string(),
            website: "https://acme.test".to_string(),
            ..Default::default()
        };
        let data = BusinessData::new();
        let selected: Vec<SchemaTypeName> = vec![schema_type.to_string()];
        let ctx = FillContext {
            client: &client,
            data: &data,
            selected: &selected,
            now: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        SchemaGenerator::new(TemplateStore::shared()).generate(schema_type, &ctx, include_optional)
    }

    #[test]
    fn test_unknown_type_has_no_template() {
        assert!(generate("Dataset", true).is_none());
    }

    #[test]
    fn test_review_item_never_thing() {
        let review = generate("Review", true).unwrap();
        assert_eq!(review["itemReviewed"]["@type"], json!("Service"));
        assert_eq!(review["itemReviewed"]["name"], json!("Acme"));
    }

    #[test]
    fn test_optional_fields_stripped_on_request() {
        let full = generate("Organization", true).unwrap();
        assert_eq!(full.get("slogan"), Some(&json!("")));

        let trimmed = generate("Organization", false).unwrap();
        assert!(!trimmed.contains_key("slogan"));
        assert!(!trimmed.contains_key("address"));
        assert_eq!(trimmed.get("name"), Some(&json!("Acme")));
    }

    #[test]
    fn test_required_fields_survive_stripping() {
        let faq = generate("FAQPage", false).unwrap();
        assert_eq!(faq.get("mainEntity"), Some(&json!([])));
    }
}
