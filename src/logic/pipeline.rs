use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::logic::analysis::{analyze_selection, distinct_types, SelectionAnalysis};
use crate::logic::assemble::{verify_output, FilledEntities, SchemaAssembler};
use crate::logic::fill::FillContext;
use crate::logic::generate::SchemaGenerator;
use crate::logic::optimize::SchemaOptimizer;
use crate::logic::validate::{SchemaValidator, ValidationResult};
use crate::model::{
    is_blank, BusinessData, ClientInfo, GenerateRequest, OptimizationPlan, RelationshipModel,
    SchemaTypeName,
};
use crate::templates::TemplateStore;

/// Everything a caller gets back from one generate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub json_ld: Value,
    pub script: String,
    pub plan: OptimizationPlan,
    pub messages: Vec<String>,
    pub validation: ValidationResult,
}

/// Selection -> plan -> filled entities -> assembled graph.
/// Borrows the shared tables; all per-request state is local to each call.
#[derive(Debug, Clone)]
pub struct SchemaPipeline<'a> {
    model: &'a RelationshipModel,
    templates: &'a TemplateStore,
    config: GeneratorConfig,
}

impl<'a> SchemaPipeline<'a> {
    pub fn new(
        model: &'a RelationshipModel,
        templates: &'a TemplateStore,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            model,
            templates,
            config,
        }
    }

    pub fn analyze(&self, requested: &[SchemaTypeName]) -> SelectionAnalysis {
        analyze_selection(self.model, requested)
    }

    pub fn optimize(&self, requested: &[SchemaTypeName]) -> OptimizationPlan {
        SchemaOptimizer::new(self.model).optimize(requested)
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult> {
        self.generate_at(request, Utc::now())
    }

    /// Same as `generate` with a fixed clock for generated date fields
    pub fn generate_at(
        &self,
        request: &GenerateRequest,
        now: DateTime<Utc>,
    ) -> Result<GenerationResult> {
        let start_time = Instant::now();
        let mut messages = Vec::new();

        // Step 1: Build the plan and check nothing was dropped
        let requested = distinct_types(&request.types);
        let plan = self.optimize(&requested);
        if let Err(e) = plan.verify_completeness(&requested) {
            error!("Optimization plan failed completeness check: {}", e);
            messages.push(e.to_string());
        }
        messages.extend(plan.warnings.iter().cloned());

        // Step 2: Fill every type the plan materializes
        let data = self.prepare_data(&plan, &request.client, &request.data);
        let mut selected = requested.clone();
        selected.extend(plan.auto_added.iter().cloned());
        let ctx = FillContext {
            client: &request.client,
            data: &data,
            selected: &selected,
            now,
        };
        let include_optional = request
            .include_optional
            .unwrap_or(self.config.include_optional);
        let filled = self.fill_all(&plan, &ctx, include_optional);

        // Step 3: Assemble the linked graph and re-check its invariants
        let output = SchemaAssembler::new(self.model, self.templates).assemble(
            &plan,
            &filled,
            &request.client.website,
        );
        if let Err(e) = verify_output(&output) {
            error!("Assembled output failed invariant check: {}", e);
            messages.push(e.to_string());
        }

        // Step 4: Serialize and validate
        let json_ld = output.to_json_ld();
        let script = output.to_script_tag()?;
        let validation = SchemaValidator::validate_output(self.templates, &output);
        messages.push(format!(
            "{} schemas generated without duplicates",
            output.len()
        ));

        info!(
            "Generated {} entities from {} requested types in {}ms",
            output.len(),
            requested.len(),
            start_time.elapsed().as_millis()
        );

        Ok(GenerationResult {
            json_ld,
            script,
            plan,
            messages,
            validation,
        })
    }

    /// Business data with defaults for an auto-added Service, so the injected
    /// review target is named after the reviewed item
    fn prepare_data(
        &self,
        plan: &OptimizationPlan,
        client: &ClientInfo,
        data: &BusinessData,
    ) -> BusinessData {
        let mut data = data.clone();
        if !plan.is_auto_added("Service") {
            return data;
        }

        let missing = |data: &BusinessData, key: &str| data.get(key).map(is_blank).unwrap_or(true);
        if missing(&data, "service_name") {
            let name = ["itemreviewed_name", "item_name"]
                .iter()
                .filter_map(|key| data.get(*key))
                .find(|v| !is_blank(v))
                .cloned()
                .unwrap_or_else(|| json!(self.config.default_service_name));
            data.insert("service_name".to_string(), name);
        }
        if missing(&data, "service_type") {
            data.insert(
                "service_type".to_string(),
                json!(self.config.default_service_type),
            );
        }
        if missing(&data, "service_description") && !client.description.trim().is_empty() {
            data.insert(
                "service_description".to_string(),
                json!(client.description),
            );
        }
        data
    }

    fn fill_all(
        &self,
        plan: &OptimizationPlan,
        ctx: &FillContext,
        include_optional: bool,
    ) -> FilledEntities {
        let generator = SchemaGenerator::new(self.templates);
        plan.types_to_fill()
            .into_iter()
            .filter_map(|schema_type| {
                generator
                    .generate(&schema_type, ctx, include_optional)
                    .map(|entity| (schema_type, entity))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pipeline() -> SchemaPipeline<'static> {
        SchemaPipeline::new(
            RelationshipModel::shared(),
            TemplateStore::shared(),
            GeneratorConfig::default(),
        )
    }

    fn client() -> ClientInfo {
        ClientInfo {
            company_name: "Acme".to_string(),
            website: "https://acme.test/".to_string(),
            logo: None,
            description: "Growth marketing for small shops".to_string(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_review_alone_gets_named_service() {
        let request = GenerateRequest::new(&["Review"], client());
        let result = pipeline().generate_at(&request, fixed_now()).unwrap();

        let graph = result.json_ld["@graph"].as_array().unwrap();
        assert_eq!(graph.len(), 2);
        let service = graph.iter().find(|e| e["@type"] == json!("Service")).unwrap();
        assert_eq!(service["name"], json!("Digital marketing agency"));
        assert_eq!(service["serviceType"], json!("Marketing Agency"));
        assert_eq!(service["description"], json!("Growth marketing for small shops"));

        let review = graph.iter().find(|e| e["@type"] == json!("Review")).unwrap();
        assert_eq!(review["itemReviewed"]["@id"], service["@id"]);
        assert!(result
            .messages
            .iter()
            .any(|m| m == "2 schemas generated without duplicates"));
    }

    #[test]
    fn test_reviewed_item_name_names_the_service() {
        let mut data = BusinessData::new();
        data.insert("itemreviewed_name".to_string(), json!("SEO audit"));
        let request = GenerateRequest::new(&["Review"], client()).with_data(data);
        let result = pipeline().generate_at(&request, fixed_now()).unwrap();

        let graph = result.json_ld["@graph"].as_array().unwrap();
        let service = graph.iter().find(|e| e["@type"] == json!("Service")).unwrap();
        assert_eq!(service["name"], json!("SEO audit"));
    }

    #[test]
    fn test_plan_warnings_are_reported() {
        let request = GenerateRequest::new(&["Review"], client());
        let result = pipeline().generate_at(&request, fixed_now()).unwrap();
        assert_eq!(result.plan.auto_added, vec!["Service".to_string()]);
        assert_eq!(result.messages[0], result.plan.warnings[0]);
    }

    #[test]
    fn test_single_entity_and_script() {
        let request = GenerateRequest::new(&["FAQPage"], client());
        let result = pipeline().generate_at(&request, fixed_now()).unwrap();

        assert_eq!(result.json_ld["@type"], json!("FAQPage"));
        assert_eq!(result.json_ld["@id"], json!("https://acme.test#faq"));
        assert!(result.script.contains("\"@type\":\"FAQPage\""));
        assert_eq!(result.validation.entity_count, 1);
    }

    #[test]
    fn test_include_optional_override() {
        let mut request = GenerateRequest::new(&["Organization"], client());
        request.include_optional = Some(false);
        let result = pipeline().generate_at(&request, fixed_now()).unwrap();
        assert!(result.json_ld.get("slogan").is_none());
        assert_eq!(result.json_ld["name"], json!("Acme"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let request = GenerateRequest::new(
            &["WebSite", "Organization", "LocalBusiness", "Review", "AggregateRating", "Person"],
            client(),
        );
        let first = pipeline().generate_at(&request, fixed_now()).unwrap();
        let second = pipeline().generate_at(&request, fixed_now()).unwrap();
        assert_eq!(first.script, second.script);
        assert_eq!(first.plan, second.plan);
    }
}
