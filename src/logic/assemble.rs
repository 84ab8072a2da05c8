use log::{debug, warn};
use serde_json::json;
use std::collections::{HashMap, HashSet};

use crate::error::{Result, SchemaError};
use crate::logic::clean::clean_entity;
use crate::model::{
    embedded_property_name, is_reviewable, normalize_base_url, AssembledOutput,
    OptimizationPlan, RelationshipModel, SchemaEntity, SchemaKind, SchemaTypeName,
    TypeSignature, REVIEWABLE_TYPES,
};
use crate::templates::TemplateStore;

/// Filled entities keyed by the type they were generated for
pub type FilledEntities = HashMap<SchemaTypeName, SchemaEntity>;

/// Turns a plan plus filled entities into the final ordered, linked output.
/// Holds only shared read-only tables; scratch state lives in each call.
#[derive(Debug, Clone, Copy)]
pub struct SchemaAssembler<'a> {
    model: &'a RelationshipModel,
    templates: &'a TemplateStore,
}

/// Per-call scratch state
#[derive(Default)]
struct Assembly {
    entities: Vec<SchemaEntity>,
    produced: HashSet<SchemaTypeName>,
    signatures: HashSet<TypeSignature>,
}

impl Assembly {
    fn push(&mut self, entity: SchemaEntity, model: &RelationshipModel) {
        let signature = entity.signature();
        if self.signatures.contains(&signature) {
            warn!("assembler: dropping duplicate entity {}", signature);
            return;
        }
        let types = entity.types();
        if let Some(singleton) = types
            .iter()
            .find(|t| model.is_singleton(t) && self.produced.contains(*t))
        {
            warn!("assembler: singleton {} already present, dropping {}", singleton, signature);
            return;
        }

        debug!("assembler: adding entity {}", signature);
        self.signatures.insert(signature);
        self.produced.extend(types);
        self.entities.push(entity);
    }
}

impl<'a> SchemaAssembler<'a> {
    pub fn new(model: &'a RelationshipModel, templates: &'a TemplateStore) -> Self {
        Self { model, templates }
    }

    pub fn assemble(
        &self,
        plan: &OptimizationPlan,
        filled: &FilledEntities,
        base_url: &str,
    ) -> AssembledOutput {
        let base_url = normalize_base_url(base_url);
        let mut assembly = Assembly::default();

        for merged in &plan.merged {
            if plan.skip.contains(&merged.result_type)
                || assembly.produced.contains(&merged.result_type)
            {
                continue;
            }
            let types = self.merged_output_types(plan, &merged.result_type);
            let entity = self.build(plan, filled, &merged.result_type, &types);
            assembly.push(entity, self.model);
        }

        for schema_type in plan.primary.iter().chain(plan.linked.iter()) {
            if assembly.produced.contains(schema_type) {
                continue;
            }
            let entity = self.build(plan, filled, schema_type, &[schema_type.clone()]);
            assembly.push(entity, self.model);
        }

        let mut entities = assembly.entities;
        resolve_ids(&mut entities, &base_url);
        self.wire_reviews(&mut entities, plan, &base_url);
        link_business_references(&mut entities);

        for entity in entities.iter_mut() {
            let required = self.templates.required_fields_for(&entity.types());
            clean_entity(entity, &required);
        }

        entities.sort_by_key(|e| self.model.priority_of_types(&e.types()));

        AssembledOutput { entities }
    }

    /// The multi-type list when some merge keeps all types, else just the result
    fn merged_output_types(
        &self,
        plan: &OptimizationPlan,
        result_type: &str,
    ) -> Vec<SchemaTypeName> {
        plan.merged
            .iter()
            .find(|m| m.multi_type && m.result_type == result_type)
            .map(|m| m.output_types())
            .unwrap_or_else(|| vec![result_type.to_string()])
    }

    fn build(
        &self,
        plan: &OptimizationPlan,
        filled: &FilledEntities,
        schema_type: &str,
        types: &[SchemaTypeName],
    ) -> SchemaEntity {
        let mut entity = filled
            .get(schema_type)
            .cloned()
            .unwrap_or_else(|| SchemaEntity::new(schema_type));
        entity.set_types(types);

        let mut hosts: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        if !hosts.contains(&schema_type) {
            hosts.push(schema_type);
        }
        for host in hosts {
            for child in plan.embedded_in(host) {
                let embedded = filled
                    .get(child)
                    .cloned()
                    .unwrap_or_else(|| SchemaEntity::new(child))
                    .as_embedded();
                debug!("assembler: embedding {} into {}", child, schema_type);
                entity.insert(&embedded_property_name(child), embedded);
            }
        }
        entity
    }

    /// Every Review points at one reviewable entity, synthesizing a Service if none exists
    fn wire_reviews(&self, entities: &mut Vec<SchemaEntity>, plan: &OptimizationPlan, base_url: &str) {
        if !entities.iter().any(|e| e.has_type("Review")) {
            return;
        }

        let target_id = match find_review_target(entities, plan) {
            Some(id) => id,
            None => {
                let service = synthesize_service(entities, base_url);
                let id = service.id().unwrap_or_default().to_string();
                warn!("assembler: no reviewable entity, synthesized Service {}", id);
                let position = entities
                    .iter()
                    .position(|e| e.has_type("WebSite"))
                    .map(|p| p + 1)
                    .unwrap_or(0);
                entities.insert(position, service);
                id
            }
        };

        for review in entities.iter_mut().filter(|e| e.has_type("Review")) {
            review.set_reference("itemReviewed", &target_id);
        }
    }
}

/// Derived ids are `{base}{suffix}`; collisions get `-1`, `-2`, ...
fn resolve_ids(entities: &mut [SchemaEntity], base_url: &str) {
    let mut taken: HashSet<String> = HashSet::new();
    for entity in entities.iter_mut() {
        if let Some(explicit) = entity.id() {
            if !taken.contains(explicit) {
                taken.insert(explicit.to_string());
                continue;
            }
        }
        let kind = entity
            .kind()
            .unwrap_or_else(|| SchemaKind::Other("Thing".to_string()));
        let derived = format!("{}{}", base_url, kind.id_suffix());
        let id = free_id(&derived, &taken);
        taken.insert(id.clone());
        entity.set_id(id);
    }
}

fn free_id(derived: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(derived) {
        return derived.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", derived, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| derived.to_string())
}

fn find_review_target(entities: &[SchemaEntity], plan: &OptimizationPlan) -> Option<String> {
    let id_of_type = |schema_type: &str| {
        entities
            .iter()
            .find(|e| e.has_type(schema_type))
            .and_then(|e| e.id())
            .map(|id| id.to_string())
    };

    if plan.is_auto_added("Service") {
        if let Some(id) = id_of_type("Service") {
            return Some(id);
        }
    }

    let preferred = plan
        .schema_config
        .iter()
        .filter(|(schema_type, config)| config.reference_reviews && is_reviewable(schema_type))
        .find_map(|(schema_type, _)| id_of_type(schema_type.as_str()));
    if preferred.is_some() {
        return preferred;
    }

    REVIEWABLE_TYPES.iter().find_map(|t| id_of_type(*t))
}

/// Minimal Service built from what the reviews say about their item.
/// Only reached when no reviewable entity exists, so there is never a business
/// entity to name as `provider`.
fn synthesize_service(entities: &[SchemaEntity], base_url: &str) -> SchemaEntity {
    let mut service = SchemaEntity::new("Service");
    let reviewed = entities
        .iter()
        .filter(|e| e.has_type("Review"))
        .find_map(|e| e.get("itemReviewed").and_then(|v| v.as_object()));
    if let Some(item) = reviewed {
        for key in ["name", "url"] {
            if let Some(value) = item.get(key) {
                service.insert(key, value.clone());
            }
        }
    }
    if !service.contains_key("name") {
        service.insert("name", json!("Service"));
    }
    service.insert("serviceType", json!("Service"));

    let taken: HashSet<String> = entities
        .iter()
        .filter_map(|e| e.id().map(|id| id.to_string()))
        .collect();
    service.set_id(free_id(&format!("{}#service", base_url), &taken));
    service
}

/// Publisher and provider properties point at the site's business entity by id
fn link_business_references(entities: &mut [SchemaEntity]) {
    let business_id = entities
        .iter()
        .find(|e| e.types().iter().any(|t| SchemaKind::parse(t).is_business()))
        .and_then(|e| e.id())
        .map(|id| id.to_string());
    let Some(business_id) = business_id else {
        return;
    };

    for entity in entities.iter_mut() {
        let Some(kind) = entity.kind() else {
            continue;
        };
        let property = match kind {
            SchemaKind::WebSite => "publisher",
            SchemaKind::Service => "provider",
            kind if kind.is_article() => "publisher",
            _ => continue,
        };
        entity.set_reference(property, &business_id);
    }
}

/// Post-conditions every assembled output must satisfy
pub fn verify_output(output: &AssembledOutput) -> Result<()> {
    let mut signatures = HashSet::new();
    let mut ids: HashMap<&str, &SchemaEntity> = HashMap::new();

    for entity in &output.entities {
        let signature = entity.signature();
        if !signatures.insert(signature.clone()) {
            return Err(SchemaError::Invariant(format!(
                "two entities share the type signature {}",
                signature
            )));
        }
        let id = entity.id().ok_or_else(|| {
            SchemaError::Invariant(format!("entity {} has no @id", signature))
        })?;
        if ids.insert(id, entity).is_some() {
            return Err(SchemaError::Invariant(format!("@id {} is used twice", id)));
        }
    }

    for review in output.entities.iter().filter(|e| e.has_type("Review")) {
        let target = review
            .reference("itemReviewed")
            .and_then(|id| ids.get(id))
            .ok_or_else(|| {
                SchemaError::Invariant("Review.itemReviewed does not resolve to an entity".to_string())
            })?;
        if !target.types().iter().any(|t| is_reviewable(t)) {
            return Err(SchemaError::Invariant(format!(
                "Review points at {}, which is not reviewable",
                target.signature()
            )));
        }
    }

    Ok(())
}
