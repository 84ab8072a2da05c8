use itertools::Itertools;
use log::debug;

use crate::logic::analysis::{analyze_selection, distinct_types};
use crate::model::{
    is_article_type, is_reviewable, MergedSchema, OptimizationPlan, RelationshipModel,
    SchemaKind, SchemaTypeName, ARTICLE_PRECEDENCE, BUSINESS_PRECEDENCE, MAIN_ENTITY_ORDER,
};

/// Business types that can win consolidation, in precedence order.
/// `MedicalBusiness` only wins when none of the fixed precedence list is present.
fn business_candidates() -> impl Iterator<Item = &'static str> {
    BUSINESS_PRECEDENCE
        .iter()
        .copied()
        .chain(std::iter::once("MedicalBusiness"))
}

/// Turns a requested type selection into an [`OptimizationPlan`].
///
/// Holds only the shared relationship tables; every call builds its plan
/// from scratch.
#[derive(Debug, Clone, Copy)]
pub struct SchemaOptimizer<'a> {
    model: &'a RelationshipModel,
}

impl<'a> SchemaOptimizer<'a> {
    pub fn new(model: &'a RelationshipModel) -> Self {
        Self { model }
    }

    pub fn optimize(&self, requested: &[SchemaTypeName]) -> OptimizationPlan {
        let mut builder = PlanBuilder::new(self.model, distinct_types(requested));

        builder.add_missing_review_target();
        builder.note_missing_dependencies();
        builder.resolve_hierarchy();
        builder.place_website();
        builder.consolidate_business();
        builder.place_services_and_products();
        builder.attach_ratings_and_reviews();
        builder.place_person();
        builder.consolidate_articles();
        builder.place_remainder();

        builder.finish()
    }
}

/// Scratch state for a single `optimize` call
struct PlanBuilder<'m> {
    model: &'m RelationshipModel,
    working: Vec<SchemaTypeName>,
    plan: OptimizationPlan,
}

impl<'m> PlanBuilder<'m> {
    fn new(model: &'m RelationshipModel, working: Vec<SchemaTypeName>) -> Self {
        Self {
            model,
            working,
            plan: OptimizationPlan::default(),
        }
    }

    fn finish(self) -> OptimizationPlan {
        self.plan
    }

    fn requested(&self, schema_type: &str) -> bool {
        self.working.iter().any(|t| t == schema_type)
    }

    fn skipped(&self, schema_type: &str) -> bool {
        self.plan.skip.contains(schema_type)
    }

    /// Requested and not superseded by a merge
    fn available(&self, schema_type: &str) -> bool {
        self.requested(schema_type) && !self.skipped(schema_type)
    }

    fn placed(&self, schema_type: &str) -> bool {
        self.plan.primary.iter().any(|t| t == schema_type)
            || self.plan.linked.iter().any(|t| t == schema_type)
            || self.plan.is_embedded(schema_type)
            || self.skipped(schema_type)
    }

    fn unplaced(&self, schema_type: &str) -> bool {
        self.requested(schema_type) && !self.placed(schema_type)
    }

    fn warn(&mut self, message: String) {
        debug!("optimizer: {}", message);
        self.plan.warnings.push(message);
    }

    fn push_primary(&mut self, schema_type: &str) {
        if !self.placed(schema_type) {
            debug!("optimizer: {} placed as primary", schema_type);
            self.plan.primary.push(schema_type.to_string());
        }
    }

    fn push_linked(&mut self, schema_type: &str) {
        if !self.placed(schema_type) {
            debug!("optimizer: {} placed as linked", schema_type);
            self.plan.linked.push(schema_type.to_string());
        }
    }

    fn sort_general_first(&self, types: &mut [SchemaTypeName]) {
        types.sort_by_key(|t| self.model.depth_of(t));
    }

    fn multi_entry_for(&self, result_type: &str) -> Option<usize> {
        self.plan
            .merged
            .iter()
            .position(|m| m.multi_type && m.result_type == result_type)
    }

    /// Folds `loser` into `winner`'s multi-type entity, creating or extending
    /// the merge entry as needed
    fn merge_into(&mut self, loser: &str, winner: &str) {
        match (self.multi_entry_for(loser), self.multi_entry_for(winner)) {
            (Some(l), Some(w)) => {
                let absorbed = self.plan.merged.remove(l);
                let w = if l < w { w - 1 } else { w };
                let mut types = self.plan.merged[w].types.clone();
                for t in absorbed.types {
                    if !types.contains(&t) {
                        types.push(t);
                    }
                }
                self.sort_general_first(&mut types);
                self.plan.merged[w].types = types;
            }
            (Some(l), None) => {
                let mut types = self.plan.merged[l].types.clone();
                types.push(winner.to_string());
                self.sort_general_first(&mut types);
                self.plan.merged[l].types = types;
                self.plan.merged[l].result_type = winner.to_string();
            }
            (None, Some(w)) => {
                let mut types = self.plan.merged[w].types.clone();
                if !types.iter().any(|t| t == loser) {
                    types.push(loser.to_string());
                }
                self.sort_general_first(&mut types);
                self.plan.merged[w].types = types;
            }
            (None, None) => {
                let mut types = vec![loser.to_string(), winner.to_string()];
                self.sort_general_first(&mut types);
                self.plan.merged.push(MergedSchema {
                    types,
                    result_type: winner.to_string(),
                    multi_type: true,
                });
            }
        }
        self.plan.skip.insert(loser.to_string());
        self.warn(format!("{} and {} merged into one entity (inheritance)", loser, winner));
    }

    /// Supersedes `loser` by `winner` without carrying its type over.
    /// Anything `loser` had absorbed moves to `winner`.
    fn discard(&mut self, loser: &str, winner: &str) {
        if let Some(idx) = self.multi_entry_for(loser) {
            let absorbed = self.plan.merged.remove(idx);
            for t in absorbed.types.iter().filter(|t| *t != loser) {
                self.merge_into(t, winner);
            }
        }
        // Earlier supersessions that ended on the loser now end on the winner
        for merged in self.plan.merged.iter_mut() {
            if !merged.multi_type && merged.result_type == loser {
                merged.result_type = winner.to_string();
                if !merged.types.iter().any(|t| t == winner) {
                    merged.types.push(winner.to_string());
                }
            }
        }
        self.plan.merged.push(MergedSchema {
            types: vec![loser.to_string(), winner.to_string()],
            result_type: winner.to_string(),
            multi_type: false,
        });
        self.plan.skip.insert(loser.to_string());
        self.warn(format!("{} superseded by {}", loser, winner));
    }

    fn add_missing_review_target(&mut self) {
        if self.requested("Review") && !self.working.iter().any(|t| is_reviewable(t)) {
            self.working.push("Service".to_string());
            self.plan.auto_added.push("Service".to_string());
            self.warn("Service added automatically so Review has an item to review".to_string());
        }
    }

    fn note_missing_dependencies(&mut self) {
        let analysis = analyze_selection(self.model, &self.working);
        for dependency in analysis.missing_dependencies {
            if dependency.auto_fix {
                continue;
            }
            self.warn(format!(
                "{} usually requires {}, which is not selected",
                dependency.schema,
                dependency.missing.join(", ")
            ));
        }
    }

    fn resolve_hierarchy(&mut self) {
        let working = self.working.clone();
        for child in &working {
            if self.skipped(child) {
                continue;
            }
            for parent in self.model.ancestors_of(child) {
                if !self.available(parent) {
                    continue;
                }
                if is_article_type(child) {
                    self.discard(parent, child);
                } else {
                    self.merge_into(parent, child);
                }
            }
        }
    }

    fn place_website(&mut self) {
        if self.unplaced("WebSite") {
            self.push_primary("WebSite");
            let config = self
                .plan
                .schema_config
                .entry("WebSite".to_string())
                .or_default();
            config.position = Some(0);
            config.embed_search = true;
        }
    }

    fn consolidate_business(&mut self) {
        let chosen = business_candidates().find(|t| self.available(t));

        let Some(chosen) = chosen else {
            if self.unplaced("Organization") {
                self.push_primary("Organization");
            }
            return;
        };

        if self.available("Organization") {
            self.merge_into("Organization", chosen);
        }

        let alternatives: Vec<&str> = business_candidates()
            .filter(|t| *t != chosen && self.available(t))
            .collect();
        for alternative in alternatives {
            self.discard(alternative, chosen);
        }

        self.push_primary(chosen);
    }

    fn place_services_and_products(&mut self) {
        for main in ["Service", "Product"] {
            if self.unplaced(main) {
                self.push_primary(main);
                let config = self.plan.schema_config.entry(main.to_string()).or_default();
                config.embed_aggregate = false;
                config.reference_reviews = false;
            }
        }
    }

    fn main_entity(&self) -> Option<&'static str> {
        MAIN_ENTITY_ORDER.iter().copied().find(|t| {
            self.plan.primary.iter().any(|p| p == t)
                || self.plan.merged.iter().any(|m| m.result_type == *t)
        })
    }

    fn attach_ratings_and_reviews(&mut self) {
        let has_aggregate = self.unplaced("AggregateRating");
        let has_review = self.unplaced("Review");
        if !has_aggregate && !has_review {
            return;
        }

        let Some(main) = self.main_entity() else {
            if has_aggregate {
                self.push_linked("AggregateRating");
            }
            if has_review {
                self.push_linked("Review");
            }
            self.warn("No main entity found, ratings and reviews kept separate".to_string());
            return;
        };

        if has_aggregate {
            self.plan
                .embedded
                .entry(main.to_string())
                .or_default()
                .push("AggregateRating".to_string());
            self.plan
                .schema_config
                .entry(main.to_string())
                .or_default()
                .embed_aggregate = true;
        }
        if has_review {
            self.push_linked("Review");
            self.plan
                .schema_config
                .entry(main.to_string())
                .or_default()
                .reference_reviews = true;
        }

        match (has_aggregate, has_review) {
            (true, true) => self.warn(format!(
                "AggregateRating embedded in {}, Review kept separate",
                main
            )),
            (true, false) => self.warn(format!("AggregateRating embedded in {}", main)),
            _ => self.warn(format!("Review linked to {}", main)),
        }
    }

    fn place_person(&mut self) {
        if self.unplaced("Person") {
            self.push_linked("Person");
        }
    }

    fn consolidate_articles(&mut self) {
        let Some(kept) = ARTICLE_PRECEDENCE
            .iter()
            .copied()
            .find(|t| self.available(t))
        else {
            return;
        };

        let others: Vec<&str> = ARTICLE_PRECEDENCE
            .iter()
            .copied()
            .filter(|t| *t != kept && self.available(t))
            .collect();
        for other in others {
            self.discard(other, kept);
        }
        self.push_primary(kept);
    }

    fn place_remainder(&mut self) {
        let remainder: Vec<SchemaTypeName> = self
            .working
            .iter()
            .filter(|t| !self.placed(t))
            .sorted_by_key(|t| self.model.priority_of(t))
            .cloned()
            .collect();

        for schema_type in remainder {
            if matches!(SchemaKind::parse(&schema_type), SchemaKind::Other(_)) {
                debug!("optimizer: {} is unknown, passed through", schema_type);
            }
            self.push_linked(&schema_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimize(items: &[&str]) -> OptimizationPlan {
        let requested: Vec<SchemaTypeName> = items.iter().map(|s| s.to_string()).collect();
        let plan = SchemaOptimizer::new(RelationshipModel::shared()).optimize(&requested);
        plan.verify_completeness(&requested).unwrap();
        plan
    }

    fn names(items: &[&str]) -> Vec<SchemaTypeName> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_review_alone_adds_service() {
        let plan = optimize(&["Review"]);
        assert_eq!(plan.auto_added, names(&["Service"]));
        assert_eq!(plan.primary, names(&["Service"]));
        assert_eq!(plan.linked, names(&["Review"]));
        assert!(plan.schema_config["Service"].reference_reviews);
        assert!(plan.warnings.iter().any(|w| w.contains("Service added automatically")));
    }

    #[test]
    fn test_review_with_reviewable_needs_no_repair() {
        let plan = optimize(&["Product", "Review"]);
        assert!(plan.auto_added.is_empty());
    }

    #[test]
    fn test_organization_local_business_merge() {
        let plan = optimize(&["Organization", "LocalBusiness", "AggregateRating"]);
        assert_eq!(plan.merged.len(), 1);
        assert_eq!(plan.merged[0].types, names(&["Organization", "LocalBusiness"]));
        assert_eq!(plan.merged[0].result_type, "LocalBusiness");
        assert!(plan.merged[0].multi_type);
        assert!(plan.skip.contains("Organization"));
        assert_eq!(plan.primary, names(&["LocalBusiness"]));
        assert_eq!(plan.embedded_in("LocalBusiness"), &names(&["AggregateRating"])[..]);
        assert!(plan.schema_config["LocalBusiness"].embed_aggregate);
    }

    #[test]
    fn test_merge_chain_is_one_entry_regardless_of_order() {
        for order in [
            ["Organization", "LocalBusiness", "Restaurant"],
            ["Restaurant", "LocalBusiness", "Organization"],
            ["LocalBusiness", "Restaurant", "Organization"],
        ] {
            let plan = optimize(&order);
            let multi: Vec<&MergedSchema> = plan.merged.iter().filter(|m| m.multi_type).collect();
            assert_eq!(multi.len(), 1, "order {:?}", order);
            assert_eq!(
                multi[0].types,
                names(&["Organization", "LocalBusiness", "Restaurant"])
            );
            assert_eq!(plan.primary, names(&["Restaurant"]));
        }
    }

    #[test]
    fn test_business_precedence_supersedes_alternatives() {
        let plan = optimize(&["Organization", "Store", "Restaurant"]);
        assert_eq!(plan.primary, names(&["Restaurant"]));
        assert!(plan.skip.contains("Store"));
        assert!(plan.skip.contains("Organization"));

        let business = plan.merged.iter().find(|m| m.multi_type).unwrap();
        assert_eq!(business.types, names(&["Organization", "Restaurant"]));
        assert!(plan
            .merged
            .iter()
            .any(|m| !m.multi_type && m.types == names(&["Store", "Restaurant"])));
    }

    #[test]
    fn test_website_always_first() {
        let plan = optimize(&["Organization", "Service", "WebSite"]);
        assert_eq!(plan.primary[0], "WebSite");
        let config = &plan.schema_config["WebSite"];
        assert_eq!(config.position, Some(0));
        assert!(config.embed_search);
    }

    #[test]
    fn test_articles_keep_most_specific_without_multi_type() {
        let plan = optimize(&["Article", "BlogPosting", "NewsArticle"]);
        assert_eq!(plan.primary, names(&["NewsArticle"]));
        assert!(plan.merged.iter().all(|m| !m.multi_type));
        assert!(plan.skip.contains("Article"));
        assert!(plan.skip.contains("BlogPosting"));
    }

    #[test]
    fn test_article_chain_ends_on_one_result_in_any_order() {
        for order in [
            ["Article", "BlogPosting", "NewsArticle"],
            ["BlogPosting", "Article", "NewsArticle"],
            ["NewsArticle", "BlogPosting", "Article"],
        ] {
            let plan = optimize(&order);
            assert!(
                plan.merged.iter().all(|m| m.result_type == "NewsArticle"),
                "order {:?}: {:?}",
                order,
                plan.merged
            );
            assert_eq!(plan.types_to_fill(), names(&["NewsArticle"]));
        }
    }

    #[test]
    fn test_rating_without_main_entity_stays_linked() {
        let plan = optimize(&["AggregateRating", "FAQPage"]);
        assert!(plan.embedded.is_empty());
        assert_eq!(plan.linked, names(&["AggregateRating", "FAQPage"]));
    }

    #[test]
    fn test_person_is_linked_not_embedded() {
        let plan = optimize(&["Organization", "Person"]);
        assert_eq!(plan.primary, names(&["Organization"]));
        assert_eq!(plan.linked, names(&["Person"]));
    }

    #[test]
    fn test_remainder_sorted_by_priority_then_request_order() {
        let plan = optimize(&["Recipe", "HowTo", "Dataset", "FAQPage", "BreadcrumbList"]);
        assert_eq!(
            plan.linked,
            names(&["BreadcrumbList", "FAQPage", "HowTo", "Recipe", "Dataset"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let plan = optimize(&["Service", "Service", "Review", "Review"]);
        assert_eq!(plan.primary, names(&["Service"]));
        assert_eq!(plan.linked, names(&["Review"]));
    }

    #[test]
    fn test_missing_dependencies_become_warnings() {
        let plan = optimize(&["Article"]);
        assert!(plan
            .warnings
            .iter()
            .any(|w| w.contains("Article usually requires Organization, Person")));
    }

    #[test]
    fn test_optimize_is_deterministic() {
        let a = optimize(&["WebSite", "Restaurant", "Review", "AggregateRating", "Person"]);
        let b = optimize(&["WebSite", "Restaurant", "Review", "AggregateRating", "Person"]);
        assert_eq!(a, b);
    }
}
