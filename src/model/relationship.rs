use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use crate::model::{SchemaTypeName, DEFAULT_PRIORITY};

/// How a type relates to the types it may contain or point at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDependencies {
    pub can_embed: BTreeSet<SchemaTypeName>,
    pub can_reference: BTreeSet<SchemaTypeName>,
    pub requires: BTreeSet<SchemaTypeName>,
}

impl SchemaDependencies {
    fn new(can_embed: &[&str], can_reference: &[&str], requires: &[&str]) -> Self {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            can_embed: set(can_embed),
            can_reference: set(can_reference),
            requires: set(requires),
        }
    }
}

/// Static tables driving the optimizer: inheritance, embedding rules,
/// singletons and output priority. Built once, then shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipModel {
    hierarchy: HashMap<SchemaTypeName, Vec<SchemaTypeName>>,
    dependencies: HashMap<SchemaTypeName, SchemaDependencies>,
    singletons: HashSet<SchemaTypeName>,
    priority: HashMap<SchemaTypeName, u32>,
}

static STANDARD_MODEL: OnceLock<RelationshipModel> = OnceLock::new();

impl RelationshipModel {
    /// Process-wide instance of the standard tables
    pub fn shared() -> &'static RelationshipModel {
        STANDARD_MODEL.get_or_init(RelationshipModel::standard)
    }

    pub fn standard() -> Self {
        let hierarchy = [
            ("LocalBusiness", vec!["Organization"]),
            ("Restaurant", vec!["LocalBusiness", "Organization"]),
            ("Store", vec!["LocalBusiness", "Organization"]),
            ("MedicalBusiness", vec!["LocalBusiness", "Organization"]),
            ("NewsArticle", vec!["Article"]),
            ("BlogPosting", vec!["Article"]),
        ]
        .into_iter()
        .map(|(child, parents)| {
            (
                child.to_string(),
                parents.into_iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect();

        let dependencies = [
            (
                "Product",
                SchemaDependencies::new(&["Offer", "AggregateRating", "Brand"], &["Review"], &[]),
            ),
            (
                "LocalBusiness",
                SchemaDependencies::new(
                    &[
                        "PostalAddress",
                        "GeoCoordinates",
                        "OpeningHoursSpecification",
                        "AggregateRating",
                        "ContactPoint",
                    ],
                    &["Review"],
                    &["PostalAddress"],
                ),
            ),
            (
                "Organization",
                SchemaDependencies::new(
                    &["ContactPoint", "PostalAddress", "Logo", "AggregateRating"],
                    &["Review", "Person"],
                    &[],
                ),
            ),
            (
                "Service",
                SchemaDependencies::new(
                    &["Offer", "AggregateRating", "Provider", "AreaServed", "HasOfferCatalog"],
                    &["Review", "Organization"],
                    &[],
                ),
            ),
            (
                "Article",
                SchemaDependencies::new(
                    &["Person", "Organization", "ImageObject"],
                    &[],
                    &["Person", "Organization"],
                ),
            ),
            (
                "Event",
                SchemaDependencies::new(&["Place", "PostalAddress", "Offer", "Organizer"], &[], &[]),
            ),
            (
                "Recipe",
                SchemaDependencies::new(
                    &["NutritionInformation", "AggregateRating", "VideoObject"],
                    &["Review"],
                    &[],
                ),
            ),
            ("FAQPage", SchemaDependencies::new(&[], &[], &[])),
            (
                "Person",
                SchemaDependencies::new(&["PostalAddress"], &["Organization"], &[]),
            ),
            (
                "WebSite",
                SchemaDependencies::new(&["SearchAction"], &["Organization"], &[]),
            ),
            (
                "Review",
                SchemaDependencies::new(
                    &[],
                    &["Service", "Product", "Organization", "LocalBusiness"],
                    &[],
                ),
            ),
        ]
        .into_iter()
        .map(|(name, deps)| (name.to_string(), deps))
        .collect();

        let singletons = ["WebSite", "Organization", "BreadcrumbList", "SearchAction", "FAQPage"]
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let priority = [
            ("WebSite", 1),
            ("Organization", 2),
            ("LocalBusiness", 2),
            ("Service", 3),
            ("Product", 3),
            ("Person", 4),
            ("BreadcrumbList", 5),
            ("Article", 6),
            ("Review", 7),
            ("FAQPage", 8),
            ("Event", 9),
            ("HowTo", 10),
        ]
        .into_iter()
        .map(|(name, p)| (name.to_string(), p))
        .collect();

        Self {
            hierarchy,
            dependencies,
            singletons,
            priority,
        }
    }

    /// Ancestors from nearest to most general; empty for unknown types
    pub fn ancestors_of(&self, schema_type: &str) -> &[SchemaTypeName] {
        self.hierarchy
            .get(schema_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        self.ancestors_of(descendant).iter().any(|a| a == ancestor)
    }

    /// Depth in the hierarchy, used to order merged type lists general-first
    pub fn depth_of(&self, schema_type: &str) -> usize {
        self.ancestors_of(schema_type).len()
    }

    pub fn dependencies_of(&self, schema_type: &str) -> SchemaDependencies {
        self.dependencies
            .get(schema_type)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_singleton(&self, schema_type: &str) -> bool {
        self.singletons.contains(schema_type)
    }

    pub fn priority_of(&self, schema_type: &str) -> u32 {
        self.priority
            .get(schema_type)
            .copied()
            .unwrap_or(DEFAULT_PRIORITY)
    }

    /// Lowest priority across a type list (a merged entity sorts by its best type)
    pub fn priority_of_types(&self, types: &[SchemaTypeName]) -> u32 {
        types
            .iter()
            .map(|t| self.priority_of(t))
            .min()
            .unwrap_or(DEFAULT_PRIORITY)
    }
}

impl Default for RelationshipModel {
    fn default() -> Self {
        Self::standard()
    }
}
