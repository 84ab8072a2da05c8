use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Result, SchemaError};
use crate::model::SchemaTypeName;

/// Types collapsed into one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSchema {
    /// General-first, e.g. `["Organization", "LocalBusiness"]`
    pub types: Vec<SchemaTypeName>,
    pub result_type: SchemaTypeName,
    /// When false the other types were superseded and the entity keeps a single `@type`
    pub multi_type: bool,
}

impl MergedSchema {
    /// Types written to `@type` for the merged entity
    pub fn output_types(&self) -> Vec<SchemaTypeName> {
        if self.multi_type {
            self.types.clone()
        } else {
            vec![self.result_type.clone()]
        }
    }
}

/// Per-entity rendering hints produced alongside the plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default)]
    pub embed_search: bool,
    #[serde(default)]
    pub embed_aggregate: bool,
    #[serde(default)]
    pub reference_reviews: bool,
}

/// Result of optimizing one selection. Built fresh per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPlan {
    pub primary: Vec<SchemaTypeName>,
    pub embedded: BTreeMap<SchemaTypeName, Vec<SchemaTypeName>>,
    pub linked: Vec<SchemaTypeName>,
    pub merged: Vec<MergedSchema>,
    pub skip: BTreeSet<SchemaTypeName>,
    pub auto_added: Vec<SchemaTypeName>,
    pub warnings: Vec<String>,
    pub schema_config: BTreeMap<SchemaTypeName, EntityConfig>,
}

impl OptimizationPlan {
    pub fn embedded_in(&self, parent: &str) -> &[SchemaTypeName] {
        self.embedded
            .get(parent)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_embedded(&self, schema_type: &str) -> bool {
        self.embedded
            .values()
            .any(|children| children.iter().any(|c| c == schema_type))
    }

    pub fn is_auto_added(&self, schema_type: &str) -> bool {
        self.auto_added.iter().any(|t| t == schema_type)
    }

    /// Every type the assembler has to fill: merge results, primaries, linked and embedded
    pub fn types_to_fill(&self) -> Vec<SchemaTypeName> {
        let mut types: Vec<SchemaTypeName> = Vec::new();
        let candidates = self
            .merged
            .iter()
            .map(|m| &m.result_type)
            .filter(|t| !self.skip.contains(*t))
            .chain(self.primary.iter())
            .chain(self.linked.iter())
            .chain(self.embedded.values().flatten());
        for schema_type in candidates {
            if !types.contains(schema_type) {
                types.push(schema_type.clone());
            }
        }
        types
    }

    /// Checks that no requested type was silently dropped and that every
    /// skipped type is explained by a merge.
    pub fn verify_completeness(&self, requested: &[SchemaTypeName]) -> Result<()> {
        let mut materialized: HashMap<&str, usize> = HashMap::new();
        for schema_type in self
            .primary
            .iter()
            .chain(self.linked.iter())
            .chain(self.embedded.values().flatten())
        {
            *materialized.entry(schema_type.as_str()).or_default() += 1;
        }

        if let Some((schema_type, _)) = materialized.iter().find(|(_, count)| **count > 1) {
            return Err(SchemaError::Invariant(format!(
                "{} is materialized more than once",
                schema_type
            )));
        }

        for schema_type in requested.iter().chain(self.auto_added.iter()) {
            let accounted = materialized.contains_key(schema_type.as_str())
                || self.skip.contains(schema_type)
                || self.merged.iter().any(|m| m.types.contains(schema_type));
            if !accounted {
                return Err(SchemaError::Invariant(format!(
                    "{} was requested but does not appear in the plan",
                    schema_type
                )));
            }
        }

        for skipped in &self.skip {
            if materialized.contains_key(skipped.as_str()) {
                return Err(SchemaError::Invariant(format!(
                    "{} is both skipped and materialized",
                    skipped
                )));
            }
            let superseded = self
                .merged
                .iter()
                .any(|m| m.types.contains(skipped) && &m.result_type != skipped);
            if !superseded {
                return Err(SchemaError::Invariant(format!(
                    "{} is skipped without being superseded by a merge",
                    skipped
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged(types: &[&str], result_type: &str, multi_type: bool) -> MergedSchema {
        MergedSchema {
            types: types.iter().map(|s| s.to_string()).collect(),
            result_type: result_type.to_string(),
            multi_type,
        }
    }

    #[test]
    fn test_output_types_respects_multi_type_flag() {
        assert_eq!(
            merged(&["Organization", "LocalBusiness"], "LocalBusiness", true).output_types(),
            vec!["Organization".to_string(), "LocalBusiness".to_string()]
        );
        assert_eq!(
            merged(&["Article", "NewsArticle"], "NewsArticle", false).output_types(),
            vec!["NewsArticle".to_string()]
        );
    }

    #[test]
    fn test_verify_completeness_accepts_merged_skip() {
        let mut plan = OptimizationPlan::default();
        plan.merged.push(merged(&["Organization", "LocalBusiness"], "LocalBusiness", true));
        plan.skip.insert("Organization".to_string());
        plan.primary.push("LocalBusiness".to_string());

        let requested = vec!["Organization".to_string(), "LocalBusiness".to_string()];
        assert!(plan.verify_completeness(&requested).is_ok());
    }

    #[test]
    fn test_verify_completeness_rejects_unexplained_skip() {
        let mut plan = OptimizationPlan::default();
        plan.skip.insert("Store".to_string());

        let err = plan.verify_completeness(&["Store".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Store"));
    }

    #[test]
    fn test_verify_completeness_rejects_dropped_type() {
        let plan = OptimizationPlan::default();
        assert!(plan.verify_completeness(&["Recipe".to_string()]).is_err());
    }

    #[test]
    fn test_verify_completeness_rejects_double_materialization() {
        let mut plan = OptimizationPlan::default();
        plan.primary.push("Service".to_string());
        plan.linked.push("Service".to_string());
        assert!(plan.verify_completeness(&["Service".to_string()]).is_err());
    }

    #[test]
    fn test_types_to_fill_is_unique_and_ordered() {
        let mut plan = OptimizationPlan::default();
        plan.merged.push(merged(&["Organization", "LocalBusiness"], "LocalBusiness", true));
        plan.primary.push("LocalBusiness".to_string());
        plan.embedded
            .insert("LocalBusiness".to_string(), vec!["AggregateRating".to_string()]);
        plan.linked.push("Review".to_string());

        assert_eq!(
            plan.types_to_fill(),
            vec![
                "LocalBusiness".to_string(),
                "Review".to_string(),
                "AggregateRating".to_string()
            ]
        );
        assert!(plan.is_embedded("AggregateRating"));
        assert_eq!(plan.embedded_in("Service"), &[] as &[String]);
    }
}
