//! Pre-optimization analysis of a requested type selection
//!
//! Reports which types conflict through inheritance, which can be nested in
//! one another, which should stay separate and point at each other, and which
//! declared dependencies are missing from the selection.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::{is_reviewable, RelationshipModel, SchemaTypeName};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalConflict {
    pub child: SchemaTypeName,
    pub parent: SchemaTypeName,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePair {
    pub parent: SchemaTypeName,
    pub child: SchemaTypeName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDependency {
    pub schema: SchemaTypeName,
    pub missing: Vec<SchemaTypeName>,
    /// True when the optimizer repairs this on its own
    pub auto_fix: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionAnalysis {
    pub hierarchical_conflicts: Vec<HierarchicalConflict>,
    pub can_be_embedded: Vec<TypePair>,
    pub should_reference: Vec<TypePair>,
    pub missing_dependencies: Vec<MissingDependency>,
}

impl SelectionAnalysis {
    pub fn has_conflicts(&self) -> bool {
        !self.hierarchical_conflicts.is_empty()
    }
}

/// Requested types with exact repeats removed, first occurrence wins
pub fn distinct_types(requested: &[SchemaTypeName]) -> Vec<SchemaTypeName> {
    requested
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .unique()
        .map(|t| t.to_string())
        .collect()
}

pub fn analyze_selection(
    model: &RelationshipModel,
    requested: &[SchemaTypeName],
) -> SelectionAnalysis {
    let selected = distinct_types(requested);
    let is_selected = |t: &str| selected.iter().any(|s| s == t);
    let mut analysis = SelectionAnalysis::default();

    for schema_type in &selected {
        for parent in model.ancestors_of(schema_type) {
            if is_selected(parent) {
                analysis.hierarchical_conflicts.push(HierarchicalConflict {
                    child: schema_type.clone(),
                    parent: parent.clone(),
                    recommendation: format!(
                        "Use {} instead of both {} and {}",
                        schema_type, schema_type, parent
                    ),
                });
            }
        }

        let deps = model.dependencies_of(schema_type);
        for child in deps.can_embed.iter().filter(|c| is_selected(c)) {
            analysis.can_be_embedded.push(TypePair {
                parent: schema_type.clone(),
                child: child.clone(),
            });
        }
        for child in deps.can_reference.iter().filter(|c| is_selected(c)) {
            analysis.should_reference.push(TypePair {
                parent: schema_type.clone(),
                child: child.clone(),
            });
        }

        let missing: Vec<SchemaTypeName> = deps
            .requires
            .iter()
            .filter(|r| !is_selected(r))
            .cloned()
            .collect();
        if !missing.is_empty() {
            analysis.missing_dependencies.push(MissingDependency {
                schema: schema_type.clone(),
                missing,
                auto_fix: false,
            });
        }
    }

    if is_selected("Review") && !selected.iter().any(|t| is_reviewable(t)) {
        analysis.missing_dependencies.push(MissingDependency {
            schema: "Review".to_string(),
            missing: vec!["Service".to_string()],
            auto_fix: true,
        });
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(items: &[&str]) -> Vec<SchemaTypeName> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_distinct_types_keeps_first_occurrence() {
        assert_eq!(
            distinct_types(&types(&["Review", "Service", "Review", " ", "Service"])),
            types(&["Review", "Service"])
        );
    }

    #[test]
    fn test_hierarchical_conflicts() {
        let model = RelationshipModel::standard();
        let analysis =
            analyze_selection(&model, &types(&["Organization", "Restaurant", "LocalBusiness"]));

        let pairs: Vec<(&str, &str)> = analysis
            .hierarchical_conflicts
            .iter()
            .map(|c| (c.child.as_str(), c.parent.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Restaurant", "LocalBusiness"),
                ("Restaurant", "Organization"),
                ("LocalBusiness", "Organization"),
            ]
        );
        assert!(analysis.has_conflicts());
    }

    #[test]
    fn test_embedding_and_reference_pairs() {
        let model = RelationshipModel::standard();
        let analysis =
            analyze_selection(&model, &types(&["Product", "AggregateRating", "Review"]));

        assert_eq!(
            analysis.can_be_embedded,
            vec![TypePair {
                parent: "Product".to_string(),
                child: "AggregateRating".to_string()
            }]
        );
        assert!(analysis.should_reference.contains(&TypePair {
            parent: "Product".to_string(),
            child: "Review".to_string()
        }));
        assert!(analysis.should_reference.contains(&TypePair {
            parent: "Review".to_string(),
            child: "Product".to_string()
        }));
        assert!(analysis.missing_dependencies.is_empty());
    }

    #[test]
    fn test_missing_dependencies() {
        let model = RelationshipModel::standard();
        let analysis = analyze_selection(&model, &types(&["Article", "Review"]));

        let article = &analysis.missing_dependencies[0];
        assert_eq!(article.schema, "Article");
        assert_eq!(article.missing, types(&["Organization", "Person"]));
        assert!(!article.auto_fix);

        let review = &analysis.missing_dependencies[1];
        assert_eq!(review.schema, "Review");
        assert!(review.auto_fix);
    }

    #[test]
    fn test_unknown_types_are_ignored() {
        let model = RelationshipModel::standard();
        let analysis = analyze_selection(&model, &types(&["Dataset", "Dataset"]));
        assert_eq!(analysis, SelectionAnalysis::default());
    }
}
