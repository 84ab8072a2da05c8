//! Competitive schema analysis
//!
//! Audits the schema types found on one page, summarizes what the ranked
//! competitor pages for the same query carry, and turns the gap between the
//! two into prioritized recommendations. Works on type lists only; fetching
//! and parsing the pages happens elsewhere.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SchemaError};
use crate::logic::analysis::distinct_types;
use crate::model::{CompareRequest, CompetitorPage, PageSchemas, SchemaTypeName};

/// Types worth 25 points each in the page score
const FOUNDATION_TYPES: &[&str] = &["Organization", "LocalBusiness", "WebSite", "WebPage"];

/// A type is competitive once it shows up in the top 3 this many times
const COMPETITIVE_TOP_3_HITS: usize = 2;

/// Coverage above which a missing type is recommended as common practice
const COMMON_COVERAGE: f64 = 50.0;

/// Coverage above which a present type earns points in the comparison score
const SCORED_COVERAGE: f64 = 30.0;

const MAX_COMBINATIONS: usize = 5;
const MAX_RECOMMENDATIONS: usize = 10;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub total_schemas: usize,
    pub schema_types_found: Vec<SchemaTypeName>,
    pub schema_distribution: BTreeMap<String, usize>,
    pub optimization_score: u32,
    pub recommendations: Vec<String>,
}

/// Scores a single page on its own, before any competitor comparison.
///
/// `total_schemas` sums the per-format counts; without them it falls back to
/// the number of distinct types.
pub fn analyze_page(page: &PageSchemas) -> PageAnalysis {
    let found = distinct_types(&page.schema_types);
    let has = |t: &str| found.iter().any(|f| f == t);

    let total_schemas = if page.formats.is_empty() {
        found.len()
    } else {
        page.formats.values().sum()
    };

    let foundation = FOUNDATION_TYPES.iter().filter(|t| has(**t)).count();
    let optimization_score = (foundation * 25 + found.len() * 5).min(100) as u32;

    let mut recommendations = Vec::new();
    if !has("Organization") {
        recommendations
            .push("Add an Organization schema to strengthen brand visibility".to_string());
    }
    if !has("BreadcrumbList") {
        recommendations.push("Add a BreadcrumbList schema to improve navigation".to_string());
    }
    if total_schemas == 0 {
        recommendations
            .push("No schema detected, start with the foundation types".to_string());
    }

    PageAnalysis {
        total_schemas,
        schema_types_found: found,
        schema_distribution: page.formats.clone(),
        optimization_score,
        recommendations,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionStats {
    pub positions: Vec<u32>,
    pub average_position: f64,
    pub in_top_3: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCombination {
    pub schemas: Vec<SchemaTypeName>,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysis {
    pub total_urls: usize,
    pub schema_coverage: BTreeMap<SchemaTypeName, Coverage>,
    pub position_analysis: BTreeMap<SchemaTypeName, PositionStats>,
    pub competitive_schemas: Vec<SchemaTypeName>,
    pub schema_combinations: Vec<SchemaCombination>,
}

impl SerpAnalysis {
    pub fn coverage_of(&self, schema_type: &str) -> f64 {
        self.schema_coverage
            .get(schema_type)
            .map(|c| c.percentage)
            .unwrap_or(0.0)
    }
}

/// Summarizes which schema types the ranked pages carry and where they rank.
/// Positions are 1-based; a zero position is rejected.
pub fn analyze_competitors(competitors: &[CompetitorPage]) -> Result<SerpAnalysis> {
    if let Some(page) = competitors.iter().find(|c| c.position == 0) {
        return Err(SchemaError::InvalidRequest(format!(
            "competitor {} has position 0, positions start at 1",
            page.url
        )));
    }

    let total_urls = competitors.len();
    let mut counts: BTreeMap<SchemaTypeName, usize> = BTreeMap::new();
    let mut positions: BTreeMap<SchemaTypeName, Vec<u32>> = BTreeMap::new();
    let mut combinations: Vec<(Vec<SchemaTypeName>, usize)> = Vec::new();

    for page in competitors {
        let types = distinct_types(&page.schema_types);
        for schema_type in &types {
            *counts.entry(schema_type.clone()).or_default() += 1;
            positions
                .entry(schema_type.clone())
                .or_default()
                .push(page.position);
        }

        if types.len() > 1 {
            let combo: Vec<SchemaTypeName> = types.into_iter().sorted().collect();
            match combinations.iter_mut().find(|(c, _)| *c == combo) {
                Some((_, count)) => *count += 1,
                None => combinations.push((combo, 1)),
            }
        }
    }

    let schema_coverage = counts
        .into_iter()
        .map(|(schema_type, count)| {
            let coverage = Coverage {
                count,
                percentage: percentage(count, total_urls),
            };
            (schema_type, coverage)
        })
        .collect();

    let position_analysis: BTreeMap<SchemaTypeName, PositionStats> = positions
        .into_iter()
        .map(|(schema_type, positions)| {
            let average =
                positions.iter().map(|p| *p as f64).sum::<f64>() / positions.len() as f64;
            let stats = PositionStats {
                in_top_3: positions.iter().filter(|p| **p <= 3).count(),
                average_position: round1(average),
                positions,
            };
            (schema_type, stats)
        })
        .collect();

    let competitive_schemas = position_analysis
        .iter()
        .filter(|(_, stats)| stats.in_top_3 >= COMPETITIVE_TOP_3_HITS)
        .map(|(schema_type, _)| schema_type.clone())
        .collect();

    // Stable sort: equal counts keep first-seen order
    combinations.sort_by(|a, b| b.1.cmp(&a.1));
    let schema_combinations = combinations
        .into_iter()
        .take(MAX_COMBINATIONS)
        .map(|(schemas, count)| SchemaCombination {
            schemas,
            count,
            percentage: percentage(count, total_urls),
        })
        .collect();

    Ok(SerpAnalysis {
        total_urls,
        schema_coverage,
        position_analysis,
        competitive_schemas,
        schema_combinations,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageComparison {
    pub current_schemas: Vec<SchemaTypeName>,
    pub missing_competitive: Vec<SchemaTypeName>,
    pub missing_common: Vec<SchemaTypeName>,
    pub unique_schemas: Vec<SchemaTypeName>,
    /// 0..=100
    pub score: u32,
}

/// Gap between the page and its competitors, scored 0..=100.
///
/// +30 per competitive type present, +10 per type present that more than 30%
/// of competitors carry, -20 per competitive type missing. A page with no
/// schema scores 0.
pub fn compare_with_page(serp: &SerpAnalysis, page_types: &[SchemaTypeName]) -> PageComparison {
    let current = distinct_types(page_types);
    let has = |t: &str| current.iter().any(|c| c == t);

    let missing_competitive: Vec<SchemaTypeName> = serp
        .competitive_schemas
        .iter()
        .filter(|t| !has(t.as_str()))
        .cloned()
        .collect();
    let missing_common: Vec<SchemaTypeName> = serp
        .schema_coverage
        .iter()
        .filter(|(t, c)| c.percentage > COMMON_COVERAGE && !has(t.as_str()))
        .map(|(t, _)| t.clone())
        .collect();
    let unique_schemas: Vec<SchemaTypeName> = current
        .iter()
        .filter(|t| !serp.schema_coverage.contains_key(*t))
        .cloned()
        .collect();

    let mut score: i64 = 0;
    if !current.is_empty() {
        let competitive_hits = current
            .iter()
            .filter(|t| serp.competitive_schemas.contains(*t))
            .count() as i64;
        let common_hits = current
            .iter()
            .filter(|t| serp.coverage_of(t) > SCORED_COVERAGE)
            .count() as i64;
        score = competitive_hits * 30 + common_hits * 10 - missing_competitive.len() as i64 * 20;
    }

    PageComparison {
        current_schemas: current,
        missing_competitive,
        missing_common,
        unique_schemas,
        score: score.clamp(0, 100) as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationReason {
    CompetitiveAdvantage,
    CommonPractice,
    PageTypeSuggestion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_position: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_3_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub schema: SchemaTypeName,
    pub priority: Priority,
    pub reason: RecommendationReason,
    pub details: RecommendationDetails,
}

/// Types usually expected on a page of the given kind
pub fn page_type_suggestions(page_type: &str) -> &'static [&'static str] {
    match page_type {
        "homepage" => &["Organization", "WebSite", "BreadcrumbList"],
        "product" => &["Product", "Offer", "AggregateRating", "Review", "BreadcrumbList"],
        "article" => &["Article", "BreadcrumbList", "Person", "Organization"],
        "local" => &[
            "LocalBusiness",
            "PostalAddress",
            "GeoCoordinates",
            "OpeningHoursSpecification",
        ],
        "contact" => &["Organization", "ContactPoint", "PostalAddress"],
        "about" => &["Organization", "Person", "BreadcrumbList"],
        "faq" => &["FAQPage", "BreadcrumbList"],
        "event" => &["Event", "Place", "Offer", "BreadcrumbList"],
        _ => &["Organization", "BreadcrumbList"],
    }
}

/// Missing competitive types first, then common ones, then page-type
/// suggestions; each type at most once, at most ten in total.
pub fn recommend_schemas(
    comparison: &PageComparison,
    serp: &SerpAnalysis,
    page_type: Option<&str>,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = Vec::new();
    let listed = |recs: &[Recommendation], t: &str| recs.iter().any(|r| r.schema == t);

    for schema_type in &comparison.missing_competitive {
        let stats = serp.position_analysis.get(schema_type);
        recommendations.push(Recommendation {
            schema: schema_type.clone(),
            priority: Priority::High,
            reason: RecommendationReason::CompetitiveAdvantage,
            details: RecommendationDetails {
                avg_position: stats.map(|s| s.average_position),
                top_3_count: Some(stats.map(|s| s.in_top_3).unwrap_or(0)),
                ..Default::default()
            },
        });
    }

    for schema_type in &comparison.missing_common {
        if listed(&recommendations, schema_type.as_str()) {
            continue;
        }
        recommendations.push(Recommendation {
            schema: schema_type.clone(),
            priority: Priority::Medium,
            reason: RecommendationReason::CommonPractice,
            details: RecommendationDetails {
                coverage: Some(serp.coverage_of(schema_type)),
                ..Default::default()
            },
        });
    }

    if let Some(page_type) = page_type {
        for schema_type in page_type_suggestions(page_type) {
            if comparison.current_schemas.iter().any(|c| c == *schema_type)
                || listed(&recommendations, *schema_type)
            {
                continue;
            }
            recommendations.push(Recommendation {
                schema: schema_type.to_string(),
                priority: Priority::Low,
                reason: RecommendationReason::PageTypeSuggestion,
                details: RecommendationDetails {
                    page_type: Some(page_type.to_string()),
                    ..Default::default()
                },
            });
        }
    }

    recommendations.sort_by_key(|r| r.priority);
    recommendations.truncate(MAX_RECOMMENDATIONS);
    debug!("compare: {} recommendations", recommendations.len());
    recommendations
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaInsights {
    pub schema_type: SchemaTypeName,
    pub benefits: Vec<String>,
    pub best_practices: Vec<String>,
    pub related_schemas: Vec<SchemaTypeName>,
}

/// Benefits and practical advice for one type, with a generic fallback
pub fn schema_insights(schema_type: &str) -> SchemaInsights {
    let (benefits, best_practices, related): (&[&str], &[&str], &[&str]) = match schema_type {
        "Organization" => (
            &["Strengthens brand recognition", "Feeds the Knowledge Graph panel"],
            &["Include a high-resolution logo", "List every social profile in sameAs"],
            &["ContactPoint", "PostalAddress"],
        ),
        "LocalBusiness" => (
            &["Shows up in map results", "Opening hours visible in search"],
            &["Use precise GPS coordinates", "Give opening hours per day"],
            &["PostalAddress", "GeoCoordinates", "OpeningHoursSpecification"],
        ),
        "Product" => (
            &["Product rich snippets", "Star ratings in results"],
            &["Keep price and availability current", "Use high-quality images"],
            &["Offer", "AggregateRating", "Review"],
        ),
        "Article" => (
            &["Eligible for news surfaces", "Better indexing"],
            &["Give precise publication dates", "Identify the author"],
            &["Person", "Organization", "ImageObject"],
        ),
        "FAQPage" => (
            &["Questions shown directly in results", "More space on the results page"],
            &["Keep questions relevant", "Keep answers short"],
            &["Question", "Answer"],
        ),
        _ => (
            &["Helps search engines understand the content"],
            &["Follow the schema.org guidelines"],
            &[],
        ),
    };

    let owned = |items: &[&str]| -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    };
    SchemaInsights {
        schema_type: schema_type.to_string(),
        benefits: owned(benefits),
        best_practices: owned(best_practices),
        related_schemas: owned(related),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveReport {
    pub page: PageAnalysis,
    pub serp: SerpAnalysis,
    pub comparison: PageComparison,
    pub recommendations: Vec<Recommendation>,
}

/// Page audit, competitor summary, comparison and recommendations in one pass
pub fn compare_against_competitors(request: &CompareRequest) -> Result<CompetitiveReport> {
    let page = analyze_page(&request.page);
    let serp = analyze_competitors(&request.competitors)?;
    let comparison = compare_with_page(&serp, &request.page.schema_types);
    let recommendations = recommend_schemas(&comparison, &serp, request.page_type.as_deref());

    Ok(CompetitiveReport {
        page,
        serp,
        comparison,
        recommendations,
    })
}
