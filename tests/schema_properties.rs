use chrono::{TimeZone, Utc};
use itertools::Itertools;
use serde_json::{json, Value};
use std::collections::HashSet;

use seo_schema_rust::config::GeneratorConfig;
use seo_schema_rust::logic::{FilledEntities, FillContext};
use seo_schema_rust::{
    is_reviewable, verify_output, AssembledOutput, BusinessData, ClientInfo, GenerateRequest,
    RelationshipModel, SchemaAssembler, SchemaGenerator, SchemaOptimizer, SchemaPipeline,
    SchemaTypeName, TemplateStore,
};

const SITE: &str = "https://bakery.test";

fn client() -> ClientInfo {
    ClientInfo {
        company_name: "Rye & Co".to_string(),
        website: format!("{}/", SITE),
        logo: Some(format!("{}/logo.png", SITE)),
        description: "Neighbourhood bakery".to_string(),
    }
}

fn names(items: &[&str]) -> Vec<SchemaTypeName> {
    items.iter().map(|s| s.to_string()).collect()
}

/// optimize -> fill -> assemble through the public building blocks
fn run(items: &[&str]) -> AssembledOutput {
    let model = RelationshipModel::shared();
    let templates = TemplateStore::shared();
    let requested = names(items);

    let plan = SchemaOptimizer::new(model).optimize(&requested);
    plan.verify_completeness(&requested)
        .unwrap_or_else(|e| panic!("{:?}: {}", items, e));

    let client = client();
    let data = BusinessData::new();
    let mut selected = requested.clone();
    selected.extend(plan.auto_added.iter().cloned());
    let ctx = FillContext {
        client: &client,
        data: &data,
        selected: &selected,
        now: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    };
    let generator = SchemaGenerator::new(templates);
    let filled: FilledEntities = plan
        .types_to_fill()
        .into_iter()
        .filter_map(|t| generator.generate(&t, &ctx, true).map(|e| (t, e)))
        .collect();

    SchemaAssembler::new(model, templates).assemble(&plan, &filled, &client.website)
}

fn selections() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Review"],
        vec!["Review", "Review", "Person"],
        vec!["Organization", "LocalBusiness", "AggregateRating"],
        vec!["Organization", "LocalBusiness", "Restaurant", "Review"],
        vec!["Restaurant", "Store", "LocalBusiness", "AggregateRating", "Review"],
        vec!["Store", "Organization", "Restaurant"],
        vec!["WebSite", "Organization"],
        vec!["WebSite", "Organization", "WebSite", "BreadcrumbList", "FAQPage"],
        vec!["Article", "NewsArticle", "BlogPosting", "Organization"],
        vec!["BlogPosting", "NewsArticle", "Article"],
        vec!["Product", "Review", "AggregateRating"],
        vec!["Service", "Product", "Review", "AggregateRating"],
        vec!["AggregateRating", "Review", "Person"],
        vec!["Dataset", "Review", "Podcast"],
        vec!["Event", "Review", "HowTo", "Recipe", "VideoObject"],
        vec!["MedicalBusiness", "Organization", "Review"],
        vec!["JobPosting", "Course", "SoftwareApplication", "Review"],
        vec![],
    ]
}

#[test]
fn test_no_duplicate_signatures() {
    for items in selections() {
        let output = run(&items);
        let mut seen = HashSet::new();
        for entity in &output.entities {
            assert!(
                seen.insert(entity.signature()),
                "{:?} produced {} twice",
                items,
                entity.signature()
            );
        }
    }
}

#[test]
fn test_ids_are_unique_and_present() {
    for items in selections() {
        let output = run(&items);
        let ids: Vec<&str> = output.entities.iter().filter_map(|e| e.id()).collect();
        assert_eq!(ids.len(), output.len(), "{:?} has an entity without @id", items);
        let distinct: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), ids.len(), "{:?} reuses an @id", items);
        verify_output(&output).unwrap_or_else(|e| panic!("{:?}: {}", items, e));
    }
}

#[test]
fn test_every_review_points_at_a_reviewable_entity() {
    for items in selections().into_iter().filter(|s| s.contains(&"Review")) {
        let output = run(&items);
        assert!(output
            .entities
            .iter()
            .any(|e| e.types().iter().any(|t| is_reviewable(t))));

        for review in output.entities.iter().filter(|e| e.has_type("Review")) {
            let target_id = review
                .reference("itemReviewed")
                .unwrap_or_else(|| panic!("{:?}: Review has no itemReviewed reference", items));
            let target = output
                .find_by_id(target_id)
                .unwrap_or_else(|| panic!("{:?}: dangling itemReviewed {}", items, target_id));
            assert!(target.types().iter().any(|t| is_reviewable(t)));
        }
    }
}

#[test]
fn test_hierarchy_collapse_keeps_one_business_entity() {
    let business = |output: &AssembledOutput| {
        output
            .entities
            .iter()
            .filter(|e| e.has_type("LocalBusiness"))
            .count()
    };

    let merged = run(&["Organization", "LocalBusiness"]);
    let single = run(&["LocalBusiness"]);

    assert_eq!(business(&merged), 1);
    assert_eq!(business(&single), 1);
    assert_eq!(merged.entities[0]["@type"], json!(["Organization", "LocalBusiness"]));
    assert_eq!(single.entities[0]["@type"], json!("LocalBusiness"));
}

#[test]
fn test_scenario_review_alone() {
    let output = run(&["Review"]);
    assert_eq!(output.len(), 2);

    let service = output.find_by_type("Service").unwrap();
    let review = output.find_by_type("Review").unwrap();
    assert_eq!(review.reference("itemReviewed"), service.id());
    assert_eq!(service.id(), Some("https://bakery.test#service"));
}

#[test]
fn test_scenario_merged_business_with_rating() {
    let output = run(&["Organization", "LocalBusiness", "AggregateRating"]);
    assert_eq!(output.len(), 1);

    let business = &output.entities[0];
    assert_eq!(business["@type"], json!(["Organization", "LocalBusiness"]));
    assert_eq!(business["aggregateRating"]["@type"], json!("AggregateRating"));
    assert!(output.find_by_type("AggregateRating").is_none());
}

#[test]
fn test_scenario_website_first_and_publisher() {
    let output = run(&["Organization", "WebSite"]);
    assert_eq!(output.len(), 2);

    let website = &output.entities[0];
    let organization = &output.entities[1];
    assert!(website.has_type("WebSite"));
    assert!(organization.has_type("Organization"));
    assert_eq!(website.reference("publisher"), organization.id());
}

#[test]
fn test_scenario_article_family() {
    let output = run(&["Article", "NewsArticle"]);
    assert_eq!(output.len(), 1);
    assert_eq!(output.entities[0]["@type"], json!("NewsArticle"));
}

#[test]
fn test_article_family_yields_one_entity_in_any_order() {
    for order in ["Article", "BlogPosting", "NewsArticle"]
        .into_iter()
        .permutations(3)
    {
        let output = run(&order);
        let articles: Vec<_> = output
            .entities
            .iter()
            .filter(|e| {
                e.types()
                    .iter()
                    .any(|t| ["Article", "BlogPosting", "NewsArticle"].contains(&t.as_str()))
            })
            .collect();
        assert_eq!(articles.len(), 1, "{:?} produced {:?}", order, articles);
        assert_eq!(articles[0]["@type"], json!("NewsArticle"));
    }
}

#[test]
fn test_scenario_product_rating_and_review() {
    let output = run(&["Product", "Review", "AggregateRating"]);
    assert_eq!(output.len(), 2);

    let product = output.find_by_type("Product").unwrap();
    assert_eq!(product["aggregateRating"]["@type"], json!("AggregateRating"));
    let review = output.find_by_type("Review").unwrap();
    assert_eq!(review.reference("itemReviewed"), product.id());
    assert!(output.find_by_type("AggregateRating").is_none());
}

#[test]
fn test_scenario_identical_runs_are_identical() {
    let pipeline = SchemaPipeline::new(
        RelationshipModel::shared(),
        TemplateStore::shared(),
        GeneratorConfig::default(),
    );
    let mut data = BusinessData::new();
    data.insert("rating_value".to_string(), json!("4.7"));
    data.insert("review_count".to_string(), json!(38));
    data.insert("author_name".to_string(), json!("Jo"));
    let request = GenerateRequest::new(
        &["WebSite", "Restaurant", "Organization", "Review", "AggregateRating", "FAQPage"],
        client(),
    )
    .with_data(data);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    let first = pipeline.generate_at(&request, now).unwrap();
    let second = pipeline.generate_at(&request, now).unwrap();

    assert_eq!(
        serde_json::to_string(&first.json_ld).unwrap(),
        serde_json::to_string(&second.json_ld).unwrap()
    );
    assert_eq!(first.script, second.script);

    let graph: &Vec<Value> = first.json_ld["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph[0]["@type"], json!("WebSite"));
    assert_eq!(graph[1]["@type"], json!(["Organization", "Restaurant"]));
    assert_eq!(graph[1]["aggregateRating"]["ratingValue"], json!("4.7"));
}
