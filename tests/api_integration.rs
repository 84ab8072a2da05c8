use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use seo_schema_rust::api::routes::create_router;
use seo_schema_rust::api::SchemaService;

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    /// Serves the router on an ephemeral port for the lifetime of the test
    async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let app = create_router().with_state(Arc::new(SchemaService::default()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{}", address),
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

#[tokio::test]
async fn test_health() {
    let client = TestClient::spawn().await;
    let response = client.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], json!("healthy"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_type_documentation() {
    let client = TestClient::spawn().await;

    let types: Value = client.get("/schemas/types").await.unwrap().json().await.unwrap();
    assert_eq!(types["total"], json!(22));
    assert!(types["items"]
        .as_array()
        .unwrap()
        .contains(&json!("AggregateRating")));

    let response = client.get("/schemas/types/Review").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = response.json().await.unwrap();
    assert_eq!(doc["type"], json!("Review"));
    assert!(doc["required_fields"]
        .as_array()
        .unwrap()
        .contains(&json!("itemReviewed")));

    let missing = client.get("/schemas/types/Dataset").await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let error: Value = missing.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("Dataset"));
}

#[tokio::test]
async fn test_analyze_and_optimize() {
    let client = TestClient::spawn().await;

    let analysis: Value = client
        .post("/schemas/analyze", json!({"types": ["Organization", "LocalBusiness", "Review"]}))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(analysis["hierarchical_conflicts"][0]["child"], json!("LocalBusiness"));
    assert_eq!(analysis["hierarchical_conflicts"][0]["parent"], json!("Organization"));

    let plan: Value = client
        .post("/schemas/optimize", json!({"types": ["Review"]}))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan["auto_added"], json!(["Service"]));
    assert_eq!(plan["primary"], json!(["Service"]));
    assert_eq!(plan["linked"], json!(["Review"]));
}

#[tokio::test]
async fn test_generate_then_validate() {
    let client = TestClient::spawn().await;

    let response = client
        .post(
            "/schemas/generate",
            json!({
                "types": ["WebSite", "Organization", "Service", "Review"],
                "client": {
                    "company_name": "Northwind",
                    "website": "https://northwind.test/"
                },
                "data": {
                    "service_name": "Roof repair",
                    "service_type": "Roofing",
                    "author_name": "Lee",
                    "rating_value": 5
                }
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result: Value = response.json().await.unwrap();
    let graph = result["json_ld"]["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph[0]["@type"], json!("WebSite"));
    assert_eq!(graph[0]["publisher"]["@id"], json!("https://northwind.test#organization"));

    let review = graph.iter().find(|e| e["@type"] == json!("Review")).unwrap();
    assert_eq!(review["itemReviewed"]["@id"], json!("https://northwind.test#service"));
    assert!(result["script"]
        .as_str()
        .unwrap()
        .starts_with("<script type=\"application/ld+json\">"));
    assert!(result["messages"]
        .as_array()
        .unwrap()
        .contains(&json!("4 schemas generated without duplicates")));

    let validation: Value = client
        .post("/schemas/validate", result["json_ld"].clone())
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(validation["entity_count"], json!(4));
    assert!(validation["errors"]
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["error_type"] != json!("InvalidItemReviewed")));
}

#[tokio::test]
async fn test_validate_rejects_non_objects() {
    let client = TestClient::spawn().await;
    let response = client.post("/schemas/validate", json!(["not", "json-ld"])).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_compare_and_recommend() {
    let client = TestClient::spawn().await;
    let request = json!({
        "page": {"schema_types": ["Product"], "formats": {"json-ld": 1}},
        "competitors": [
            {"url": "https://one.test", "position": 1, "schema_types": ["Product", "Review"]},
            {"url": "https://two.test", "position": 2, "schema_types": ["Product", "Review"]},
            {"url": "https://three.test", "position": 3, "schema_types": ["Organization"]}
        ],
        "page_type": "product"
    });

    let response = client.post("/schemas/compare", request.clone()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["serp"]["total_urls"], json!(3));
    assert_eq!(report["serp"]["competitive_schemas"], json!(["Product", "Review"]));
    assert_eq!(report["comparison"]["missing_competitive"], json!(["Review"]));
    assert_eq!(report["comparison"]["score"], json!(20));
    assert_eq!(report["recommendations"][0]["priority"], json!("high"));
    assert_eq!(report["recommendations"][0]["reason"], json!("competitive_advantage"));

    let recommendations: Value = client
        .post("/schemas/recommend", request)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = recommendations["items"].as_array().unwrap();
    assert_eq!(recommendations["total"], json!(items.len()));
    assert_eq!(items[0]["schema"], json!("Review"));
    assert!(items[1..].iter().all(|r| r["priority"] == json!("low")));

    let bad = client
        .post(
            "/schemas/compare",
            json!({"competitors": [{"position": 0, "schema_types": ["Product"]}]}),
        )
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let insights: Value = client
        .get("/schemas/types/FAQPage/insights")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(insights["related_schemas"], json!(["Question", "Answer"]));
}
