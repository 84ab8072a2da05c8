use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{normalize_base_url, BusinessData, SchemaTypeName};

/// Site owner details shared by every generated entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl ClientInfo {
    /// Website without trailing slash, used as the `@id` prefix
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.website)
    }

    pub fn company_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.company_name.is_empty() {
            fallback
        } else {
            &self.company_name
        }
    }
}

/// Selection-only request used by the analyze and optimize endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub types: Vec<SchemaTypeName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub types: Vec<SchemaTypeName>,
    #[serde(default)]
    pub client: ClientInfo,
    #[serde(default)]
    pub data: BusinessData,
    /// Keep empty optional template fields; falls back to the configured default
    #[serde(default)]
    pub include_optional: Option<bool>,
}

impl GenerateRequest {
    pub fn new(types: &[&str], client: ClientInfo) -> Self {
        Self {
            types: types.iter().map(|t| t.to_string()).collect(),
            client,
            data: BusinessData::new(),
            include_optional: None,
        }
    }

    pub fn with_data(mut self, data: BusinessData) -> Self {
        self.data = data;
        self
    }
}

/// Schema types found on the page being audited, with counts per markup format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSchemas {
    #[serde(default)]
    pub schema_types: Vec<SchemaTypeName>,
    /// e.g. `{"json-ld": 3, "microdata": 1}`
    #[serde(default)]
    pub formats: BTreeMap<String, usize>,
}

/// One ranked search result and the schema types it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorPage {
    #[serde(default)]
    pub url: String,
    /// 1-based rank in the results page
    pub position: u32,
    #[serde(default)]
    pub schema_types: Vec<SchemaTypeName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub page: PageSchemas,
    #[serde(default)]
    pub competitors: Vec<CompetitorPage>,
    /// homepage, product, article, local, contact, about, faq or event
    #[serde(default)]
    pub page_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str(r#"{"types": ["Review"]}"#).unwrap();
        assert_eq!(request.types, vec!["Review".to_string()]);
        assert_eq!(request.client, ClientInfo::default());
        assert!(request.data.is_empty());
        assert_eq!(request.include_optional, None);
    }

    #[test]
    fn test_client_base_url_and_fallback_name() {
        let client = ClientInfo {
            website: "https://acme.test/".to_string(),
            ..Default::default()
        };
        assert_eq!(client.base_url(), "https://acme.test");
        assert_eq!(client.company_name_or("Website"), "Website");
    }

    #[test]
    fn test_compare_request_defaults() {
        let request: CompareRequest = serde_json::from_str(
            r#"{"competitors": [{"position": 1, "schema_types": ["Product"]}]}"#,
        )
        .unwrap();
        assert!(request.page.schema_types.is_empty());
        assert!(request.page.formats.is_empty());
        assert_eq!(request.competitors[0].url, "");
        assert_eq!(request.page_type, None);
    }
}
