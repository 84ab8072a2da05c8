pub type SchemaTypeName = String;

/// Free-form business data supplied by the caller, keyed by loosely-typed field names
pub type BusinessData = serde_json::Map<String, serde_json::Value>;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// JSON-LD keys that are never stripped by cleaning
pub const RESERVED_KEYS: &[&str] = &["@context", "@type", "@id"];

/// Priority assigned to types the relationship model does not know
pub const DEFAULT_PRIORITY: u32 = 999;

/// Types a Review is allowed to point at through `itemReviewed`
pub const REVIEWABLE_TYPES: &[&str] = &[
    "Service",
    "Product",
    "LocalBusiness",
    "Restaurant",
    "Store",
    "Organization",
    "Event",
    "Course",
    "SoftwareApplication",
];

/// Scan order used to pick the entity ratings and reviews attach to
pub const MAIN_ENTITY_ORDER: &[&str] = &[
    "Service",
    "Product",
    "LocalBusiness",
    "Restaurant",
    "Store",
    "Organization",
];

/// Business consolidation precedence, most specific first.
/// A fixed convention, not derived from the hierarchy table.
pub const BUSINESS_PRECEDENCE: &[&str] = &["Restaurant", "Store", "LocalBusiness"];

/// Article family precedence, most specific first.
pub const ARTICLE_PRECEDENCE: &[&str] = &["NewsArticle", "BlogPosting", "Article"];

pub fn is_reviewable(schema_type: &str) -> bool {
    REVIEWABLE_TYPES.contains(&schema_type)
}

pub fn is_article_type(schema_type: &str) -> bool {
    ARTICLE_PRECEDENCE.contains(&schema_type)
}

/// Property name used when a type is embedded in a parent, e.g. `AggregateRating` -> `aggregateRating`
pub fn embedded_property_name(schema_type: &str) -> String {
    let mut chars = schema_type.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Null, empty string, empty list or empty object
pub fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Strip trailing slashes so `{base}#suffix` identifiers are stable
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_property_name() {
        assert_eq!(embedded_property_name("AggregateRating"), "aggregateRating");
        assert_eq!(embedded_property_name("Offer"), "offer");
        assert_eq!(embedded_property_name(""), "");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://example.com/"), "https://example.com");
        assert_eq!(normalize_base_url(" https://example.com "), "https://example.com");
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_is_blank() {
        use serde_json::json;
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!("  ")));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!("x")));
    }

    #[test]
    fn test_reviewable_and_article_sets() {
        assert!(is_reviewable("SoftwareApplication"));
        assert!(!is_reviewable("Thing"));
        assert!(is_article_type("BlogPosting"));
        assert!(!is_article_type("Review"));
    }
}
