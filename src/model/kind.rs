use serde::{Deserialize, Serialize};

/// Schema types the filler and identifier tables know about.
/// Anything else is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchemaKind {
    Organization,
    LocalBusiness,
    Restaurant,
    Store,
    MedicalBusiness,
    Product,
    Service,
    Article,
    NewsArticle,
    BlogPosting,
    FAQPage,
    BreadcrumbList,
    WebSite,
    Person,
    Event,
    Recipe,
    VideoObject,
    Review,
    AggregateRating,
    HowTo,
    JobPosting,
    Course,
    SoftwareApplication,
    Other(String),
}

impl SchemaKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "Organization" => SchemaKind::Organization,
            "LocalBusiness" => SchemaKind::LocalBusiness,
            "Restaurant" => SchemaKind::Restaurant,
            "Store" => SchemaKind::Store,
            "MedicalBusiness" => SchemaKind::MedicalBusiness,
            "Product" => SchemaKind::Product,
            "Service" => SchemaKind::Service,
            "Article" => SchemaKind::Article,
            "NewsArticle" => SchemaKind::NewsArticle,
            "BlogPosting" => SchemaKind::BlogPosting,
            "FAQPage" => SchemaKind::FAQPage,
            "BreadcrumbList" => SchemaKind::BreadcrumbList,
            "WebSite" => SchemaKind::WebSite,
            "Person" => SchemaKind::Person,
            "Event" => SchemaKind::Event,
            "Recipe" => SchemaKind::Recipe,
            "VideoObject" => SchemaKind::VideoObject,
            "Review" => SchemaKind::Review,
            "AggregateRating" => SchemaKind::AggregateRating,
            "HowTo" => SchemaKind::HowTo,
            "JobPosting" => SchemaKind::JobPosting,
            "Course" => SchemaKind::Course,
            "SoftwareApplication" => SchemaKind::SoftwareApplication,
            other => SchemaKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SchemaKind::Organization => "Organization",
            SchemaKind::LocalBusiness => "LocalBusiness",
            SchemaKind::Restaurant => "Restaurant",
            SchemaKind::Store => "Store",
            SchemaKind::MedicalBusiness => "MedicalBusiness",
            SchemaKind::Product => "Product",
            SchemaKind::Service => "Service",
            SchemaKind::Article => "Article",
            SchemaKind::NewsArticle => "NewsArticle",
            SchemaKind::BlogPosting => "BlogPosting",
            SchemaKind::FAQPage => "FAQPage",
            SchemaKind::BreadcrumbList => "BreadcrumbList",
            SchemaKind::WebSite => "WebSite",
            SchemaKind::Person => "Person",
            SchemaKind::Event => "Event",
            SchemaKind::Recipe => "Recipe",
            SchemaKind::VideoObject => "VideoObject",
            SchemaKind::Review => "Review",
            SchemaKind::AggregateRating => "AggregateRating",
            SchemaKind::HowTo => "HowTo",
            SchemaKind::JobPosting => "JobPosting",
            SchemaKind::Course => "Course",
            SchemaKind::SoftwareApplication => "SoftwareApplication",
            SchemaKind::Other(name) => name,
        }
    }

    /// Fragment appended to the site base URL to build the entity `@id`
    pub fn id_suffix(&self) -> String {
        let fixed = match self {
            SchemaKind::WebSite => "#website",
            SchemaKind::Organization
            | SchemaKind::LocalBusiness
            | SchemaKind::Restaurant
            | SchemaKind::Store => "#organization",
            SchemaKind::Person => "#person",
            SchemaKind::Service => "#service",
            SchemaKind::Product => "#product",
            SchemaKind::Article | SchemaKind::NewsArticle | SchemaKind::BlogPosting => "#article",
            SchemaKind::BreadcrumbList => "#breadcrumb",
            SchemaKind::FAQPage => "#faq",
            SchemaKind::Review => "#review",
            SchemaKind::Event => "#event",
            SchemaKind::HowTo => "#howto",
            _ => return format!("#{}", self.as_str().to_lowercase()),
        };
        fixed.to_string()
    }

    pub fn is_business(&self) -> bool {
        matches!(
            self,
            SchemaKind::Organization
                | SchemaKind::LocalBusiness
                | SchemaKind::Restaurant
                | SchemaKind::Store
                | SchemaKind::MedicalBusiness
        )
    }

    pub fn is_article(&self) -> bool {
        matches!(
            self,
            SchemaKind::Article | SchemaKind::NewsArticle | SchemaKind::BlogPosting
        )
    }
}

impl From<String> for SchemaKind {
    fn from(value: String) -> Self {
        SchemaKind::parse(&value)
    }
}

impl From<SchemaKind> for String {
    fn from(kind: SchemaKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SchemaKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SchemaKind::parse(s))
    }
}
