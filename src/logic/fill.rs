//! Per-type field fillers
//!
//! Each filler copies caller-supplied business data into a fresh template.
//! A template field is only overwritten when the caller supplied a non-empty
//! value for it; missing keys are never an error.

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use crate::model::{
    is_blank, is_reviewable, BusinessData, ClientInfo, SchemaEntity, SchemaKind, SchemaTypeName,
};

/// Everything a filler may read. `now` is injected so output is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FillContext<'a> {
    pub client: &'a ClientInfo,
    pub data: &'a BusinessData,
    /// Types selected alongside the one being filled, used for type hints
    pub selected: &'a [SchemaTypeName],
    pub now: DateTime<Utc>,
}

impl<'a> FillContext<'a> {
    /// Non-blank value under `key`
    fn value(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key).filter(|v| !is_blank(v))
    }

    /// Non-blank scalar rendered as a string; numbers are stringified
    fn text(&self, key: &str) -> Option<String> {
        self.value(key).and_then(scalar_text)
    }

    /// String list; a single string is treated as a one-item list
    fn list(&self, key: &str) -> Vec<String> {
        match self.value(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.value(key).and_then(|v| v.as_object())
    }

    fn objects(&self, key: &str) -> Vec<&'a Map<String, Value>> {
        match self.value(key) {
            Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_object()).collect(),
            _ => Vec::new(),
        }
    }

    fn timestamp(&self) -> String {
        self.now.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn company(&self) -> Option<String> {
        non_empty(&self.client.company_name)
    }

    fn website(&self) -> Option<String> {
        non_empty(&self.client.website)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_text)
}

/// First contiguous run of digits, e.g. `"from 1500 EUR"` -> `"1500"`
pub fn extract_price(raw: &str) -> Option<String> {
    static PRICE: OnceLock<Option<Regex>> = OnceLock::new();
    PRICE
        .get_or_init(|| Regex::new(r"\d+").ok())
        .as_ref()
        .and_then(|re| re.find(raw))
        .map(|m| m.as_str().to_string())
}

/// Drops a leading `"1. "` style ordinal from a process step
pub fn strip_step_number(step: &str) -> String {
    static ORDINAL: OnceLock<Option<Regex>> = OnceLock::new();
    let step = step.trim();
    match ORDINAL.get_or_init(|| Regex::new(r"^\d+\.\s*").ok()) {
        Some(re) => re.replace(step, "").to_string(),
        None => step.to_string(),
    }
}

/// Nested object under `key`, only if the template already has one
fn nested<'e>(entity: &'e mut SchemaEntity, key: &str) -> Option<&'e mut Map<String, Value>> {
    entity.get_mut(key).and_then(|v| v.as_object_mut())
}

fn set_text(entity: &mut SchemaEntity, field: &str, value: Option<String>) {
    if let Some(value) = value {
        entity.insert(field, Value::String(value));
    }
}

fn set_list(entity: &mut SchemaEntity, field: &str, values: Vec<String>) {
    if !values.is_empty() {
        entity.insert(field, json!(values));
    }
}

pub fn fill_entity(entity: &mut SchemaEntity, kind: &SchemaKind, ctx: &FillContext) {
    match kind {
        SchemaKind::Organization => fill_organization(entity, ctx),
        SchemaKind::LocalBusiness | SchemaKind::Store | SchemaKind::MedicalBusiness => {
            fill_local_business(entity, ctx)
        }
        SchemaKind::Restaurant => fill_restaurant(entity, ctx),
        SchemaKind::Product => fill_product(entity, ctx),
        SchemaKind::Article | SchemaKind::NewsArticle | SchemaKind::BlogPosting => {
            fill_article(entity, ctx)
        }
        SchemaKind::FAQPage => fill_faq(entity, ctx),
        SchemaKind::BreadcrumbList => fill_breadcrumbs(entity, ctx),
        SchemaKind::WebSite => fill_website(entity, ctx),
        SchemaKind::Person => fill_person(entity, ctx),
        SchemaKind::Event => fill_event(entity, ctx),
        SchemaKind::HowTo => fill_howto(entity, ctx),
        SchemaKind::JobPosting => fill_job_posting(entity, ctx),
        SchemaKind::Service => fill_service(entity, ctx),
        SchemaKind::Review => fill_review(entity, ctx),
        SchemaKind::AggregateRating => fill_aggregate_rating(entity, ctx),
        SchemaKind::SoftwareApplication => fill_software_application(entity, ctx),
        SchemaKind::Recipe | SchemaKind::VideoObject | SchemaKind::Course => {
            fill_common(entity, ctx)
        }
        SchemaKind::Other(_) => {}
    }
}

/// name, url and description from the client when the template slot is empty
fn fill_common(entity: &mut SchemaEntity, ctx: &FillContext) {
    let defaults = [
        ("name", ctx.company()),
        ("url", ctx.website()),
        ("description", non_empty(&ctx.client.description)),
    ];
    for (field, value) in defaults {
        let empty_slot = matches!(entity.get(field), Some(Value::String(s)) if s.is_empty());
        if empty_slot {
            set_text(entity, field, value);
        }
    }
}

fn fill_organization(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    let logo = ctx
        .text("logo")
        .or_else(|| ctx.client.logo.as_deref().and_then(non_empty));
    if let Some(url) = logo {
        match nested(entity, "logo") {
            Some(existing) => {
                existing.insert("url".to_string(), json!(url));
                existing.entry("width").or_insert(json!(300));
                existing.entry("height").or_insert(json!(300));
            }
            None => {
                entity.insert(
                    "logo",
                    json!({"@type": "ImageObject", "url": url, "width": 300, "height": 300}),
                );
            }
        }
    }

    if let Some(address) = ctx.object("address") {
        if let Some(existing) = nested(entity, "address") {
            for (key, value) in address {
                if existing.contains_key(key) && !is_blank(value) {
                    existing.insert(key.clone(), value.clone());
                }
            }
        }
    }

    let contact_points: Vec<Value> = ctx
        .objects("contact_points")
        .into_iter()
        .map(|contact| {
            let mut point = Map::new();
            point.insert("@type".to_string(), json!("ContactPoint"));
            point.insert(
                "contactType".to_string(),
                json!(field_text(contact, "type").unwrap_or_else(|| "customer service".to_string())),
            );
            for (source, target) in [
                ("telephone", "telephone"),
                ("email", "email"),
                ("area_served", "areaServed"),
                ("languages", "availableLanguage"),
            ] {
                if let Some(value) = contact.get(source).filter(|v| !is_blank(v)) {
                    point.insert(target.to_string(), value.clone());
                }
            }
            Value::Object(point)
        })
        .collect();
    if !contact_points.is_empty() {
        entity.insert("contactPoint", Value::Array(contact_points));
    }

    for field in ["legalName", "taxID", "vatID", "naics", "duns", "foundingDate", "slogan"] {
        set_text(entity, field, ctx.text(field));
    }
    for field in ["telephone", "email", "faxNumber"] {
        set_text(entity, field, ctx.text(field));
    }
    set_list(entity, "sameAs", ctx.list("social_media"));

    if let Some(count) = ctx.value("employee_count").and_then(|v| v.as_u64()) {
        if count > 0 {
            entity.insert(
                "numberOfEmployees",
                json!({"@type": "QuantitativeValue", "value": count.to_string()}),
            );
        }
    }
}

fn fill_local_business(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_organization(entity, ctx);

    if let Some(geo) = ctx.object("geo") {
        if let Some(existing) = nested(entity, "geo") {
            if let Some(lat) = field_text(geo, "lat") {
                existing.insert("latitude".to_string(), json!(lat));
            }
            if let Some(lng) = field_text(geo, "lng") {
                existing.insert("longitude".to_string(), json!(lng));
            }
        }
    }

    let hours: Vec<Value> = ctx
        .objects("opening_hours")
        .into_iter()
        .map(|hours| {
            let mut spec = json!({
                "@type": "OpeningHoursSpecification",
                "dayOfWeek": hours.get("days").cloned().unwrap_or_else(|| json!([])),
                "opens": field_text(hours, "opens").unwrap_or_default(),
                "closes": field_text(hours, "closes").unwrap_or_default()
            });
            for key in ["validFrom", "validThrough"] {
                if let Some(value) = field_text(hours, key) {
                    spec[key] = json!(value);
                }
            }
            spec
        })
        .collect();
    if !hours.is_empty() {
        entity.insert("openingHoursSpecification", Value::Array(hours));
    }

    set_text(entity, "priceRange", ctx.text("price_range"));
    set_text(entity, "paymentAccepted", ctx.text("payment_accepted"));
    set_text(entity, "currenciesAccepted", ctx.text("currencies_accepted"));
}

fn fill_restaurant(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_local_business(entity, ctx);

    set_list(entity, "servesCuisine", ctx.list("cuisines"));
    set_text(entity, "hasMenu", ctx.text("menu_url"));
    if let Some(accepts) = ctx.data.get("accepts_reservations").and_then(|v| v.as_bool()) {
        entity.insert("acceptsReservations", json!(accepts));
    }
}

fn fill_product(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    for field in ["sku", "gtin", "gtin13", "mpn", "size", "color", "material"] {
        set_text(entity, field, ctx.text(field));
    }
    set_text(entity, "name", ctx.text("product_name"));

    let brand = ctx.text("brand_name").or_else(|| ctx.company());
    if let (Some(existing), Some(brand)) = (nested(entity, "brand"), brand) {
        existing.insert("name".to_string(), json!(brand));
    }

    for dimension in ["weight", "width", "height", "depth"] {
        let Some(value) = ctx.text(&format!("{}_value", dimension)) else {
            continue;
        };
        let unit = ctx
            .text(&format!("{}_unit", dimension))
            .unwrap_or_else(|| "CMT".to_string());
        if let Some(existing) = nested(entity, dimension) {
            existing.insert("value".to_string(), json!(value));
            existing.insert("unitCode".to_string(), json!(unit));
        }
    }

    let company = ctx.company();
    if let Some(offers) = nested(entity, "offers") {
        for (source, target) in [
            ("price", "price"),
            ("currency", "priceCurrency"),
            ("availability", "availability"),
            ("price_valid_until", "priceValidUntil"),
        ] {
            if let Some(value) = ctx.text(source) {
                offers.insert(target.to_string(), json!(value));
            }
        }
        if let (Some(seller), Some(company)) = (
            offers.get_mut("seller").and_then(|s| s.as_object_mut()),
            company,
        ) {
            seller.insert("name".to_string(), json!(company));
        }
    }

    set_list(entity, "image", ctx.list("images"));
}

fn fill_article(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    let published = ctx.text("date_published").unwrap_or_else(|| ctx.timestamp());
    let modified = ctx.text("date_modified").unwrap_or_else(|| ctx.timestamp());
    entity.insert("datePublished", json!(published));
    entity.insert("dateModified", json!(modified));

    let company = ctx.company();
    let logo = ctx
        .text("publisher_logo")
        .or_else(|| ctx.client.logo.as_deref().and_then(non_empty));
    if let Some(publisher) = nested(entity, "publisher") {
        if let Some(company) = company {
            publisher.insert("name".to_string(), json!(company));
        }
        if let Some(logo) = logo {
            match publisher.get_mut("logo").and_then(|l| l.as_object_mut()) {
                Some(existing) => {
                    existing.insert("url".to_string(), json!(logo));
                }
                None => {
                    publisher.insert(
                        "logo".to_string(),
                        json!({"@type": "ImageObject", "url": logo}),
                    );
                }
            }
        }
    }

    set_text(entity, "headline", ctx.text("headline"));

    if let Some(author) = ctx.text("author_name") {
        let url = ctx.text("author_url");
        match nested(entity, "author") {
            Some(existing) => {
                existing.insert("name".to_string(), json!(author));
                if let Some(url) = url {
                    existing.insert("url".to_string(), json!(url));
                }
            }
            None => {
                let mut value = json!({"@type": "Person", "name": author});
                if let Some(url) = url {
                    value["url"] = json!(url);
                }
                entity.insert("author", value);
            }
        }
    }

    if let Some(body) = ctx.text("article_body") {
        entity.insert("wordCount", json!(body.split_whitespace().count()));
        entity.insert("articleBody", json!(body));
    }
    set_text(entity, "articleSection", ctx.text("article_section"));
    set_text(entity, "keywords", ctx.text("keywords"));
    set_list(entity, "image", ctx.list("images"));
}

fn fill_event(entity: &mut SchemaEntity, ctx: &FillContext) {
    const ONLINE: &str = "https://schema.org/OnlineEventAttendanceMode";
    const MIXED: &str = "https://schema.org/MixedEventAttendanceMode";

    fill_common(entity, ctx);

    set_text(entity, "startDate", ctx.text("start_date"));
    set_text(entity, "endDate", ctx.text("end_date"));
    set_text(entity, "eventAttendanceMode", ctx.text("attendance_mode"));
    set_text(entity, "eventStatus", ctx.text("event_status"));

    if let Some(location_name) = ctx.text("location_name") {
        if let Some(location) = nested(entity, "location") {
            location.insert("name".to_string(), json!(location_name));
        }
    }

    if let Some(virtual_url) = ctx.text("virtual_location_url") {
        let virtual_location = json!({"@type": "VirtualLocation", "url": virtual_url});
        let mode = entity
            .get("eventAttendanceMode")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string());
        match mode.as_deref() {
            Some(ONLINE) => {
                entity.insert("location", virtual_location);
            }
            Some(MIXED) => {
                let physical = entity.remove("location").unwrap_or_else(|| json!({"@type": "Place"}));
                let mut locations = match physical {
                    Value::Array(items) => items,
                    other => vec![other],
                };
                locations.push(virtual_location);
                entity.insert("location", Value::Array(locations));
            }
            _ => {}
        }
    }

    if let Some(organizer) = nested(entity, "organizer") {
        if let Some(name) = ctx.text("organizer_name") {
            organizer.insert("name".to_string(), json!(name));
        }
        if let Some(url) = ctx.text("organizer_url") {
            organizer.insert("url".to_string(), json!(url));
        }
    }

    if let Some(offers) = nested(entity, "offers") {
        if let Some(price) = ctx.text("ticket_price") {
            offers.insert("price".to_string(), json!(price));
            let currency = ctx
                .text("ticket_currency")
                .unwrap_or_else(|| "EUR".to_string());
            offers.insert("priceCurrency".to_string(), json!(currency));
        }
        if let Some(url) = ctx.text("ticket_url") {
            offers.insert("url".to_string(), json!(url));
        }
    }
}

/// Flat question/answer pairs become `Question` entities with an `acceptedAnswer`
fn fill_faq(entity: &mut SchemaEntity, ctx: &FillContext) {
    let questions: Vec<Value> = ctx
        .objects("questions")
        .into_iter()
        .filter_map(|pair| {
            let question = field_text(pair, "question")?;
            let answer = field_text(pair, "answer")?;
            Some(json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": answer
                }
            }))
        })
        .collect();
    if !questions.is_empty() {
        entity.insert("mainEntity", Value::Array(questions));
    }
}

fn fill_breadcrumbs(entity: &mut SchemaEntity, ctx: &FillContext) {
    let items: Vec<Value> = ctx
        .objects("breadcrumbs")
        .into_iter()
        .filter_map(|crumb| Some((field_text(crumb, "name")?, field_text(crumb, "url")?)))
        .enumerate()
        .map(|(i, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url
            })
        })
        .collect();
    if !items.is_empty() {
        entity.insert("itemListElement", Value::Array(items));
    }
}

fn fill_website(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    let url_template = ctx.text("search_url_template").or_else(|| {
        ctx.website()
            .map(|_| format!("{}/search?q={{search_term_string}}", ctx.client.base_url()))
    });
    if let Some(url_template) = url_template {
        if let Some(target) = nested(entity, "potentialAction")
            .and_then(|action| action.get_mut("target"))
            .and_then(|t| t.as_object_mut())
        {
            target.insert("urlTemplate".to_string(), json!(url_template));
        }
    }

    let company = ctx.company();
    if let (Some(publisher), Some(company)) = (nested(entity, "publisher"), company) {
        publisher.insert("name".to_string(), json!(company));
    }
}

fn fill_howto(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    set_text(entity, "name", ctx.text("howto_name"));
    set_text(entity, "totalTime", ctx.text("total_time"));

    if let Some(cost) = ctx.object("estimated_cost") {
        if let Some(value) = field_text(cost, "value") {
            entity.insert(
                "estimatedCost",
                json!({
                    "@type": "MonetaryAmount",
                    "currency": field_text(cost, "currency").unwrap_or_else(|| "EUR".to_string()),
                    "value": value
                }),
            );
        }
    }

    let tools: Vec<Value> = ctx
        .list("tools")
        .into_iter()
        .map(|name| json!({"@type": "HowToTool", "name": name}))
        .collect();
    if !tools.is_empty() {
        entity.insert("tool", Value::Array(tools));
    }

    let supplies: Vec<Value> = ctx
        .list("supplies")
        .into_iter()
        .map(|name| json!({"@type": "HowToSupply", "name": name}))
        .collect();
    if !supplies.is_empty() {
        entity.insert("supply", Value::Array(supplies));
    }

    let steps: Vec<Value> = ctx
        .objects("steps")
        .into_iter()
        .enumerate()
        .map(|(i, step)| {
            let position = step
                .get("position")
                .and_then(|p| p.as_u64())
                .unwrap_or(i as u64 + 1);
            let mut value = json!({
                "@type": "HowToStep",
                "position": position,
                "name": field_text(step, "name").unwrap_or_default(),
                "text": field_text(step, "text").unwrap_or_default()
            });
            if let Some(image) = field_text(step, "image") {
                value["image"] = json!(image);
            }
            value
        })
        .collect();
    if !steps.is_empty() {
        entity.insert("step", Value::Array(steps));
    }
}

/// Person never inherits the company's name, url, address or description
fn fill_person(entity: &mut SchemaEntity, ctx: &FillContext) {
    let given = ctx.text("given_name");
    let family = ctx.text("family_name");

    if given.is_some() || family.is_some() {
        let full = [given.as_deref(), family.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        entity.insert("name", json!(full));
        set_text(entity, "givenName", given);
        set_text(entity, "familyName", family);
    } else if let Some(full) = ctx.text("person_name") {
        if let Some((first, rest)) = full.split_once(char::is_whitespace) {
            entity.insert("givenName", json!(first));
            entity.insert("familyName", json!(rest.trim()));
        }
        entity.insert("name", json!(full));
    }

    set_text(entity, "jobTitle", ctx.text("job_title"));
    if let Some(employer) = ctx.text("works_for") {
        match nested(entity, "worksFor") {
            Some(existing) => {
                existing.insert("name".to_string(), json!(employer));
            }
            None => {
                entity.insert("worksFor", json!({"@type": "Organization", "name": employer}));
            }
        }
    }

    for field in ["email", "telephone", "image"] {
        set_text(entity, field, ctx.text(field));
    }
    set_list(entity, "sameAs", ctx.list("social_media"));

    for (source, target) in [
        ("person_url", "url"),
        ("person_address", "address"),
        ("person_description", "description"),
    ] {
        match ctx.value(source) {
            Some(value) => {
                entity.insert(target, value.clone());
            }
            None => {
                entity.remove(target);
            }
        }
    }
}

fn fill_job_posting(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    set_text(entity, "title", ctx.text("job_title"));
    set_text(entity, "description", ctx.text("job_description"));
    set_text(entity, "datePosted", ctx.text("date_posted"));
    set_text(entity, "validThrough", ctx.text("valid_through"));
    set_list(entity, "employmentType", ctx.list("employment_types"));

    let company = ctx.company();
    let website = ctx.website();
    if let Some(hiring) = nested(entity, "hiringOrganization") {
        if let Some(company) = company {
            hiring.insert("name".to_string(), json!(company));
        }
        if let Some(website) = website {
            hiring.insert("sameAs".to_string(), json!(website));
        }
    }

    if let Some(salary) = ctx.object("salary") {
        let min = field_text(salary, "min");
        let max = field_text(salary, "max");
        let currency = field_text(salary, "currency").unwrap_or_else(|| "EUR".to_string());
        if let Some(base) = nested(entity, "baseSalary") {
            base.insert("currency".to_string(), json!(currency));
            let value = match (min, max) {
                (Some(min), Some(max)) => Some(json!({
                    "@type": "QuantitativeValue",
                    "minValue": min,
                    "maxValue": max,
                    "unitText": "YEAR"
                })),
                (Some(single), None) | (None, Some(single)) => Some(json!({
                    "@type": "QuantitativeValue",
                    "value": single,
                    "unitText": "YEAR"
                })),
                (None, None) => None,
            };
            if let Some(value) = value {
                base.insert("value".to_string(), value);
            }
        }
    }
}

fn service_availability(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "immediate" | "within 24h" | "within 48h" => "https://schema.org/InStock".to_string(),
        "by appointment" | "scheduled" => "https://schema.org/PreOrder".to_string(),
        _ => raw.to_string(),
    }
}

fn fill_service(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    set_text(entity, "name", ctx.text("service_name"));
    set_text(entity, "serviceType", ctx.text("service_type"));
    set_text(entity, "description", ctx.text("service_description"));

    let company = ctx.company();
    if let (Some(provider), Some(company)) = (nested(entity, "provider"), company) {
        provider.insert("name".to_string(), json!(company));
    }

    let areas = ctx.list("area_served");
    match areas.as_slice() {
        [] => {}
        [single] => {
            entity.insert("areaServed", json!({"@type": "Place", "name": single}));
        }
        many => {
            let places: Vec<Value> = many
                .iter()
                .map(|area| json!({"@type": "Place", "name": area}))
                .collect();
            entity.insert("areaServed", Value::Array(places));
        }
    }

    if let Some(audience) = ctx.text("audience_type") {
        entity.insert("audience", json!({"@type": "Audience", "audienceType": audience}));
    }

    let offers: Vec<Value> = ctx
        .objects("offers_catalog")
        .into_iter()
        .map(|offer| {
            let mut item = json!({
                "@type": "Offer",
                "name": field_text(offer, "name").unwrap_or_default(),
                "description": field_text(offer, "description").unwrap_or_default()
            });
            if let Some(raw) = field_text(offer, "price") {
                match extract_price(&raw) {
                    Some(price) => {
                        item["price"] = json!(price);
                        item["priceCurrency"] = json!("EUR");
                    }
                    None => {
                        item["priceSpecification"] = json!({
                            "@type": "PriceSpecification",
                            "price": raw,
                            "priceCurrency": "EUR"
                        });
                    }
                }
            }
            item
        })
        .collect();
    if !offers.is_empty() {
        let catalog_name = format!(
            "Catalog {}",
            ctx.text("service_name").unwrap_or_else(|| "Services".to_string())
        );
        entity.insert(
            "hasOfferCatalog",
            json!({
                "@type": "OfferCatalog",
                "name": catalog_name,
                "itemListElement": offers
            }),
        );
    }

    set_text(entity, "priceRange", ctx.text("price_range"));
    set_text(
        entity,
        "availability",
        ctx.text("availability").map(|a| service_availability(&a)),
    );
    set_text(entity, "duration", ctx.text("service_duration"));

    let channels = ctx.list("delivery_method");
    if !channels.is_empty() {
        entity.insert(
            "availableChannel",
            json!({"@type": "ServiceChannel", "serviceChannelType": channels.join(", ")}),
        );
    }
    set_list(entity, "award", ctx.list("certifications"));
    set_text(entity, "termsOfService", ctx.text("guarantees"));

    let steps: Vec<String> = ctx
        .list("process_steps")
        .iter()
        .map(|step| strip_step_number(step))
        .filter(|step| !step.is_empty())
        .collect();
    if !steps.is_empty() {
        entity.insert(
            "serviceOutput",
            json!({"@type": "Thing", "description": format!("Process: {}", steps.join(" → "))}),
        );
    }
}

/// Type for `itemReviewed`; never `Thing`
pub fn review_item_type(ctx: &FillContext) -> SchemaTypeName {
    if let Some(explicit) = ctx.text("review_type").filter(|t| t != "Thing") {
        return explicit;
    }
    if let Some(selected) = ctx.selected.iter().find(|t| is_reviewable(t)) {
        return selected.clone();
    }

    let has = |key: &str| ctx.value(key).is_some();
    if has("service_name") || has("service_type") {
        return "Service".to_string();
    }
    if has("product_name") || has("product_sku") {
        return "Product".to_string();
    }
    if has("organization_type") {
        return "Organization".to_string();
    }
    if has("local_business_type") {
        return "LocalBusiness".to_string();
    }

    let item_name = ctx
        .text("item_name")
        .or_else(|| ctx.text("itemreviewed_name"))
        .unwrap_or_default()
        .to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| item_name.contains(w));
    if mentions(&["product", "item"]) {
        "Product".to_string()
    } else if mentions(&["restaurant", "café", "bistro"]) {
        "Restaurant".to_string()
    } else {
        "Service".to_string()
    }
}

fn fill_review(entity: &mut SchemaEntity, ctx: &FillContext) {
    let item_name = ctx
        .text("item_name")
        .or_else(|| ctx.text("itemreviewed_name"))
        .or_else(|| ctx.text("service_name"))
        .or_else(|| ctx.text("product_name"))
        .unwrap_or_else(|| ctx.client.company_name_or("Service").to_string());
    let mut item = json!({"@type": review_item_type(ctx), "name": item_name});
    if let Some(url) = ctx
        .text("item_url")
        .or_else(|| ctx.text("itemreviewed_url"))
        .or_else(|| ctx.website())
    {
        item["url"] = json!(url);
    }
    entity.insert("itemReviewed", item);

    if let Some(author) = ctx.text("author_name") {
        let author_type = ctx.text("author_type").unwrap_or_else(|| "Person".to_string());
        let mut value = json!({"@type": author_type, "name": author});
        if author_type == "Person" {
            if let Some(url) = ctx.text("author_url") {
                value["url"] = json!(url);
            }
        }
        entity.insert("author", value);
    }

    let published = ctx.text("date_published").unwrap_or_else(|| ctx.timestamp());
    entity.insert("datePublished", json!(published));
    set_text(entity, "headline", ctx.text("review_headline"));
    set_text(entity, "reviewBody", ctx.text("review_body"));

    if let Some(rating) = ctx.text("rating_value") {
        entity.insert(
            "reviewRating",
            json!({
                "@type": "Rating",
                "ratingValue": rating,
                "bestRating": ctx.text("best_rating").unwrap_or_else(|| "5".to_string()),
                "worstRating": ctx.text("worst_rating").unwrap_or_else(|| "1".to_string())
            }),
        );
    }

    let aspects: Vec<Value> = ctx
        .objects("review_aspects")
        .into_iter()
        .filter_map(|aspect| {
            let name = field_text(aspect, "name")?;
            let mut value = json!({
                "@type": "PropertyValue",
                "name": name,
                "value": aspect.get("rating").cloned().unwrap_or(Value::Null)
            });
            if let Some(comment) = field_text(aspect, "comment") {
                value["description"] = json!(comment);
            }
            Some(value)
        })
        .collect();
    if !aspects.is_empty() {
        entity.insert("reviewAspect", Value::Array(aspects));
    }

    match ctx.data.get("would_recommend").and_then(|v| v.as_bool()) {
        Some(true) => {
            entity.insert(
                "positiveNotes",
                json!({"@type": "ItemList", "itemListElement": ["Recommended"]}),
            );
        }
        Some(false) => {
            entity.insert(
                "negativeNotes",
                json!({"@type": "ItemList", "itemListElement": ["Not recommended"]}),
            );
        }
        None => {}
    }

    let tags = ctx.list("review_tags");
    if !tags.is_empty() {
        entity.insert("keywords", json!(tags.join(", ")));
    }

    let media: Vec<Value> = ctx
        .list("review_images")
        .into_iter()
        .map(|url| json!({"@type": "ImageObject", "url": url}))
        .collect();
    if !media.is_empty() {
        entity.insert("associatedMedia", Value::Array(media));
    }

    let publisher_name = ctx.client.company_name_or("Website").to_string();
    match nested(entity, "publisher") {
        Some(publisher) => {
            let empty = publisher.get("name").map(is_blank).unwrap_or(true);
            if empty {
                publisher.insert("name".to_string(), json!(publisher_name));
            }
        }
        None => {
            entity.insert("publisher", json!({"@type": "Organization", "name": publisher_name}));
        }
    }
}

fn rating_target_type(ctx: &FillContext) -> SchemaTypeName {
    if let Some(explicit) = ctx.text("target_type").filter(|t| t != "Thing") {
        return explicit;
    }
    [
        "Service",
        "Product",
        "LocalBusiness",
        "Organization",
        "Restaurant",
        "Store",
        "Event",
        "Course",
    ]
    .iter()
    .find(|t| ctx.selected.iter().any(|s| s == *t))
    .map(|t| t.to_string())
    .unwrap_or_else(|| "Service".to_string())
}

fn fill_aggregate_rating(entity: &mut SchemaEntity, ctx: &FillContext) {
    set_text(entity, "ratingValue", ctx.text("rating_value"));
    set_text(entity, "reviewCount", ctx.text("review_count"));
    set_text(entity, "bestRating", ctx.text("best_rating"));
    set_text(entity, "worstRating", ctx.text("worst_rating"));
    set_text(
        entity,
        "ratingCount",
        ctx.text("rating_count").or_else(|| ctx.text("review_count")),
    );

    if let Some(name) = ctx.text("target_name") {
        let mut item = json!({"@type": rating_target_type(ctx), "name": name});
        if let Some(url) = ctx.text("target_url") {
            item["url"] = json!(url);
        }
        entity.insert("itemReviewed", item);
    }

    if let Some(distribution) = ctx.object("rating_distribution") {
        let levels: Vec<Value> = distribution
            .iter()
            .map(|(level, count)| {
                json!({
                    "@type": "RatingDistribution",
                    "ratingValue": level,
                    "ratingCount": count
                })
            })
            .collect();
        entity.insert("ratingDistribution", Value::Array(levels));
    }

    if let Some(source) = ctx.text("review_source") {
        entity.insert("reviewSource", json!({"@type": "Organization", "name": source}));
    }
    set_text(entity, "url", ctx.text("reviews_url"));
    set_text(entity, "dateModified", ctx.text("last_updated"));

    if let Some(period) = ctx.object("review_period") {
        if let (Some(start), Some(end)) = (field_text(period, "start"), field_text(period, "end")) {
            entity.insert("temporalCoverage", json!(format!("{}/{}", start, end)));
        }
    }
}

fn fill_software_application(entity: &mut SchemaEntity, ctx: &FillContext) {
    fill_common(entity, ctx);

    set_text(entity, "name", ctx.text("app_name"));
    set_text(entity, "applicationCategory", ctx.text("app_category"));
    set_text(entity, "applicationSubCategory", ctx.text("app_subcategory"));

    let systems = ctx.list("operating_systems");
    if !systems.is_empty() {
        entity.insert("operatingSystem", json!(systems.join(", ")));
    }

    for (source, target) in [
        ("software_version", "softwareVersion"),
        ("file_size", "fileSize"),
        ("download_url", "downloadUrl"),
        ("install_url", "installUrl"),
        ("software_requirements", "softwareRequirements"),
        ("support_url", "supportingData"),
        ("privacy_policy_url", "privacyPolicy"),
        ("terms_url", "termsOfService"),
    ] {
        set_text(entity, target, ctx.text(source));
    }

    if let Some(offers) = nested(entity, "offers") {
        let price = ctx.text("price").unwrap_or_else(|| "0".to_string());
        offers.insert("price".to_string(), json!(price));
        if let Some(currency) = ctx.text("price_currency") {
            offers.insert("priceCurrency".to_string(), json!(currency));
        }
        match ctx.text("pricing_model").map(|m| m.to_lowercase()).as_deref() {
            Some("subscription") => {
                offers.insert("@type".to_string(), json!("Subscription"));
            }
            Some("free trial") => {
                offers.insert("trialDuration".to_string(), json!("P30D"));
            }
            _ => {}
        }
    }

    set_list(entity, "featureList", ctx.list("features"));
    set_list(entity, "screenshot", ctx.list("screenshots"));

    if let Some(docs) = ctx.text("documentation_url") {
        entity.insert("softwareHelp", json!({"@type": "CreativeWork", "url": docs}));
    }
    let permissions = ctx.list("permissions");
    if !permissions.is_empty() {
        entity.insert("permissions", json!(permissions.join(", ")));
    }

    entity.insert(
        "author",
        json!({
            "@type": "Organization",
            "name": ctx.client.company_name,
            "url": ctx.client.website
        }),
    );
}
