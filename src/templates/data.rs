use serde_json::{json, Value};

fn postal_address() -> Value {
    json!({
        "@type": "PostalAddress",
        "streetAddress": "",
        "addressLocality": "",
        "addressRegion": "",
        "postalCode": "",
        "addressCountry": ""
    })
}

fn geo_coordinates() -> Value {
    json!({
        "@type": "GeoCoordinates",
        "latitude": "",
        "longitude": ""
    })
}

fn article_base(schema_type: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": schema_type,
        "headline": "",
        "image": [],
        "datePublished": "",
        "dateModified": "",
        "author": {
            "@type": "Person",
            "name": "",
            "url": ""
        },
        "publisher": {
            "@type": "Organization",
            "name": "",
            "logo": {
                "@type": "ImageObject",
                "url": ""
            }
        },
        "description": "",
        "articleBody": "",
        "articleSection": "",
        "wordCount": "",
        "keywords": ""
    })
}

fn business_base(schema_type: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": schema_type,
        "name": "",
        "url": "",
        "logo": {
            "@type": "ImageObject",
            "url": "",
            "width": 300,
            "height": 300
        },
        "description": "",
        "image": [],
        "address": postal_address(),
        "geo": geo_coordinates(),
        "hasMap": "",
        "telephone": "",
        "email": "",
        "openingHoursSpecification": [],
        "currenciesAccepted": "",
        "paymentAccepted": "",
        "priceRange": "",
        "aggregateRating": null,
        "review": [],
        "sameAs": []
    })
}

/// Default shapes keyed by type name. Placeholder values are empty and get
/// stripped by cleaning unless a filler writes into them.
pub fn all_templates() -> Vec<(&'static str, Value)> {
    let mut restaurant = business_base("Restaurant");
    restaurant["servesCuisine"] = json!([]);
    restaurant["hasMenu"] = json!("");
    restaurant["acceptsReservations"] = json!(true);

    let mut blog_posting = article_base("BlogPosting");
    blog_posting["isPartOf"] = json!({
        "@type": "Blog",
        "name": ""
    });

    let mut news_article = article_base("NewsArticle");
    news_article["dateline"] = json!("");

    vec![
        (
            "Organization",
            json!({
                "@context": "https://schema.org",
                "@type": "Organization",
                "name": "",
                "url": "",
                "logo": {
                    "@type": "ImageObject",
                    "url": "",
                    "width": 300,
                    "height": 300
                },
                "description": "",
                "alternateName": "",
                "address": postal_address(),
                "contactPoint": [],
                "telephone": "",
                "email": "",
                "faxNumber": "",
                "legalName": "",
                "taxID": "",
                "vatID": "",
                "duns": "",
                "naics": "",
                "numberOfEmployees": {
                    "@type": "QuantitativeValue",
                    "value": ""
                },
                "foundingDate": "",
                "aggregateRating": null,
                "review": [],
                "award": [],
                "sameAs": [],
                "knowsAbout": [],
                "slogan": ""
            }),
        ),
        ("LocalBusiness", business_base("LocalBusiness")),
        ("Store", business_base("Store")),
        ("Restaurant", restaurant),
        (
            "Product",
            json!({
                "@context": "https://schema.org",
                "@type": "Product",
                "name": "",
                "description": "",
                "image": [],
                "sku": "",
                "gtin": "",
                "gtin13": "",
                "mpn": "",
                "brand": {
                    "@type": "Brand",
                    "name": ""
                },
                "size": "",
                "color": "",
                "material": "",
                "weight": {
                    "@type": "QuantitativeValue",
                    "value": "",
                    "unitCode": ""
                },
                "width": {
                    "@type": "QuantitativeValue",
                    "value": "",
                    "unitCode": ""
                },
                "height": {
                    "@type": "QuantitativeValue",
                    "value": "",
                    "unitCode": ""
                },
                "depth": {
                    "@type": "QuantitativeValue",
                    "value": "",
                    "unitCode": ""
                },
                "offers": {
                    "@type": "Offer",
                    "price": "",
                    "priceCurrency": "",
                    "availability": "https://schema.org/InStock",
                    "itemCondition": "https://schema.org/NewCondition",
                    "priceValidUntil": "",
                    "seller": {
                        "@type": "Organization",
                        "name": ""
                    }
                },
                "aggregateRating": null,
                "review": []
            }),
        ),
        ("Article", article_base("Article")),
        ("NewsArticle", news_article),
        ("BlogPosting", blog_posting),
        (
            "FAQPage",
            json!({
                "@context": "https://schema.org",
                "@type": "FAQPage",
                "mainEntity": []
            }),
        ),
        (
            "BreadcrumbList",
            json!({
                "@context": "https://schema.org",
                "@type": "BreadcrumbList",
                "itemListElement": []
            }),
        ),
        (
            "WebSite",
            json!({
                "@context": "https://schema.org",
                "@type": "WebSite",
                "name": "",
                "url": "",
                "description": "",
                "publisher": {
                    "@type": "Organization",
                    "name": ""
                },
                "potentialAction": {
                    "@type": "SearchAction",
                    "target": {
                        "@type": "EntryPoint",
                        "urlTemplate": ""
                    },
                    "query-input": "required name=search_term_string"
                }
            }),
        ),
        (
            "Person",
            json!({
                "@context": "https://schema.org",
                "@type": "Person",
                "name": "",
                "givenName": "",
                "familyName": "",
                "jobTitle": "",
                "worksFor": {
                    "@type": "Organization",
                    "name": ""
                },
                "email": "",
                "telephone": "",
                "image": "",
                "url": "",
                "sameAs": [],
                "address": postal_address(),
                "description": "",
                "alumniOf": [],
                "knowsAbout": []
            }),
        ),
        (
            "Event",
            json!({
                "@context": "https://schema.org",
                "@type": "Event",
                "name": "",
                "description": "",
                "startDate": "",
                "endDate": "",
                "eventStatus": "https://schema.org/EventScheduled",
                "eventAttendanceMode": "https://schema.org/OfflineEventAttendanceMode",
                "location": {
                    "@type": "Place",
                    "name": "",
                    "address": postal_address()
                },
                "image": [],
                "organizer": {
                    "@type": "Organization",
                    "name": "",
                    "url": ""
                },
                "performer": [],
                "offers": {
                    "@type": "Offer",
                    "price": "",
                    "priceCurrency": "",
                    "availability": "https://schema.org/InStock",
                    "url": ""
                }
            }),
        ),
        (
            "Recipe",
            json!({
                "@context": "https://schema.org",
                "@type": "Recipe",
                "name": "",
                "description": "",
                "image": [],
                "author": {
                    "@type": "Person",
                    "name": ""
                },
                "datePublished": "",
                "prepTime": "",
                "cookTime": "",
                "totalTime": "",
                "recipeYield": "",
                "recipeCategory": "",
                "recipeCuisine": "",
                "recipeIngredient": [],
                "recipeInstructions": [],
                "aggregateRating": null,
                "keywords": ""
            }),
        ),
        (
            "VideoObject",
            json!({
                "@context": "https://schema.org",
                "@type": "VideoObject",
                "name": "",
                "description": "",
                "thumbnailUrl": [],
                "uploadDate": "",
                "duration": "",
                "contentUrl": "",
                "embedUrl": ""
            }),
        ),
        (
            "Review",
            json!({
                "@context": "https://schema.org",
                "@type": "Review",
                "itemReviewed": {
                    "@type": "Thing",
                    "name": ""
                },
                "author": {
                    "@type": "Person",
                    "name": ""
                },
                "datePublished": "",
                "reviewBody": "",
                "reviewRating": {
                    "@type": "Rating",
                    "ratingValue": "",
                    "bestRating": "5",
                    "worstRating": "1"
                },
                "publisher": {
                    "@type": "Organization",
                    "name": ""
                }
            }),
        ),
        (
            "AggregateRating",
            json!({
                "@context": "https://schema.org",
                "@type": "AggregateRating",
                "ratingValue": "",
                "reviewCount": "",
                "bestRating": "5",
                "worstRating": "1",
                "ratingCount": ""
            }),
        ),
        (
            "HowTo",
            json!({
                "@context": "https://schema.org",
                "@type": "HowTo",
                "name": "",
                "description": "",
                "image": [],
                "totalTime": "",
                "estimatedCost": {
                    "@type": "MonetaryAmount",
                    "currency": "",
                    "value": ""
                },
                "tool": [],
                "supply": [],
                "step": []
            }),
        ),
        (
            "JobPosting",
            json!({
                "@context": "https://schema.org",
                "@type": "JobPosting",
                "title": "",
                "description": "",
                "datePosted": "",
                "validThrough": "",
                "employmentType": [],
                "hiringOrganization": {
                    "@type": "Organization",
                    "name": "",
                    "sameAs": ""
                },
                "jobLocation": {
                    "@type": "Place",
                    "address": postal_address()
                },
                "baseSalary": {
                    "@type": "MonetaryAmount",
                    "currency": "",
                    "value": {
                        "@type": "QuantitativeValue",
                        "value": "",
                        "unitText": "YEAR"
                    }
                }
            }),
        ),
        (
            "Course",
            json!({
                "@context": "https://schema.org",
                "@type": "Course",
                "name": "",
                "description": "",
                "provider": {
                    "@type": "Organization",
                    "name": "",
                    "sameAs": ""
                },
                "courseCode": "",
                "hasCourseInstance": []
            }),
        ),
        (
            "Service",
            json!({
                "@context": "https://schema.org",
                "@type": "Service",
                "name": "",
                "description": "",
                "serviceType": "",
                "provider": {
                    "@type": "Organization",
                    "name": ""
                },
                "areaServed": {
                    "@type": "Place",
                    "name": ""
                },
                "hasOfferCatalog": {
                    "@type": "OfferCatalog",
                    "name": "",
                    "itemListElement": []
                },
                "aggregateRating": null,
                "review": []
            }),
        ),
        (
            "SoftwareApplication",
            json!({
                "@context": "https://schema.org",
                "@type": "SoftwareApplication",
                "name": "",
                "operatingSystem": "",
                "applicationCategory": "",
                "applicationSubCategory": "",
                "downloadUrl": "",
                "fileSize": "",
                "softwareVersion": "",
                "offers": {
                    "@type": "Offer",
                    "price": "0",
                    "priceCurrency": "EUR"
                },
                "aggregateRating": null,
                "screenshot": [],
                "featureList": []
            }),
        ),
    ]
}

/// Fields that must be present for rich-result eligibility
pub fn required_fields() -> Vec<(&'static str, &'static [&'static str])> {
    vec![
        ("Organization", &["name"]),
        ("LocalBusiness", &["name"]),
        ("Restaurant", &["name"]),
        ("Store", &["name"]),
        ("Product", &["name", "image", "offers"]),
        ("Article", &["headline", "image", "datePublished"]),
        ("NewsArticle", &["headline", "image", "datePublished"]),
        ("BlogPosting", &["headline", "image", "datePublished"]),
        ("FAQPage", &["mainEntity"]),
        ("BreadcrumbList", &["itemListElement"]),
        ("WebSite", &["name", "url"]),
        ("Person", &["name"]),
        ("Event", &["name", "startDate", "location"]),
        ("Recipe", &["name", "image", "recipeIngredient", "recipeInstructions"]),
        ("VideoObject", &["name", "description", "thumbnailUrl", "uploadDate"]),
        ("Review", &["itemReviewed", "author", "reviewRating"]),
        ("AggregateRating", &["ratingValue", "reviewCount"]),
        ("HowTo", &["name", "step"]),
        ("JobPosting", &["title", "description", "datePosted", "hiringOrganization"]),
        ("Course", &["name", "description", "provider"]),
        ("Service", &["name", "serviceType"]),
        ("SoftwareApplication", &["name", "operatingSystem", "applicationCategory"]),
    ]
}

pub fn recommended_fields() -> Vec<(&'static str, &'static [&'static str])> {
    vec![
        ("Organization", &["url", "logo", "sameAs", "contactPoint"]),
        (
            "LocalBusiness",
            &["address", "geo", "telephone", "openingHoursSpecification", "priceRange"],
        ),
        (
            "Restaurant",
            &[
                "address",
                "geo",
                "telephone",
                "openingHoursSpecification",
                "priceRange",
                "servesCuisine",
            ],
        ),
        ("Product", &["description", "sku", "brand", "aggregateRating", "review"]),
        ("Article", &["author", "publisher", "dateModified", "description"]),
        (
            "NewsArticle",
            &["author", "publisher", "dateModified", "description", "articleSection"],
        ),
        ("BlogPosting", &["author", "publisher", "dateModified", "description"]),
        ("Event", &["description", "endDate", "organizer", "performer", "offers"]),
        (
            "Recipe",
            &["author", "datePublished", "description", "prepTime", "cookTime"],
        ),
        ("WebSite", &["potentialAction", "description"]),
        ("VideoObject", &["duration", "embedUrl", "contentUrl"]),
        ("HowTo", &["description", "totalTime", "estimatedCost", "tool", "supply"]),
        ("JobPosting", &["jobLocation", "baseSalary", "employmentType", "validThrough"]),
        ("Service", &["provider", "areaServed", "description"]),
    ]
}
