use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field on a page record holding the ordered component list.
pub const DYNAMIC_ZONE_FIELD: &str = "dynamicZone";

/// One entry of a page's dynamic zone. The CMS tags every entry with a
/// `__component` kind; kind-specific fields ride along untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "__component", default)]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Component {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut obj) => {
                let kind = match obj.remove("__component") {
                    Some(Value::String(s)) => s,
                    _ => String::new(),
                };
                Some(Self { kind, fields: obj })
            }
            _ => None,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.fields.get("id").and_then(Value::as_i64)
    }
}

/// Dynamic-zone kinds the primary page query returns only shallowly.
/// Everything else passes through the enricher untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichKind {
    Slider,
    Testimonial,
    Therapy,
}

impl EnrichKind {
    pub const ALL: [EnrichKind; 3] = [
        EnrichKind::Slider,
        EnrichKind::Testimonial,
        EnrichKind::Therapy,
    ];

    pub fn component_kind(&self) -> &'static str {
        match self {
            EnrichKind::Slider => "sections.slider-section",
            EnrichKind::Testimonial => "sections.testimonial-slider",
            EnrichKind::Therapy => "sections.therapy-section",
        }
    }
}

/// Populate depth for the site-global query. `Broad` is `populate=*`;
/// `Explicit` names each section path and is the one documented retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateScope {
    Broad,
    Explicit,
}

/// Standalone content sections the UI fetches one endpoint at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    About,
    Testimonials,
    Footer,
    QuickFinds,
    Contact,
    Seo,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Hero,
        SectionKind::About,
        SectionKind::Testimonials,
        SectionKind::Footer,
        SectionKind::QuickFinds,
        SectionKind::Contact,
        SectionKind::Seo,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero-section",
            SectionKind::About => "about-section",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Footer => "footer",
            SectionKind::QuickFinds => "quick-finds",
            SectionKind::Contact => "contact",
            SectionKind::Seo => "seo",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Footer => "footer",
            SectionKind::QuickFinds => "quick-finds",
            SectionKind::Contact => "contact",
            SectionKind::Seo => "seo",
        }
    }
}

/// Site-wide navigation/footer/contact/SEO data. Every section is
/// independently optional; an absent section is None, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSiteData {
    pub navbar: Option<Value>,
    pub footer: Option<Value>,
    pub contact: Option<Value>,
    pub seo: Option<Value>,
}

impl GlobalSiteData {
    pub fn from_record(record: Value) -> Self {
        let take = |obj: &mut Map<String, Value>, key: &str| match obj.remove(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        };

        match record {
            Value::Object(mut obj) => Self {
                navbar: take(&mut obj, "navbar"),
                footer: take(&mut obj, "footer"),
                contact: take(&mut obj, "contact"),
                seo: take(&mut obj, "seo"),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.navbar.is_none() && self.footer.is_none() && self.contact.is_none() && self.seo.is_none()
    }
}

/// Final logo URLs per slot, after base joining and fallback handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLogos {
    pub navbar: String,
    pub footer: String,
    pub page: String,
}

/// The single plain structure handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPage {
    pub slug: String,
    pub dynamic_zone: Vec<Component>,
    pub seo: Option<Value>,
    pub navbar: Option<Value>,
    pub footer: Option<Value>,
    pub contact: Option<Value>,
    pub resolved_logo_urls: ResolvedLogos,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a page aggregation. A missing slug is a normal branch,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Found(Box<NormalizedPage>),
    NotFound { slug: String },
}

impl PageOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PageOutcome::Found(_))
    }

    pub fn into_page(self) -> Option<NormalizedPage> {
        match self {
            PageOutcome::Found(page) => Some(*page),
            PageOutcome::NotFound { .. } => None,
        }
    }
}
