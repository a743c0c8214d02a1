use crate::core::enrich::SubComponentEnricher;
use crate::core::media::MediaResolver;
use crate::domain::model::{
    Component, GlobalSiteData, NormalizedPage, PageOutcome, PopulateScope, ResolvedLogos,
    DYNAMIC_ZONE_FIELD,
};
use crate::domain::ports::ContentRepository;
use crate::utils::error::Result;
use chrono::Utc;
use serde_json::Value;

const LOGO_FIELD: &str = "logo";

/// Two-phase logo resolution: the CMS sometimes hands back a bare numeric
/// file id where a populated media object belongs.
#[derive(Debug, Clone, PartialEq)]
pub enum LogoSource {
    Missing,
    Id(i64),
    Object(Value),
}

impl LogoSource {
    pub fn classify(value: Option<&Value>) -> LogoSource {
        match value {
            None | Some(Value::Null) => LogoSource::Missing,
            Some(v) => match v.as_i64() {
                Some(id) => LogoSource::Id(id),
                None => LogoSource::Object(v.clone()),
            },
        }
    }
}

/// Orchestrates one "get full page by slug" pass: shell query, dynamic-zone
/// enrichment, global-data merge, media URL resolution. Only the shell query
/// is fatal; everything after it degrades with a logged warning.
pub struct PageAggregator<R: ContentRepository> {
    repo: R,
    media: MediaResolver,
}

impl<R: ContentRepository> PageAggregator<R> {
    pub fn new(repo: R, media: MediaResolver) -> Self {
        Self { repo, media }
    }

    /// `cached_global` short-circuits the site-global query; the aggregator
    /// itself holds no state between invocations.
    pub async fn get_page(
        &self,
        slug: &str,
        cached_global: Option<GlobalSiteData>,
    ) -> Result<PageOutcome> {
        tracing::info!("📡 Aggregating page '{}'", slug);

        let Some(mut page) = self.repo.page_by_slug(slug).await? else {
            tracing::info!("Page '{}' not found", slug);
            return Ok(PageOutcome::NotFound {
                slug: slug.to_string(),
            });
        };

        let shallow_zone = extract_zone(&mut page);

        // Zone enrichment and the global-data query are independent.
        let (dynamic_zone, mut global) = tokio::join!(
            self.enrich_zone(slug, shallow_zone),
            self.load_global(cached_global),
        );

        self.fill_logo_object(global.navbar.as_mut(), "navbar").await;
        self.fill_logo_object(global.footer.as_mut(), "footer").await;

        let resolved_logo_urls = self.resolve_logos(&global, page.get(LOGO_FIELD));

        tracing::info!(
            "✅ Page '{}' aggregated with {} zone component(s)",
            slug,
            dynamic_zone.len()
        );

        Ok(PageOutcome::Found(Box::new(NormalizedPage {
            slug: slug.to_string(),
            dynamic_zone,
            seo: global.seo,
            navbar: global.navbar,
            footer: global.footer,
            contact: global.contact,
            resolved_logo_urls,
            fetched_at: Utc::now(),
        })))
    }

    async fn enrich_zone(&self, slug: &str, zone: Vec<Component>) -> Vec<Component> {
        if zone.is_empty() {
            return zone;
        }
        SubComponentEnricher::new(&self.repo).enrich(slug, zone).await
    }

    async fn load_global(&self, cached: Option<GlobalSiteData>) -> GlobalSiteData {
        if let Some(cached) = cached {
            tracing::debug!("Using caller-supplied global site data");
            return cached;
        }

        match self.repo.global_site_data(PopulateScope::Broad).await {
            Ok(record) => GlobalSiteData::from_record(record),
            Err(e) => {
                tracing::warn!(
                    "🔶 Broad global-data query failed, retrying with explicit populate paths: {}",
                    e
                );
                match self.repo.global_site_data(PopulateScope::Explicit).await {
                    Ok(record) => GlobalSiteData::from_record(record),
                    Err(e) => {
                        tracing::warn!(
                            "🔶 Global-data retry failed, continuing with empty sections: {}",
                            e
                        );
                        GlobalSiteData::default()
                    }
                }
            }
        }
    }

    /// If a section's logo is a bare numeric id, fetch the media object and
    /// splice it back in before URL resolution. A failed lookup leaves the
    /// id untouched and the slot degrades to the fallback chain.
    async fn fill_logo_object(&self, section: Option<&mut Value>, label: &str) {
        let Some(section) = section else { return };
        let LogoSource::Id(id) = LogoSource::classify(section.get(LOGO_FIELD)) else {
            return;
        };

        match self.repo.media_file(id).await {
            Ok(media) => {
                tracing::debug!("📥 Spliced media object {} into {} logo", id, label);
                if let Some(obj) = section.as_object_mut() {
                    obj.insert(LOGO_FIELD.to_string(), media);
                }
            }
            Err(e) => {
                tracing::warn!("🔶 Media lookup for {} logo id {} failed: {}", label, id, e);
            }
        }
    }

    fn resolve_logos(&self, global: &GlobalSiteData, page_logo: Option<&Value>) -> ResolvedLogos {
        let resolve_slot = |section: &Option<Value>| {
            section
                .as_ref()
                .and_then(|s| s.get(LOGO_FIELD))
                .and_then(|logo| self.media.resolve(logo))
        };

        let navbar = resolve_slot(&global.navbar);
        let footer = resolve_slot(&global.footer);
        let page = page_logo.and_then(|logo| self.media.resolve(logo));

        // A slot without its own logo borrows any resolved alternative; the
        // configured fallback applies only when every candidate is empty.
        let first = navbar
            .clone()
            .or_else(|| footer.clone())
            .or_else(|| page.clone());

        ResolvedLogos {
            navbar: navbar
                .or_else(|| first.clone())
                .unwrap_or_else(|| self.media.fallback_url().to_string()),
            footer: footer
                .or_else(|| first.clone())
                .unwrap_or_else(|| self.media.fallback_url().to_string()),
            page: page
                .or_else(|| first.clone())
                .unwrap_or_else(|| self.media.fallback_url().to_string()),
        }
    }
}

fn extract_zone(page: &mut Value) -> Vec<Component> {
    match page
        .as_object_mut()
        .and_then(|obj| obj.remove(DYNAMIC_ZONE_FIELD))
    {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| {
                let component = Component::from_value(entry);
                if component.is_none() {
                    tracing::warn!("🔶 Skipping malformed dynamic-zone entry");
                }
                component
            })
            .collect(),
        _ => Vec::new(),
    }
}
