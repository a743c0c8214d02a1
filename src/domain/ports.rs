use crate::domain::model::{Component, EnrichKind, PopulateScope, SectionKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The CMS boundary. Every operation is one request/response fetch; records
/// come back entity-flattened (no `{id, attributes}` nesting, no envelope).
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Page shell matching the slug, with shallow dynamic-zone population.
    /// `None` means no page matches.
    async fn page_by_slug(&self, slug: &str) -> Result<Option<Value>>;

    /// The page's dynamic zone from a dedicated query that deep-populates
    /// only the given kind.
    async fn page_zone_deep(&self, slug: &str, kind: EnrichKind) -> Result<Vec<Component>>;

    /// Bulk therapy lookup by id set.
    async fn therapies_by_ids(&self, ids: &[i64]) -> Result<Vec<Value>>;

    /// Site-global navbar/footer/contact/SEO record.
    async fn global_site_data(&self, scope: PopulateScope) -> Result<Value>;

    /// One media-library object by numeric file id.
    async fn media_file(&self, id: i64) -> Result<Value>;

    /// One standalone content section with its fixed population directive.
    async fn section(&self, kind: SectionKind) -> Result<Value>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn fallback_logo_url(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}
