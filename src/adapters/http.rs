use crate::core::envelope::Envelope;
use crate::domain::model::{
    Component, EnrichKind, PopulateScope, SectionKind, DYNAMIC_ZONE_FIELD,
};
use crate::domain::ports::{ConfigProvider, ContentRepository};
use crate::utils::error::{AggregateError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const THERAPY_BULK_LIMIT: usize = 100;

/// Strapi-style REST implementation of the content repository. Query
/// parameters select filters, population depth, sort order, and pagination
/// limits; response bodies may be `{data: ...}` envelopes or flat objects.
#[derive(Debug, Clone)]
pub struct HttpContentRepository {
    client: Client,
    base_url: String,
}

impl HttpContentRepository {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("cms-aggregator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout_secs())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = self.endpoint(path);
        tracing::debug!("📡 GET {} ({} query param(s))", url, query.len());

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        tracing::debug!("📡 {} -> {}", url, status);

        if !status.is_success() {
            return Err(AggregateError::UnexpectedStatus {
                endpoint: url,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

fn empty_payload(endpoint: &str) -> AggregateError {
    AggregateError::ProcessingError {
        message: format!("Response from '{}' carried no payload", endpoint),
    }
}

#[async_trait]
impl ContentRepository for HttpContentRepository {
    async fn page_by_slug(&self, slug: &str) -> Result<Option<Value>> {
        let query = vec![
            ("filters[slug][$eq]".to_string(), slug.to_string()),
            ("populate".to_string(), DYNAMIC_ZONE_FIELD.to_string()),
            ("pagination[limit]".to_string(), "1".to_string()),
        ];

        let body = self.get_json("pages", &query).await?;
        Ok(Envelope::decode(body).into_single())
    }

    async fn page_zone_deep(&self, slug: &str, kind: EnrichKind) -> Result<Vec<Component>> {
        let populate_key = format!(
            "populate[{}][on][{}][populate]",
            DYNAMIC_ZONE_FIELD,
            kind.component_kind()
        );
        let query = vec![
            ("filters[slug][$eq]".to_string(), slug.to_string()),
            (populate_key, "*".to_string()),
            ("pagination[limit]".to_string(), "1".to_string()),
        ];

        let body = self.get_json("pages", &query).await?;
        let Some(mut page) = Envelope::decode(body).into_single() else {
            return Ok(Vec::new());
        };

        match page
            .as_object_mut()
            .and_then(|obj| obj.remove(DYNAMIC_ZONE_FIELD))
        {
            Some(Value::Array(entries)) => Ok(entries
                .into_iter()
                .filter_map(Component::from_value)
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn therapies_by_ids(&self, ids: &[i64]) -> Result<Vec<Value>> {
        let mut query: Vec<(String, String)> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (format!("filters[id][$in][{}]", index), id.to_string()))
            .collect();
        query.push(("sort".to_string(), "id:asc".to_string()));
        query.push((
            "pagination[limit]".to_string(),
            THERAPY_BULK_LIMIT.to_string(),
        ));

        let body = self.get_json("therapies", &query).await?;
        Ok(Envelope::decode(body).into_records())
    }

    async fn global_site_data(&self, scope: PopulateScope) -> Result<Value> {
        let query: Vec<(String, String)> = match scope {
            PopulateScope::Broad => vec![("populate".to_string(), "*".to_string())],
            PopulateScope::Explicit => ["navbar", "footer", "contact", "seo"]
                .iter()
                .map(|section| (format!("populate[{}][populate]", section), "*".to_string()))
                .collect(),
        };

        let body = self.get_json("global", &query).await?;
        Envelope::decode(body)
            .into_single()
            .ok_or_else(|| empty_payload("global"))
    }

    async fn media_file(&self, id: i64) -> Result<Value> {
        let path = format!("upload/files/{}", id);
        let body = self.get_json(&path, &[]).await?;
        Envelope::decode(body)
            .into_single()
            .ok_or_else(|| empty_payload(&path))
    }

    async fn section(&self, kind: SectionKind) -> Result<Value> {
        let mut query = vec![("populate".to_string(), "*".to_string())];
        if kind == SectionKind::Testimonials {
            query.push(("sort".to_string(), "order:asc".to_string()));
        }

        let body = self.get_json(kind.endpoint(), &query).await?;
        Envelope::decode(body)
            .into_single()
            .ok_or_else(|| empty_payload(kind.endpoint()))
    }
}
