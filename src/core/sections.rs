use crate::domain::model::SectionKind;
use crate::domain::ports::ContentRepository;
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;

/// Uniform thin wrappers over the standalone section endpoints. One GET with
/// a fixed population directive per section; the repository unwraps the
/// envelope, rejections propagate to the caller.
pub struct SectionFetcher<R: ContentRepository> {
    repo: R,
}

impl<R: ContentRepository> SectionFetcher<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn fetch(&self, kind: SectionKind) -> Result<Value> {
        tracing::debug!("📡 Fetching section '{}'", kind.as_str());
        self.repo.section(kind).await
    }

    /// Best-effort sweep over every section for the composite landing case.
    /// Failed sections are logged and omitted; the UI supplies its own
    /// fallback content.
    pub async fn fetch_all(&self) -> HashMap<&'static str, Value> {
        let mut sections = HashMap::new();
        for kind in SectionKind::ALL {
            match self.fetch(kind).await {
                Ok(content) => {
                    sections.insert(kind.as_str(), content);
                }
                Err(e) => {
                    tracing::warn!("🔶 Section '{}' fetch failed, omitting: {}", kind.as_str(), e);
                }
            }
        }
        sections
    }
}
