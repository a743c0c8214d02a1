pub mod aggregator;
pub mod enrich;
pub mod envelope;
pub mod media;
pub mod sections;

pub use crate::domain::model::{
    Component, EnrichKind, GlobalSiteData, NormalizedPage, PageOutcome, PopulateScope,
    ResolvedLogos, SectionKind,
};
pub use crate::domain::ports::{ConfigProvider, ContentRepository};
pub use crate::utils::error::Result;
