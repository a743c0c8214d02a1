pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::site::SiteConfig;

pub use adapters::http::HttpContentRepository;
pub use core::aggregator::PageAggregator;
pub use core::media::MediaResolver;
pub use core::sections::SectionFetcher;
pub use domain::model::{
    Component, EnrichKind, GlobalSiteData, NormalizedPage, PageOutcome, ResolvedLogos, SectionKind,
};
pub use domain::ports::{ConfigProvider, ContentRepository};
pub use utils::error::{AggregateError, Result};
