use crate::config::{DEFAULT_FALLBACK_LOGO_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cms-aggregator")]
#[command(about = "Aggregates one CMS page into a single normalized document")]
pub struct CliConfig {
    /// Slug of the page to aggregate
    pub slug: String,

    #[arg(long, default_value = "http://localhost:1337")]
    pub api_base_url: String,

    /// Optional TOML site-config file; overrides the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_FALLBACK_LOGO_URL)]
    pub fallback_logo_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn fallback_logo_url(&self) -> &str {
        &self.fallback_logo_url
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_slug("slug", &self.slug)?;
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_non_empty_string("fallback_logo_url", &self.fallback_logo_url)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}
