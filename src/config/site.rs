use crate::config::{DEFAULT_FALLBACK_LOGO_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AggregateError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub api: ApiConfig,
    pub media: Option<MediaConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub fallback_logo_url: Option<String>,
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AggregateError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AggregateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values; unset
    /// variables are left as-is so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }

        if let Some(media) = &self.media {
            if let Some(fallback) = &media.fallback_logo_url {
                validation::validate_non_empty_string("media.fallback_logo_url", fallback)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for SiteConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn fallback_logo_url(&self) -> &str {
        self.media
            .as_ref()
            .and_then(|media| media.fallback_logo_url.as_deref())
            .unwrap_or(DEFAULT_FALLBACK_LOGO_URL)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
