use clap::Parser;
use cms_aggregator::utils::{logger, validation::Validate};
use cms_aggregator::{
    CliConfig, ConfigProvider, HttpContentRepository, MediaResolver, PageAggregator, PageOutcome,
    SiteConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting cms-aggregator");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let aggregator = match build_aggregator(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            tracing::error!("❌ Could not set up the content repository: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match aggregator.get_page(&config.slug, None).await {
        Ok(PageOutcome::Found(page)) => {
            tracing::info!("✅ Page '{}' aggregated successfully", config.slug);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Ok(PageOutcome::NotFound { slug }) => {
            tracing::warn!("🔶 No page found for slug '{}'", slug);
            eprintln!("🔶 No page found for slug '{}'", slug);
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("❌ Page aggregation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn build_aggregator(
    config: &CliConfig,
) -> cms_aggregator::Result<PageAggregator<HttpContentRepository>> {
    if let Some(path) = &config.config {
        let site = SiteConfig::from_file(path)?;
        site.validate()?;
        let media = MediaResolver::new(site.api_base_url(), site.fallback_logo_url());
        Ok(PageAggregator::new(
            HttpContentRepository::from_config(&site)?,
            media,
        ))
    } else {
        let media = MediaResolver::new(config.api_base_url(), config.fallback_logo_url());
        Ok(PageAggregator::new(
            HttpContentRepository::from_config(config)?,
            media,
        ))
    }
}
