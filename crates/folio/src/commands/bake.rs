//! Static export command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use folio_index::{AssetIndex, ContentResolver};
use folio_static::{discover_custom_pages, SiteBaker, SiteRenderer};

use crate::config::SiteConfig;

/// Run the bake command.
pub async fn run(config: &SiteConfig, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Baking static site...");

    let index = Arc::new(AssetIndex::build_with(&config.paths.portfolio, &config.resolver_config()));
    let custom_pages = discover_custom_pages(&config.paths.custom_pages);
    let output_dir = output.unwrap_or_else(|| config.paths.output.clone());

    let renderer = SiteRenderer::new(
        Arc::clone(&index),
        ContentResolver::new(config.resolver_config()),
        config.site_settings(),
    );
    let baker = SiteBaker::new(config.bake_config(minify), renderer);

    let report = baker.bake(&index, &custom_pages, &output_dir)?;

    tracing::info!("Output: {}", report.output_dir.display());

    if !report.is_complete() {
        bail!(
            "{} of {} pages failed to bake",
            report.failures.len(),
            report.pages + report.failures.len()
        );
    }

    Ok(())
}
