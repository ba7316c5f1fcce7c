//! Live server command.

use std::sync::Arc;

use anyhow::Result;
use folio_index::{AssetIndex, ContentResolver};
use folio_server::LiveServer;
use folio_static::SiteRenderer;

use crate::config::SiteConfig;

/// Run the live server.
pub async fn run(config: &SiteConfig, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting live server on port {}", port);

    let index = AssetIndex::build_with(&config.paths.portfolio, &config.resolver_config());

    let renderer = SiteRenderer::new(
        Arc::new(index),
        ContentResolver::new(config.resolver_config()),
        config.site_settings(),
    );

    LiveServer::new(config.server_config(port, open), Arc::new(renderer))
        .start()
        .await?;

    Ok(())
}
