use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::get_config;
use crate::sitemap::{SitemapService, SitemapSettings};
use crate::storage::{CatalogReader, SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub sitemap: Arc<SitemapService>,
}

impl StartupContext {
    pub fn settings(&self) -> &SitemapSettings {
        self.sitemap.settings()
    }
}

/// 准备启动上下文：连接目录数据库并构建 sitemap 服务
pub async fn prepare_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();
    let storage = StorageFactory::create()
        .await
        .context("Failed to open the catalog database")?;
    info!(
        "Catalog backend: {} ({})",
        storage.backend_name(),
        config.database.database_url
    );

    let settings = SitemapSettings::from(&config.sitemap);
    info!(
        "Sitemap settings: base_url={}, part_size={}, hub_top_k={}, leg_sample_cap={}, concurrency={}, gate={}",
        settings.base_url,
        settings.part_size,
        settings.hub_top_k,
        settings.leg_sample_cap,
        settings.concurrency,
        settings.gate
    );

    let catalog: Arc<dyn CatalogReader> = storage.clone();
    let sitemap = Arc::new(SitemapService::new(catalog, settings));

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(StartupContext { storage, sitemap })
}
