//! Server mode
//!
//! Configures and starts the HTTP server serving sitemaps, indexability
//! decisions and health probes.

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::api::middleware::TimingMiddleware;
use crate::api::services::{AppStartTime, health_routes, indexability_routes, sitemap_routes};
use crate::runtime::lifetime;
use crate::sitemap::SitemapService;

/// 路由注册，服务器与集成测试共用
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").service(health_routes()))
        .service(web::scope("/indexability").service(indexability_routes()))
        .service(sitemap_routes());
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_startup().await.map_err(|e| {
        tracing::error!("Server startup failed: {}", e);
        e
    })?;

    let sitemap: Arc<SitemapService> = startup.sitemap.clone();
    let db_for_shutdown = startup.storage.get_db().clone();

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware) // 记录请求延迟
            .wrap(Compress::default())
            .app_data(web::Data::new(sitemap.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
