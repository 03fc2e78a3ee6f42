use actix_web::{HttpResponse, Responder, http::StatusCode, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::constants::{HEALTH_PROBE_TIMEOUT_SECS, JSON_CONTENT_TYPE};
use crate::sitemap::SitemapService;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthCatalogCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub catalog: HealthCatalogCheck,
    pub response_time_ms: u64,
}

/// Health Service
///
/// 只做一次轻量目录查询，不渲染任何 sitemap。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        service: web::Data<Arc<SitemapService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = service.backend_name().to_string();
        let catalog = match tokio::time::timeout(
            Duration::from_secs(HEALTH_PROBE_TIMEOUT_SECS),
            service.probe(),
        )
        .await
        {
            Ok(Ok(())) => HealthCatalogCheck {
                status: "healthy".to_string(),
                backend,
                error: None,
            },
            Ok(Err(e)) => {
                error!("Catalog health check failed: {}", e);
                HealthCatalogCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some(format!("catalog error: {}", e.message())),
                }
            }
            Err(_) => {
                error!("Catalog health check timeout");
                HealthCatalogCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let is_healthy = catalog.status == "healthy";

        let health = HealthResponse {
            status: catalog.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime,
            catalog,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            health.status
        );

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        HttpResponse::build(status)
            .insert_header(("Content-Type", JSON_CONTENT_TYPE))
            .json(health)
    }

    // 活跃性检查，只确认进程在运行
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
