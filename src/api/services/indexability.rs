//! Page-facing indexability decisions
//!
//! The page renderer asks here before emitting its robots meta tag, so pages
//! and sitemaps share one decision.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, trace};

use crate::errors::RoutemapError;
use crate::sitemap::{Decision, EntityKey, EntityKind, SitemapService};

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub decision: Decision,
    pub indexable: bool,
    pub robots: &'static str,
}

impl From<Decision> for DecisionResponse {
    fn from(decision: Decision) -> Self {
        Self {
            indexable: decision.is_indexable(),
            robots: decision.robots(),
            decision,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    error: String,
}

impl ErrorBody {
    fn from_error(err: &RoutemapError) -> Self {
        Self {
            code: err.code(),
            error: err.message().to_string(),
        }
    }
}

pub struct IndexabilityService;

impl IndexabilityService {
    pub async fn decide(
        path: web::Path<(String, String)>,
        service: web::Data<Arc<SitemapService>>,
    ) -> HttpResponse {
        let (kind, key) = path.into_inner();
        let kind = match kind.parse::<EntityKind>() {
            Ok(kind) => kind,
            Err(msg) => {
                trace!("Rejected indexability lookup: {}", msg);
                return HttpResponse::NotFound()
                    .json(ErrorBody::from_error(&RoutemapError::not_found(msg)));
            }
        };
        let key = match EntityKey::parse(kind, &key) {
            Ok(key) => key,
            Err(e) => return HttpResponse::NotFound().json(ErrorBody::from_error(&e)),
        };

        match service.decide(&key).await {
            Ok(Some(decision)) => HttpResponse::Ok().json(DecisionResponse::from(decision)),
            Ok(None) => HttpResponse::NotFound().json(ErrorBody::from_error(
                &RoutemapError::not_found(format!("{} '{}' not found", kind, key)),
            )),
            Err(e) => {
                error!("Indexability decision for {} {} failed: {}", kind, key, e);
                HttpResponse::ServiceUnavailable().json(ErrorBody::from_error(&e))
            }
        }
    }
}

/// Indexability 路由配置
pub fn indexability_routes() -> actix_web::Scope {
    web::scope("").route("/{kind}/{key}", web::get().to(IndexabilityService::decide))
}
