//! Sitemap endpoints
//!
//! `/sitemap.xml`, `/sitemaps/static.xml` and `/sitemaps/{kind}-{part}.xml`.
//! A failing or panicking pipeline still answers 200 with a minimal urlset.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::FutureExt;
use tracing::{error, trace};
use xxhash_rust::xxh64::xxh64;

use crate::api::constants::{FAILSAFE_MAX_AGE_SECS, XML_CONTENT_TYPE};
use crate::config::get_config;
use crate::errors::Result;
use crate::sitemap::{EntityKind, SitemapService};

/// `/sitemaps/` 下的文档名（不含 `.xml`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapDocument {
    Static,
    Part { kind: EntityKind, part_index: usize },
}

impl SitemapDocument {
    pub fn parse(name: &str) -> Option<Self> {
        if name == "static" {
            return Some(Self::Static);
        }
        let (slug, part) = name.rsplit_once('-')?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::Part {
            kind: EntityKind::from_slug(slug)?,
            part_index: part.parse().ok()?,
        })
    }
}

/// 渲染结果：正常文档或兜底文档
struct Rendered {
    body: String,
    failsafe: bool,
}

async fn guarded<F>(what: &str, kind: Option<EntityKind>, service: &SitemapService, fut: F) -> Rendered
where
    F: Future<Output = Result<String>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(body)) => Rendered {
            body,
            failsafe: false,
        },
        Ok(Err(e)) => {
            error!("Sitemap {} failed, serving failsafe document: {}", what, e);
            Rendered {
                body: service.render_failsafe(kind),
                failsafe: true,
            }
        }
        Err(_) => {
            error!("Sitemap {} panicked, serving failsafe document", what);
            Rendered {
                body: service.render_failsafe(kind),
                failsafe: true,
            }
        }
    }
}

/// 强 ETag：响应体的 xxh64
pub fn etag_for(body: &str) -> String {
    format!("\"{:016x}\"", xxh64(body.as_bytes(), 0))
}

fn if_none_match_hits(req: &HttpRequest, etag: &str) -> bool {
    let Some(value) = req.headers().get(IF_NONE_MATCH).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    value
        .split(',')
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == "*" || tag == etag)
}

fn xml_response(req: &HttpRequest, rendered: Rendered) -> HttpResponse {
    let max_age = if rendered.failsafe {
        FAILSAFE_MAX_AGE_SECS
    } else {
        get_config().sitemap.cache_max_age_secs
    };
    let cache_control = format!("public, max-age={}", max_age);
    let etag = etag_for(&rendered.body);

    if if_none_match_hits(req, &etag) {
        trace!("ETag {} matched, returning 304", etag);
        return HttpResponse::NotModified()
            .insert_header((ETAG, etag))
            .insert_header((CACHE_CONTROL, cache_control))
            .finish();
    }

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, XML_CONTENT_TYPE))
        .insert_header((CACHE_CONTROL, cache_control))
        .insert_header((ETAG, etag))
        .body(rendered.body)
}

fn not_found_response() -> HttpResponse {
    HttpResponse::NotFound()
        .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
        .insert_header((CACHE_CONTROL, "public, max-age=60"))
        .body("Not Found")
}

pub struct SitemapHandlers;

impl SitemapHandlers {
    pub async fn sitemap_index(
        req: HttpRequest,
        service: web::Data<Arc<SitemapService>>,
    ) -> HttpResponse {
        let rendered = guarded("index", None, &service, service.render_index()).await;
        xml_response(&req, rendered)
    }

    pub async fn sitemap_document(
        req: HttpRequest,
        path: web::Path<String>,
        service: web::Data<Arc<SitemapService>>,
    ) -> HttpResponse {
        let name = path.into_inner();
        let rendered = match SitemapDocument::parse(&name) {
            Some(SitemapDocument::Static) => {
                guarded("static", None, &service, async { service.render_static() }).await
            }
            Some(SitemapDocument::Part { kind, part_index }) => {
                guarded(
                    &name,
                    Some(kind),
                    &service,
                    service.render_sitemap_part(kind, part_index),
                )
                .await
            }
            None => {
                trace!("Unknown sitemap document: {}", name);
                return not_found_response();
            }
        };
        xml_response(&req, rendered)
    }
}

/// Sitemap 路由配置
pub fn sitemap_routes() -> actix_web::Scope {
    web::scope("")
        .route("/sitemap.xml", web::get().to(SitemapHandlers::sitemap_index))
        .route("/sitemap.xml", web::head().to(SitemapHandlers::sitemap_index))
        .route(
            "/sitemaps/{name}.xml",
            web::get().to(SitemapHandlers::sitemap_document),
        )
        .route(
            "/sitemaps/{name}.xml",
            web::head().to(SitemapHandlers::sitemap_document),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_names() {
        assert_eq!(SitemapDocument::parse("static"), Some(SitemapDocument::Static));
        assert_eq!(
            SitemapDocument::parse("airline-routes-12"),
            Some(SitemapDocument::Part {
                kind: EntityKind::AirlineRoutes,
                part_index: 12
            })
        );
        assert_eq!(SitemapDocument::parse("routes-"), None);
        assert_eq!(SitemapDocument::parse("routes-+1"), None);
        assert_eq!(SitemapDocument::parse("routes-one"), None);
        assert_eq!(SitemapDocument::parse("blog-1"), None);
        assert_eq!(SitemapDocument::parse("airports"), None);
    }

    #[test]
    fn test_etag_is_stable() {
        assert_eq!(etag_for("<urlset/>"), etag_for("<urlset/>"));
        assert_ne!(etag_for("a"), etag_for("b"));
        assert_eq!(etag_for("a").len(), 18);
    }
}
