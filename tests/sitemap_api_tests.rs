//! HTTP API integration tests
//!
//! Sitemap, indexability and health endpoints through `actix_web::test`.

use std::collections::BTreeSet;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use serde_json::Value;

use routemap::api::services::AppStartTime;
use routemap::errors::{Result, RoutemapError};
use routemap::runtime::modes::server::configure_routes;
use routemap::sitemap::{SitemapService, SitemapSettings};
use routemap::storage::{
    Airline, Airport, CatalogReader, FlightLeg, MemoryCatalog, Route, RouteKey,
};

// =============================================================================
// 测试环境
// =============================================================================

/// 目录故障模式
#[derive(Clone, Copy)]
enum Fault {
    Error,
    Panic,
}

struct FaultyCatalog {
    fault: Fault,
}

impl FaultyCatalog {
    fn fail<T>(&self) -> Result<T> {
        match self.fault {
            Fault::Error => Err(RoutemapError::database_connection("catalog unreachable")),
            Fault::Panic => panic!("catalog driver bug"),
        }
    }
}

#[async_trait]
impl CatalogReader for FaultyCatalog {
    async fn load_airports(&self) -> Result<Vec<Airport>> {
        self.fail()
    }

    async fn load_routes(&self) -> Result<Vec<Route>> {
        self.fail()
    }

    async fn load_airlines(&self) -> Result<Vec<Airline>> {
        self.fail()
    }

    async fn top_airports_by_departures(&self, _k: usize) -> Result<Vec<String>> {
        self.fail()
    }

    async fn route_origins(&self) -> Result<BTreeSet<String>> {
        self.fail()
    }

    async fn sample_legs(&self, _airline_iata: &str, _cap: u64) -> Result<Vec<FlightLeg>> {
        self.fail()
    }

    async fn find_airport(&self, _iata: &str) -> Result<Option<Airport>> {
        self.fail()
    }

    async fn find_route(&self, _key: &RouteKey) -> Result<Option<Route>> {
        self.fail()
    }

    async fn find_airline(&self, _iata: &str) -> Result<Option<Airline>> {
        self.fail()
    }

    fn backend_name(&self) -> &str {
        "faulty"
    }
}

fn route(origin: &str, destination: &str, has_flight_data: bool) -> Route {
    Route {
        origin_iata: origin.to_string(),
        destination_iata: destination.to_string(),
        destination_city: destination.to_string(),
        flights_per_day: has_flight_data.then(|| "8 flights".to_string()),
        has_flight_data,
        average_duration: Some("2h10m".to_string()),
        updated_at: None,
    }
}

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new().with_routes(vec![
        route("DEL", "BOM", true),
        route("XYZ", "ABC", false),
    ])
}

fn service(catalog: impl CatalogReader + 'static) -> Arc<SitemapService> {
    let settings = SitemapSettings {
        base_url: "https://fly.example".to_string(),
        ..Default::default()
    };
    Arc::new(SitemapService::new(Arc::new(catalog), settings))
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(configure_routes),
        )
        .await
    };
}

fn header(resp: &actix_web::dev::ServiceResponse, name: actix_web::http::header::HeaderName) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Sitemap 端点
// =============================================================================

#[actix_rt::test]
async fn test_sitemap_part_headers_and_body() {
    let app = app!(service(catalog()));
    let req = TestRequest::get().uri("/sitemaps/routes-1.xml").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, CONTENT_TYPE), "application/xml; charset=utf-8");
    assert_eq!(header(&resp, CACHE_CONTROL), "public, max-age=3600");
    assert!(header(&resp, ETAG).starts_with('"'));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<loc>https://fly.example/flights/del-bom</loc>"));
    assert!(!body.contains("xyz-abc"));
}

#[actix_rt::test]
async fn test_conditional_request_returns_304() {
    let app = app!(service(catalog()));
    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/sitemaps/routes-1.xml").to_request(),
    )
    .await;
    let etag = header(&resp, ETAG);

    let req = TestRequest::get()
        .uri("/sitemaps/routes-1.xml")
        .insert_header((IF_NONE_MATCH, etag.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(header(&resp, ETAG), etag);

    let req = TestRequest::get()
        .uri("/sitemaps/routes-1.xml")
        .insert_header((IF_NONE_MATCH, "\"0000000000000000\""))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_unknown_documents_are_404() {
    let app = app!(service(catalog()));
    for uri in [
        "/sitemaps/blog-1.xml",
        "/sitemaps/routes-one.xml",
        "/sitemaps/routes.xml",
        "/sitemaps/routes-1.json",
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_index_and_static_documents() {
    let app = app!(service(catalog()));

    let resp = test::call_service(&app, TestRequest::get().uri("/sitemap.xml").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
    assert!(body.contains("<loc>https://fly.example/sitemaps/static.xml</loc>"));
    assert!(body.contains("<loc>https://fly.example/sitemaps/airline-airports-1.xml</loc>"));

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/sitemaps/static.xml").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<loc>https://fly.example/flights</loc>"));

    let resp = test::call_service(&app, TestRequest::default().method(actix_web::http::Method::HEAD).uri("/sitemap.xml").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_backend_error_serves_failsafe() {
    let app = app!(service(FaultyCatalog { fault: Fault::Error }));
    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/sitemaps/airline-routes-3.xml").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, CACHE_CONTROL), "public, max-age=60");
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<urlset"));
    assert!(body.contains("<loc>https://fly.example/airlines</loc>"));
}

#[actix_rt::test]
async fn test_panic_serves_failsafe() {
    let app = app!(service(FaultyCatalog { fault: Fault::Panic }));
    let resp = test::call_service(&app, TestRequest::get().uri("/sitemap.xml").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<url>"));
    assert!(body.contains("<loc>https://fly.example/</loc>"));
}

// =============================================================================
// Indexability 端点
// =============================================================================

#[actix_rt::test]
async fn test_indexability_decisions() {
    let app = app!(service(catalog()));

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/indexability/routes/del-bom").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["entity_kind"], "routes");
    assert_eq!(json["entity_key"], "DEL-BOM");
    assert_eq!(json["quality_score"], 4);
    assert_eq!(json["indexable"], true);
    assert_eq!(json["robots"], "index, follow");

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/indexability/routes/XYZ-ABC").to_request(),
    )
    .await;
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["indexable"], false);
    assert_eq!(json["robots"], "noindex, follow");
}

#[actix_rt::test]
async fn test_indexability_unknown_is_404() {
    let app = app!(service(catalog()));
    for uri in [
        "/indexability/routes/MAA-BLR",
        "/indexability/routes/garbage",
        "/indexability/blog/DEL",
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

// =============================================================================
// Health 端点
// =============================================================================

#[actix_rt::test]
async fn test_health_reports_catalog_status() {
    let app = app!(service(catalog()));
    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["catalog"]["backend"], "memory");

    let app = app!(service(FaultyCatalog { fault: Fault::Error }));
    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
