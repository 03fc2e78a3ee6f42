//! Sitemap pipeline
//!
//! One parameterized computation per `(kind, part)`: load a catalog snapshot,
//! correlate airlines when a derived kind needs it, evaluate every candidate
//! through the shared policy, sort into the canonical order, then slice and
//! render. Nothing is cached between runs.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::correlation::{CorrelationArena, CorrelationEngine};
use super::entity::{EntityKey, EntityKind};
use super::indexability::{
    Decision, Entity, IndexabilityPolicy, PolicyContext, StandardPolicy, parse_flights_per_day,
};
use super::lastmod::LastmodClock;
use super::partition::{part_count, partition};
use super::render::{render_minimal, render_sitemap_index, render_urlset};
use super::role::HubSet;
use super::url::{
    ChangeFreq, STATIC_SITEMAP_PATH, SitemapIndexEntry, SitemapUrl, airline_airport_path,
    airline_route_path, airport_path, part_path, route_path,
};
use crate::config::{DerivedLinkGate, SitemapConfig};
use crate::errors::Result;
use crate::storage::{Airport, CatalogReader, Route, RouteKey};

/// 回退页和类目页的优先级
pub const FALLBACK_PRIORITY: f32 = 0.8;
const HOME_PRIORITY: f32 = 1.0;
const CATEGORY_PRIORITY: f32 = 0.9;

#[derive(Debug, Clone)]
pub struct SitemapSettings {
    pub base_url: String,
    pub part_size: usize,
    pub hub_top_k: usize,
    pub leg_sample_cap: u64,
    pub concurrency: usize,
    pub default_lastmod_age_days: i64,
    pub fresh_window_days: i64,
    pub gate: DerivedLinkGate,
    pub request_budget: Duration,
}

impl From<&SitemapConfig> for SitemapSettings {
    fn from(config: &SitemapConfig) -> Self {
        Self {
            base_url: config.normalized_base_url(),
            part_size: config.effective_part_size(),
            hub_top_k: config.hub_top_k,
            leg_sample_cap: config.leg_sample_cap,
            concurrency: config.effective_concurrency(),
            default_lastmod_age_days: config.default_lastmod_age_days,
            fresh_window_days: config.fresh_window_days,
            gate: config.derived_link_gate,
            request_budget: Duration::from_secs(config.request_budget_secs),
        }
    }
}

impl Default for SitemapSettings {
    fn default() -> Self {
        Self::from(&SitemapConfig::default())
    }
}

/// 规范排序键：分组升序，权重降序，然后按主、次键升序
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    group: String,
    weight: Reverse<u64>,
    primary: String,
    secondary: String,
}

impl SortKey {
    fn weighted(weight: u64, primary: &str, secondary: &str) -> Self {
        Self {
            group: String::new(),
            weight: Reverse(weight),
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }

    fn grouped(group: &str, primary: &str, secondary: &str) -> Self {
        Self {
            group: group.to_string(),
            weight: Reverse(0),
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }
}

/// 单次运行的目录快照
#[derive(Default)]
struct Snapshot {
    ctx: PolicyContext,
    airports: Vec<Airport>,
    routes: Vec<Route>,
    arena: CorrelationArena,
}

pub struct SitemapService {
    catalog: Arc<dyn CatalogReader>,
    policy: Arc<dyn IndexabilityPolicy>,
    settings: SitemapSettings,
}

impl SitemapService {
    pub fn new(catalog: Arc<dyn CatalogReader>, settings: SitemapSettings) -> Self {
        Self {
            catalog,
            policy: Arc::new(StandardPolicy),
            settings,
        }
    }

    pub fn settings(&self) -> &SitemapSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.catalog.backend_name()
    }

    /// 一次轻量查询，确认目录可读
    pub async fn probe(&self) -> Result<()> {
        self.catalog.top_airports_by_departures(1).await.map(|_| ())
    }

    pub fn clock_at(&self, now: DateTime<Utc>) -> LastmodClock {
        LastmodClock::new(
            now,
            self.settings.default_lastmod_age_days,
            self.settings.fresh_window_days,
        )
    }

    fn clock(&self) -> LastmodClock {
        self.clock_at(Utc::now())
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    // ========== 上下文与快照 ==========

    async fn load_context(&self) -> Result<PolicyContext> {
        let hubs = self
            .catalog
            .top_airports_by_departures(self.settings.hub_top_k)
            .await?;
        let route_origins = self.catalog.route_origins().await?;
        Ok(PolicyContext {
            hubs: HubSet::new(hubs),
            route_origins,
            gate: self.settings.gate,
        })
    }

    fn correlation_engine(&self) -> CorrelationEngine<'_> {
        CorrelationEngine::new(
            self.catalog.as_ref(),
            self.settings.leg_sample_cap,
            self.settings.concurrency,
        )
    }

    async fn load_snapshot(&self, kinds: &[EntityKind]) -> Result<Snapshot> {
        let needs = |wanted: &[EntityKind]| kinds.iter().any(|k| wanted.contains(k));

        let mut snapshot = Snapshot {
            ctx: self.load_context().await?,
            ..Default::default()
        };
        if needs(&[EntityKind::Airports, EntityKind::AirlineAirports]) {
            snapshot.airports = self.catalog.load_airports().await?;
        }
        if needs(&[EntityKind::Routes, EntityKind::AirlineRoutes]) {
            snapshot.routes = self.catalog.load_routes().await?;
        }
        if needs(&[EntityKind::AirlineRoutes, EntityKind::AirlineAirports]) {
            let airlines = self.catalog.load_airlines().await?;
            snapshot.arena = self
                .correlation_engine()
                .correlate(airlines.iter().map(|a| a.iata.as_str()))
                .await;
        }
        Ok(snapshot)
    }

    // ========== 候选 URL ==========

    fn entry(&self, path: String, kind: EntityKind, lastmod: chrono::NaiveDate, priority: f32) -> SitemapUrl {
        SitemapUrl {
            loc: self.absolute(&path),
            lastmod: Some(lastmod),
            changefreq: kind.changefreq(),
            priority,
        }
    }

    fn build_urls(&self, kind: EntityKind, snapshot: &Snapshot, clock: &LastmodClock) -> Vec<SitemapUrl> {
        let ctx = &snapshot.ctx;
        let mut ranked: Vec<(SortKey, SitemapUrl)> = Vec::new();
        let mut admit = |entity: Entity<'_>, sort_key: SortKey, path: String, updated_at| {
            let decision = self.policy.evaluate(&entity, ctx);
            if decision.is_indexable() {
                let url = self.entry(path, kind, clock.resolve(updated_at), decision.priority);
                ranked.push((sort_key, url));
            }
        };

        match kind {
            EntityKind::Airports => {
                for airport in &snapshot.airports {
                    admit(
                        Entity::Airport(airport),
                        SortKey::weighted(airport.departure_count, &airport.iata, ""),
                        airport_path(&airport.iata),
                        airport.updated_at,
                    );
                }
            }
            EntityKind::Routes => {
                for route in &snapshot.routes {
                    admit(
                        Entity::Route(route),
                        SortKey::weighted(
                            parse_flights_per_day(route.flights_per_day.as_deref()),
                            &route.origin_iata,
                            &route.destination_iata,
                        ),
                        route_path(&route.key()),
                        route.updated_at,
                    );
                }
            }
            EntityKind::AirlineRoutes => {
                let by_key: BTreeMap<RouteKey, &Route> =
                    snapshot.routes.iter().map(|r| (r.key(), r)).collect();
                for (airline, relations) in snapshot.arena.iter() {
                    for key in &relations.routes {
                        let base = by_key.get(key).copied();
                        admit(
                            Entity::AirlineRoute {
                                airline,
                                route: key,
                                base,
                            },
                            SortKey::grouped(airline, &key.origin, &key.destination),
                            airline_route_path(airline, key),
                            base.and_then(|r| r.updated_at),
                        );
                    }
                }
            }
            EntityKind::AirlineAirports => {
                let by_code: BTreeMap<&str, &Airport> = snapshot
                    .airports
                    .iter()
                    .map(|a| (a.iata.as_str(), a))
                    .collect();
                for (airline, relations) in snapshot.arena.iter() {
                    for iata in &relations.airports {
                        let base = by_code.get(iata.as_str()).copied();
                        admit(
                            Entity::AirlineAirport {
                                airline,
                                iata,
                                base,
                            },
                            SortKey::grouped(airline, iata, ""),
                            airline_airport_path(airline, iata),
                            base.and_then(|a| a.updated_at),
                        );
                    }
                }
            }
        }

        ranked.sort_by(|a, b| a.0.cmp(&b.0));
        let mut seen = BTreeSet::new();
        ranked
            .into_iter()
            .filter(|(_, url)| seen.insert(url.loc.clone()))
            .map(|(_, url)| url)
            .collect()
    }

    /// 某类实体的全部可索引 URL，按规范顺序
    pub async fn collect_urls(&self, kind: EntityKind, clock: &LastmodClock) -> Result<Vec<SitemapUrl>> {
        let snapshot = self.load_snapshot(&[kind]).await?;
        Ok(self.build_urls(kind, &snapshot, clock))
    }

    fn fallback_url(&self, kind: EntityKind, clock: &LastmodClock) -> SitemapUrl {
        SitemapUrl {
            loc: self.absolute(kind.category_root()),
            lastmod: Some(clock.default_date()),
            changefreq: ChangeFreq::Daily,
            priority: FALLBACK_PRIORITY,
        }
    }

    // ========== 渲染 ==========

    pub async fn render_sitemap_part(&self, kind: EntityKind, part_index: usize) -> Result<String> {
        self.render_sitemap_part_at(kind, part_index, &self.clock()).await
    }

    pub async fn render_sitemap_part_at(
        &self,
        kind: EntityKind,
        part_index: usize,
        clock: &LastmodClock,
    ) -> Result<String> {
        let started = Instant::now();
        let urls = self.collect_urls(kind, clock).await?;
        let slice = partition(&urls, part_index, self.settings.part_size);

        let body = if slice.is_empty() {
            info!(
                "Sitemap {}-{} is empty ({} urls total), emitting fallback",
                kind, part_index, urls.len()
            );
            render_urlset(&[self.fallback_url(kind, clock)])?
        } else {
            render_urlset(slice)?
        };

        self.check_budget(&format!("{}-{}", kind, part_index), started);
        Ok(body)
    }

    pub async fn render_index(&self) -> Result<String> {
        self.render_index_at(&self.clock()).await
    }

    /// 静态 sitemap 在前，其后每类至少一片
    pub async fn render_index_at(&self, clock: &LastmodClock) -> Result<String> {
        let started = Instant::now();
        let snapshot = self.load_snapshot(&EntityKind::ALL).await?;
        let lastmod = Some(clock.default_date());

        let mut entries = vec![SitemapIndexEntry {
            loc: self.absolute(STATIC_SITEMAP_PATH),
            lastmod,
        }];
        for kind in EntityKind::ALL {
            let total = self.build_urls(kind, &snapshot, clock).len();
            let parts = part_count(total, self.settings.part_size);
            debug!("Sitemap index: {} has {} urls in {} parts", kind, total, parts);
            entries.extend((1..=parts).map(|part| SitemapIndexEntry {
                loc: self.absolute(&part_path(kind.slug(), part)),
                lastmod,
            }));
        }

        let body = render_sitemap_index(&entries)?;
        self.check_budget("index", started);
        Ok(body)
    }

    pub fn render_static(&self) -> Result<String> {
        self.render_static_at(&self.clock())
    }

    pub fn render_static_at(&self, clock: &LastmodClock) -> Result<String> {
        let lastmod = Some(clock.default_date());
        let mut urls = vec![SitemapUrl {
            loc: self.absolute("/"),
            lastmod,
            changefreq: ChangeFreq::Daily,
            priority: HOME_PRIORITY,
        }];
        let mut roots: Vec<&str> = EntityKind::ALL.iter().map(|k| k.category_root()).collect();
        roots.dedup();
        urls.extend(roots.into_iter().map(|root| SitemapUrl {
            loc: self.absolute(root),
            lastmod,
            changefreq: ChangeFreq::Daily,
            priority: CATEGORY_PRIORITY,
        }));
        render_urlset(&urls)
    }

    /// 顶层兜底：任何失败都返回合法的最小文档
    pub fn render_failsafe(&self, kind: Option<EntityKind>) -> String {
        let path = kind.map_or("/", |k| k.category_root());
        render_minimal(&self.absolute(path))
    }

    fn check_budget(&self, what: &str, started: Instant) {
        let elapsed = started.elapsed();
        if elapsed > self.settings.request_budget {
            warn!(
                "Sitemap {} took {:?}, over the {:?} budget",
                what, elapsed, self.settings.request_budget
            );
        } else {
            debug!("Sitemap {} rendered in {:?}", what, elapsed);
        }
    }

    // ========== 单实体判定 ==========

    /// 页面层使用的判定，与 sitemap 同一策略。实体不存在时返回 `None`。
    pub async fn decide(&self, key: &EntityKey) -> Result<Option<Decision>> {
        let kind = key.kind();
        match key {
            EntityKey::Airport(iata) => {
                let Some(airport) = self.catalog.find_airport(iata).await? else {
                    return Ok(None);
                };
                let ctx = self.load_context().await?;
                Ok(Some(self.policy.evaluate(&Entity::Airport(&airport), &ctx)))
            }
            EntityKey::Route(route_key) => {
                let Some(route) = self.catalog.find_route(route_key).await? else {
                    return Ok(None);
                };
                let ctx = self.load_context().await?;
                Ok(Some(self.policy.evaluate(&Entity::Route(&route), &ctx)))
            }
            EntityKey::AirlineRoute { airline, route } => {
                if self.catalog.find_airline(airline).await?.is_none() {
                    return Ok(None);
                }
                let arena = self.correlation_engine().correlate([airline]).await;
                if !arena.serves_route(airline, route) {
                    return Ok(Some(Decision::excluded(kind, key.to_string())));
                }
                let base = self.catalog.find_route(route).await?;
                let ctx = self.load_context().await?;
                let entity = Entity::AirlineRoute {
                    airline,
                    route,
                    base: base.as_ref(),
                };
                Ok(Some(self.policy.evaluate(&entity, &ctx)))
            }
            EntityKey::AirlineAirport { airline, iata } => {
                if self.catalog.find_airline(airline).await?.is_none() {
                    return Ok(None);
                }
                let arena = self.correlation_engine().correlate([airline]).await;
                if !arena.serves_airport(airline, iata) {
                    return Ok(Some(Decision::excluded(kind, key.to_string())));
                }
                let base = self.catalog.find_airport(iata).await?;
                let ctx = self.load_context().await?;
                let entity = Entity::AirlineAirport {
                    airline,
                    iata,
                    base: base.as_ref(),
                };
                Ok(Some(self.policy.evaluate(&entity, &ctx)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::render::parse_entries;
    use crate::storage::MemoryCatalog;
    use chrono::TimeZone;

    fn clock(service: &SitemapService) -> LastmodClock {
        service.clock_at(Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap())
    }

    fn route(origin: &str, destination: &str, flights: &str) -> Route {
        Route {
            origin_iata: origin.to_string(),
            destination_iata: destination.to_string(),
            destination_city: destination.to_string(),
            flights_per_day: Some(flights.to_string()),
            has_flight_data: true,
            average_duration: Some("1h30m".to_string()),
            updated_at: None,
        }
    }

    fn service(catalog: MemoryCatalog) -> SitemapService {
        let settings = SitemapSettings {
            base_url: "https://example.com".to_string(),
            ..Default::default()
        };
        SitemapService::new(Arc::new(catalog), settings)
    }

    #[tokio::test]
    async fn test_routes_sorted_by_frequency_then_key() {
        let svc = service(MemoryCatalog::new().with_routes(vec![
            route("MAA", "BLR", "3 flights"),
            route("DEL", "BOM", "12 flights"),
            route("BOM", "GOI", "3-5 flights"),
            route("BLR", "MAA", "3 flights"),
        ]));
        let urls = svc.collect_urls(EntityKind::Routes, &clock(&svc)).await.unwrap();
        let locs: Vec<&str> = urls.iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com/flights/del-bom",
                "https://example.com/flights/bom-goi",
                "https://example.com/flights/blr-maa",
                "https://example.com/flights/maa-blr",
            ]
        );
    }

    #[tokio::test]
    async fn test_out_of_range_part_falls_back() {
        let svc = service(MemoryCatalog::new().with_routes(vec![route("DEL", "BOM", "12 flights")]));
        let xml = svc
            .render_sitemap_part_at(EntityKind::Routes, 2, &clock(&svc))
            .await
            .unwrap();
        let parsed = parse_entries(&xml).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].loc, "https://example.com/flights");
        assert_eq!(parsed[0].priority, Some(FALLBACK_PRIORITY));
    }

    #[tokio::test]
    async fn test_static_sitemap_lists_category_roots() {
        let svc = service(MemoryCatalog::new());
        let parsed = parse_entries(&svc.render_static_at(&clock(&svc)).unwrap()).unwrap();
        let locs: Vec<&str> = parsed.iter().map(|p| p.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com/",
                "https://example.com/airports",
                "https://example.com/flights",
                "https://example.com/airlines",
            ]
        );
        assert_eq!(parsed[0].priority, Some(1.0));
    }

    #[test]
    fn test_failsafe_points_at_category() {
        let svc = service(MemoryCatalog::new());
        assert!(
            svc.render_failsafe(Some(EntityKind::AirlineRoutes))
                .contains("<loc>https://example.com/airlines</loc>")
        );
        assert!(svc.render_failsafe(None).contains("<loc>https://example.com/</loc>"));
    }
}
