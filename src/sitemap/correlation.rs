//! Airline correlation engine
//!
//! Derives `airline -> routes` and `airline -> airports` from a bounded,
//! id-ordered sample of flight legs per airline. Airlines with more legs than
//! the cap may under-report rare routes; the sitemap accepts that
//! approximation in exchange for bounded latency.
//!
//! The arena lives for one pipeline run and is dropped with it.

use std::collections::{BTreeMap, BTreeSet};

use futures_util::{StreamExt, stream};
use tracing::{debug, warn};

use crate::storage::{CatalogReader, FlightLeg, RouteKey};
use crate::utils::{normalize_airline_code, normalize_optional_airport_code};

/// 单个航司的派生关系
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirlineRelations {
    pub routes: BTreeSet<RouteKey>,
    pub airports: BTreeSet<String>,
    pub sampled_legs: usize,
    pub skipped_legs: usize,
}

impl AirlineRelations {
    pub fn from_legs(legs: &[FlightLeg]) -> Self {
        let mut relations = Self {
            sampled_legs: legs.len(),
            ..Default::default()
        };
        for leg in legs {
            let origin = normalize_optional_airport_code(leg.origin_iata.as_deref());
            let destination = normalize_optional_airport_code(leg.destination_iata.as_deref());
            match (origin, destination) {
                (Some(origin), Some(destination)) => {
                    relations.airports.insert(origin.clone());
                    relations.airports.insert(destination.clone());
                    relations.routes.insert(RouteKey::new(origin, destination));
                }
                _ => relations.skipped_legs += 1,
            }
        }
        relations
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.airports.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationArena {
    relations: BTreeMap<String, AirlineRelations>,
    failed: BTreeSet<String>,
}

impl CorrelationArena {
    /// 按航司代码升序
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AirlineRelations)> {
        self.relations.iter()
    }

    pub fn get(&self, airline: &str) -> Option<&AirlineRelations> {
        self.relations.get(airline)
    }

    pub fn serves_route(&self, airline: &str, route: &RouteKey) -> bool {
        self.get(airline).is_some_and(|r| r.routes.contains(route))
    }

    pub fn serves_airport(&self, airline: &str, iata: &str) -> bool {
        self.get(airline).is_some_and(|r| r.airports.contains(iata))
    }

    /// 采样查询失败的航司（关系已降级为空）
    pub fn failed_airlines(&self) -> &BTreeSet<String> {
        &self.failed
    }

    pub fn airline_count(&self) -> usize {
        self.relations.len()
    }

    pub fn route_link_count(&self) -> usize {
        self.relations.values().map(|r| r.routes.len()).sum()
    }

    pub fn airport_link_count(&self) -> usize {
        self.relations.values().map(|r| r.airports.len()).sum()
    }
}

pub struct CorrelationEngine<'a> {
    catalog: &'a dyn CatalogReader,
    leg_sample_cap: u64,
    concurrency: usize,
}

impl<'a> CorrelationEngine<'a> {
    pub fn new(catalog: &'a dyn CatalogReader, leg_sample_cap: u64, concurrency: usize) -> Self {
        Self {
            catalog,
            leg_sample_cap,
            concurrency: concurrency.max(1),
        }
    }

    /// 每个航司一次有界子查询，最多 `concurrency` 个同时进行
    pub async fn correlate<I, S>(&self, airlines: I) -> CorrelationArena
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: BTreeSet<String> = airlines
            .into_iter()
            .filter_map(|code| normalize_airline_code(code.as_ref()))
            .collect();

        let catalog = self.catalog;
        let cap = self.leg_sample_cap;
        let results: Vec<_> = stream::iter(codes)
            .map(|code| async move {
                let legs = catalog.sample_legs(&code, cap).await;
                (code, legs)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut arena = CorrelationArena::default();
        for (code, legs) in results {
            let relations = match legs {
                Ok(legs) => AirlineRelations::from_legs(&legs),
                Err(e) => {
                    warn!(
                        "Leg sample for airline {} failed, treating as empty: {}",
                        code,
                        e.message()
                    );
                    arena.failed.insert(code.clone());
                    AirlineRelations::default()
                }
            };
            if relations.skipped_legs > 0 {
                debug!(
                    "Airline {}: skipped {}/{} legs with missing endpoints",
                    code, relations.skipped_legs, relations.sampled_legs
                );
            }
            arena.relations.insert(code, relations);
        }

        debug!(
            "Correlated {} airlines: {} route links, {} airport links, {} failed",
            arena.airline_count(),
            arena.route_link_count(),
            arena.airport_link_count(),
            arena.failed.len()
        );
        arena
    }
}
