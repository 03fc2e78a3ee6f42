//! Read-only query interface over the entity catalog and flight-leg store
//!
//! The sitemap pipeline only ever talks to this trait. `SeaOrmStorage` is the
//! production implementation; `MemoryCatalog` serves embedding and tests.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{Airline, Airport, FlightLeg, Route, RouteKey};

#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// 全部机场，按 IATA 升序
    async fn load_airports(&self) -> Result<Vec<Airport>>;

    /// 全部航线，按 (origin, destination) 升序
    async fn load_routes(&self) -> Result<Vec<Route>>;

    /// 全部航司，按代码升序
    async fn load_airlines(&self) -> Result<Vec<Airline>>;

    /// 出港量前 K 的机场代码（只取 departure_count > 0，并列按 IATA 升序）
    async fn top_airports_by_departures(&self, k: usize) -> Result<Vec<String>>;

    /// 至少有一条出港航线的机场（routes.origin_iata 去重）
    async fn route_origins(&self) -> Result<BTreeSet<String>>;

    /// 某航司的航段采样，按记录 id 升序，最多 `cap` 条
    async fn sample_legs(&self, airline_iata: &str, cap: u64) -> Result<Vec<FlightLeg>>;

    async fn find_airport(&self, iata: &str) -> Result<Option<Airport>>;

    async fn find_route(&self, key: &RouteKey) -> Result<Option<Route>>;

    async fn find_airline(&self, iata: &str) -> Result<Option<Airline>>;

    fn backend_name(&self) -> &str;
}
