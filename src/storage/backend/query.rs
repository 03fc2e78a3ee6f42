//! Catalog queries for SeaOrmStorage
//!
//! All operations are read-only. Malformed rows are logged and skipped so a
//! single bad record never fails a whole sitemap request.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func, IntoColumnRef};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::{debug, warn};

use super::converters::{model_to_airline, model_to_airport, model_to_leg, model_to_route};
use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::catalog::CatalogReader;
use crate::storage::models::{Airline, Airport, FlightLeg, Route, RouteKey};
use crate::utils::{normalize_airline_code, normalize_airport_code};

use migration::entities::{airline, airport, flight_leg, route};

/// 转换一批记录，非法记录记录诊断日志后跳过
fn keep_valid<M, T>(models: Vec<M>, convert: fn(M) -> Result<T>, what: &str) -> Vec<T> {
    let total = models.len();
    let valid: Vec<T> = models
        .into_iter()
        .filter_map(|model| match convert(model) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping malformed {} record: {}", what, e.message());
                None
            }
        })
        .collect();
    if valid.len() != total {
        debug!("Loaded {}/{} {} records", valid.len(), total, what);
    }
    valid
}

/// 目录中的代码列未必已规范化，查找时按 `UPPER(TRIM(col))` 比较
fn normalized(column: impl IntoColumnRef) -> Expr {
    Func::upper(Func::cust("TRIM").arg(Expr::col(column))).into()
}

#[async_trait]
impl CatalogReader for SeaOrmStorage {
    async fn load_airports(&self) -> Result<Vec<Airport>> {
        let db = &self.db;
        let models = retry::with_retry("load_airports", self.retry_config, || async {
            airport::Entity::find()
                .order_by_asc(airport::Column::Iata)
                .all(db)
                .await
        })
        .await?;
        Ok(keep_valid(models, model_to_airport, "airport"))
    }

    async fn load_routes(&self) -> Result<Vec<Route>> {
        let db = &self.db;
        let models = retry::with_retry("load_routes", self.retry_config, || async {
            route::Entity::find()
                .order_by_asc(route::Column::OriginIata)
                .order_by_asc(route::Column::DestinationIata)
                .all(db)
                .await
        })
        .await?;
        Ok(keep_valid(models, model_to_route, "route"))
    }

    async fn load_airlines(&self) -> Result<Vec<Airline>> {
        let db = &self.db;
        let models = retry::with_retry("load_airlines", self.retry_config, || async {
            airline::Entity::find()
                .order_by_asc(airline::Column::Iata)
                .all(db)
                .await
        })
        .await?;
        Ok(keep_valid(models, model_to_airline, "airline"))
    }

    async fn top_airports_by_departures(&self, k: usize) -> Result<Vec<String>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let db = &self.db;
        let codes = retry::with_retry("top_airports_by_departures", self.retry_config, || async {
            airport::Entity::find()
                .select_only()
                .column(airport::Column::Iata)
                .filter(airport::Column::DepartureCount.gt(0))
                .order_by_desc(airport::Column::DepartureCount)
                .order_by_asc(airport::Column::Iata)
                .limit(k as u64)
                .into_tuple::<String>()
                .all(db)
                .await
        })
        .await?;
        Ok(codes
            .iter()
            .filter_map(|code| normalize_airport_code(code))
            .collect())
    }

    async fn route_origins(&self) -> Result<BTreeSet<String>> {
        let db = &self.db;
        let origins = retry::with_retry("route_origins", self.retry_config, || async {
            route::Entity::find()
                .select_only()
                .column(route::Column::OriginIata)
                .distinct()
                .into_tuple::<String>()
                .all(db)
                .await
        })
        .await?;
        Ok(origins
            .iter()
            .filter_map(|code| normalize_airport_code(code))
            .collect())
    }

    async fn sample_legs(&self, airline_iata: &str, cap: u64) -> Result<Vec<FlightLeg>> {
        let Some(code) = normalize_airline_code(airline_iata) else {
            return Ok(Vec::new());
        };
        let db = &self.db;
        let operation = format!("sample_legs({})", code);
        let models = retry::with_retry(&operation, self.retry_config, || async {
            flight_leg::Entity::find()
                .filter(normalized(flight_leg::Column::AirlineIata).eq(code.clone()))
                .order_by_asc(flight_leg::Column::Id)
                .limit(cap)
                .all(db)
                .await
        })
        .await?;
        Ok(models.into_iter().map(model_to_leg).collect())
    }

    async fn find_airport(&self, iata: &str) -> Result<Option<Airport>> {
        let Some(code) = normalize_airport_code(iata) else {
            return Ok(None);
        };
        let db = &self.db;
        let models = retry::with_retry("find_airport", self.retry_config, || async {
            airport::Entity::find()
                .filter(normalized(airport::Column::Iata).eq(code.clone()))
                .order_by_asc(airport::Column::Iata)
                .all(db)
                .await
        })
        .await?;
        Ok(keep_valid(models, model_to_airport, "airport").into_iter().next())
    }

    async fn find_route(&self, key: &RouteKey) -> Result<Option<Route>> {
        let db = &self.db;
        let models = retry::with_retry("find_route", self.retry_config, || async {
            route::Entity::find()
                .filter(normalized(route::Column::OriginIata).eq(key.origin.clone()))
                .filter(normalized(route::Column::DestinationIata).eq(key.destination.clone()))
                .order_by_asc(route::Column::OriginIata)
                .order_by_asc(route::Column::DestinationIata)
                .all(db)
                .await
        })
        .await?;
        Ok(keep_valid(models, model_to_route, "route").into_iter().next())
    }

    async fn find_airline(&self, iata: &str) -> Result<Option<Airline>> {
        let Some(code) = normalize_airline_code(iata) else {
            return Ok(None);
        };
        let db = &self.db;
        let models = retry::with_retry("find_airline", self.retry_config, || async {
            airline::Entity::find()
                .filter(normalized(airline::Column::Iata).eq(code.clone()))
                .order_by_asc(airline::Column::Iata)
                .all(db)
                .await
        })
        .await?;
        Ok(keep_valid(models, model_to_airline, "airline").into_iter().next())
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
