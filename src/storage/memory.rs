//! In-memory catalog
//!
//! Holds already-validated domain records. Insertion order of legs stands in
//! for the leg id, so sampling is deterministic.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::catalog::CatalogReader;
use crate::storage::models::{Airline, Airport, FlightLeg, Route, RouteKey};
use crate::utils::{normalize_airline_code, normalize_airport_code};

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    airports: Vec<Airport>,
    routes: Vec<Route>,
    airlines: Vec<Airline>,
    legs: Vec<FlightLeg>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_airports(mut self, airports: impl IntoIterator<Item = Airport>) -> Self {
        self.airports.extend(airports);
        self.airports.sort_by(|a, b| a.iata.cmp(&b.iata));
        self
    }

    pub fn with_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self.routes.sort_by_key(|r| r.key());
        self
    }

    pub fn with_airlines(mut self, airlines: impl IntoIterator<Item = Airline>) -> Self {
        self.airlines.extend(airlines);
        self.airlines.sort_by(|a, b| a.iata.cmp(&b.iata));
        self
    }

    pub fn with_legs(mut self, legs: impl IntoIterator<Item = FlightLeg>) -> Self {
        self.legs.extend(legs);
        self
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn load_airports(&self) -> Result<Vec<Airport>> {
        Ok(self.airports.clone())
    }

    async fn load_routes(&self) -> Result<Vec<Route>> {
        Ok(self.routes.clone())
    }

    async fn load_airlines(&self) -> Result<Vec<Airline>> {
        Ok(self.airlines.clone())
    }

    async fn top_airports_by_departures(&self, k: usize) -> Result<Vec<String>> {
        let mut ranked: Vec<&Airport> = self
            .airports
            .iter()
            .filter(|a| a.departure_count > 0)
            .collect();
        ranked.sort_by(|a, b| {
            b.departure_count
                .cmp(&a.departure_count)
                .then_with(|| a.iata.cmp(&b.iata))
        });
        Ok(ranked.into_iter().take(k).map(|a| a.iata.clone()).collect())
    }

    async fn route_origins(&self) -> Result<BTreeSet<String>> {
        Ok(self.routes.iter().map(|r| r.origin_iata.clone()).collect())
    }

    async fn sample_legs(&self, airline_iata: &str, cap: u64) -> Result<Vec<FlightLeg>> {
        Ok(self
            .legs
            .iter()
            .filter(|leg| {
                leg.airline_iata
                    .as_deref()
                    .is_some_and(|code| code.trim().eq_ignore_ascii_case(airline_iata))
            })
            .take(cap as usize)
            .cloned()
            .collect())
    }

    async fn find_airport(&self, iata: &str) -> Result<Option<Airport>> {
        let Some(code) = normalize_airport_code(iata) else {
            return Ok(None);
        };
        Ok(self.airports.iter().find(|a| a.iata == code).cloned())
    }

    async fn find_route(&self, key: &RouteKey) -> Result<Option<Route>> {
        Ok(self
            .routes
            .iter()
            .find(|r| r.origin_iata == key.origin && r.destination_iata == key.destination)
            .cloned())
    }

    async fn find_airline(&self, iata: &str) -> Result<Option<Airline>> {
        let Some(code) = normalize_airline_code(iata) else {
            return Ok(None);
        };
        Ok(self.airlines.iter().find(|a| a.iata == code).cloned())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(iata: &str, departures: u64) -> Airport {
        Airport {
            iata: iata.to_string(),
            name: format!("{} Airport", iata),
            city: iata.to_string(),
            country: "IN".to_string(),
            departure_count: departures,
            arrival_count: 0,
            destinations_count: 0,
            coordinates: None,
            terminals: Vec::new(),
            pois: Vec::new(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_top_airports_tie_break_by_code() {
        let catalog = MemoryCatalog::new().with_airports(vec![
            airport("MAA", 10),
            airport("BOM", 50),
            airport("DEL", 50),
            airport("GOI", 1),
        ]);
        let top = catalog.top_airports_by_departures(3).await.unwrap();
        assert_eq!(top, vec!["BOM", "DEL", "MAA"]);
    }

    #[tokio::test]
    async fn test_top_airports_skip_inactive() {
        let catalog = MemoryCatalog::new().with_airports(vec![
            airport("DEL", 500),
            airport("XXA", 0),
            airport("YYB", 0),
        ]);
        let top = catalog.top_airports_by_departures(50).await.unwrap();
        assert_eq!(top, vec!["DEL"]);
    }

    #[tokio::test]
    async fn test_lookups_normalize_codes() {
        let catalog = MemoryCatalog::new().with_airports(vec![airport("DEL", 5)]);
        assert!(catalog.find_airport(" del ").await.unwrap().is_some());
        assert!(catalog.find_airport("DELHI").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sample_legs_respects_cap_and_airline() {
        let catalog = MemoryCatalog::new().with_legs(vec![
            FlightLeg::new("AI", "DEL", "BOM"),
            FlightLeg::new("6E", "DEL", "GOI"),
            FlightLeg::new("AI", "BOM", "DEL"),
            FlightLeg::new("AI", "DEL", "MAA"),
        ]);
        let legs = catalog.sample_legs("AI", 2).await.unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[1].origin_iata.as_deref(), Some("BOM"));
    }
}
