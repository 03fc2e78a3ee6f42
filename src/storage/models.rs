use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RoutemapError;
use crate::utils::normalize_airport_code;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub departure_count: u64,
    pub arrival_count: u64,
    pub destinations_count: u64,
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub terminals: Vec<String>,
    #[serde(default)]
    pub pois: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Airport {
    /// 有出港或进港航班
    pub fn has_activity(&self) -> bool {
        self.departure_count > 0 || self.arrival_count > 0
    }
}

/// 航线主键 "ORIGIN-DEST"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub origin: String,
    pub destination: String,
}

impl RouteKey {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.destination)
    }
}

impl FromStr for RouteKey {
    type Err = RoutemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, destination) = s
            .split_once('-')
            .ok_or_else(|| RoutemapError::validation(format!("Invalid route key: '{}'", s)))?;
        match (
            normalize_airport_code(origin),
            normalize_airport_code(destination),
        ) {
            (Some(origin), Some(destination)) => Ok(Self {
                origin,
                destination,
            }),
            _ => Err(RoutemapError::validation(format!(
                "Invalid route key: '{}', expected ORIGIN-DEST",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin_iata: String,
    pub destination_iata: String,
    pub destination_city: String,
    /// 人类可读的频次描述，例如 "12 flights"、"3-5 flights"
    pub flights_per_day: Option<String>,
    pub has_flight_data: bool,
    pub average_duration: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Route {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.origin_iata.clone(), self.destination_iata.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub iata: String,
    pub name: String,
    pub country: String,
}

/// 单条航段原始记录，字段可能缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub airline_iata: Option<String>,
    pub origin_iata: Option<String>,
    pub destination_iata: Option<String>,
}

impl FlightLeg {
    pub fn new(airline: &str, origin: &str, destination: &str) -> Self {
        Self {
            airline_iata: Some(airline.to_string()),
            origin_iata: Some(origin.to_string()),
            destination_iata: Some(destination.to_string()),
        }
    }
}
