//! Sea-ORM model → 领域模型
//!
//! 目录由外部流程写入，这里是唯一的校验关口：非法代码、负计数、
//! 无法解析的 JSON 列表都以 `MalformedRecord` 拒绝，由调用方记录并跳过。

use crate::errors::{Result, RoutemapError};
use crate::storage::models::{Airline, Airport, Coordinates, FlightLeg, Route};
use crate::utils::{normalize_airline_code, normalize_airport_code};
use migration::entities::{airline, airport, flight_leg, route};

fn counter(value: i64, field: &str, key: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        RoutemapError::malformed_record(format!("airport {}: {} = {} is negative", key, field, value))
    })
}

fn json_list(raw: Option<&str>, field: &str, key: &str) -> Result<Vec<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => {
            let items: Vec<String> = serde_json::from_str(text).map_err(|e| {
                RoutemapError::malformed_record(format!("airport {}: {} is not a JSON list: {}", key, field, e))
            })?;
            Ok(items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect())
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn model_to_airport(model: airport::Model) -> Result<Airport> {
    let iata = normalize_airport_code(&model.iata).ok_or_else(|| {
        RoutemapError::malformed_record(format!("airport with invalid IATA code '{}'", model.iata))
    })?;

    let coordinates = match (model.latitude, model.longitude) {
        (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
            Some(Coordinates {
                latitude,
                longitude,
            })
        }
        _ => None,
    };

    Ok(Airport {
        departure_count: counter(model.departure_count, "departure_count", &iata)?,
        arrival_count: counter(model.arrival_count, "arrival_count", &iata)?,
        destinations_count: counter(model.destinations_count, "destinations_count", &iata)?,
        terminals: json_list(model.terminals.as_deref(), "terminals", &iata)?,
        pois: json_list(model.pois.as_deref(), "pois", &iata)?,
        coordinates,
        name: model.name,
        city: model.city,
        country: model.country,
        updated_at: model.updated_at,
        iata,
    })
}

pub fn model_to_route(model: route::Model) -> Result<Route> {
    match (
        normalize_airport_code(&model.origin_iata),
        normalize_airport_code(&model.destination_iata),
    ) {
        (Some(origin_iata), Some(destination_iata)) => Ok(Route {
            origin_iata,
            destination_iata,
            destination_city: model.destination_city,
            flights_per_day: non_empty(model.flights_per_day),
            has_flight_data: model.has_flight_data,
            average_duration: non_empty(model.average_duration),
            updated_at: model.updated_at,
        }),
        _ => Err(RoutemapError::malformed_record(format!(
            "route with invalid endpoints '{}-{}'",
            model.origin_iata, model.destination_iata
        ))),
    }
}

pub fn model_to_airline(model: airline::Model) -> Result<Airline> {
    let iata = normalize_airline_code(&model.iata).ok_or_else(|| {
        RoutemapError::malformed_record(format!("airline with invalid code '{}'", model.iata))
    })?;
    Ok(Airline {
        iata,
        name: model.name,
        country: model.country,
    })
}

/// 航段不做过滤，缺失字段交给关联引擎跳过
pub fn model_to_leg(model: flight_leg::Model) -> FlightLeg {
    FlightLeg {
        airline_iata: model.airline_iata,
        origin_iata: model.origin_iata,
        destination_iata: model.destination_iata,
    }
}
