//! Indexability policy
//!
//! Sitemap emission and the page-facing decision endpoint both call
//! [`IndexabilityPolicy::evaluate`]; a URL listed in a sitemap is never served
//! with `noindex`, and vice versa.

use std::collections::BTreeSet;

use serde::Serialize;

use super::entity::EntityKind;
use super::role::{AIRPORT_PRIORITY, HubSet, Role, airport_role, priority, route_role};
use crate::config::DerivedLinkGate;
use crate::storage::{Airport, Route, RouteKey};
use crate::utils::normalize_airport_code;

pub const MAX_QUALITY_SCORE: u8 = 4;

/// 低于此分数的条目只有 hub 才能入选
pub const MIN_QUALITY_SCORE: u8 = 2;

const ROBOTS_INDEX: &str = "index, follow";
const ROBOTS_NOINDEX: &str = "noindex, follow";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub entity_kind: EntityKind,
    pub entity_key: String,
    pub should_index: bool,
    pub quality_score: u8,
    pub role: Role,
    pub priority: f32,
}

impl Decision {
    /// 不存在或未被观测到的实体
    pub fn excluded(entity_kind: EntityKind, entity_key: impl Into<String>) -> Self {
        Self {
            entity_kind,
            entity_key: entity_key.into(),
            should_index: false,
            quality_score: 0,
            role: Role::Thin,
            priority: priority(Role::Thin, 0),
        }
    }

    pub fn is_indexable(&self) -> bool {
        self.should_index && (self.quality_score >= MIN_QUALITY_SCORE || self.role == Role::Hub)
    }

    pub fn robots(&self) -> &'static str {
        if self.is_indexable() {
            ROBOTS_INDEX
        } else {
            ROBOTS_NOINDEX
        }
    }
}

/// Entity under evaluation. Derived links carry their base record, if the
/// catalog has one.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Airport(&'a Airport),
    Route(&'a Route),
    AirlineRoute {
        airline: &'a str,
        route: &'a RouteKey,
        base: Option<&'a Route>,
    },
    AirlineAirport {
        airline: &'a str,
        iata: &'a str,
        base: Option<&'a Airport>,
    },
}

impl Entity<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Airport(_) => EntityKind::Airports,
            Entity::Route(_) => EntityKind::Routes,
            Entity::AirlineRoute { .. } => EntityKind::AirlineRoutes,
            Entity::AirlineAirport { .. } => EntityKind::AirlineAirports,
        }
    }

    pub fn key(&self) -> String {
        match self {
            Entity::Airport(airport) => airport.iata.clone(),
            Entity::Route(route) => route.key().to_string(),
            Entity::AirlineRoute { airline, route, .. } => format!("{}:{}", airline, route),
            Entity::AirlineAirport { airline, iata, .. } => format!("{}:{}", airline, iata),
        }
    }
}

/// 一次计算内共享的只读上下文
#[derive(Debug, Clone, Default)]
pub struct PolicyContext {
    pub hubs: HubSet,
    /// 至少有一条出港航线的机场
    pub route_origins: BTreeSet<String>,
    pub gate: DerivedLinkGate,
}

pub trait IndexabilityPolicy: Send + Sync {
    fn evaluate(&self, entity: &Entity<'_>, ctx: &PolicyContext) -> Decision;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPolicy;

impl StandardPolicy {
    fn evaluate_airport(&self, airport: &Airport, ctx: &PolicyContext) -> Decision {
        let has_content = !airport.pois.is_empty()
            || !airport.terminals.is_empty()
            || ctx.route_origins.contains(&airport.iata);
        Decision {
            entity_kind: EntityKind::Airports,
            entity_key: airport.iata.clone(),
            should_index: airport.has_activity() && has_content,
            quality_score: airport_quality_score(airport),
            role: airport_role(airport, &ctx.hubs),
            priority: AIRPORT_PRIORITY,
        }
    }

    fn evaluate_route(&self, route: &Route, ctx: &PolicyContext) -> Decision {
        let meaningful = flights_per_day_is_meaningful(route.flights_per_day.as_deref());
        let quality_score = route_quality_score(route);
        let role = route_role(route, route.has_flight_data || meaningful, &ctx.hubs);
        Decision {
            entity_kind: EntityKind::Routes,
            entity_key: route.key().to_string(),
            should_index: route.has_flight_data && meaningful,
            quality_score,
            role,
            priority: priority(role, quality_score),
        }
    }
}

impl IndexabilityPolicy for StandardPolicy {
    fn evaluate(&self, entity: &Entity<'_>, ctx: &PolicyContext) -> Decision {
        match *entity {
            Entity::Airport(airport) => self.evaluate_airport(airport, ctx),
            Entity::Route(route) => self.evaluate_route(route, ctx),
            Entity::AirlineRoute { base, .. } => republish(
                entity,
                base.map(|route| self.evaluate_route(route, ctx)),
                ctx.gate,
            ),
            Entity::AirlineAirport { base, .. } => republish(
                entity,
                base.map(|airport| self.evaluate_airport(airport, ctx)),
                ctx.gate,
            ),
        }
    }
}

/// 派生链接沿用基础实体的判定。`PresenceOnly` 下航段存在即可入选。
fn republish(entity: &Entity<'_>, base: Option<Decision>, gate: DerivedLinkGate) -> Decision {
    let entity_kind = entity.kind();
    let entity_key = entity.key();
    match (gate, base) {
        (DerivedLinkGate::InheritBase, Some(base)) => Decision {
            entity_kind,
            entity_key,
            ..base
        },
        (DerivedLinkGate::InheritBase, None) => Decision::excluded(entity_kind, entity_key),
        (DerivedLinkGate::PresenceOnly, Some(base)) if base.is_indexable() => Decision {
            entity_kind,
            entity_key,
            ..base
        },
        (DerivedLinkGate::PresenceOnly, base) => {
            let quality_score = base
                .map_or(MIN_QUALITY_SCORE, |b| b.quality_score.max(MIN_QUALITY_SCORE));
            Decision {
                entity_kind,
                entity_key,
                should_index: true,
                quality_score,
                role: Role::Standard,
                priority: priority(Role::Standard, quality_score),
            }
        }
    }
}

/// 频次描述中的最大整数，例如 "3-5 flights" → 5
pub fn parse_flights_per_day(descriptor: Option<&str>) -> u64 {
    let Some(text) = descriptor else {
        return 0;
    };
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

/// 描述缺失、为空或全部数字为 0（"0 flights"、"0-0 flights"）视为无意义
pub fn flights_per_day_is_meaningful(descriptor: Option<&str>) -> bool {
    let Some(text) = descriptor.map(str::trim).filter(|t| !t.is_empty()) else {
        return false;
    };
    let has_digits = text.chars().any(|c| c.is_ascii_digit());
    !has_digits || parse_flights_per_day(Some(text)) > 0
}

pub fn route_quality_score(route: &Route) -> u8 {
    let signals = [
        route.has_flight_data,
        flights_per_day_is_meaningful(route.flights_per_day.as_deref()),
        route
            .average_duration
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty()),
        normalize_airport_code(&route.origin_iata).is_some()
            && normalize_airport_code(&route.destination_iata).is_some(),
    ];
    signals.iter().filter(|present| **present).count() as u8
}

pub fn airport_quality_score(airport: &Airport) -> u8 {
    let signals = [
        airport.has_activity(),
        airport.destinations_count > 0,
        !airport.terminals.is_empty(),
        airport.coordinates.is_some(),
    ];
    signals.iter().filter(|present| **present).count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Coordinates;

    fn route(origin: &str, destination: &str) -> Route {
        Route {
            origin_iata: origin.to_string(),
            destination_iata: destination.to_string(),
            destination_city: String::new(),
            flights_per_day: None,
            has_flight_data: false,
            average_duration: None,
            updated_at: None,
        }
    }

    fn airport(iata: &str) -> Airport {
        Airport {
            iata: iata.to_string(),
            name: String::new(),
            city: String::new(),
            country: String::new(),
            departure_count: 0,
            arrival_count: 0,
            destinations_count: 0,
            coordinates: None,
            terminals: Vec::new(),
            pois: Vec::new(),
            updated_at: None,
        }
    }

    #[test]
    fn test_flights_per_day_parsing() {
        assert_eq!(parse_flights_per_day(Some("12 flights")), 12);
        assert_eq!(parse_flights_per_day(Some("3-5 flights")), 5);
        assert_eq!(parse_flights_per_day(Some("daily")), 0);
        assert_eq!(parse_flights_per_day(None), 0);
    }

    #[test]
    fn test_flights_per_day_meaningful() {
        assert!(flights_per_day_is_meaningful(Some("12 flights")));
        assert!(flights_per_day_is_meaningful(Some("0-2 flights")));
        assert!(!flights_per_day_is_meaningful(Some("0 flights")));
        assert!(!flights_per_day_is_meaningful(Some("0-0 flights")));
        assert!(!flights_per_day_is_meaningful(Some("  ")));
        assert!(!flights_per_day_is_meaningful(None));
    }

    #[test]
    fn test_full_route_scores_four() {
        let mut r = route("DEL", "BOM");
        r.has_flight_data = true;
        r.flights_per_day = Some("12 flights".to_string());
        r.average_duration = Some("2h10m".to_string());
        let decision = StandardPolicy.evaluate(&Entity::Route(&r), &PolicyContext::default());
        assert_eq!(decision.quality_score, 4);
        assert!(decision.is_indexable());
        assert_eq!(decision.role, Role::Standard);
        assert_eq!(decision.priority, 0.7);
        assert_eq!(decision.robots(), "index, follow");
    }

    #[test]
    fn test_hub_overrides_score_floor_only() {
        let ctx = PolicyContext {
            hubs: HubSet::new(vec!["DEL".to_string()]),
            ..Default::default()
        };
        let mut r = route("DEL", "BOM");
        r.has_flight_data = true;
        r.flights_per_day = Some("1 flight".to_string());
        r.origin_iata = "DEL".to_string();
        let decision = StandardPolicy.evaluate(&Entity::Route(&r), &ctx);
        assert_eq!(decision.quality_score, 3);
        assert_eq!(decision.role, Role::Hub);
        assert!(decision.is_indexable());

        let stale = route("DEL", "XYZ");
        let decision = StandardPolicy.evaluate(&Entity::Route(&stale), &ctx);
        assert_eq!(decision.role, Role::Hub);
        assert!(!decision.should_index);
        assert!(!decision.is_indexable());
    }

    #[test]
    fn test_hub_admits_low_score() {
        let decision = Decision {
            entity_kind: EntityKind::Routes,
            entity_key: "DEL-BOM".to_string(),
            should_index: true,
            quality_score: 1,
            role: Role::Hub,
            priority: 0.8,
        };
        assert!(decision.is_indexable());
        let decision = Decision {
            role: Role::Standard,
            ..decision
        };
        assert!(!decision.is_indexable());
    }

    #[test]
    fn test_airport_thin_content_guard() {
        let mut a = airport("IXZ");
        a.departure_count = 4;
        a.coordinates = Some(Coordinates {
            latitude: 11.64,
            longitude: 92.72,
        });
        let ctx = PolicyContext::default();
        assert!(!StandardPolicy.evaluate(&Entity::Airport(&a), &ctx).should_index);

        let ctx = PolicyContext {
            route_origins: ["IXZ".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let decision = StandardPolicy.evaluate(&Entity::Airport(&a), &ctx);
        assert!(decision.is_indexable());
        assert_eq!(decision.quality_score, 2);
        assert_eq!(decision.priority, AIRPORT_PRIORITY);
    }

    #[test]
    fn test_inactive_airport_never_indexed() {
        let mut a = airport("XXA");
        a.terminals = vec!["T1".to_string()];
        a.pois = vec!["Museum".to_string()];
        let decision = StandardPolicy.evaluate(&Entity::Airport(&a), &PolicyContext::default());
        assert!(!decision.should_index);
        assert_eq!(decision.role, Role::Thin);
    }

    #[test]
    fn test_derived_link_inherits_base() {
        let key = RouteKey::new("XYZ", "ABC");
        let base = route("XYZ", "ABC");
        let entity = Entity::AirlineRoute {
            airline: "AI",
            route: &key,
            base: Some(&base),
        };
        let decision = StandardPolicy.evaluate(&entity, &PolicyContext::default());
        assert_eq!(decision.entity_kind, EntityKind::AirlineRoutes);
        assert_eq!(decision.entity_key, "AI:XYZ-ABC");
        assert!(!decision.is_indexable());

        let orphan = Entity::AirlineRoute {
            airline: "AI",
            route: &key,
            base: None,
        };
        assert!(!StandardPolicy
            .evaluate(&orphan, &PolicyContext::default())
            .is_indexable());
    }

    #[test]
    fn test_presence_only_gate() {
        let ctx = PolicyContext {
            gate: DerivedLinkGate::PresenceOnly,
            ..Default::default()
        };
        let entity = Entity::AirlineAirport {
            airline: "AA",
            iata: "JFK",
            base: None,
        };
        let decision = StandardPolicy.evaluate(&entity, &ctx);
        assert!(decision.is_indexable());
        assert_eq!(decision.role, Role::Standard);
        assert_eq!(decision.priority, 0.6);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let mut r = route("DE", "BOM");
        assert_eq!(route_quality_score(&r), 0);
        r.has_flight_data = true;
        r.flights_per_day = Some("4 flights".to_string());
        r.average_duration = Some("1h".to_string());
        assert_eq!(route_quality_score(&r), 3);
        r.origin_iata = "DEL".to_string();
        assert_eq!(route_quality_score(&r), MAX_QUALITY_SCORE);
    }
}
