//! Tagged entity kinds served as sitemap families

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use super::url::ChangeFreq;
use crate::errors::{Result, RoutemapError};
use crate::storage::RouteKey;
use crate::utils::{normalize_airline_code, normalize_airport_code};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Airports,
    Routes,
    AirlineRoutes,
    AirlineAirports,
}

impl EntityKind {
    /// 在 sitemap 索引中的排列顺序
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Airports,
        EntityKind::Routes,
        EntityKind::AirlineRoutes,
        EntityKind::AirlineAirports,
    ];

    /// URL 中使用的名称，例如 `airline-routes`
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::Airports => "airports",
            EntityKind::Routes => "routes",
            EntityKind::AirlineRoutes => "airline-routes",
            EntityKind::AirlineAirports => "airline-airports",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    /// 空分片回退时指向的类目页
    pub fn category_root(&self) -> &'static str {
        match self {
            EntityKind::Airports => "/airports",
            EntityKind::Routes => "/flights",
            EntityKind::AirlineRoutes | EntityKind::AirlineAirports => "/airlines",
        }
    }

    pub fn changefreq(&self) -> ChangeFreq {
        match self {
            EntityKind::Airports | EntityKind::Routes => ChangeFreq::Daily,
            EntityKind::AirlineRoutes | EntityKind::AirlineAirports => ChangeFreq::Weekly,
        }
    }

    /// 派生条目（航司维度）
    pub fn is_derived(&self) -> bool {
        matches!(self, EntityKind::AirlineRoutes | EntityKind::AirlineAirports)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_slug(&s.to_lowercase()).ok_or_else(|| {
            format!(
                "Invalid entity kind: '{}'. Valid: airports, routes, airline-routes, airline-airports",
                s
            )
        })
    }
}

/// 单个实体的键
///
/// 文本形式：`DEL`、`DEL-BOM`、`AI:DEL-BOM`、`AI:DEL`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Airport(String),
    Route(RouteKey),
    AirlineRoute { airline: String, route: RouteKey },
    AirlineAirport { airline: String, iata: String },
}

impl EntityKey {
    pub fn parse(kind: EntityKind, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match kind {
            EntityKind::Airports => normalize_airport_code(raw)
                .map(EntityKey::Airport)
                .ok_or_else(|| RoutemapError::validation(format!("Invalid airport code: '{}'", raw))),
            EntityKind::Routes => Ok(EntityKey::Route(raw.parse()?)),
            EntityKind::AirlineRoutes => {
                let (airline, route) = split_airline(raw)?;
                Ok(EntityKey::AirlineRoute {
                    airline,
                    route: route.parse()?,
                })
            }
            EntityKind::AirlineAirports => {
                let (airline, iata) = split_airline(raw)?;
                let iata = normalize_airport_code(iata).ok_or_else(|| {
                    RoutemapError::validation(format!("Invalid airport code: '{}'", iata))
                })?;
                Ok(EntityKey::AirlineAirport { airline, iata })
            }
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Airport(_) => EntityKind::Airports,
            EntityKey::Route(_) => EntityKind::Routes,
            EntityKey::AirlineRoute { .. } => EntityKind::AirlineRoutes,
            EntityKey::AirlineAirport { .. } => EntityKind::AirlineAirports,
        }
    }
}

fn split_airline(raw: &str) -> Result<(String, &str)> {
    let (airline, rest) = raw.split_once(':').ok_or_else(|| {
        RoutemapError::validation(format!("Invalid airline-scoped key: '{}', expected AIRLINE:KEY", raw))
    })?;
    let airline = normalize_airline_code(airline)
        .ok_or_else(|| RoutemapError::validation(format!("Invalid airline code: '{}'", airline)))?;
    Ok((airline, rest))
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKey::Airport(iata) => f.write_str(iata),
            EntityKey::Route(route) => write!(f, "{}", route),
            EntityKey::AirlineRoute { airline, route } => write!(f, "{}:{}", airline, route),
            EntityKey::AirlineAirport { airline, iata } => write!(f, "{}:{}", airline, iata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_entity_key_parse() {
        assert_eq!(
            EntityKey::parse(EntityKind::Airports, "del").unwrap(),
            EntityKey::Airport("DEL".to_string())
        );
        let key = EntityKey::parse(EntityKind::AirlineRoutes, "ai:del-bom").unwrap();
        assert_eq!(key.to_string(), "AI:DEL-BOM");
        assert_eq!(key.kind(), EntityKind::AirlineRoutes);
        assert_eq!(
            EntityKey::parse(EntityKind::AirlineAirports, "6E:GOI")
                .unwrap()
                .to_string(),
            "6E:GOI"
        );
        assert!(EntityKey::parse(EntityKind::AirlineRoutes, "DEL-BOM").is_err());
        assert!(EntityKey::parse(EntityKind::Routes, "DEL").is_err());
    }

    #[test]
    fn test_slug_roundtrip() {
        for kind in EntityKind::iter() {
            assert_eq!(EntityKind::from_slug(kind.slug()), Some(kind));
            assert_eq!(kind.as_ref(), kind.slug());
        }
        assert_eq!(EntityKind::from_slug("blog"), None);
    }

    #[test]
    fn test_category_roots() {
        assert_eq!(EntityKind::Routes.category_root(), "/flights");
        assert_eq!(EntityKind::AirlineAirports.category_root(), "/airlines");
        assert_eq!(EntityKind::Airports.category_root(), "/airports");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Airline-Routes".parse::<EntityKind>().unwrap(),
            EntityKind::AirlineRoutes
        );
    }
}
