//! Sitemap URL entries and page paths

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::storage::RouteKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapUrl {
    /// 绝对地址
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// `<sitemapindex>` 中的一项
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapIndexEntry {
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
}

pub fn airport_path(iata: &str) -> String {
    format!("/airports/{}", iata.to_ascii_lowercase())
}

pub fn route_path(key: &RouteKey) -> String {
    format!("/flights/{}", key.to_string().to_ascii_lowercase())
}

pub fn airline_route_path(airline: &str, key: &RouteKey) -> String {
    format!(
        "/airlines/{}/routes/{}",
        airline.to_ascii_lowercase(),
        key.to_string().to_ascii_lowercase()
    )
}

pub fn airline_airport_path(airline: &str, iata: &str) -> String {
    format!(
        "/airlines/{}/airports/{}",
        airline.to_ascii_lowercase(),
        iata.to_ascii_lowercase()
    )
}

/// 分片文档的路径，例如 `/sitemaps/routes-2.xml`
pub fn part_path(slug: &str, part_index: usize) -> String {
    format!("/sitemaps/{}-{}.xml", slug, part_index)
}

pub const STATIC_SITEMAP_PATH: &str = "/sitemaps/static.xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_lowercase() {
        let key = RouteKey::new("DEL", "BOM");
        assert_eq!(route_path(&key), "/flights/del-bom");
        assert_eq!(airport_path("JFK"), "/airports/jfk");
        assert_eq!(airline_route_path("AI", &key), "/airlines/ai/routes/del-bom");
        assert_eq!(airline_airport_path("6E", "GOI"), "/airlines/6e/airports/goi");
        assert_eq!(part_path("airline-routes", 3), "/sitemaps/airline-routes-3.xml");
    }

    #[test]
    fn test_changefreq_wire_names() {
        assert_eq!(ChangeFreq::Daily.as_ref(), "daily");
        assert_eq!(ChangeFreq::Weekly.as_ref(), "weekly");
    }
}
