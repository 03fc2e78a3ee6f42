//! Role and priority assignment

use std::collections::BTreeSet;

use serde::Serialize;
use strum::AsRefStr;

use crate::storage::{Airport, Route};

/// 机场固定优先级（主实体）
pub const AIRPORT_PRIORITY: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Hub,
    Standard,
    Thin,
}

/// 出港量前 K 的机场
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubSet(BTreeSet<String>);

impl HubSet {
    pub fn new(codes: impl IntoIterator<Item = String>) -> Self {
        Self(codes.into_iter().collect())
    }

    pub fn contains(&self, iata: &str) -> bool {
        self.0.contains(iata)
    }
}

pub fn airport_role(airport: &Airport, hubs: &HubSet) -> Role {
    if hubs.contains(&airport.iata) {
        Role::Hub
    } else if airport.has_activity() {
        Role::Standard
    } else {
        Role::Thin
    }
}

/// `active` 由调用方根据航班数据判定
pub fn route_role(route: &Route, active: bool, hubs: &HubSet) -> Role {
    if hubs.contains(&route.origin_iata) || hubs.contains(&route.destination_iata) {
        Role::Hub
    } else if active {
        Role::Standard
    } else {
        Role::Thin
    }
}

/// 优先级表
pub fn priority(role: Role, quality_score: u8) -> f32 {
    match (role, quality_score) {
        (Role::Hub, _) => 0.8,
        (Role::Standard, s) if s >= 3 => 0.7,
        (Role::Standard, 2) => 0.6,
        _ => 0.5,
    }
}
