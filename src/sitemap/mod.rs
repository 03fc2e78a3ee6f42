//! Sitemap generation: correlation, indexability, partitioning and rendering

pub mod correlation;
pub mod entity;
pub mod indexability;
pub mod lastmod;
pub mod partition;
pub mod pipeline;
pub mod render;
pub mod role;
pub mod url;

pub use correlation::{AirlineRelations, CorrelationArena, CorrelationEngine};
pub use entity::{EntityKey, EntityKind};
pub use indexability::{Decision, Entity, IndexabilityPolicy, PolicyContext, StandardPolicy};
pub use lastmod::LastmodClock;
pub use partition::{part_count, partition};
pub use pipeline::{SitemapService, SitemapSettings};
pub use role::{HubSet, Role};
pub use url::{ChangeFreq, SitemapIndexEntry, SitemapUrl};
