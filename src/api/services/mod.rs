pub mod health;
pub mod indexability;
pub mod sitemap;

pub use health::{AppStartTime, HealthService, health_routes};
pub use indexability::{IndexabilityService, indexability_routes};
pub use sitemap::{SitemapDocument, SitemapHandlers, sitemap_routes};
