//! routemap - sitemap and indexability service for a travel catalog
//!
//! Decides, for every airport, route and airline-scoped link in a read-only
//! catalog, whether it may be indexed and at what priority, and serves those
//! decisions as paginated sitemaps.
//!
//! # Architecture
//! - `storage`: catalog access (`CatalogReader`, sea-orm backend, in-memory catalog)
//! - `sitemap`: correlation, indexability policy, partitioning and rendering
//! - `api`: HTTP services and middleware
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging initialization

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod sitemap;
pub mod storage;
pub mod system;
pub mod utils;
