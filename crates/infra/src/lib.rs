//! Infrastructure layer: backend access and configuration.

pub mod config;
pub mod fetcher;

pub use config::{CatalogConfig, ConfigError};
pub use fetcher::{
    HttpFetcher, InMemoryFetcher, RemoteFetcher, demo_categories, demo_products, demo_suppliers,
};
