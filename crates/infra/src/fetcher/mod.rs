//! Remote fetch boundary.
//!
//! The catalog backend is an external collaborator: this module only defines
//! the request/response contract and two implementations of it.

pub mod http;
pub mod in_memory;
pub mod r#trait;

pub use http::HttpFetcher;
pub use in_memory::{InMemoryFetcher, demo_categories, demo_products, demo_suppliers};
pub use r#trait::RemoteFetcher;
