//! `catalog-core`: catalog foundation building blocks.
//!
//! This crate contains **pure** primitives shared by every other crate
//! (identifiers, entity lookup, the fetch error taxonomy). No IO, no async.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id};
pub use error::{FetchError, FetchResult};
pub use id::{CategoryId, ProductId, SupplierId};
