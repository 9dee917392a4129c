//! Catalog data model.
//!
//! Products, categories and suppliers as the backend serves them, plus the
//! pure transforms the engine applies to them (enrichment with category
//! names, the added-product fold). No IO, no async.

pub mod category;
pub mod change;
pub mod product;
pub mod supplier;

pub use category::Category;
pub use change::ProductChange;
pub use product::{Product, placeholder_product, with_categories};
pub use supplier::Supplier;
