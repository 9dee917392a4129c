//! Added-product accumulation.
//!
//! The "products with add" view merges two differently shaped inputs: whole
//! lists coming from the enriched product stream, and single products coming
//! from "add product" actions. Both are lifted into [`ProductChange`] so one
//! fold handles them without inspecting runtime types.

use crate::product::Product;

/// One input to the added-product accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductChange {
    /// A fresh full list: the accumulator becomes exactly this list.
    FullReplace(Vec<Product>),
    /// A single added product: appended after everything accumulated so far.
    Append(Product),
}

impl ProductChange {
    /// Apply this change to the accumulator, returning the new state.
    pub fn apply_to(self, mut acc: Vec<Product>) -> Vec<Product> {
        match self {
            ProductChange::FullReplace(list) => list,
            ProductChange::Append(product) => {
                acc.push(product);
                acc
            }
        }
    }
}

impl From<Vec<Product>> for ProductChange {
    fn from(list: Vec<Product>) -> Self {
        ProductChange::FullReplace(list)
    }
}

impl From<Product> for ProductChange {
    fn from(product: Product) -> Self {
        ProductChange::Append(product)
    }
}
