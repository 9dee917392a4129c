use serde::{Deserialize, Serialize};

use catalog_core::{CategoryId, Entity, ProductId, SupplierId, find_by_id};

use crate::category::Category;

/// A catalog product.
///
/// `category` and `search_key` are derived: the backend leaves them empty and
/// [`with_categories`] fills them in on every composition pass. Values are
/// never mutated after being emitted; each pass builds new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub product_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_key: Vec<String>,
    #[serde(default)]
    pub quantity_in_stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_ids: Option<Vec<SupplierId>>,
}

impl Product {
    /// Supplier ids, if the product lists any.
    pub fn supplier_ids(&self) -> &[SupplierId] {
        self.supplier_ids.as_deref().unwrap_or(&[])
    }

    /// Display copy of this product against the given category list.
    ///
    /// The price shown is twice the fetched price (`0` when the fetched price
    /// is missing, zero or NaN). An unknown category id leaves `category`
    /// empty.
    pub fn enriched(&self, categories: &[Category]) -> Product {
        let price = if self.price == 0.0 || self.price.is_nan() {
            0.0
        } else {
            self.price * 2.0
        };

        Product {
            price,
            search_key: vec![self.product_name.clone()],
            category: find_by_id(categories, self.category_id).map(|c| c.name.clone()),
            ..self.clone()
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Enrich a freshly fetched product list with the latest categories.
///
/// Always start from the raw fetched list: feeding an already enriched list
/// back in would double the price again.
pub fn with_categories(products: &[Product], categories: &[Category]) -> Vec<Product> {
    products.iter().map(|p| p.enriched(categories)).collect()
}

/// Product pushed by "add product" when the caller supplies none.
pub fn placeholder_product() -> Product {
    Product {
        id: ProductId(42),
        product_name: "Another One".to_string(),
        product_code: "TBX-0042".to_string(),
        description: "Our new product".to_string(),
        price: 8.9,
        category_id: CategoryId(3),
        category: Some("Toolbox".to_string()),
        search_key: vec!["Another One".to_string()],
        quantity_in_stock: 30,
        supplier_ids: None,
    }
}
