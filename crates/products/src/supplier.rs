use serde::{Deserialize, Serialize};

use catalog_core::{Entity, SupplierId};

/// A supplier of one or more products. Read-only from the catalog's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub min_quantity: i64,
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_deserializes_with_defaults() {
        let supplier: Supplier = serde_json::from_str(r#"{"id": 3, "name": "Acme Tool Supply"}"#).unwrap();
        assert_eq!(supplier.id, SupplierId(3));
        assert_eq!(supplier.cost, 0.0);
        assert_eq!(supplier.min_quantity, 0);
    }
}
