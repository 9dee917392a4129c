use serde::{Deserialize, Serialize};

use catalog_core::{CategoryId, Entity};

/// A product category. Read-only from the catalog's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}
