use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use catalog_core::{CategoryId, FetchError, FetchResult, ProductId, SupplierId, find_by_id};
use catalog_products::{Category, Product, Supplier};

use super::r#trait::RemoteFetcher;

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,

    products_failure: Option<FetchError>,
    categories_failure: Option<FetchError>,
    suppliers_failure: Option<FetchError>,
    supplier_failures: HashMap<SupplierId, FetchError>,

    latency: Duration,
    supplier_latency: HashMap<SupplierId, Duration>,

    issued_suppliers: Vec<SupplierId>,
}

/// In-memory catalog backend.
///
/// Intended for tests/dev. Every response can be delayed (driven by tokio
/// time, so paused-clock tests stay deterministic) or replaced by an injected
/// failure, and every request is counted.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    state: RwLock<State>,
    product_fetches: AtomicUsize,
    category_fetches: AtomicUsize,
    supplier_list_fetches: AtomicUsize,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small garden/toolbox/gaming catalog.
    pub fn with_demo_catalog() -> Self {
        Self::new()
            .with_products(demo_products())
            .with_categories(demo_categories())
            .with_suppliers(demo_suppliers())
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.update(|s| s.products = products);
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.update(|s| s.categories = categories);
        self
    }

    pub fn with_suppliers(self, suppliers: Vec<Supplier>) -> Self {
        self.update(|s| s.suppliers = suppliers);
        self
    }

    /// Delay applied to every response.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.update(|s| s.latency = latency);
        self
    }

    /// Delay applied to `GET suppliers/{id}` for one id (overrides the default latency).
    pub fn with_supplier_latency(self, id: SupplierId, latency: Duration) -> Self {
        self.update(|s| {
            s.supplier_latency.insert(id, latency);
        });
        self
    }

    pub fn fail_products(self, err: FetchError) -> Self {
        self.update(|s| s.products_failure = Some(err));
        self
    }

    pub fn fail_categories(self, err: FetchError) -> Self {
        self.update(|s| s.categories_failure = Some(err));
        self
    }

    pub fn fail_suppliers(self, err: FetchError) -> Self {
        self.update(|s| s.suppliers_failure = Some(err));
        self
    }

    pub fn fail_supplier(self, id: SupplierId, err: FetchError) -> Self {
        self.update(|s| {
            s.supplier_failures.insert(id, err);
        });
        self
    }

    /// Replace the category list served from now on.
    pub fn set_categories(&self, categories: Vec<Category>) {
        self.update(|s| s.categories = categories);
    }

    /// Stop failing `GET suppliers/{id}` for `id`.
    pub fn heal_supplier(&self, id: SupplierId) {
        self.update(|s| {
            s.supplier_failures.remove(&id);
        });
    }

    pub fn product_fetches(&self) -> usize {
        self.product_fetches.load(Ordering::SeqCst)
    }

    pub fn category_fetches(&self) -> usize {
        self.category_fetches.load(Ordering::SeqCst)
    }

    pub fn supplier_list_fetches(&self) -> usize {
        self.supplier_list_fetches.load(Ordering::SeqCst)
    }

    /// Ids passed to `fetch_supplier`, in the order the requests were issued.
    pub fn issued_supplier_requests(&self) -> Vec<SupplierId> {
        self.read(|s| s.issued_suppliers.clone())
    }

    // A poisoned lock only means some test panicked mid-update; every write
    // leaves `State` consistent, so keep serving it.
    fn update(&self, f: impl FnOnce(&mut State)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    async fn respond<T>(&self, latency: Duration, outcome: FetchResult<T>) -> FetchResult<T> {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        outcome
    }
}

#[async_trait]
impl RemoteFetcher for InMemoryFetcher {
    async fn fetch_products(&self) -> FetchResult<Vec<Product>> {
        self.product_fetches.fetch_add(1, Ordering::SeqCst);
        let (latency, outcome) = self.read(|s| {
            let outcome = match &s.products_failure {
                Some(err) => Err(err.clone()),
                None => Ok(s.products.clone()),
            };
            (s.latency, outcome)
        });
        self.respond(latency, outcome).await
    }

    async fn fetch_categories(&self) -> FetchResult<Vec<Category>> {
        self.category_fetches.fetch_add(1, Ordering::SeqCst);
        let (latency, outcome) = self.read(|s| {
            let outcome = match &s.categories_failure {
                Some(err) => Err(err.clone()),
                None => Ok(s.categories.clone()),
            };
            (s.latency, outcome)
        });
        self.respond(latency, outcome).await
    }

    async fn fetch_suppliers(&self) -> FetchResult<Vec<Supplier>> {
        self.supplier_list_fetches.fetch_add(1, Ordering::SeqCst);
        let (latency, outcome) = self.read(|s| {
            let outcome = match &s.suppliers_failure {
                Some(err) => Err(err.clone()),
                None => Ok(s.suppliers.clone()),
            };
            (s.latency, outcome)
        });
        self.respond(latency, outcome).await
    }

    async fn fetch_supplier(&self, id: SupplierId) -> FetchResult<Supplier> {
        self.update(|s| s.issued_suppliers.push(id));
        let (latency, outcome) = self.read(|s| {
            let latency = s.supplier_latency.get(&id).copied().unwrap_or(s.latency);
            let outcome = match s.supplier_failures.get(&id) {
                Some(err) => Err(err.clone()),
                None => find_by_id(&s.suppliers, id).cloned().ok_or_else(|| {
                    FetchError::backend(
                        404,
                        format!("Http failure response for api/suppliers/{id}: 404 Not Found"),
                    )
                }),
            };
            (latency, outcome)
        });
        self.respond(latency, outcome).await
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_product(
    id: i64,
    name: &str,
    code: &str,
    description: &str,
    price: f64,
    category_id: i64,
    quantity_in_stock: i64,
    supplier_ids: &[i64],
) -> Product {
    Product {
        id: ProductId(id),
        product_name: name.to_string(),
        product_code: code.to_string(),
        description: description.to_string(),
        price,
        category_id: CategoryId(category_id),
        category: None,
        search_key: Vec::new(),
        quantity_in_stock,
        supplier_ids: Some(supplier_ids.iter().copied().map(SupplierId).collect()),
    }
}

pub fn demo_products() -> Vec<Product> {
    vec![
        demo_product(1, "Leaf Rake", "GDN-0011", "Leaf rake with 48-inch wooden handle", 19.95, 1, 15, &[1, 2]),
        demo_product(2, "Garden Cart", "GDN-0023", "15 gallon capacity rolling garden cart", 32.99, 1, 2, &[3, 4]),
        demo_product(5, "Hammer", "TBX-0048", "Curved claw steel hammer", 8.9, 3, 8, &[5, 6]),
        demo_product(8, "Saw", "TBX-0022", "15-inch steel blade hand saw", 11.55, 3, 6, &[7, 8]),
        demo_product(10, "Video Game Controller", "GMG-0042", "Standard two-button video game controller", 35.95, 5, 12, &[9, 10]),
    ]
}

pub fn demo_categories() -> Vec<Category> {
    [(1, "Garden"), (3, "Toolbox"), (5, "Gaming")]
        .into_iter()
        .map(|(id, name)| Category {
            id: CategoryId(id),
            name: name.to_string(),
        })
        .collect()
}

pub fn demo_suppliers() -> Vec<Supplier> {
    [
        (1, "Acme Gardening Supply", 16.95, 12),
        (2, "Standard Garden", 15.95, 24),
        (3, "Acme General Supply", 25.0, 2),
        (4, "Acme General Supply", 35.0, 3),
        (5, "Acme General Supply", 2.0, 24),
        (6, "Acme Tool Supply", 4.0, 12),
        (7, "Tools Are Us", 8.0, 8),
        (8, "Tools Are Us", 12.0, 12),
        (9, "Acme Game Supply", 25.0, 6),
        (10, "Gamers Unite", 20.0, 12),
    ]
    .into_iter()
    .map(|(id, name, cost, min_quantity)| Supplier {
        id: SupplierId(id),
        name: name.to_string(),
        cost,
        min_quantity,
    })
    .collect()
}
