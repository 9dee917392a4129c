//! Product engine: derived product, selection and supplier streams.
//!
//! ```text
//! fetch products ─┐
//!                 ├─ combine_latest ─ products_with_categories ─┐
//! categories ─────┤                                             │
//!                 └─ biased merge + fold ─ products_with_add    │
//!                            ▲                                  │
//!                       add_product                             │
//! selection ────────────────── combine_latest ──────────────────┴─ selected_product
//!                                                                        │
//!                                                              switch_map (fork-join)
//!                                                                        │
//!                                                            selected_product_suppliers
//! ```
//!
//! Every box is a hot [`Replay`]: subscribing never re-runs upstream work and
//! late subscribers start from the latest value.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

use catalog_core::{ProductId, find_by_id};
use catalog_infra::RemoteFetcher;
use catalog_products::{
    Category, Product, ProductChange, Supplier, placeholder_product, with_categories,
};
use catalog_streams::{
    ActionBus, ActionStream, NotificationStream, Notifier, Publish, Replay, ReplayStream,
    accumulate, action_channel, combine_latest, switch_map,
};

use crate::categories::CategoryProvider;
use crate::failure::isolate;
use crate::suppliers::{FetchStrategy, SupplierProvider};

/// Product selected before the user picks one.
pub const DEFAULT_SELECTION: ProductId = ProductId(1);

/// Cloneable handle for the engine's user actions.
///
/// Both operations return immediately and cannot fail.
#[derive(Debug, Clone)]
pub struct ProductActions {
    add: ActionBus<Product>,
    selection: Replay<ProductId>,
}

impl ProductActions {
    /// Append `product` (or the placeholder product) to `products_with_add`.
    pub fn add_product(&self, product: Option<Product>) {
        let product = product.unwrap_or_else(placeholder_product);
        tracing::info!("adding product {} ({})", product.id, product.product_name);
        self.add.publish(product);
    }

    /// Make `id` the selected product.
    pub fn selected_product_change(&self, id: ProductId) {
        tracing::info!("selected product changed to {}", id);
        self.selection.publish(id);
    }
}

/// The composed product streams.
///
/// Owns the pipeline tasks; dropping the engine aborts them and ends every
/// subscription.
pub struct ProductEngine {
    products: Replay<Vec<Product>>,
    products_with_categories: Replay<Vec<Product>>,
    products_with_add: Replay<Vec<Product>>,
    selected_product: Replay<Option<Product>>,
    selected_product_suppliers: Replay<Vec<Supplier>>,
    actions: ProductActions,
    notifier: Notifier,
    tasks: Vec<JoinHandle<()>>,
}

impl core::fmt::Debug for ProductEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductEngine")
            .field("selection", &self.actions.selection.latest())
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl ProductEngine {
    /// Wire the pipeline and start fetching products.
    pub fn spawn(
        fetcher: Arc<dyn RemoteFetcher>,
        categories: &CategoryProvider,
        suppliers: &SupplierProvider,
        notifier: Notifier,
    ) -> Self {
        let mut tasks = Vec::with_capacity(5);

        let products = Replay::new();
        tasks.push(spawn_products_fetch(fetcher, products.clone(), notifier.clone()));

        let products_with_categories = Replay::new();
        tasks.push(combine_latest(
            products.subscribe(),
            categories.categories(),
            |products: &Vec<Product>, categories: &Vec<Category>| with_categories(products, categories),
            products_with_categories.clone(),
        ));

        let (add, added) = action_channel();
        let products_with_add = Replay::new();
        let changes = product_changes(products.subscribe(), categories.categories(), added);
        tasks.push(accumulate(
            changes,
            Vec::new(),
            |acc, change: ProductChange| change.apply_to(acc),
            products_with_add.clone(),
        ));

        let selection = Replay::seeded(DEFAULT_SELECTION);
        let selected_product = Replay::new();
        tasks.push(combine_latest(
            products_with_categories.subscribe(),
            selection.subscribe(),
            |products: &Vec<Product>, id: &ProductId| find_by_id(products, *id).cloned(),
            selected_product.clone(),
        ));

        let selected_product_suppliers = Replay::new();
        let provider = suppliers.clone();
        let supplier_notifier = notifier.clone();
        tasks.push(switch_map(
            selected_product.subscribe(),
            move |product: Option<Product>| {
                let provider = provider.clone();
                let notifier = supplier_notifier.clone();
                async move { suppliers_for(product, &provider, &notifier).await }
            },
            selected_product_suppliers.clone(),
        ));

        tracing::info!("product engine started");

        Self {
            products,
            products_with_categories,
            products_with_add,
            selected_product,
            selected_product_suppliers,
            actions: ProductActions { add, selection },
            notifier,
            tasks,
        }
    }

    /// Raw product list, as fetched.
    pub fn products(&self) -> ReplayStream<Vec<Product>> {
        self.products.subscribe()
    }

    /// Product list with display prices, search keys and category names.
    pub fn products_with_categories(&self) -> ReplayStream<Vec<Product>> {
        self.products_with_categories.subscribe()
    }

    /// Enriched product list followed by every product added since it arrived.
    pub fn products_with_add(&self) -> ReplayStream<Vec<Product>> {
        self.products_with_add.subscribe()
    }

    /// The product matching the current selection, or `None`.
    pub fn selected_product(&self) -> ReplayStream<Option<Product>> {
        self.selected_product.subscribe()
    }

    /// Suppliers of the selected product, in the product's supplier-id order.
    pub fn selected_product_suppliers(&self) -> ReplayStream<Vec<Supplier>> {
        self.selected_product_suppliers.subscribe()
    }

    /// Current selection id.
    pub fn selection(&self) -> ReplayStream<ProductId> {
        self.actions.selection.subscribe()
    }

    pub fn add_product(&self, product: Option<Product>) {
        self.actions.add_product(product)
    }

    pub fn selected_product_change(&self, id: ProductId) {
        self.actions.selected_product_change(id)
    }

    pub fn actions(&self) -> ProductActions {
        self.actions.clone()
    }

    /// Open an error notification session.
    pub fn errors(&self) -> NotificationStream {
        self.notifier.subscribe()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Drop for ProductEngine {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_products_fetch(
    fetcher: Arc<dyn RemoteFetcher>,
    products: Replay<Vec<Product>>,
    notifier: Notifier,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let fetched = fetcher.fetch_products().await;
        if let Some(list) = isolate(fetched, &notifier, "products") {
            tracing::debug!(
                "Products: {}",
                serde_json::to_string(&list).unwrap_or_else(|_| format!("{} products", list.len()))
            );
            products.publish(list);
        }
    })
}

/// Inputs of the added-product fold.
struct ChangeSources {
    products: ReplayStream<Vec<Product>>,
    categories: ReplayStream<Vec<Category>>,
    added: ActionStream<Product>,
    raw: Option<Vec<Product>>,
    known: Option<Vec<Category>>,
}

impl ChangeSources {
    fn fresh_list(&self) -> Option<ProductChange> {
        let raw = self.raw.as_ref()?;
        let known = self.known.as_ref()?;
        Some(ProductChange::FullReplace(with_categories(raw, known)))
    }
}

/// Enriched lists and added products as one ordered change stream.
///
/// The enriched list is recomputed here rather than read back from
/// `products_with_categories`, so a list change and an add never race across
/// tasks. List-side inputs are always drained first: an add published after a
/// refresh lands on the refreshed list instead of being replaced by it.
fn product_changes(
    products: ReplayStream<Vec<Product>>,
    categories: ReplayStream<Vec<Category>>,
    added: ActionStream<Product>,
) -> impl Stream<Item = ProductChange> + Send + 'static {
    let sources = ChangeSources {
        products,
        categories,
        added,
        raw: None,
        known: None,
    };

    futures::stream::unfold(sources, |mut s| async move {
        loop {
            tokio::select! {
                biased;
                Some(list) = s.products.next() => s.raw = Some(list),
                Some(list) = s.categories.next() => s.known = Some(list),
                Some(product) = s.added.next() => return Some((ProductChange::Append(product), s)),
                else => return None,
            }

            if let Some(change) = s.fresh_list() {
                return Some((change, s));
            }
        }
    })
}

/// Fork-join the suppliers of `product`; failures fall back to an empty list.
async fn suppliers_for(
    product: Option<Product>,
    provider: &SupplierProvider,
    notifier: &Notifier,
) -> Vec<Supplier> {
    let Some(product) = product else {
        return Vec::new();
    };
    if product.supplier_ids().is_empty() {
        return Vec::new();
    }

    let fetched = provider
        .fetch_batch(product.supplier_ids(), FetchStrategy::Joined)
        .await;
    let suppliers = isolate(fetched, notifier, "selected product suppliers").unwrap_or_default();

    tracing::debug!(
        "Product Suppliers for {}: {:?}",
        product.id,
        suppliers.iter().map(|s| s.id.get()).collect::<Vec<_>>()
    );
    suppliers
}
