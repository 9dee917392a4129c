//! Reactive composition core of the product catalog.
//!
//! Providers turn single-shot backend requests into shared, replayed streams;
//! the [`ProductEngine`] derives the streams the product screens consume; the
//! [`view`] adapters reconcile them into view-models. Every backend failure is
//! diverted into error notifications at the point of use (see [`failure`]), so
//! no public stream ever terminates with an error.

pub mod categories;
pub mod engine;
pub mod failure;
pub mod suppliers;
pub mod view;

pub use categories::CategoryProvider;
pub use engine::{DEFAULT_SELECTION, ProductActions, ProductEngine};
pub use suppliers::{FetchStrategy, SupplierProvider};
pub use view::{ProductDetailView, ProductListView, Render};

use std::sync::Arc;

use catalog_core::FetchResult;
use catalog_infra::{CatalogConfig, HttpFetcher, RemoteFetcher};
use catalog_streams::Notifier;

/// The wired catalog: providers, engine, and one notifier shared by all of them.
#[derive(Debug)]
pub struct Catalog {
    categories: CategoryProvider,
    suppliers: SupplierProvider,
    products: ProductEngine,
    notifier: Notifier,
}

impl Catalog {
    /// Wire every component on top of `fetcher` and start the initial fetches.
    pub fn spawn(fetcher: Arc<dyn RemoteFetcher>) -> Self {
        let notifier = Notifier::new();
        let categories = CategoryProvider::spawn(fetcher.clone(), notifier.clone());
        let suppliers = SupplierProvider::spawn(fetcher.clone(), notifier.clone());
        let products = ProductEngine::spawn(fetcher, &categories, &suppliers, notifier.clone());

        Self {
            categories,
            suppliers,
            products,
            notifier,
        }
    }

    /// Wire the catalog against the HTTP backend described by `config`.
    pub fn connect(config: CatalogConfig) -> FetchResult<Self> {
        tracing::info!("connecting to catalog backend at {}", config.base_url);
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::spawn(Arc::new(fetcher)))
    }

    pub fn categories(&self) -> &CategoryProvider {
        &self.categories
    }

    pub fn suppliers(&self) -> &SupplierProvider {
        &self.suppliers
    }

    pub fn products(&self) -> &ProductEngine {
        &self.products
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn list_view(&self) -> ProductListView {
        ProductListView::attach(&self.products)
    }

    pub fn detail_view(&self) -> ProductDetailView {
        ProductDetailView::attach(&self.products)
    }
}
