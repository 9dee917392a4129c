use std::sync::Arc;

use async_trait::async_trait;

use catalog_core::{FetchResult, SupplierId};
use catalog_products::{Category, Product, Supplier};

/// Read access to the catalog backend.
///
/// Every call is a single-shot request: it resolves once, with either the
/// value or a [`catalog_core::FetchError`] that says whether the request
/// failed in transit or was rejected by the backend. Implementations do no
/// caching and no retrying; sharing and replay of results is the engine's
/// job.
///
/// ## Architecture Role
///
/// ```text
/// RemoteFetcher ─┬─ CategoryProvider ──┐
///                ├─ SupplierProvider ──┼─ ProductEngine ── views
///                └─────────────────────┘
/// ```
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync` so one fetcher can be shared (behind an
/// `Arc`) by every provider and pipeline task.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// `GET products`: raw list, prices as stored.
    async fn fetch_products(&self) -> FetchResult<Vec<Product>>;

    /// `GET categories`.
    async fn fetch_categories(&self) -> FetchResult<Vec<Category>>;

    /// `GET suppliers`.
    async fn fetch_suppliers(&self) -> FetchResult<Vec<Supplier>>;

    /// `GET suppliers/{id}`.
    async fn fetch_supplier(&self, id: SupplierId) -> FetchResult<Supplier>;
}

#[async_trait]
impl<F> RemoteFetcher for Arc<F>
where
    F: RemoteFetcher + ?Sized,
{
    async fn fetch_products(&self) -> FetchResult<Vec<Product>> {
        (**self).fetch_products().await
    }

    async fn fetch_categories(&self) -> FetchResult<Vec<Category>> {
        (**self).fetch_categories().await
    }

    async fn fetch_suppliers(&self) -> FetchResult<Vec<Supplier>> {
        (**self).fetch_suppliers().await
    }

    async fn fetch_supplier(&self, id: SupplierId) -> FetchResult<Supplier> {
        (**self).fetch_supplier(id).await
    }
}
