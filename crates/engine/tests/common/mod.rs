#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_core::{ProductId, SupplierId};
use catalog_engine::Catalog;
use catalog_infra::{InMemoryFetcher, demo_products};
use catalog_products::Product;
use catalog_streams::ReplayStream;
use tokio_stream::StreamExt;

pub fn ids(raw: &[i64]) -> Vec<SupplierId> {
    raw.iter().copied().map(SupplierId).collect()
}

pub fn supplier_ids_of<T: catalog_core::Entity<Id = SupplierId>>(items: &[T]) -> Vec<SupplierId> {
    items.iter().map(|s| s.id()).collect()
}

/// Demo products, with product 1 sourced from `suppliers` instead.
pub fn products_with_first_sourced_from(suppliers: &[i64]) -> Vec<Product> {
    let mut products = demo_products();
    if let Some(first) = products.iter_mut().find(|p| p.id == ProductId(1)) {
        first.supplier_ids = Some(ids(suppliers));
    }
    products
}

pub fn spawn(fetcher: InMemoryFetcher) -> (Arc<InMemoryFetcher>, Catalog) {
    catalog_observability::init();
    let fetcher = Arc::new(fetcher);
    let catalog = Catalog::spawn(fetcher.clone());
    (fetcher, catalog)
}

/// Collect every value a stream emits in the background.
pub fn record<T>(mut stream: ReplayStream<T>) -> Arc<Mutex<Vec<T>>>
where
    T: Clone + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    tokio::spawn(async move {
        while let Some(value) = stream.next().await {
            sink.lock().unwrap().push(value);
        }
    });
    seen
}

pub async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}
