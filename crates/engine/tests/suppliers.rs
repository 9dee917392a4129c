//! Supplier pipelines: the selected product's suppliers and the batch fetch
//! strategies.
//!
//! Latencies are simulated by the in-memory backend on a paused tokio clock,
//! so elapsed-time assertions are exact.

mod common;

use std::sync::Arc;
use std::time::Duration;

use catalog_core::{FetchError, ProductId, SupplierId};
use catalog_engine::{FetchStrategy, SupplierProvider};
use catalog_infra::InMemoryFetcher;
use catalog_streams::Notifier;
use tokio::time::Instant;
use tokio_stream::StreamExt;

use common::{ids, products_with_first_sourced_from, record, settle, spawn, supplier_ids_of};

/// A bare supplier provider (no engine issuing its own requests) over a
/// backend where supplier 1 is slow, 5 fast and 8 in between.
fn slow_fast_slow() -> (Arc<InMemoryFetcher>, SupplierProvider) {
    catalog_observability::init();
    let fetcher = Arc::new(
        InMemoryFetcher::with_demo_catalog()
            .with_supplier_latency(SupplierId(1), Duration::from_millis(300))
            .with_supplier_latency(SupplierId(5), Duration::from_millis(100))
            .with_supplier_latency(SupplierId(8), Duration::from_millis(200)),
    );
    let provider = SupplierProvider::spawn(fetcher.clone(), Notifier::new());
    (fetcher, provider)
}

#[tokio::test(start_paused = true)]
async fn selected_suppliers_keep_product_order() {
    let fetcher = InMemoryFetcher::with_demo_catalog()
        .with_products(products_with_first_sourced_from(&[3, 7]))
        .with_supplier_latency(SupplierId(3), Duration::from_millis(300))
        .with_supplier_latency(SupplierId(7), Duration::from_millis(10));
    let (_fetcher, catalog) = spawn(fetcher);

    let suppliers = catalog
        .products()
        .selected_product_suppliers()
        .next()
        .await
        .unwrap();

    assert_eq!(supplier_ids_of(&suppliers), ids(&[3, 7]));
    assert_eq!(suppliers[0].name, "Acme General Supply");
    assert_eq!(suppliers[1].name, "Tools Are Us");
}

#[tokio::test]
async fn product_without_suppliers_yields_empty_list() {
    let mut products = products_with_first_sourced_from(&[]);
    products[1].supplier_ids = None;
    let (fetcher, catalog) = spawn(InMemoryFetcher::with_demo_catalog().with_products(products));
    let engine = catalog.products();

    assert_eq!(engine.selected_product_suppliers().next().await, Some(Vec::new()));

    engine.selected_product_change(ProductId(2));
    engine
        .selected_product()
        .wait_for(|p| p.as_ref().map(|p| p.id) == Some(ProductId(2)))
        .await
        .unwrap();
    settle(Duration::from_millis(10)).await;

    assert_eq!(engine.selected_product_suppliers().next().await, Some(Vec::new()));
    assert!(fetcher.issued_supplier_requests().is_empty());
}

#[tokio::test]
async fn unknown_selection_yields_empty_suppliers() {
    let (fetcher, catalog) = spawn(InMemoryFetcher::with_demo_catalog());
    let engine = catalog.products();
    let mut suppliers = engine.selected_product_suppliers();
    suppliers.wait_for(|s| s.len() == 2).await.unwrap();

    engine.selected_product_change(ProductId(404));

    assert_eq!(suppliers.wait_for(Vec::is_empty).await, Some(Vec::new()));
    assert_eq!(fetcher.issued_supplier_requests(), ids(&[1, 2]));
}

#[tokio::test]
async fn supplier_failure_notifies_once_and_later_selections_work() {
    let (fetcher, catalog) = spawn(
        InMemoryFetcher::with_demo_catalog()
            .fail_supplier(SupplierId(2), FetchError::backend(500, "Internal Server Error")),
    );
    let engine = catalog.products();
    let mut errors = engine.errors();
    let mut suppliers = engine.selected_product_suppliers();

    assert_eq!(suppliers.next().await, Some(Vec::new()));
    let notification = errors.recv().await.unwrap();
    assert_eq!(notification.message, "Backend returned code 500: Internal Server Error");
    assert!(errors.try_recv().is_none());

    // The product list is untouched by the supplier failure.
    let products = engine.products_with_categories().next().await.unwrap();
    assert_eq!(products.len(), 5);

    fetcher.heal_supplier(SupplierId(2));
    engine.selected_product_change(ProductId(2));
    let next = suppliers.wait_for(|s| !s.is_empty()).await.unwrap();
    assert_eq!(supplier_ids_of(&next), ids(&[3, 4]));
    assert!(errors.try_recv().is_none());
}

#[tokio::test(start_paused = true)]
async fn stale_supplier_batch_never_overwrites_newer_selection() {
    let fetcher = InMemoryFetcher::with_demo_catalog()
        .with_supplier_latency(SupplierId(1), Duration::from_millis(500))
        .with_supplier_latency(SupplierId(2), Duration::from_millis(500))
        .with_supplier_latency(SupplierId(3), Duration::from_millis(10))
        .with_supplier_latency(SupplierId(4), Duration::from_millis(10));
    let (_fetcher, catalog) = spawn(fetcher);
    let engine = catalog.products();
    let seen = record(engine.selected_product_suppliers());

    engine.selected_product().next().await.unwrap();
    engine.selected_product_change(ProductId(2));
    settle(Duration::from_secs(2)).await;

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(supplier_ids_of(&seen[0]), ids(&[3, 4]));
}

#[tokio::test(start_paused = true)]
async fn sequential_strategy_preserves_order_and_sums_latency() {
    let (fetcher, provider) = slow_fast_slow();

    let started = Instant::now();
    let suppliers = provider
        .fetch_batch(&ids(&[1, 5, 8]), FetchStrategy::Sequential)
        .await
        .unwrap();

    assert_eq!(supplier_ids_of(&suppliers), ids(&[1, 5, 8]));
    assert!(started.elapsed() >= Duration::from_millis(600));
    assert_eq!(fetcher.issued_supplier_requests(), ids(&[1, 5, 8]));
}

#[tokio::test(start_paused = true)]
async fn unordered_strategy_returns_same_set_in_max_latency() {
    let (_fetcher, provider) = slow_fast_slow();

    let started = Instant::now();
    let suppliers = provider
        .fetch_batch(&ids(&[1, 5, 8]), FetchStrategy::Unordered)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    let mut got = supplier_ids_of(&suppliers);
    got.sort();
    assert_eq!(got, ids(&[1, 5, 8]));
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn latest_only_strategy_keeps_last_id() {
    let (fetcher, provider) = slow_fast_slow();

    let suppliers = provider
        .fetch_batch(&ids(&[1, 5, 8]), FetchStrategy::LatestOnly)
        .await
        .unwrap();

    assert_eq!(supplier_ids_of(&suppliers), ids(&[8]));
    // Every request was issued; only the superseded results were dropped.
    assert_eq!(fetcher.issued_supplier_requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn joined_strategy_orders_by_input_in_max_latency() {
    let (_fetcher, provider) = slow_fast_slow();

    let started = Instant::now();
    let suppliers = provider
        .fetch_batch(&ids(&[5, 8, 1]), FetchStrategy::Joined)
        .await
        .unwrap();

    assert_eq!(supplier_ids_of(&suppliers), ids(&[5, 8, 1]));
    assert!(started.elapsed() < Duration::from_millis(600));
}
