//! Supplier provider and batch fetch strategies.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt, TryStreamExt};

use catalog_core::{FetchResult, SupplierId};
use catalog_infra::RemoteFetcher;
use catalog_products::Supplier;
use catalog_streams::{Generation, Notifier, Replay, ReplayStream};

use crate::failure::isolate;

/// How a batch of supplier ids is turned into requests.
///
/// Every strategy goes through the same single-id request; they differ in
/// when requests are issued and which results are kept.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FetchStrategy {
    /// One request at a time, each issued after the previous one resolved.
    /// Output follows input order; latency is the sum of all requests.
    Sequential,
    /// All requests issued at once. Output follows completion order; latency
    /// is that of the slowest request.
    Unordered,
    /// All requests issued at once, but every id supersedes the ones before
    /// it: only the last id's result is kept, the rest are dropped.
    LatestOnly,
    /// All requests issued at once; output follows input order and is
    /// available once every request resolved.
    Joined,
}

/// Shared, replayed supplier list plus by-id batch fetching.
#[derive(Clone)]
pub struct SupplierProvider {
    fetcher: Arc<dyn RemoteFetcher>,
    suppliers: Replay<Vec<Supplier>>,
    notifier: Notifier,
}

impl core::fmt::Debug for SupplierProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SupplierProvider")
            .field("suppliers", &self.suppliers.latest().map(|s| s.len()))
            .finish_non_exhaustive()
    }
}

impl SupplierProvider {
    /// Create the provider and start fetching the full supplier list.
    pub fn spawn(fetcher: Arc<dyn RemoteFetcher>, notifier: Notifier) -> Self {
        let provider = Self {
            fetcher,
            suppliers: Replay::new(),
            notifier,
        };

        let initial = provider.clone();
        tokio::spawn(async move {
            let fetched = initial.fetcher.fetch_suppliers().await;
            if let Some(suppliers) = isolate(fetched, &initial.notifier, "suppliers") {
                tracing::debug!("Suppliers: {} loaded", suppliers.len());
                initial.suppliers.publish(suppliers);
            }
        });

        provider
    }

    pub fn suppliers(&self) -> ReplayStream<Vec<Supplier>> {
        self.suppliers.subscribe()
    }

    /// Fetch one supplier by id.
    pub async fn fetch_one(&self, id: SupplierId) -> FetchResult<Supplier> {
        self.fetcher.fetch_supplier(id).await
    }

    /// Fetch a batch of suppliers by id using `strategy`.
    ///
    /// The first failure among the results that are kept ends the batch with
    /// that error; a failure of a superseded request (under
    /// [`FetchStrategy::LatestOnly`]) is ignored.
    pub async fn fetch_batch(
        &self,
        ids: &[SupplierId],
        strategy: FetchStrategy,
    ) -> FetchResult<Vec<Supplier>> {
        match strategy {
            FetchStrategy::Sequential => {
                let mut out = Vec::with_capacity(ids.len());
                for &id in ids {
                    tracing::debug!("supplier {} emitted from sequential source", id);
                    out.push(self.fetch_one(id).await?);
                }
                Ok(out)
            }
            FetchStrategy::Unordered => {
                let pending: FuturesUnordered<_> = ids
                    .iter()
                    .map(|&id| {
                        tracing::debug!("supplier {} emitted from unordered source", id);
                        self.fetch_one(id)
                    })
                    .collect();
                pending.try_collect().await
            }
            FetchStrategy::LatestOnly => {
                let generation = Generation::new();
                let mut pending = FuturesUnordered::new();
                for &id in ids {
                    tracing::debug!("supplier {} emitted from latest-only source", id);
                    let token = generation.advance();
                    pending.push(async move { (token, self.fetch_one(id).await) });
                }

                while let Some((token, result)) = pending.next().await {
                    if generation.is_current(token) {
                        // Dropping `pending` cancels whatever is still in flight.
                        return result.map(|supplier| vec![supplier]);
                    }
                    tracing::debug!("discarding superseded supplier result");
                }
                Ok(Vec::new())
            }
            FetchStrategy::Joined => {
                futures::future::try_join_all(ids.iter().map(|&id| self.fetch_one(id))).await
            }
        }
    }
}
