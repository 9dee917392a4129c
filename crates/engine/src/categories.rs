//! Category provider.

use std::sync::Arc;

use catalog_infra::RemoteFetcher;
use catalog_products::Category;
use catalog_streams::{Notifier, Replay, ReplayStream};

use crate::failure::isolate;

/// Shared, replayed list of product categories.
///
/// The list is fetched once when the provider is spawned; [`CategoryProvider::refresh`]
/// fetches it again and, on success, every downstream composition recomputes.
#[derive(Clone)]
pub struct CategoryProvider {
    fetcher: Arc<dyn RemoteFetcher>,
    categories: Replay<Vec<Category>>,
    notifier: Notifier,
}

impl core::fmt::Debug for CategoryProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CategoryProvider")
            .field("categories", &self.categories.latest().map(|c| c.len()))
            .finish_non_exhaustive()
    }
}

impl CategoryProvider {
    /// Create the provider and start the initial fetch.
    pub fn spawn(fetcher: Arc<dyn RemoteFetcher>, notifier: Notifier) -> Self {
        let provider = Self {
            fetcher,
            categories: Replay::new(),
            notifier,
        };

        let initial = provider.clone();
        tokio::spawn(async move {
            initial.refresh().await;
        });

        provider
    }

    pub fn categories(&self) -> ReplayStream<Vec<Category>> {
        self.categories.subscribe()
    }

    pub fn latest(&self) -> Option<Vec<Category>> {
        self.categories.latest()
    }

    /// Fetch the list again. A failure keeps the previous list and is only
    /// reported as a notification.
    ///
    /// Returns whether a new list was published.
    pub async fn refresh(&self) -> bool {
        let fetched = self.fetcher.fetch_categories().await;
        match isolate(fetched, &self.notifier, "categories") {
            Some(categories) => {
                tracing::debug!("Categories: {} loaded", categories.len());
                self.categories.publish(categories);
                true
            }
            None => false,
        }
    }
}
