use async_trait::async_trait;
use serde::de::DeserializeOwned;

use catalog_core::{FetchError, FetchResult, SupplierId};
use catalog_products::{Category, Product, Supplier};

use super::r#trait::RemoteFetcher;
use crate::config::CatalogConfig;

/// `RemoteFetcher` over HTTP/JSON.
///
/// Failures are classified for the error notifications:
/// - no response (connect/timeout/reset) → [`FetchError::Transport`]
/// - non-2xx status → [`FetchError::Backend`] with the status code
/// - 2xx with an unreadable body → [`FetchError::Backend`] as well, since the
///   backend did answer
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl HttpFetcher {
    pub fn new(config: CatalogConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> FetchResult<T> {
        tracing::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::backend(
                status.as_u16(),
                format!(
                    "Http failure response for {}: {} {}",
                    url,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                ),
            ));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| {
            FetchError::backend(status.as_u16(), format!("Http failure during parsing for {url}: {e}"))
        })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch_products(&self) -> FetchResult<Vec<Product>> {
        self.get_json(self.config.products_url()).await
    }

    async fn fetch_categories(&self) -> FetchResult<Vec<Category>> {
        self.get_json(self.config.categories_url()).await
    }

    async fn fetch_suppliers(&self) -> FetchResult<Vec<Supplier>> {
        self.get_json(self.config.suppliers_url()).await
    }

    async fn fetch_supplier(&self, id: SupplierId) -> FetchResult<Supplier> {
        self.get_json(self.config.supplier_url(id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// A loopback port that was just bound and released, so nothing listens on it.
    async fn closed_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_failure() {
        let config = CatalogConfig {
            base_url: format!("http://127.0.0.1:{}", closed_port().await),
            request_timeout: Duration::from_secs(2),
            ..CatalogConfig::default()
        };
        let fetcher = HttpFetcher::new(config).unwrap();

        let err = fetcher.fetch_products().await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().starts_with("An error occurred: "));
    }
}
