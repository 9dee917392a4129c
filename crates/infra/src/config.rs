//! Backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:4200";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Where the catalog backend lives and how to reach each resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub products_path: String,
    pub categories_path: String,
    pub suppliers_path: String,
    #[serde(with = "secs")]
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            products_path: "api/products".to_string(),
            categories_path: "api/productCategories".to_string(),
            suppliers_path: "api/suppliers".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CatalogConfig {
    /// Load from the environment.
    ///
    /// - `CATALOG_API_URL`: backend base URL (falls back to a local dev server)
    /// - `CATALOG_REQUEST_TIMEOUT_SECS`: per-request timeout in seconds
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup("CATALOG_API_URL") {
            Some(url) if !url.trim().is_empty() => {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
            _ => {
                tracing::warn!("CATALOG_API_URL not set; using {}", DEFAULT_API_URL);
            }
        }

        if let Some(raw) = lookup("CATALOG_REQUEST_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: "CATALOG_REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn products_url(&self) -> String {
        self.url(&self.products_path)
    }

    pub fn categories_url(&self) -> String {
        self.url(&self.categories_path)
    }

    pub fn suppliers_url(&self) -> String {
        self.url(&self.suppliers_path)
    }

    pub fn supplier_url(&self, id: impl core::fmt::Display) -> String {
        format!("{}/{}", self.suppliers_url(), id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.products_url(), "http://localhost:4200/api/products");
    }

    #[test]
    fn reads_url_and_timeout() {
        let config = CatalogConfig::from_lookup(lookup(&[
            ("CATALOG_API_URL", "https://catalog.example.com/"),
            ("CATALOG_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.supplier_url(7), "https://catalog.example.com/api/suppliers/7");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = CatalogConfig::from_lookup(lookup(&[("CATALOG_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "CATALOG_REQUEST_TIMEOUT_SECS",
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn deserializes_partial_config() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{"base_url": "http://api", "request_timeout": 2}"#).unwrap();
        assert_eq!(config.categories_url(), "http://api/api/productCategories");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
