//! # HTTP Catalog
//!
//! A single GET against the product-listing URL.
//!
//! ```text
//! GET https://fakestoreapi.com/products
//!      │
//!      ├── non-2xx ───────────────► CatalogError::HttpStatus
//!      ├── body not a JSON array ──► CatalogError::DeserializationFailed
//!      └── [record, ...]
//!              │
//!              ├── record does not decode ───► skipped (warn!)
//!              ├── record fails validation ──► skipped (warn!)
//!              └── rest returned in endpoint order
//! ```

use reqwest::Client;
use std::future::Future;
use storefront_core::validation::validate_catalog_product;
use serde_json::Value;
use storefront_core::CatalogProduct;
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::error::CatalogResult;

/// Anything that can produce the product list.
///
/// [`HttpCatalog`] is the real implementation. Tests and offline runs can
/// supply their own.
pub trait CatalogFetcher: Send + Sync {
    fn fetch_products(&self) -> impl Future<Output = CatalogResult<Vec<CatalogProduct>>> + Send;
}

/// HTTP client for the remote catalog endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    endpoint: Url,
}

impl HttpCatalog {
    /// Builds a client for the configured endpoint.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let endpoint = config.endpoint_url()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HttpCatalog { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl CatalogFetcher for HttpCatalog {
    async fn fetch_products(&self) -> CatalogResult<Vec<CatalogProduct>> {
        debug!(endpoint = %self.endpoint, "GET catalog");

        let body = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let records: Vec<Value> = serde_json::from_slice(&body)?;
        let received = records.len();

        let products: Vec<CatalogProduct> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let product = match serde_json::from_value::<CatalogProduct>(record) {
                    Ok(product) => product,
                    Err(e) => {
                        warn!(index, error = %e, "Skipping undecodable catalog record");
                        return None;
                    }
                };
                match validate_catalog_product(&product) {
                    Ok(()) => Some(product),
                    Err(e) => {
                        warn!(index, error = %e, "Skipping catalog record");
                        None
                    }
                }
            })
            .collect();

        debug!(received, kept = products.len(), "Catalog decoded");
        Ok(products)
    }
}
