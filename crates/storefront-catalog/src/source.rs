//! # Product Source
//!
//! Binds the catalog fetcher to a cache key and hands both to the query
//! client. This type adds no policy of its own.

use storefront_core::{CatalogProduct, ProductId};

use crate::config::{CatalogConfig, DEFAULT_CACHE_KEY};
use crate::error::CatalogResult;
use crate::http::{CatalogFetcher, HttpCatalog};
use crate::query::{MemoryQueryClient, QueryClient, QueryResult};

/// The catalog snapshot type shared through the query client.
pub type Products = Vec<CatalogProduct>;

/// The product source the terminal app runs with.
pub type DefaultProductSource = ProductSource<HttpCatalog, MemoryQueryClient<Products>>;

/// Exposes the remote catalog and its fetch status to any consumer.
#[derive(Debug)]
pub struct ProductSource<F, Q> {
    fetcher: F,
    query: Q,
    key: String,
}

impl<F, Q> ProductSource<F, Q>
where
    F: CatalogFetcher,
    Q: QueryClient<Products>,
{
    pub fn new(fetcher: F, query: Q) -> Self {
        Self::with_key(fetcher, query, DEFAULT_CACHE_KEY)
    }

    pub fn with_key(fetcher: F, query: Q, key: impl Into<String>) -> Self {
        ProductSource {
            fetcher,
            query,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fetches the catalog through the query client and returns its state.
    pub async fn products(&self) -> QueryResult<Products> {
        let fetcher = &self.fetcher;
        self.query
            .fetch(&self.key, move || fetcher.fetch_products())
            .await
    }

    /// Current state without fetching.
    pub fn state(&self) -> QueryResult<Products> {
        self.query.state(&self.key)
    }

    /// Marks the catalog stale; the next [`ProductSource::products`] refetches.
    pub fn refresh(&self) {
        self.query.invalidate(&self.key);
    }

    /// Looks a product up in the last fetched catalog.
    pub fn find(&self, id: ProductId) -> Option<CatalogProduct> {
        self.state()
            .data
            .and_then(|products| products.into_iter().find(|p| p.id == id))
    }
}

impl DefaultProductSource {
    /// Builds the HTTP-backed source described by `config`.
    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        let fetcher = HttpCatalog::new(config)?;
        let query = MemoryQueryClient::new(config.query.options());
        Ok(ProductSource::with_key(
            fetcher,
            query,
            config.query.cache_key.clone(),
        ))
    }
}
