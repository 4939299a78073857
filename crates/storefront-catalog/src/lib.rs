//! # storefront-catalog: Remote Product Source
//!
//! Fetches the product catalog and exposes it, with a fetch status, to any
//! consumer that lists products.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Product Source                                  │
//! │                                                                         │
//! │  consumer ──► ProductSource::products()                                 │
//! │                   │  key = "products"                                   │
//! │                   ▼                                                     │
//! │              QueryClient::fetch(key, fetcher)                           │
//! │                   │  fresh? in flight? retry?                           │
//! │                   ▼                                                     │
//! │              HttpCatalog::fetch_products()  ──►  GET /products          │
//! │                                                                         │
//! │  Result: QueryResult { status: Pending|Success|Error, data, error }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Endpoint and cache policy (TOML + env)
//! - [`http`] - reqwest-backed fetcher
//! - [`query`] - Query client trait and in-memory implementation
//! - [`source`] - The product source itself
//! - [`error`] - Catalog error types

pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod source;

pub use config::{CatalogConfig, DEFAULT_CACHE_KEY, DEFAULT_CATALOG_URL};
pub use error::{CatalogError, CatalogResult};
pub use http::{CatalogFetcher, HttpCatalog};
pub use query::{MemoryQueryClient, QueryClient, QueryOptions, QueryResult, QueryStatus};
pub use source::{DefaultProductSource, ProductSource, Products};
