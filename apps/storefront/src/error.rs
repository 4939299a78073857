//! # App Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Command Loop                       │
//! │                                                                         │
//! │  input line                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Command::parse ─── UnknownCommand / MissingArgument / InvalidProductId │
//! │      │                                    │                             │
//! │      ▼                                    ▼                             │
//! │  App::execute ──── UnknownProduct ──► "Error: ..." printed, loop goes on│
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  terminal write ── Io ──────────────► loop stops, error returned        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog failures never surface here during browsing: they are part of
//! the product list's state and rendered as such.

use std::io;

use storefront_catalog::CatalogError;
use storefront_core::{ProductId, ValidationError};
use thiserror::Error;

/// Errors raised while handling a terminal command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown command: {0} (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Invalid product id: {0}")]
    InvalidProductId(#[from] ValidationError),

    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Errors the command loop reports and moves past.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Io(_))
    }
}

/// Result type for app operations.
pub type AppResult<T> = Result<T, AppError>;
