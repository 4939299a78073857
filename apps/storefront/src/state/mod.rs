//! # State Module
//!
//! Application state owned by the app root.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────┐          │
//! │  │      Session         │        │     DisplayConfig        │          │
//! │  │                      │        │                          │          │
//! │  │  id (uuid)           │        │  store_name              │          │
//! │  │  started_at          │        │  currency_symbol         │          │
//! │  │  CartStore           │        │                          │          │
//! │  └──────────────────────┘        └──────────────────────────┘          │
//! │                                                                         │
//! │  • Session: mutated only through CartStore's four operations           │
//! │  • DisplayConfig: read-only after initialization                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::DisplayConfig;
pub use session::Session;
