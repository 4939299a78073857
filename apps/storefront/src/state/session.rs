//! # Session State
//!
//! The application root's state: one session, one cart store.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App ──owns──► Session ──owns──► CartStore ──owns──► Cart               │
//! │                                       │                                 │
//! │                 CartView::new(&mut store, ..)   (borrowed per command)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Views borrow the store for the length of one command. Nothing else can
//! reach it, so a view can never exist without a store behind it.

use chrono::{DateTime, Utc};
use storefront_core::CartStore;
use uuid::Uuid;

/// One shopping session. The cart starts empty and dies with the session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    store: CartStore,
}

impl Session {
    /// Starts a new session with an empty cart.
    pub fn new() -> Self {
        Session {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            store: CartStore::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Read access to the cart store.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Write access to the cart store.
    pub fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
