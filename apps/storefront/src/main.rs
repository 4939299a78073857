//! # Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront (terminal)                            │
//! │                                                                         │
//! │  main.rs ────► Parses flags                                             │
//! │                                                                         │
//! │  lib.rs ─────► Logging, config, product source, command loop            │
//! │                                                                         │
//! │  storefront-catalog ──► GET <catalog url>                               │
//! │  storefront-core ─────► Cart store                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs for better testability
    storefront_lib::run(storefront_lib::Cli::parse())
}
