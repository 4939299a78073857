//! # Storefront Terminal Library
//!
//! Core library for the storefront terminal application.
//! This is the main entry point that loads configuration and runs the
//! command loop.
//!
//! ## Module Organization
//! ```text
//! storefront_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── app.rs          ◄─── App root: session, product source, command loop
//! ├── commands.rs     ◄─── Command vocabulary and parser
//! ├── terminal.rs     ◄─── Line I/O and the confirmation prompt
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Session owning the cart store
//! │   └── config.rs   ◄─── Display configuration
//! ├── view/
//! │   ├── cart.rs     ◄─── Cart view and checkout
//! │   ├── products.rs ◄─── Product list
//! │   └── confirm.rs  ◄─── Confirmation surface trait
//! └── error.rs        ◄─── App error type
//! ```

pub mod app;
pub mod commands;
pub mod error;
pub mod state;
pub mod terminal;
pub mod view;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use storefront_catalog::{CatalogConfig, DefaultProductSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use state::DisplayConfig;

/// Browse the catalog, fill a cart, check out.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about)]
pub struct Cli {
    /// Path to a storefront.toml config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Catalog endpoint URL, overriding config and environment
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Runs the terminal application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info, debug for storefront crates; RUST_LOG overrides    │
/// │                                                                         │
/// │  2. Load Catalog Config ──────────────────────────────────────────────► │
/// │     • storefront.toml, then STOREFRONT_* env, then --endpoint           │
/// │                                                                         │
/// │  3. Build Product Source ─────────────────────────────────────────────► │
/// │     • HttpCatalog + MemoryQueryClient                                   │
/// │                                                                         │
/// │  4. Run the Command Loop on stdin/stdout ─────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();

    info!("Starting storefront");

    let mut config =
        CatalogConfig::load(cli.config).context("Failed to load catalog configuration")?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint.url = endpoint;
        config.validate().context("Invalid --endpoint")?;
    }
    info!(endpoint = %config.endpoint.url, "Catalog configured");

    let source =
        DefaultProductSource::from_config(&config).context("Failed to build catalog client")?;
    let display = DisplayConfig::from_env();

    let mut app = App::new(source, display).context("Failed to start runtime")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    app.run(stdin.lock(), stdout.lock())?;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_catalog=trace` - Trace the catalog client only
/// - Default: INFO, DEBUG for the storefront crates
///
/// Logs go to stderr so they never interleave with the command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,storefront=debug,storefront_lib=debug,storefront_catalog=debug")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
