//! # App Root
//!
//! Owns the session and the product source, reads commands, and hands each
//! one to the view that handles it.
//!
//! ## Command Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    App::run                                             │
//! │                                                                         │
//! │  welcome ──► products (initial fetch) ──► prompt ◄──────────────┐      │
//! │                                             │                    │      │
//! │                                        read line                 │      │
//! │                                             │                    │      │
//! │                  EOF / quit ◄───────── Command::parse            │      │
//! │                      │                      │                    │      │
//! │                      ▼                      ▼                    │      │
//! │                    done               App::execute ──────────────┤      │
//! │                                             │                    │      │
//! │                                  recoverable error               │      │
//! │                                  "Error: ..." ───────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog fetch is async; the loop is not. Each fetch is driven to
//! completion on the app's own runtime with `block_on`.

use std::io::{BufRead, Write};

use storefront_catalog::{CatalogFetcher, ProductSource, Products, QueryClient, QueryResult};
use storefront_core::{CartTotals, CatalogProduct, ProductId};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::commands::{Command, HELP};
use crate::error::{AppError, AppResult};
use crate::state::{DisplayConfig, Session};
use crate::terminal::Terminal;
use crate::view::{CartView, ProductList};

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App<F, Q> {
    session: Session,
    source: ProductSource<F, Q>,
    display: DisplayConfig,
    runtime: Runtime,
}

impl<F, Q> App<F, Q>
where
    F: CatalogFetcher,
    Q: QueryClient<Products>,
{
    /// Builds the app and the runtime its catalog fetches run on.
    pub fn new(source: ProductSource<F, Q>, display: DisplayConfig) -> AppResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let session = Session::new();
        info!(session_id = %session.id(), started_at = %session.started_at(), "Session started");

        Ok(App {
            session,
            source,
            display,
            runtime,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> AppResult<()> {
        let mut terminal = Terminal::new(input, output);
        terminal.write_line(&format!(
            "Welcome to {}! Type 'help' for commands.",
            self.display.store_name
        ))?;

        self.execute(Command::Products, &mut terminal)?;

        loop {
            terminal.prompt()?;
            let Some(line) = terminal.read_line()? else {
                debug!("End of input");
                break;
            };

            let outcome = Command::parse(&line).and_then(|command| match command {
                Some(command) => self.execute(command, &mut terminal),
                None => Ok(Flow::Continue),
            });

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if e.is_recoverable() => terminal.write_line(&format!("Error: {e}"))?,
                Err(e) => return Err(e),
            }
        }

        info!(session_id = %self.session.id(), "Session ended");
        Ok(())
    }

    fn execute<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        terminal: &mut Terminal<R, W>,
    ) -> AppResult<Flow> {
        match command {
            Command::Products => {
                debug!("products command");
                self.show_products(terminal)?;
            }
            Command::Refresh => {
                debug!("refresh command");
                self.source.refresh();
                self.show_products(terminal)?;
            }
            Command::Add(id) => {
                debug!(product_id = %id, "add_to_cart command");
                let product = self.lookup(id)?;
                self.session.store_mut().add_to_cart(&product);
                terminal.write_line(&format!("Added {} to your cart.", product.title))?;
            }
            Command::Qty(id, raw) => {
                debug!(product_id = %id, raw = %raw, "update_quantity command");
                let mut view = CartView::new(self.session.store_mut(), &self.display);
                view.edit_quantity(id, &raw);
                view.render(terminal.output_mut())?;
            }
            Command::Remove(id) => {
                debug!(product_id = %id, "remove_from_cart command");
                let mut view = CartView::new(self.session.store_mut(), &self.display);
                view.remove(id);
                view.render(terminal.output_mut())?;
            }
            Command::Clear => {
                debug!("clear_cart command");
                self.session.store_mut().clear_cart();
                terminal.write_line("Your cart has been cleared.")?;
            }
            Command::Cart => {
                debug!("get_cart command");
                CartView::new(self.session.store_mut(), &self.display)
                    .render(terminal.output_mut())?;
            }
            Command::Checkout => {
                debug!("checkout command");
                self.checkout(terminal)?;
            }
            Command::Help => terminal.write_line(HELP)?,
            Command::Quit => {
                debug!("quit command");
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    /// Renders the list, fetching through the query client first.
    fn show_products<R: BufRead, W: Write>(
        &mut self,
        terminal: &mut Terminal<R, W>,
    ) -> AppResult<()> {
        // An earlier error is not current while the refetch runs.
        if self.source.state().data.is_none() {
            ProductList::new(&QueryResult::pending(), &self.display)
                .render(terminal.output_mut())?;
        }

        let state = self.runtime.block_on(self.source.products());
        info!(
            status = %state.status,
            products = state.data.as_ref().map_or(0, Vec::len),
            "Catalog state"
        );

        ProductList::new(&state, &self.display).render(terminal.output_mut())?;
        Ok(())
    }

    /// Finds a product in the catalog, fetching it once if nothing has been
    /// loaded yet.
    fn lookup(&mut self, id: ProductId) -> AppResult<CatalogProduct> {
        if let Some(product) = self.source.find(id) {
            return Ok(product);
        }

        if self.source.state().data.is_none() {
            let state = self.runtime.block_on(self.source.products());
            if let Some(error) = state.error {
                return Err(error.into());
            }
        }

        self.source.find(id).ok_or(AppError::UnknownProduct(id))
    }

    fn checkout<R: BufRead, W: Write>(&mut self, terminal: &mut Terminal<R, W>) -> AppResult<()> {
        let totals = CartTotals::from(self.session.store().cart());

        let confirmation =
            CartView::new(self.session.store_mut(), &self.display).checkout(terminal);

        match confirmation {
            Some(order) => {
                info!(
                    session_id = %self.session.id(),
                    items = totals.item_count,
                    quantity = totals.total_quantity,
                    total = %order.total,
                    "Order placed"
                );
            }
            None => terminal.write_line("Your cart is empty.")?,
        }

        Ok(())
    }
}
