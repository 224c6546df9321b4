//! A session: one CLI invocation or one MCP connection.
//!
//! The expense collection is durable and shared by all sessions. The filter selectors and the
//! per-row edit state live only as long as the `Session`.

use crate::storage::{FileStore, MemoryStore};
use crate::store::ExpenseStore;
use crate::view::{FilteredView, Rows};
use crate::{Config, Result};

#[derive(Debug)]
pub struct Session {
    store: ExpenseStore<FileStore>,
    view: FilteredView<MemoryStore>,
    rows: Rows,
    currency_symbol: String,
}

impl Session {
    /// Loads the expense collection and starts with fresh session storage.
    pub async fn open(config: &Config) -> Result<Self> {
        Self::open_with(config, MemoryStore::new()).await
    }

    /// Loads the expense collection and the filter selectors held in `session_storage`.
    pub async fn open_with(config: &Config, session_storage: MemoryStore) -> Result<Self> {
        Ok(Self {
            store: config.open_store().await?,
            view: FilteredView::load(session_storage).await,
            rows: Rows::new(),
            currency_symbol: config.currency_symbol().to_string(),
        })
    }

    pub fn store(&self) -> &ExpenseStore<FileStore> {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut ExpenseStore<FileStore> {
        &mut self.store
    }

    pub fn view(&self) -> &FilteredView<MemoryStore> {
        &self.view
    }

    pub(crate) fn view_mut(&mut self) -> &mut FilteredView<MemoryStore> {
        &mut self.view
    }

    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Rows {
        &mut self.rows
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }
}
