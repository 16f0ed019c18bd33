//! Data store seam.
//!
//! The engine never persists anything itself. Catalog edits and quotes are
//! sent to a [`DataStore`]; the session only applies a change locally once
//! the store has accepted it.

use crate::{
    error::{StoreError, StoreResult},
    quote::{QuoteReceipt, QuoteRequest},
};
use async_trait::async_trait;
use configurator_catalog::{Category, ConfigOption, ConfiguratorSnapshot};
use configurator_core::{CategoryId, ConfiguratorId, EditToken, OptionId};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Remote persistence for configurators, catalogs and quotes.
///
/// Implementations must be thread-safe (Send + Sync) so a session can be
/// driven from any async context.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch a configurator with its categories and incompatibility rules.
    async fn fetch_configurator(&self, public_id: &ConfiguratorId)
        -> StoreResult<ConfiguratorSnapshot>;

    /// Create a category; returns the category as persisted.
    async fn create_category(
        &self,
        token: &EditToken,
        configurator_id: &ConfiguratorId,
        category: &Category,
    ) -> StoreResult<Category>;

    /// Update a category's metadata.
    async fn update_category(&self, token: &EditToken, category: &Category) -> StoreResult<()>;

    /// Delete a category.
    async fn delete_category(&self, token: &EditToken, category_id: &CategoryId)
        -> StoreResult<()>;

    /// Create an option; returns the option as persisted.
    async fn create_option(
        &self,
        token: &EditToken,
        category_id: &CategoryId,
        option: &ConfigOption,
    ) -> StoreResult<ConfigOption>;

    /// Update an option.
    async fn update_option(
        &self,
        token: &EditToken,
        category_id: &CategoryId,
        option: &ConfigOption,
    ) -> StoreResult<()>;

    /// Delete an option.
    async fn delete_option(
        &self,
        token: &EditToken,
        category_id: &CategoryId,
        option_id: &OptionId,
    ) -> StoreResult<()>;

    /// Submit a quote request.
    async fn submit_quote(&self, request: &QuoteRequest) -> StoreResult<QuoteReceipt>;

    /// Get the unique identifier for this store.
    fn store_id(&self) -> &str;
}

/// In-process store backed by snapshots held in memory.
///
/// Serves snapshots loaded from files, accepts every edit as-is and issues
/// sequential quote codes. A failure can be queued to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<ConfiguratorId, ConfiguratorSnapshot>>,
    quotes: Mutex<Vec<QuoteRequest>>,
    calls: Mutex<Vec<&'static str>>,
    next_failure: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store serving one snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: ConfiguratorSnapshot) -> Self {
        let store = Self::new();
        store.insert(snapshot);
        store
    }

    /// Add or replace a snapshot.
    pub fn insert(&self, snapshot: ConfiguratorSnapshot) {
        self.snapshots
            .lock()
            .expect("snapshots lock poisoned")
            .insert(snapshot.public_id.clone(), snapshot);
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: StoreError) {
        *self.next_failure.lock().expect("failure lock poisoned") = Some(error);
    }

    /// Operations received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Quote requests received so far.
    #[must_use]
    pub fn quotes(&self) -> Vec<QuoteRequest> {
        self.quotes.lock().expect("quotes lock poisoned").clone()
    }

    fn record(&self, operation: &'static str) -> StoreResult<()> {
        debug!(operation, "memory store call");
        self.calls.lock().expect("calls lock poisoned").push(operation);
        match self.next_failure.lock().expect("failure lock poisoned").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn fetch_configurator(
        &self,
        public_id: &ConfiguratorId,
    ) -> StoreResult<ConfiguratorSnapshot> {
        self.record("fetch_configurator")?;
        self.snapshots
            .lock()
            .expect("snapshots lock poisoned")
            .get(public_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                resource: "configurator",
                id: public_id.to_string(),
            })
    }

    async fn create_category(
        &self,
        _token: &EditToken,
        _configurator_id: &ConfiguratorId,
        category: &Category,
    ) -> StoreResult<Category> {
        self.record("create_category")?;
        Ok(category.clone())
    }

    async fn update_category(&self, _token: &EditToken, _category: &Category) -> StoreResult<()> {
        self.record("update_category")
    }

    async fn delete_category(
        &self,
        _token: &EditToken,
        _category_id: &CategoryId,
    ) -> StoreResult<()> {
        self.record("delete_category")
    }

    async fn create_option(
        &self,
        _token: &EditToken,
        _category_id: &CategoryId,
        option: &ConfigOption,
    ) -> StoreResult<ConfigOption> {
        self.record("create_option")?;
        Ok(option.clone())
    }

    async fn update_option(
        &self,
        _token: &EditToken,
        _category_id: &CategoryId,
        _option: &ConfigOption,
    ) -> StoreResult<()> {
        self.record("update_option")
    }

    async fn delete_option(
        &self,
        _token: &EditToken,
        _category_id: &CategoryId,
        _option_id: &OptionId,
    ) -> StoreResult<()> {
        self.record("delete_option")
    }

    async fn submit_quote(&self, request: &QuoteRequest) -> StoreResult<QuoteReceipt> {
        self.record("submit_quote")?;
        let mut quotes = self.quotes.lock().expect("quotes lock poisoned");
        quotes.push(request.clone());
        Ok(QuoteReceipt {
            quote_code: format!("Q-{:06}", quotes.len()),
        })
    }

    fn store_id(&self) -> &str {
        "memory"
    }
}
