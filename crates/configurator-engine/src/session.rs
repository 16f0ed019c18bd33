//! Session controller.
//!
//! A [`Session`] owns one configurator's state and is the single entry point
//! for changes to it. User actions apply immediately. Catalog edits are
//! validated locally, sent to the data store, and applied only once the
//! store has accepted them; a failed round trip leaves the state as it was.

use crate::{
    action::{reduce, Action, ConfigState},
    error::{EngineError, Result},
    events::{EventBus, SessionEvent},
    pricing::calculate_total,
    quote::{ContactDetails, QuoteReceipt, QuoteRequest, QuoteSnapshot},
    resolver::{conflicting_categories, resolve, ClearedSelection},
    selection::Selection,
    store::DataStore,
};
use configurator_catalog::{Catalog, Category, ConfigOption, IncompatibilityIndex, LoadedCatalog};
use configurator_core::{
    CategoryId, ConfiguratorId, EditToken, OptionId, Price, SessionConfig,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// One user's configurator session.
pub struct Session {
    store: Arc<dyn DataStore>,
    state: ConfigState,
    token: Option<EditToken>,
    events: EventBus,
    notify_on_clear: bool,
}

impl Session {
    /// Create an empty session backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            state: ConfigState::default(),
            token: None,
            events: EventBus::new(config.events_capacity),
            notify_on_clear: config.notify_on_clear,
        }
    }

    /// Attach the edit token used for catalog changes.
    #[must_use]
    pub fn with_token(mut self, token: EditToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Replace or remove the edit token.
    pub fn set_token(&mut self, token: Option<EditToken>) {
        self.token = token;
    }

    /// Fetch a configurator from the store and install it.
    pub async fn load(&mut self, public_id: &ConfiguratorId) -> Result<Vec<ClearedSelection>> {
        info!(public_id = %public_id, store = self.store.store_id(), "loading configurator");
        let snapshot = self.store.fetch_configurator(public_id).await?;
        self.replace_catalog(snapshot.into_loaded())
    }

    /// Install a freshly fetched catalog: replaces catalog, rules and
    /// metadata, applies default selections and resolves.
    pub fn replace_catalog(&mut self, loaded: LoadedCatalog) -> Result<Vec<ClearedSelection>> {
        let public_id = loaded.info.public_id.clone();
        let cleared = self.dispatch(Action::ReplaceCatalog(loaded))?;

        self.events.publish(SessionEvent::CatalogLoaded {
            public_id,
            categories: self.state.catalog.len(),
            rules: self.state.rules.len(),
        });
        Ok(cleared)
    }

    /// Apply an action to the session state and publish the resulting events.
    ///
    /// Catalog actions applied here bypass the data store; use the async
    /// edit methods to persist them.
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<ClearedSelection>> {
        let name = action.name();
        let catalog_edit = matches!(
            action,
            Action::AddCategory(_)
                | Action::UpdateCategory(_)
                | Action::DeleteCategory(_)
                | Action::AddOption { .. }
                | Action::UpdateOption { .. }
                | Action::DeleteOption { .. }
        );

        let transition = reduce(&self.state, action)?;
        let admin_changed = transition.state.admin_mode != self.state.admin_mode;
        let selection_changed = transition.state.selection != self.state.selection;
        self.state = transition.state;

        if catalog_edit {
            self.events.publish(SessionEvent::CatalogChanged { action: name });
        }
        if admin_changed {
            self.events.publish(SessionEvent::AdminModeChanged {
                enabled: self.state.admin_mode,
            });
        }
        if selection_changed {
            self.events.publish(SessionEvent::SelectionChanged {
                selection: self.state.selection.to_raw(),
            });
        }
        self.announce_cleared(&transition.cleared);

        Ok(transition.cleared)
    }

    /// Choose an option. Never rejected; returns what the resolver cleared.
    pub fn select_option(
        &mut self,
        category_id: CategoryId,
        option_id: OptionId,
    ) -> Result<Vec<ClearedSelection>> {
        self.dispatch(Action::SelectOption {
            category_id,
            option_id,
        })
    }

    /// Deselect a category. Clearing an unselected category is a no-op.
    pub fn clear_selection(&mut self, category_id: CategoryId) -> Result<()> {
        self.dispatch(Action::ClearSelection(category_id)).map(|_| ())
    }

    /// Replace the selection wholesale without checking it.
    ///
    /// Call [`Session::resolve`] afterwards to drop stale or conflicting entries.
    pub fn restore_selection(&mut self, selection: Selection) -> Result<()> {
        self.dispatch(Action::RestoreSelection(selection)).map(|_| ())
    }

    /// Run a resolver pass over the current state.
    pub fn resolve(&mut self) -> Vec<ClearedSelection> {
        let resolution = resolve(&self.state.selection, &self.state.catalog, &self.state.rules);
        if !resolution.is_clean() {
            self.state.selection = resolution.selection;
            self.events.publish(SessionEvent::SelectionChanged {
                selection: self.state.selection.to_raw(),
            });
        }
        self.announce_cleared(&resolution.cleared);
        resolution.cleared
    }

    /// Flip admin mode; returns the new value.
    pub fn toggle_admin(&mut self) -> Result<bool> {
        self.dispatch(Action::ToggleAdmin)?;
        Ok(self.state.admin_mode)
    }

    /// Create a category in the store, then add it locally.
    ///
    /// The store assigns the ID; `category.id` is only used for the local
    /// check and is replaced by the one the store returns.
    pub async fn add_category(&mut self, category: Category) -> Result<Vec<ClearedSelection>> {
        let token = self.require_token()?;
        let configurator_id = self
            .state
            .info
            .as_ref()
            .map(|info| info.public_id.clone())
            .ok_or(EngineError::NotLoaded)?;
        reduce(&self.state, Action::AddCategory(category.clone()))?;

        let created = self
            .store
            .create_category(token, &configurator_id, &category)
            .await
            .inspect_err(|e| warn!(category_id = %category.id, error = %e, "create category failed"))?;

        self.dispatch(Action::AddCategory(created))
    }

    /// Update a category in the store, then locally.
    pub async fn update_category(&mut self, category: Category) -> Result<Vec<ClearedSelection>> {
        let token = self.require_token()?;
        reduce(&self.state, Action::UpdateCategory(category.clone()))?;

        self.store
            .update_category(token, &category)
            .await
            .inspect_err(|e| warn!(category_id = %category.id, error = %e, "update category failed"))?;

        self.dispatch(Action::UpdateCategory(category))
    }

    /// Delete a category in the store, then locally.
    pub async fn delete_category(
        &mut self,
        category_id: CategoryId,
    ) -> Result<Vec<ClearedSelection>> {
        let token = self.require_token()?;
        reduce(&self.state, Action::DeleteCategory(category_id.clone()))?;

        self.store
            .delete_category(token, &category_id)
            .await
            .inspect_err(|e| warn!(category_id = %category_id, error = %e, "delete category failed"))?;

        self.dispatch(Action::DeleteCategory(category_id))
    }

    /// Create an option in the store, then add it locally under the ID the
    /// store assigns.
    pub async fn add_option(
        &mut self,
        category_id: CategoryId,
        option: ConfigOption,
    ) -> Result<Vec<ClearedSelection>> {
        let token = self.require_token()?;
        reduce(
            &self.state,
            Action::AddOption {
                category_id: category_id.clone(),
                option: option.clone(),
            },
        )?;

        let created = self
            .store
            .create_option(token, &category_id, &option)
            .await
            .inspect_err(|e| warn!(option_id = %option.id, error = %e, "create option failed"))?;

        self.dispatch(Action::AddOption {
            category_id,
            option: created,
        })
    }

    /// Update an option in the store, then locally.
    pub async fn update_option(
        &mut self,
        category_id: CategoryId,
        option: ConfigOption,
    ) -> Result<Vec<ClearedSelection>> {
        let token = self.require_token()?;
        reduce(
            &self.state,
            Action::UpdateOption {
                category_id: category_id.clone(),
                option: option.clone(),
            },
        )?;

        self.store
            .update_option(token, &category_id, &option)
            .await
            .inspect_err(|e| warn!(option_id = %option.id, error = %e, "update option failed"))?;

        self.dispatch(Action::UpdateOption {
            category_id,
            option,
        })
    }

    /// Delete an option in the store, then locally.
    pub async fn delete_option(
        &mut self,
        category_id: CategoryId,
        option_id: OptionId,
    ) -> Result<Vec<ClearedSelection>> {
        let token = self.require_token()?;
        reduce(
            &self.state,
            Action::DeleteOption {
                category_id: category_id.clone(),
                option_id: option_id.clone(),
            },
        )?;

        self.store
            .delete_option(token, &category_id, &option_id)
            .await
            .inspect_err(|e| warn!(option_id = %option_id, error = %e, "delete option failed"))?;

        self.dispatch(Action::DeleteOption {
            category_id,
            option_id,
        })
    }

    /// Total price of the current selection.
    #[must_use]
    pub fn calculate_total(&self) -> Price {
        calculate_total(&self.state.selection, &self.state.catalog)
    }

    /// Freeze the current configuration for quoting.
    pub fn quote_snapshot(&self) -> Result<QuoteSnapshot> {
        QuoteSnapshot::capture(&self.state)
    }

    /// Required categories that have no resolved selection.
    #[must_use]
    pub fn missing_required(&self) -> Vec<CategoryId> {
        self.state
            .catalog
            .categories()
            .iter()
            .filter(|category| {
                category.is_required
                    && self
                        .state
                        .selection
                        .get(&category.id)
                        .and_then(|option_id| category.option(option_id))
                        .is_none()
            })
            .map(|category| category.id.clone())
            .collect()
    }

    /// Submit a quote for the current configuration.
    pub async fn submit_quote(&self, contact: ContactDetails) -> Result<QuoteReceipt> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(EngineError::IncompleteSelection {
                category_ids: missing.iter().map(ToString::to_string).collect(),
            });
        }

        let request = QuoteRequest::new(self.quote_snapshot()?, contact)?;
        let receipt = self.store.submit_quote(&request).await?;
        info!(
            quote_code = %receipt.quote_code,
            total = %request.snapshot.total_price,
            "quote submitted"
        );
        Ok(receipt)
    }

    /// Whether choosing an option would conflict with another category's
    /// current selection. Unknown options are not blocked.
    #[must_use]
    pub fn is_option_blocked(&self, category_id: &CategoryId, option_id: &OptionId) -> bool {
        self.state
            .catalog
            .option(category_id, option_id)
            .is_some_and(|option| {
                !conflicting_categories(
                    category_id,
                    option,
                    &self.state.selection,
                    &self.state.catalog,
                    &self.state.rules,
                )
                .is_empty()
            })
    }

    /// Subscribe to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Full session state.
    #[must_use]
    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    /// Current catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    /// Current incompatibility rules.
    #[must_use]
    pub fn rules(&self) -> &IncompatibilityIndex {
        &self.state.rules
    }

    /// Whether admin mode is on.
    #[must_use]
    pub fn is_admin_mode(&self) -> bool {
        self.state.admin_mode
    }

    fn require_token(&self) -> Result<&EditToken> {
        self.token.as_ref().ok_or(EngineError::MissingCredential)
    }

    fn announce_cleared(&self, cleared: &[ClearedSelection]) {
        if cleared.is_empty() {
            return;
        }
        debug!(cleared = cleared.len(), "selections adjusted by resolver");
        if self.notify_on_clear {
            self.events.publish(SessionEvent::SelectionsCleared {
                cleared: cleared.to_vec(),
            });
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store.store_id())
            .field("state", &self.state)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
