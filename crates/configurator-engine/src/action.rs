//! Session state and the pure reducer that transitions it.
//!
//! Every change to a session goes through [`reduce`]: it takes the current
//! state and an [`Action`] and returns a new state, never mutating its
//! input. A rejected action leaves the caller holding the unchanged state.

use crate::{
    defaults::default_selection,
    error::Result,
    resolver::{resolve, ClearedSelection},
    selection::Selection,
};
use configurator_catalog::{
    Catalog, Category, ConfigOption, ConfiguratorInfo, IncompatibilityIndex, LoadedCatalog,
};
use configurator_core::{CategoryId, OptionId};
use tracing::debug;

/// Everything a configurator session holds.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    /// Metadata of the loaded configurator
    pub info: Option<ConfiguratorInfo>,
    /// Active categories and options
    pub catalog: Catalog,
    /// Incompatibility relation of the loaded configurator
    pub rules: IncompatibilityIndex,
    /// Current choice per category
    pub selection: Selection,
    /// Whether catalog editing is unlocked in the presentation layer
    pub admin_mode: bool,
}

impl ConfigState {
    /// State for a freshly loaded configurator, with default selections applied.
    #[must_use]
    pub fn from_loaded(loaded: LoadedCatalog) -> Self {
        let mut state = Self::default();
        state.install(loaded);
        let resolution = resolve(&state.selection, &state.catalog, &state.rules);
        state.selection = resolution.selection;
        state
    }

    fn install(&mut self, loaded: LoadedCatalog) {
        self.selection = default_selection(&loaded.catalog);
        self.info = Some(loaded.info);
        self.catalog = loaded.catalog;
        self.rules = loaded.rules;
    }
}

/// A state change request.
#[derive(Debug, Clone)]
pub enum Action {
    /// Choose an option; never rejected, unknown IDs are cleared by the resolver
    SelectOption {
        /// Category to choose in
        category_id: CategoryId,
        /// Chosen option
        option_id: OptionId,
    },
    /// Deselect a category, leaving it with no choice
    ClearSelection(CategoryId),
    /// Flip admin mode
    ToggleAdmin,
    /// Append a category
    AddCategory(Category),
    /// Replace a category's metadata, keeping its options
    UpdateCategory(Category),
    /// Remove a category and its options
    DeleteCategory(CategoryId),
    /// Append an option to a category
    AddOption {
        /// Owning category
        category_id: CategoryId,
        /// New option
        option: ConfigOption,
    },
    /// Replace an option (matched by ID)
    UpdateOption {
        /// Owning category
        category_id: CategoryId,
        /// Replacement option
        option: ConfigOption,
    },
    /// Remove an option
    DeleteOption {
        /// Owning category
        category_id: CategoryId,
        /// Option to remove
        option_id: OptionId,
    },
    /// Replace the selection wholesale without resolving it
    RestoreSelection(Selection),
    /// Replace catalog, rules and metadata, then apply default selections
    ReplaceCatalog(LoadedCatalog),
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectOption { .. } => "select_option",
            Self::ClearSelection(_) => "clear_selection",
            Self::ToggleAdmin => "toggle_admin",
            Self::AddCategory(_) => "add_category",
            Self::UpdateCategory(_) => "update_category",
            Self::DeleteCategory(_) => "delete_category",
            Self::AddOption { .. } => "add_option",
            Self::UpdateOption { .. } => "update_option",
            Self::DeleteOption { .. } => "delete_option",
            Self::RestoreSelection(_) => "restore_selection",
            Self::ReplaceCatalog(_) => "replace_catalog",
        }
    }
}

/// Result of applying an action.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The new state
    pub state: ConfigState,
    /// Selections the resolver cleared while applying the action
    pub cleared: Vec<ClearedSelection>,
}

/// Apply an action to a state.
///
/// Catalog changes and new choices are followed by a resolver pass.
/// Deselecting, toggling admin mode and restoring a selection are not:
/// removing a choice cannot introduce a conflict.
///
/// # Errors
/// Returns a catalog error if a catalog mutation violates an invariant; the
/// input state is untouched in that case.
pub fn reduce(state: &ConfigState, action: Action) -> Result<Transition> {
    debug!(action = action.name(), "reducing action");
    let mut next = state.clone();

    let needs_resolve = match action {
        Action::SelectOption {
            category_id,
            option_id,
        } => {
            next.selection.select(category_id, option_id);
            true
        }
        Action::ClearSelection(category_id) => {
            next.selection.clear(&category_id);
            false
        }
        Action::ToggleAdmin => {
            next.admin_mode = !next.admin_mode;
            false
        }
        Action::AddCategory(category) => {
            next.catalog.add_category(category)?;
            true
        }
        Action::UpdateCategory(category) => {
            next.catalog.update_category(category)?;
            true
        }
        Action::DeleteCategory(category_id) => {
            next.catalog.remove_category(&category_id)?;
            true
        }
        Action::AddOption {
            category_id,
            option,
        } => {
            next.catalog.add_option(&category_id, option)?;
            true
        }
        Action::UpdateOption {
            category_id,
            option,
        } => {
            next.catalog.update_option(&category_id, option)?;
            true
        }
        Action::DeleteOption {
            category_id,
            option_id,
        } => {
            next.catalog.remove_option(&category_id, &option_id)?;
            true
        }
        Action::RestoreSelection(selection) => {
            next.selection = selection;
            false
        }
        Action::ReplaceCatalog(loaded) => {
            next.install(loaded);
            true
        }
    };

    let mut cleared = Vec::new();
    if needs_resolve {
        let resolution = resolve(&next.selection, &next.catalog, &next.rules);
        next.selection = resolution.selection;
        cleared = resolution.cleared;
    }

    Ok(Transition {
        state: next,
        cleared,
    })
}
