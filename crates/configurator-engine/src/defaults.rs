//! Initial selection applied whenever a catalog is (re)loaded.

use crate::selection::Selection;
use configurator_catalog::{Catalog, Category, ConfigOption};

/// Option a category starts with, if any.
///
/// Primary categories take their default option, falling back to the first
/// option. Other categories take the first free option, so an optional
/// add-on never inflates the starting price.
#[must_use]
pub fn default_option(category: &Category) -> Option<&ConfigOption> {
    if category.is_primary {
        category
            .default_option()
            .or_else(|| category.options.first())
    } else {
        category.options.iter().find(|opt| opt.price.is_zero())
    }
}

/// Build the starting selection for a catalog.
#[must_use]
pub fn default_selection(catalog: &Catalog) -> Selection {
    let mut selection = Selection::new();
    for category in catalog.categories() {
        if let Some(option) = default_option(category) {
            selection.assign(category.id.clone(), option.id.clone());
        }
    }
    selection
}
