//! In-memory catalog of categories and options.
//!
//! The catalog is an ordered list of categories. Every mutation validates
//! first and only then touches state, so a rejected mutation leaves the
//! catalog exactly as it was.

use crate::{
    definition::{Category, ConfigOption},
    error::{CatalogError, Result},
};
use configurator_core::{CategoryId, OptionId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Ordered collection of categories with lookup by ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, validating every category and ID uniqueness.
    pub fn from_categories(categories: Vec<Category>) -> Result<Self> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate the whole catalog.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(&category.id) {
                return Err(CatalogError::DuplicateCategory {
                    category_id: category.id.to_string(),
                });
            }
            category.validate()?;
        }
        Ok(())
    }

    /// Categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Get a category by ID.
    #[must_use]
    pub fn category(&self, category_id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|cat| &cat.id == category_id)
    }

    /// Position of a category in catalog order.
    #[must_use]
    pub fn position(&self, category_id: &CategoryId) -> Option<usize> {
        self.categories.iter().position(|cat| &cat.id == category_id)
    }

    /// Get an option by category and option ID.
    #[must_use]
    pub fn option(&self, category_id: &CategoryId, option_id: &OptionId) -> Option<&ConfigOption> {
        self.category(category_id)?.option(option_id)
    }

    /// Whether a category exists.
    #[must_use]
    pub fn contains(&self, category_id: &CategoryId) -> bool {
        self.position(category_id).is_some()
    }

    /// Append a new category.
    pub fn add_category(&mut self, category: Category) -> Result<()> {
        if self.contains(&category.id) {
            return Err(CatalogError::DuplicateCategory {
                category_id: category.id.to_string(),
            });
        }
        category.validate()?;

        debug!(category_id = %category.id, options = category.options.len(), "added category");
        self.categories.push(category);
        Ok(())
    }

    /// Replace a category's metadata.
    ///
    /// Options are managed through the option mutations: the incoming
    /// category's option list is ignored and the current options are kept.
    pub fn update_category(&mut self, mut category: Category) -> Result<()> {
        let index = self.require_position(&category.id)?;
        let current = &self.categories[index];

        if current.category_type != category.category_type && !current.options.is_empty() {
            return Err(CatalogError::CategoryTypeLocked {
                category_id: category.id.to_string(),
            });
        }

        category.options = current.options.clone();
        category.validate()?;

        debug!(category_id = %category.id, "updated category");
        self.categories[index] = category;
        Ok(())
    }

    /// Remove a category and all of its options.
    pub fn remove_category(&mut self, category_id: &CategoryId) -> Result<Category> {
        let index = self.require_position(category_id)?;
        let removed = self.categories.remove(index);
        debug!(category_id = %category_id, "removed category");
        Ok(removed)
    }

    /// Append an option to a category.
    pub fn add_option(&mut self, category_id: &CategoryId, option: ConfigOption) -> Result<()> {
        let index = self.require_position(category_id)?;
        let category = &self.categories[index];

        if category.option(&option.id).is_some() {
            return Err(CatalogError::DuplicateOption {
                category_id: category_id.to_string(),
                option_id: option.id.to_string(),
            });
        }
        if option.is_default && category.default_option().is_some() {
            return Err(CatalogError::MultipleDefaults {
                category_id: category_id.to_string(),
            });
        }
        category.validate_option(&option)?;

        debug!(category_id = %category_id, option_id = %option.id, "added option");
        self.categories[index].options.push(option);
        Ok(())
    }

    /// Replace an existing option (matched by ID).
    pub fn update_option(&mut self, category_id: &CategoryId, option: ConfigOption) -> Result<()> {
        let index = self.require_position(category_id)?;
        let category = &self.categories[index];

        let Some(slot) = category.options.iter().position(|opt| opt.id == option.id) else {
            return Err(CatalogError::OptionNotFound {
                category_id: category_id.to_string(),
                option_id: option.id.to_string(),
            });
        };
        let other_default = category
            .options
            .iter()
            .any(|opt| opt.is_default && opt.id != option.id);
        if option.is_default && other_default {
            return Err(CatalogError::MultipleDefaults {
                category_id: category_id.to_string(),
            });
        }
        category.validate_option(&option)?;

        debug!(category_id = %category_id, option_id = %option.id, "updated option");
        self.categories[index].options[slot] = option;
        Ok(())
    }

    /// Remove an option from its category.
    pub fn remove_option(
        &mut self,
        category_id: &CategoryId,
        option_id: &OptionId,
    ) -> Result<ConfigOption> {
        let index = self.require_position(category_id)?;
        let options = &mut self.categories[index].options;

        let slot = options
            .iter()
            .position(|opt| &opt.id == option_id)
            .ok_or_else(|| CatalogError::OptionNotFound {
                category_id: category_id.to_string(),
                option_id: option_id.to_string(),
            })?;

        debug!(category_id = %category_id, option_id = %option_id, "removed option");
        Ok(options.remove(slot))
    }

    fn require_position(&self, category_id: &CategoryId) -> Result<usize> {
        self.position(category_id)
            .ok_or_else(|| CatalogError::CategoryNotFound {
                category_id: category_id.to_string(),
            })
    }
}
