//! The user's current choice per category.
//!
//! A [`Selection`] maps category IDs to option IDs. It does not check the
//! catalog: selecting an unknown ID is accepted and cleared by the next
//! resolver pass. Each explicit choice stamps the category with a change
//! sequence, which the resolver uses to decide which side of a conflict was
//! chosen last.

use configurator_catalog::{Catalog, Category, ConfigOption};
use configurator_core::{CategoryId, OptionId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Category to option mapping plus per-category change sequences.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Selection {
    chosen: BTreeMap<CategoryId, OptionId>,
    #[serde(skip)]
    changes: BTreeMap<CategoryId, u64>,
    #[serde(skip)]
    clock: u64,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a selection from its raw wire form.
    ///
    /// An empty option ID means "no selection". Entries whose IDs are not
    /// well-formed cannot reference anything and are dropped. Change
    /// sequences start from zero.
    #[must_use]
    pub fn from_raw<K, V>(raw: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut selection = Self::new();
        for (category, option) in raw {
            let (category, option) = (category.into(), option.into());
            if option.is_empty() {
                continue;
            }
            match (CategoryId::new(category.as_str()), OptionId::new(option.as_str())) {
                (Ok(category_id), Ok(option_id)) => selection.assign(category_id, option_id),
                _ => warn!(category = %category, option = %option, "dropping malformed selection entry"),
            }
        }
        selection
    }

    /// Raw wire form; categories without a selection are omitted.
    #[must_use]
    pub fn to_raw(&self) -> BTreeMap<String, String> {
        self.chosen
            .iter()
            .map(|(category, option)| (category.to_string(), option.to_string()))
            .collect()
    }

    /// Record an explicit user choice. Last write wins.
    pub fn select(&mut self, category_id: CategoryId, option_id: OptionId) {
        self.clock += 1;
        self.changes.insert(category_id.clone(), self.clock);
        self.chosen.insert(category_id, option_id);
    }

    /// Set a selection without stamping a change (defaults, restores).
    pub fn assign(&mut self, category_id: CategoryId, option_id: OptionId) {
        self.chosen.insert(category_id, option_id);
    }

    /// Remove the selection of a category.
    pub fn clear(&mut self, category_id: &CategoryId) -> Option<OptionId> {
        self.changes.remove(category_id);
        self.chosen.remove(category_id)
    }

    /// Selected option of a category, if any.
    #[must_use]
    pub fn get(&self, category_id: &CategoryId) -> Option<&OptionId> {
        self.chosen.get(category_id)
    }

    /// Whether a category has a selection.
    #[must_use]
    pub fn is_selected(&self, category_id: &CategoryId) -> bool {
        self.chosen.contains_key(category_id)
    }

    /// Change sequence of a category's last explicit choice (0 if never chosen).
    #[must_use]
    pub fn change_seq(&self, category_id: &CategoryId) -> u64 {
        self.changes.get(category_id).copied().unwrap_or(0)
    }

    /// All selections, ordered by category ID.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &OptionId)> {
        self.chosen.iter()
    }

    /// Number of categories with a selection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Selections that resolve against the catalog, in catalog order.
    #[must_use]
    pub fn resolved<'a>(&self, catalog: &'a Catalog) -> Vec<(&'a Category, &'a ConfigOption)> {
        catalog
            .categories()
            .iter()
            .filter_map(|category| {
                let option_id = self.get(&category.id)?;
                Some((category, category.option(option_id)?))
            })
            .collect()
    }
}

impl PartialEq for Selection {
    /// Two selections are equal when they choose the same options; change
    /// sequences are bookkeeping and do not take part.
    fn eq(&self, other: &Self) -> bool {
        self.chosen == other.chosen
    }
}

impl Eq for Selection {}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_core::Price;

    fn cat_id(id: &str) -> CategoryId {
        CategoryId::new(id).expect("valid category ID")
    }

    fn opt_id(id: &str) -> OptionId {
        OptionId::new(id).expect("valid option ID")
    }

    #[test]
    fn test_select_last_write_wins() {
        let mut selection = Selection::new();
        selection.select(cat_id("color"), opt_id("red"));
        selection.select(cat_id("color"), opt_id("blue"));

        assert_eq!(selection.get(&cat_id("color")), Some(&opt_id("blue")));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_change_sequences() {
        let mut selection = Selection::new();
        selection.assign(cat_id("size"), opt_id("small"));
        selection.select(cat_id("color"), opt_id("red"));
        selection.select(cat_id("material"), opt_id("steel"));

        assert_eq!(selection.change_seq(&cat_id("size")), 0);
        assert!(selection.change_seq(&cat_id("material")) > selection.change_seq(&cat_id("color")));

        selection.clear(&cat_id("material"));
        assert_eq!(selection.change_seq(&cat_id("material")), 0);
        assert!(!selection.is_selected(&cat_id("material")));
    }

    #[test]
    fn test_raw_round_trip_drops_empty_entries() {
        let selection = Selection::from_raw([
            ("color", "blue"),
            ("material", ""),
            ("   ", "x"),
        ]);

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.change_seq(&cat_id("color")), 0);

        let raw = selection.to_raw();
        assert_eq!(raw.get("color").map(String::as_str), Some("blue"));
        assert!(!raw.contains_key("material"));
    }

    #[test]
    fn test_equality_ignores_sequences() {
        let mut a = Selection::new();
        a.select(cat_id("color"), opt_id("red"));
        let b = Selection::from_raw([("color", "red")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolved_in_catalog_order() {
        let catalog = Catalog::from_categories(vec![
            Category::new(cat_id("material"), "Material")
                .with_option(ConfigOption::new(opt_id("steel"), "Steel", Price::ZERO)),
            Category::new(cat_id("color"), "Color")
                .with_option(ConfigOption::new(opt_id("red"), "Red", Price::ZERO)),
        ])
        .expect("valid catalog");

        let selection = Selection::from_raw([("color", "red"), ("material", "steel"), ("size", "xl")]);
        let resolved: Vec<&str> = selection
            .resolved(&catalog)
            .iter()
            .map(|(category, _)| category.id.as_str())
            .collect();

        assert_eq!(resolved, vec!["material", "color"]);
    }

    #[test]
    fn test_serializes_as_map() {
        let selection = Selection::from_raw([("color", "red")]);
        let json = serde_json::to_string(&selection).expect("serialize selection");
        assert_eq!(json, r#"{"color":"red"}"#);
    }
}
