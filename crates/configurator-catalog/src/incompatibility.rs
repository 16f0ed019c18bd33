//! Symmetric incompatibility relation over SKUs.

use crate::definition::ConfigOption;
use configurator_core::Sku;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A rule forbidding two SKUs from being selected together.
///
/// Orientation is irrelevant: `{from: A, to: B}` and `{from: B, to: A}`
/// express the same constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Incompatibility {
    /// One side of the pair
    pub from: Sku,
    /// The other side of the pair
    pub to: Sku,
}

impl Incompatibility {
    /// Create a rule.
    #[must_use]
    pub fn new(from: Sku, to: Sku) -> Self {
        Self { from, to }
    }

    /// The pair with its two sides sorted, used as the index key.
    fn normalized(self) -> (Sku, Sku) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

/// Index answering "may these two options coexist?".
///
/// Pairs are stored with sorted sides, so a rule listed in both orientations
/// is a single entry and lookups are commutative by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncompatibilityIndex {
    pairs: HashSet<(Sku, Sku)>,
}

impl IncompatibilityIndex {
    /// Create an empty index (everything compatible).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from rules.
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = Incompatibility>) -> Self {
        let mut index = Self::new();
        index.set_rules(rules);
        index
    }

    /// Replace the entire relation.
    pub fn set_rules(&mut self, rules: impl IntoIterator<Item = Incompatibility>) {
        self.pairs = rules.into_iter().map(Incompatibility::normalized).collect();
        debug!(pairs = self.pairs.len(), "replaced incompatibility rules");
    }

    /// Number of distinct constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether two SKUs are forbidden together.
    #[must_use]
    pub fn contains_pair(&self, a: &Sku, b: &Sku) -> bool {
        let key = Incompatibility::new(a.clone(), b.clone()).normalized();
        self.pairs.contains(&key)
    }

    /// Whether two options may not be selected together.
    ///
    /// Always `false` when either option has no SKU.
    #[must_use]
    pub fn are_incompatible(&self, a: &ConfigOption, b: &ConfigOption) -> bool {
        match (&a.sku, &b.sku) {
            (Some(sku_a), Some(sku_b)) => self.contains_pair(sku_a, sku_b),
            _ => false,
        }
    }

    /// The constraints, sorted, one entry per pair.
    #[must_use]
    pub fn rules(&self) -> Vec<Incompatibility> {
        let mut rules: Vec<Incompatibility> = self
            .pairs
            .iter()
            .map(|(from, to)| Incompatibility::new(from.clone(), to.clone()))
            .collect();
        rules.sort_by(|x, y| (&x.from, &x.to).cmp(&(&y.from, &y.to)));
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_core::{OptionId, Price};

    fn sku(s: &str) -> Sku {
        Sku::new(s).expect("valid SKU")
    }

    fn option(id: &str, sku_value: Option<&str>) -> ConfigOption {
        let opt = ConfigOption::new(
            OptionId::new(id).expect("valid option ID"),
            id,
            Price::ZERO,
        );
        match sku_value {
            Some(s) => opt.with_sku(sku(s)),
            None => opt,
        }
    }

    #[test]
    fn test_symmetry() {
        let index = IncompatibilityIndex::from_rules([Incompatibility::new(sku("B"), sku("T"))]);
        let blue = option("blue", Some("B"));
        let titanium = option("titanium", Some("T"));

        assert!(index.are_incompatible(&blue, &titanium));
        assert!(index.are_incompatible(&titanium, &blue));
    }

    #[test]
    fn test_no_sku_immunity() {
        let index = IncompatibilityIndex::from_rules([Incompatibility::new(sku("B"), sku("T"))]);
        let bare = option("bare", None);
        let titanium = option("titanium", Some("T"));

        assert!(!index.are_incompatible(&bare, &titanium));
        assert!(!index.are_incompatible(&titanium, &bare));
        assert!(!index.are_incompatible(&bare, &bare));
    }

    #[test]
    fn test_unrelated_pair_is_compatible() {
        let index = IncompatibilityIndex::from_rules([Incompatibility::new(sku("B"), sku("T"))]);
        assert!(!index.are_incompatible(&option("red", Some("R")), &option("ti", Some("T"))));
    }

    #[test]
    fn test_both_orientations_dedup() {
        let index = IncompatibilityIndex::from_rules([
            Incompatibility::new(sku("B"), sku("T")),
            Incompatibility::new(sku("T"), sku("B")),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.rules(), vec![Incompatibility::new(sku("B"), sku("T"))]);
    }

    #[test]
    fn test_set_rules_replaces() {
        let mut index =
            IncompatibilityIndex::from_rules([Incompatibility::new(sku("B"), sku("T"))]);
        index.set_rules([Incompatibility::new(sku("R"), sku("S"))]);

        assert_eq!(index.len(), 1);
        assert!(!index.contains_pair(&sku("B"), &sku("T")));
        assert!(index.contains_pair(&sku("S"), &sku("R")));

        index.set_rules(Vec::new());
        assert!(index.is_empty());
    }
}
