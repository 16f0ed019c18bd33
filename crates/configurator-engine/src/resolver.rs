//! Consistency resolver.
//!
//! A resolver pass takes a selection and clears every entry that either no
//! longer resolves against the catalog or conflicts with another selected
//! option. The clear set is computed from the selection as it stood when
//! the pass started; clearing one category never rescues or condemns another
//! within the same pass.
//!
//! For each conflicting pair exactly one side loses: the category whose
//! selection was changed most recently, or on equal change sequences the one
//! later in catalog order. Every conflicting pair therefore loses a side, so
//! the result is conflict-free and a second pass clears nothing.

use crate::selection::Selection;
use configurator_catalog::{Catalog, ConfigOption, IncompatibilityIndex};
use configurator_core::{CategoryId, OptionId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Why a selection was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClearReason {
    /// The category or option no longer exists
    Orphaned,
    /// The option is incompatible with the selection of another category
    Conflict {
        /// Category holding the surviving side of the pair
        with: CategoryId,
    },
}

/// A selection removed by a resolver pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedSelection {
    /// Category whose selection was cleared
    pub category_id: CategoryId,
    /// Option that was selected
    pub option_id: OptionId,
    /// Why it was cleared
    pub reason: ClearReason,
}

/// Outcome of a resolver pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Consistent selection
    pub selection: Selection,
    /// What was cleared, orphans first, then conflicts in catalog order
    pub cleared: Vec<ClearedSelection>,
}

impl Resolution {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.cleared.is_empty()
    }

    /// Categories whose selection was cleared.
    #[must_use]
    pub fn cleared_categories(&self) -> Vec<&CategoryId> {
        self.cleared.iter().map(|c| &c.category_id).collect()
    }
}

struct Resolved<'a> {
    position: usize,
    category_id: &'a CategoryId,
    option: &'a ConfigOption,
    change_seq: u64,
}

impl Resolved<'_> {
    /// Sort key of the side that should give way: newer change, then later position.
    fn yield_rank(&self) -> (u64, usize) {
        (self.change_seq, self.position)
    }
}

/// Run a resolver pass. Pure; never fails.
#[must_use]
pub fn resolve(
    selection: &Selection,
    catalog: &Catalog,
    rules: &IncompatibilityIndex,
) -> Resolution {
    let mut cleared = Vec::new();
    let mut resolved = Vec::with_capacity(selection.len());

    for (category_id, option_id) in selection.iter() {
        let found = catalog.position(category_id).and_then(|position| {
            let option = catalog.categories()[position].option(option_id)?;
            Some((position, option))
        });

        match found {
            Some((position, option)) => resolved.push(Resolved {
                position,
                category_id,
                option,
                change_seq: selection.change_seq(category_id),
            }),
            None => {
                debug!(category_id = %category_id, option_id = %option_id, "clearing orphaned selection");
                cleared.push(ClearedSelection {
                    category_id: category_id.clone(),
                    option_id: option_id.clone(),
                    reason: ClearReason::Orphaned,
                });
            }
        }
    }
    resolved.sort_by_key(|r| r.position);

    // Loser -> winner of the first conflicting pair that condemned it.
    let mut losers: BTreeMap<usize, &CategoryId> = BTreeMap::new();
    for (i, a) in resolved.iter().enumerate() {
        for b in &resolved[i + 1..] {
            if !rules.are_incompatible(a.option, b.option) {
                continue;
            }
            let (loser, winner) = if b.yield_rank() > a.yield_rank() {
                (b, a)
            } else {
                (a, b)
            };
            losers.entry(loser.position).or_insert(winner.category_id);
        }
    }

    for r in &resolved {
        if let Some(&winner) = losers.get(&r.position) {
            debug!(
                category_id = %r.category_id,
                option_id = %r.option.id,
                with = %winner,
                "clearing conflicting selection"
            );
            cleared.push(ClearedSelection {
                category_id: r.category_id.clone(),
                option_id: r.option.id.clone(),
                reason: ClearReason::Conflict {
                    with: winner.clone(),
                },
            });
        }
    }

    let mut next = selection.clone();
    for entry in &cleared {
        next.clear(&entry.category_id);
    }

    if !cleared.is_empty() {
        info!(cleared = cleared.len(), "resolver cleared selections");
    }

    Resolution {
        selection: next,
        cleared,
    }
}

/// Categories whose current selection would conflict with choosing `option`
/// in `category_id`.
///
/// The category's own selection is ignored since choosing replaces it.
#[must_use]
pub fn conflicting_categories(
    category_id: &CategoryId,
    option: &ConfigOption,
    selection: &Selection,
    catalog: &Catalog,
    rules: &IncompatibilityIndex,
) -> Vec<CategoryId> {
    selection
        .resolved(catalog)
        .into_iter()
        .filter(|(category, selected)| {
            &category.id != category_id && rules.are_incompatible(option, selected)
        })
        .map(|(category, _)| category.id.clone())
        .collect()
}

/// Whether choosing `option` in `category_id` would conflict with the current selection.
#[must_use]
pub fn conflicts_with_selection(
    category_id: &CategoryId,
    option: &ConfigOption,
    selection: &Selection,
    catalog: &Catalog,
    rules: &IncompatibilityIndex,
) -> bool {
    !conflicting_categories(category_id, option, selection, catalog, rules).is_empty()
}
