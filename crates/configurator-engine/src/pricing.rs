//! Price aggregation.

use crate::selection::Selection;
use configurator_catalog::Catalog;
use configurator_core::Price;

/// Sum of the prices of all selected options that resolve against the catalog.
///
/// Selections pointing at missing categories or options contribute nothing.
#[must_use]
pub fn calculate_total(selection: &Selection, catalog: &Catalog) -> Price {
    selection
        .resolved(catalog)
        .into_iter()
        .map(|(_, option)| option.price)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_catalog::{Category, ConfigOption};
    use configurator_core::{CategoryId, OptionId};

    fn catalog() -> Catalog {
        let opt = |id: &str, price: &str| {
            ConfigOption::new(
                OptionId::new(id).expect("valid option ID"),
                id,
                Price::parse(price).expect("valid price"),
            )
        };
        Catalog::from_categories(vec![
            Category::new(CategoryId::new("color").expect("valid category ID"), "Color")
                .with_option(opt("red", "0"))
                .with_option(opt("blue", "10.5")),
            Category::new(CategoryId::new("material").expect("valid category ID"), "Material")
                .with_option(opt("steel", "0"))
                .with_option(opt("titanium", "50")),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn test_empty_selection_totals_zero() {
        assert_eq!(calculate_total(&Selection::new(), &catalog()), Price::ZERO);
    }

    #[test]
    fn test_total_sums_selected_prices() {
        let selection = Selection::from_raw([("color", "blue"), ("material", "steel")]);
        let total = calculate_total(&selection, &catalog());
        assert_eq!(total.to_string(), "10.50");
    }

    #[test]
    fn test_missing_option_contributes_nothing() {
        let selection = Selection::from_raw([("color", "blue"), ("material", "carbon")]);
        assert_eq!(calculate_total(&selection, &catalog()), Price::from_cents(1050));
    }

    #[test]
    fn test_total_is_stable() {
        let catalog = catalog();
        let selection = Selection::from_raw([("color", "blue"), ("material", "titanium")]);
        let first = calculate_total(&selection, &catalog);
        assert_eq!(first, calculate_total(&selection, &catalog));
        assert_eq!(first, Price::from_cents(6050));
    }
}
