//! Rendering a session for the terminal.

use configurator_core::{CategoryId, DisplayConfig, Price};
use configurator_engine::{ClearReason, ClearedSelection, Session};
use serde::Serialize;
use std::fmt::Write as _;

/// One category row of the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    /// Category identifier
    pub category_id: CategoryId,
    /// Category name
    pub category: String,
    /// Selected option label, if any
    pub option: Option<String>,
    /// Selected option price, if any
    pub price: Option<Price>,
    /// Labels of options that conflict with the current selection
    pub blocked: Vec<String>,
}

/// What the session looks like after all selections were applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Configurator name
    pub name: String,
    /// Configurator public identifier
    pub public_id: String,
    /// One line per category, in catalog order
    pub lines: Vec<SummaryLine>,
    /// Total price
    pub total: Price,
    /// Symbol used to format prices
    pub currency_symbol: String,
    /// Selections cleared while applying the requested selections
    pub cleared: Vec<ClearedSelection>,
}

impl Summary {
    /// Summarize a session.
    ///
    /// The configurator's own currency symbol wins over the configured one.
    #[must_use]
    pub fn from_session(
        session: &Session,
        cleared: Vec<ClearedSelection>,
        display: &DisplayConfig,
    ) -> Self {
        let info = session.state().info.as_ref();
        let lines = session
            .catalog()
            .categories()
            .iter()
            .map(|category| {
                let selected = session
                    .selection()
                    .get(&category.id)
                    .and_then(|option_id| category.option(option_id));
                SummaryLine {
                    category_id: category.id.clone(),
                    category: category.name.clone(),
                    option: selected.map(|o| o.label.clone()),
                    price: selected.map(|o| o.price),
                    blocked: category
                        .options
                        .iter()
                        .filter(|o| session.is_option_blocked(&category.id, &o.id))
                        .map(|o| o.label.clone())
                        .collect(),
                }
            })
            .collect();

        Self {
            name: info.map(|i| i.name.clone()).unwrap_or_default(),
            public_id: info.map(|i| i.public_id.to_string()).unwrap_or_default(),
            lines,
            total: session.calculate_total(),
            currency_symbol: info
                .and_then(|i| i.currency_symbol.clone())
                .unwrap_or_else(|| display.currency_symbol.clone()),
            cleared,
        }
    }

    /// Plain text rendering.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.name, self.public_id);

        for line in &self.lines {
            match (&line.option, line.price) {
                (Some(option), Some(price)) => {
                    let _ = writeln!(
                        out,
                        "  {}: {} {}",
                        line.category,
                        option,
                        price.format_with(&self.currency_symbol)
                    );
                }
                _ => {
                    let _ = writeln!(out, "  {}: (none)", line.category);
                }
            }
            if !line.blocked.is_empty() {
                let _ = writeln!(out, "    unavailable: {}", line.blocked.join(", "));
            }
        }

        let _ = write!(
            out,
            "Total: {}",
            self.total.format_with(&self.currency_symbol)
        );

        for entry in &self.cleared {
            let reason = match &entry.reason {
                ClearReason::Orphaned => "no longer available".to_string(),
                ClearReason::Conflict { with } => format!("incompatible with {with}"),
            };
            let _ = write!(
                out,
                "\nCleared {} ({}): {reason}",
                entry.category_id, entry.option_id
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_core::OptionId;

    fn summary() -> Summary {
        Summary {
            name: "Desk".to_string(),
            public_id: "desk".to_string(),
            lines: vec![
                SummaryLine {
                    category_id: CategoryId::new("color").expect("valid ID"),
                    category: "Color".to_string(),
                    option: Some("Blue".to_string()),
                    price: Some(Price::from_cents(2000)),
                    blocked: Vec::new(),
                },
                SummaryLine {
                    category_id: CategoryId::new("material").expect("valid ID"),
                    category: "Material".to_string(),
                    option: None,
                    price: None,
                    blocked: vec!["Titanium".to_string()],
                },
            ],
            total: Price::from_cents(2000),
            currency_symbol: "$".to_string(),
            cleared: vec![ClearedSelection {
                category_id: CategoryId::new("material").expect("valid ID"),
                option_id: OptionId::new("titanium").expect("valid ID"),
                reason: ClearReason::Conflict {
                    with: CategoryId::new("color").expect("valid ID"),
                },
            }],
        }
    }

    #[test]
    fn test_render_text() {
        let text = summary().render_text();
        assert_eq!(
            text,
            "Desk (desk)\n  Color: Blue $20.00\n  Material: (none)\n    unavailable: Titanium\n\
             Total: $20.00\nCleared material (titanium): incompatible with color"
        );
    }

    #[test]
    fn test_render_json() {
        let value = serde_json::to_value(summary()).expect("serialize summary");
        assert_eq!(value["publicId"], "desk");
        assert_eq!(value["lines"][1]["option"], serde_json::Value::Null);
        assert_eq!(value["cleared"][0]["reason"]["kind"], "conflict");
    }
}
