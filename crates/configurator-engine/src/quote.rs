//! Quote snapshots and quote requests.
//!
//! A [`QuoteSnapshot`] freezes what the user configured: the selection, the
//! computed total and the selected items flattened for display. A
//! [`QuoteRequest`] adds the customer's contact details and is what gets
//! submitted to the data store.

use crate::{
    action::ConfigState,
    error::{EngineError, Result},
    pricing::calculate_total,
};
use chrono::{DateTime, Utc};
use configurator_core::{CategoryId, ConfiguratorId, OptionId, Price};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

/// One selected option, flattened for display and quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    /// Category the option belongs to
    pub category_id: CategoryId,
    /// Selected option
    pub option_id: OptionId,
    /// SKU, empty when the option has none
    pub sku: String,
    /// Option label
    pub label: String,
    /// Option price
    pub price: Price,
}

/// Frozen view of a configured product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    /// Configurator the product was configured in
    pub configurator_id: ConfiguratorId,
    /// Category ID to option ID
    pub selected_options: BTreeMap<String, String>,
    /// Computed total
    pub total_price: Price,
    /// Selected items in catalog order
    pub items: Vec<QuoteItem>,
}

impl QuoteSnapshot {
    /// Capture the current state.
    ///
    /// # Errors
    /// Returns [`EngineError::NotLoaded`] if no configurator is loaded.
    pub fn capture(state: &ConfigState) -> Result<Self> {
        let info = state.info.as_ref().ok_or(EngineError::NotLoaded)?;
        let resolved = state.selection.resolved(&state.catalog);

        Ok(Self {
            configurator_id: info.public_id.clone(),
            selected_options: resolved
                .iter()
                .map(|(category, option)| (category.id.to_string(), option.id.to_string()))
                .collect(),
            total_price: calculate_total(&state.selection, &state.catalog),
            items: resolved
                .into_iter()
                .map(|(category, option)| QuoteItem {
                    category_id: category.id.clone(),
                    option_id: option.id.clone(),
                    sku: option.sku.as_ref().map(ToString::to_string).unwrap_or_default(),
                    label: option.label.clone(),
                    price: option.price,
                })
                .collect(),
        })
    }
}

/// Customer contact details attached to a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    /// Customer name (required)
    pub name: String,
    /// Customer email (required)
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Free-form message
    pub message: Option<String>,
}

impl ContactDetails {
    /// Contact with the required fields only.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Check required fields and the email shape.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation("customer name is required".to_string()));
        }
        if !email_regex().is_match(self.email.trim()) {
            return Err(EngineError::Validation(format!(
                "invalid customer email: '{}'",
                self.email
            )));
        }
        Ok(())
    }
}

/// A validated quote request ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    /// What was configured
    pub snapshot: QuoteSnapshot,
    /// Who is asking
    pub contact: ContactDetails,
    /// When the request was made
    pub timestamp: DateTime<Utc>,
}

impl QuoteRequest {
    /// Build a request stamped with the current time.
    ///
    /// # Errors
    /// Returns a validation error if the contact details are incomplete.
    pub fn new(snapshot: QuoteSnapshot, contact: ContactDetails) -> Result<Self> {
        contact.validate()?;
        Ok(Self {
            snapshot,
            contact,
            timestamp: Utc::now(),
        })
    }

    /// Override the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Wire payload for the quote endpoint.
    #[must_use]
    pub fn payload(&self) -> QuotePayload<'_> {
        QuotePayload {
            configurator_id: &self.snapshot.configurator_id,
            customer_email: self.contact.email.trim(),
            customer_name: self.contact.name.trim(),
            customer_phone: self.contact.phone.as_deref().unwrap_or_default(),
            selected_options: &self.snapshot.selected_options,
            total_price: self.snapshot.total_price,
            configuration: QuoteConfiguration {
                items: &self.snapshot.items,
            },
            metadata: QuoteMetadata {
                company: self.contact.company.as_deref().unwrap_or_default(),
                message: self.contact.message.as_deref().unwrap_or_default(),
                timestamp: self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            },
        }
    }
}

/// Serialized form of a [`QuoteRequest`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload<'a> {
    configurator_id: &'a ConfiguratorId,
    customer_email: &'a str,
    customer_name: &'a str,
    customer_phone: &'a str,
    selected_options: &'a BTreeMap<String, String>,
    total_price: Price,
    configuration: QuoteConfiguration<'a>,
    metadata: QuoteMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct QuoteConfiguration<'a> {
    items: &'a [QuoteItem],
}

#[derive(Debug, Serialize)]
struct QuoteMetadata<'a> {
    company: &'a str,
    message: &'a str,
    timestamp: String,
}

/// Store acknowledgement of a submitted quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReceipt {
    /// Reference code the customer can quote back
    pub quote_code: String,
}
