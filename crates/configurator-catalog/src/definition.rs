//! Category and option definition types.
//!
//! These mirror the configurator payload served by the data store (camelCase
//! JSON). Validation here covers a single category; cross-category rules live
//! in [`crate::catalog`].

use crate::error::{CatalogError, Result};
use configurator_core::{CategoryId, CategoryType, OptionId, Price, Sku};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

fn default_true() -> bool {
    true
}

/// Treat a missing, null or blank SKU as "no SKU".
fn blank_sku_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Sku>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(s) if !s.trim().is_empty() => Sku::new(s).map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// A configurable axis of the product, holding mutually exclusive options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique, stable identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Kind of axis (color, dimension, ...)
    #[serde(default)]
    pub category_type: CategoryType,

    /// Optional description shown to end users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Options in catalog order
    #[serde(default)]
    pub options: Vec<ConfigOption>,

    /// Attribute definitions every option of this category may fill in
    #[serde(default)]
    pub attributes_template: Vec<AttributeDefinition>,

    /// Primary categories always start with a selection
    #[serde(default)]
    pub is_primary: bool,

    /// Whether a quote requires a selection in this category
    #[serde(default)]
    pub is_required: bool,

    /// Soft-deletion flag maintained by the data store
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Sort position assigned by the data store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl Category {
    /// Create an empty, active, non-primary category.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category_type: CategoryType::Generic,
            description: None,
            options: Vec::new(),
            attributes_template: Vec::new(),
            is_primary: false,
            is_required: false,
            is_active: true,
            order_index: None,
        }
    }

    /// Set the category type.
    #[must_use]
    pub fn with_type(mut self, category_type: CategoryType) -> Self {
        self.category_type = category_type;
        self
    }

    /// Mark the category as primary.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Append an option.
    #[must_use]
    pub fn with_option(mut self, option: ConfigOption) -> Self {
        self.options.push(option);
        self
    }

    /// Append an attribute definition to the template.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes_template.push(attribute);
        self
    }

    /// Find an option by ID.
    #[must_use]
    pub fn option(&self, option_id: &OptionId) -> Option<&ConfigOption> {
        self.options.iter().find(|opt| &opt.id == option_id)
    }

    /// The option flagged as default, if any.
    #[must_use]
    pub fn default_option(&self) -> Option<&ConfigOption> {
        self.options.iter().find(|opt| opt.is_default)
    }

    /// Find an attribute definition by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeDefinition> {
        self.attributes_template.iter().find(|attr| attr.key == key)
    }

    /// Repair a category received from the data store so that it passes
    /// [`Category::validate`], fixing each bad option in place rather than
    /// rejecting the category. Returns the number of repairs made.
    ///
    /// - blank name or label: replaced by the ID
    /// - blank or duplicate template keys: dropped
    /// - duplicate option ID: later occurrences dropped
    /// - attribute value with an unknown key or the wrong type: dropped
    /// - several defaults: only the first keeps the flag
    pub fn normalize(&mut self) -> usize {
        let mut repairs = 0;

        if self.name.trim().is_empty() {
            warn!(category_id = %self.id, "blank category name, using ID");
            self.name = self.id.to_string();
            repairs += 1;
        }

        let mut keys = HashSet::new();
        let template_len = self.attributes_template.len();
        self.attributes_template
            .retain(|attr| !attr.key.trim().is_empty() && keys.insert(attr.key.clone()));
        if self.attributes_template.len() < template_len {
            warn!(category_id = %self.id, "dropping blank or duplicate attribute keys");
            repairs += template_len - self.attributes_template.len();
        }

        let mut seen = HashSet::new();
        let options_len = self.options.len();
        self.options.retain(|opt| seen.insert(opt.id.clone()));
        if self.options.len() < options_len {
            warn!(category_id = %self.id, "dropping options with duplicate IDs");
            repairs += options_len - self.options.len();
        }

        let template = &self.attributes_template;
        let mut has_default = false;
        for option in &mut self.options {
            if option.label.trim().is_empty() {
                warn!(option_id = %option.id, "blank option label, using ID");
                option.label = option.id.to_string();
                repairs += 1;
            }

            let values_len = option.attribute_values.len();
            option.attribute_values.retain(|key, value| {
                template
                    .iter()
                    .any(|attr| &attr.key == key && attr.accepts(value))
            });
            if option.attribute_values.len() < values_len {
                warn!(option_id = %option.id, "dropping attribute values that do not fit the template");
                repairs += values_len - option.attribute_values.len();
            }

            if option.is_default {
                if has_default {
                    warn!(category_id = %self.id, option_id = %option.id, "ignoring extra default option");
                    option.is_default = false;
                    repairs += 1;
                }
                has_default = true;
            }
        }

        repairs
    }

    /// Validate the category and all of its options.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::ValidationError {
                entity: "category",
                id: self.id.to_string(),
                reason: "category name cannot be empty".to_string(),
            });
        }

        let mut keys = HashSet::new();
        for attr in &self.attributes_template {
            if attr.key.trim().is_empty() {
                return Err(CatalogError::ValidationError {
                    entity: "category",
                    id: self.id.to_string(),
                    reason: "attribute key cannot be empty".to_string(),
                });
            }
            if !keys.insert(attr.key.as_str()) {
                return Err(CatalogError::ValidationError {
                    entity: "category",
                    id: self.id.to_string(),
                    reason: format!("duplicate attribute key '{}'", attr.key),
                });
            }
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(&option.id) {
                return Err(CatalogError::DuplicateOption {
                    category_id: self.id.to_string(),
                    option_id: option.id.to_string(),
                });
            }
            self.validate_option(option)?;
        }

        if self.options.iter().filter(|opt| opt.is_default).count() > 1 {
            return Err(CatalogError::MultipleDefaults {
                category_id: self.id.to_string(),
            });
        }

        Ok(())
    }

    /// Validate one option against this category's attribute template.
    ///
    /// Does not check uniqueness; callers adding or replacing options do that.
    pub fn validate_option(&self, option: &ConfigOption) -> Result<()> {
        if option.label.trim().is_empty() {
            return Err(CatalogError::ValidationError {
                entity: "option",
                id: option.id.to_string(),
                reason: "option label cannot be empty".to_string(),
            });
        }

        for (key, value) in &option.attribute_values {
            let Some(attr) = self.attribute(key) else {
                return Err(CatalogError::ValidationError {
                    entity: "option",
                    id: option.id.to_string(),
                    reason: format!(
                        "attribute '{key}' is not in the template of category {}",
                        self.id
                    ),
                });
            };

            if !attr.accepts(value) {
                return Err(CatalogError::ValidationError {
                    entity: "option",
                    id: option.id.to_string(),
                    reason: format!(
                        "attribute '{key}' expects a {} value",
                        attr.value_type.display_name()
                    ),
                });
            }
        }

        Ok(())
    }
}

/// One selectable value within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOption {
    /// Identifier, unique within the owning category
    pub id: OptionId,

    /// Display label
    pub label: String,

    /// Price added to the total when selected
    #[serde(default)]
    pub price: Price,

    /// Key for incompatibility matching; options without one never conflict
    #[serde(
        default,
        deserialize_with = "blank_sku_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub sku: Option<Sku>,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Values keyed by the owning category's attribute template keys
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attribute_values: BTreeMap<String, Value>,

    /// Pre-selected option of a primary category
    #[serde(default)]
    pub is_default: bool,

    /// Soft-deletion flag maintained by the data store
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Stock availability
    #[serde(default = "default_true")]
    pub in_stock: bool,

    /// Sort position assigned by the data store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl ConfigOption {
    /// Create an active, in-stock option without SKU.
    #[must_use]
    pub fn new(id: OptionId, label: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            label: label.into(),
            price,
            sku: None,
            description: None,
            image_url: None,
            attribute_values: BTreeMap::new(),
            is_default: false,
            is_active: true,
            in_stock: true,
            order_index: None,
        }
    }

    /// Set the SKU.
    #[must_use]
    pub fn with_sku(mut self, sku: Sku) -> Self {
        self.sku = Some(sku);
        self
    }

    /// Flag as the category default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Set an attribute value.
    #[must_use]
    pub fn with_attribute_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attribute_values.insert(key.into(), value);
        self
    }
}

/// Attribute definition in a category template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Key used in option attribute values
    pub key: String,

    /// Display label
    pub label: String,

    /// Expected value type
    #[serde(rename = "type", default)]
    pub value_type: AttributeType,

    /// Display unit, e.g. "mm"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Allowed values for select attributes (empty = any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl AttributeDefinition {
    /// Create a definition without unit or allowed values.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, value_type: AttributeType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value_type,
            unit: None,
            options: Vec::new(),
        }
    }

    /// Whether a value fits this definition. Null always fits (unset).
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self.value_type, value) {
            (_, Value::Null)
            | (AttributeType::Text, Value::String(_))
            | (AttributeType::Number, Value::Number(_))
            | (AttributeType::Boolean, Value::Bool(_)) => true,
            (AttributeType::Select, Value::String(s)) => {
                self.options.is_empty() || self.options.iter().any(|allowed| allowed == s)
            }
            _ => false,
        }
    }
}

/// Value type of a template attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Free text
    #[default]
    Text,
    /// Numeric value
    Number,
    /// Yes/no flag
    Boolean,
    /// One of a fixed list of strings
    Select,
}

impl AttributeType {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cat_id(id: &str) -> CategoryId {
        CategoryId::new(id).expect("valid category ID")
    }

    fn opt(id: &str, cents: u64) -> ConfigOption {
        ConfigOption::new(
            OptionId::new(id).expect("valid option ID"),
            id.to_uppercase(),
            Price::from_cents(cents),
        )
    }

    #[test]
    fn test_category_validate_ok() {
        let category = Category::new(cat_id("color"), "Color")
            .with_option(opt("red", 0).as_default())
            .with_option(opt("blue", 2000));
        assert!(category.validate().is_ok());
        assert_eq!(
            category.default_option().map(|o| o.id.as_str()),
            Some("red")
        );
    }

    #[test]
    fn test_category_rejects_empty_name() {
        let category = Category::new(cat_id("color"), "  ");
        assert!(matches!(
            category.validate(),
            Err(CatalogError::ValidationError { entity: "category", .. })
        ));
    }

    #[test]
    fn test_category_rejects_duplicate_options() {
        let category = Category::new(cat_id("color"), "Color")
            .with_option(opt("red", 0))
            .with_option(opt("red", 100));
        assert!(matches!(
            category.validate(),
            Err(CatalogError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn test_category_rejects_two_defaults() {
        let category = Category::new(cat_id("color"), "Color")
            .with_option(opt("red", 0).as_default())
            .with_option(opt("blue", 0).as_default());
        assert!(matches!(
            category.validate(),
            Err(CatalogError::MultipleDefaults { .. })
        ));
    }

    #[test]
    fn test_normalize_repairs_options_in_place() {
        let mut category = Category::new(cat_id("color"), "")
            .with_attribute(AttributeDefinition::new("gloss", "Gloss", AttributeType::Boolean))
            .with_option(opt("red", 0).as_default())
            .with_option(
                opt("blue", 2000)
                    .as_default()
                    .with_attribute_value("gloss", json!("very"))
                    .with_attribute_value("legacy", json!(1)),
            )
            .with_option(opt("red", 500));
        assert!(category.validate().is_err());

        let repairs = category.normalize();
        assert_eq!(repairs, 5);
        assert!(category.validate().is_ok());

        assert_eq!(category.name, "color");
        assert_eq!(category.options.len(), 2);
        assert_eq!(category.options[0].price, Price::ZERO);
        assert_eq!(
            category.default_option().map(|o| o.id.as_str()),
            Some("red")
        );
        assert!(!category.options[1].is_default);
        assert!(category.options[1].attribute_values.is_empty());
    }

    #[test]
    fn test_normalize_keeps_valid_category() {
        let mut category = Category::new(cat_id("size"), "Size")
            .with_attribute(AttributeDefinition::new("width", "Width", AttributeType::Number))
            .with_option(opt("small", 0).with_attribute_value("width", json!(120)));
        let before = category.clone();

        assert_eq!(category.normalize(), 0);
        assert_eq!(category, before);
    }

    #[test]
    fn test_option_attribute_validation() {
        let category = Category::new(cat_id("size"), "Size")
            .with_attribute(AttributeDefinition::new("width", "Width", AttributeType::Number))
            .with_attribute(AttributeDefinition::new("outdoor", "Outdoor", AttributeType::Boolean));

        let good = opt("small", 0)
            .with_attribute_value("width", json!(120))
            .with_attribute_value("outdoor", json!(false));
        assert!(category.validate_option(&good).is_ok());

        let wrong_type = opt("medium", 0).with_attribute_value("width", json!("wide"));
        assert!(category.validate_option(&wrong_type).is_err());

        let unknown_key = opt("large", 0).with_attribute_value("depth", json!(3));
        assert!(category.validate_option(&unknown_key).is_err());
    }

    #[test]
    fn test_select_attribute_allowed_values() {
        let mut attr = AttributeDefinition::new("grade", "Grade", AttributeType::Select);
        attr.options = vec!["A".to_string(), "B".to_string()];

        assert!(attr.accepts(&json!("A")));
        assert!(!attr.accepts(&json!("C")));
        assert!(attr.accepts(&Value::Null));
    }

    #[test]
    fn test_option_wire_format() {
        let option: ConfigOption = serde_json::from_value(json!({
            "id": "titanium",
            "label": "Titanium",
            "price": "50",
            "sku": "",
            "isDefault": false,
            "imageUrl": "https://cdn.example.com/ti.png"
        }))
        .expect("deserialize option");

        assert_eq!(option.price, Price::from_cents(5000));
        assert!(option.sku.is_none(), "blank SKU should be treated as absent");
        assert!(option.is_active);
        assert!(option.in_stock);

        let value = serde_json::to_value(&option).expect("serialize option");
        assert_eq!(value["imageUrl"], "https://cdn.example.com/ti.png");
        assert_eq!(value["price"], json!(50.0));
        assert!(value.get("sku").is_none());
    }

    #[test]
    fn test_category_wire_format() {
        let category: Category = serde_json::from_value(json!({
            "id": "material",
            "name": "Material",
            "categoryType": "MATERIAL",
            "isPrimary": true,
            "attributesTemplate": [
                {"key": "thickness", "label": "Thickness", "type": "number", "unit": "mm"}
            ],
            "options": [
                {"id": "steel", "label": "Steel", "price": 0, "sku": "S"}
            ]
        }))
        .expect("deserialize category");

        assert_eq!(category.category_type, CategoryType::Material);
        assert!(category.is_primary);
        assert!(category.is_active);
        assert_eq!(category.attributes_template[0].unit.as_deref(), Some("mm"));
        assert_eq!(
            category.options[0].sku.as_ref().map(Sku::as_str),
            Some("S")
        );
    }
}
