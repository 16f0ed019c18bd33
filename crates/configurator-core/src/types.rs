//! Shared types used across the configurator.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::ConfiguratorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use zeroize::Zeroizing;

/// Maximum length of any identifier handed to us by the data store.
const MAX_ID_LEN: usize = 128;

/// Identifiers are opaque to us: any non-blank string up to [`MAX_ID_LEN`]
/// characters is accepted.
fn validate_id(kind: &str, id: &str) -> Result<(), ConfiguratorError> {
    let len = id.chars().count();
    if id.trim().is_empty() || len > MAX_ID_LEN {
        return Err(ConfiguratorError::Validation(format!(
            "invalid {kind}: must be 1-{MAX_ID_LEN} non-blank characters, got {len} characters"
        )));
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` from a string.")]
            ///
            /// # Errors
            /// Returns error if the ID is empty, too long, or contains invalid characters.
            pub fn new(id: impl Into<String>) -> Result<Self, ConfiguratorError> {
                let id = id.into();
                validate_id($kind, &id)?;
                Ok(Self(id))
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConfiguratorError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Identifier of a category, unique within a catalog.
    CategoryId,
    "category ID"
);

string_id!(
    /// Identifier of an option, unique within its category.
    OptionId,
    "option ID"
);

string_id!(
    /// Public identifier (API key) of a configurator.
    ConfiguratorId,
    "configurator ID"
);

/// Stock-keeping unit, used only as the key for incompatibility matching.
///
/// SKUs are compared verbatim. A blank SKU is not a SKU: callers model the
/// absence with `Option<Sku>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Create a new `Sku`.
    ///
    /// # Errors
    /// Returns error if the SKU is blank or longer than 128 characters.
    pub fn new(sku: impl Into<String>) -> Result<Self, ConfiguratorError> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(ConfiguratorError::Validation(
                "invalid SKU: must not be blank".to_string(),
            ));
        }
        if sku.len() > MAX_ID_LEN {
            return Err(ConfiguratorError::Validation(format!(
                "invalid SKU: must be at most {MAX_ID_LEN} characters, got {}",
                sku.len()
            )));
        }
        Ok(Self(sku))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Sku {
    type Error = ConfiguratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

/// Non-negative currency amount with two-decimal precision.
///
/// Stored as whole cents so that sums are exact. On the wire a price is a
/// JSON number; deserialization is lenient and coerces anything that is not
/// a non-negative number (or numeric string) to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(u64);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(0);

    /// Largest value accepted from floating point input (keeps cents exact in an `f64`).
    const MAX_F64: f64 = 9.0e13;

    /// Create a price from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Get the amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert a decimal amount, rounding to the nearest cent.
    ///
    /// # Errors
    /// Returns error if the value is negative, not finite, or too large.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(value: f64) -> Result<Self, ConfiguratorError> {
        if !value.is_finite() || value < 0.0 || value > Self::MAX_F64 {
            return Err(ConfiguratorError::Validation(format!(
                "invalid price: must be a non-negative amount, got {value}"
            )));
        }
        Ok(Self((value * 100.0).round() as u64))
    }

    /// Parse a decimal string such as `"10.5"` or `"20"`.
    ///
    /// # Errors
    /// Returns error if the string is not a non-negative decimal number.
    pub fn parse(s: &str) -> Result<Self, ConfiguratorError> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| ConfiguratorError::Validation(format!("invalid price: '{s}'")))?;
        Self::from_f64(value)
    }

    /// Lenient conversion: anything invalid becomes zero.
    #[must_use]
    pub fn coerce_f64(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(|_| {
            tracing::warn!(value, "coercing invalid price to zero");
            Self::ZERO
        })
    }

    /// Lenient parse: anything invalid becomes zero.
    #[must_use]
    pub fn coerce_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|_| {
            tracing::warn!(value = s, "coercing non-numeric price to zero");
            Self::ZERO
        })
    }

    /// Get the amount as a floating point number of currency units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Format with a currency symbol, e.g. `$20.00`.
    #[must_use]
    pub fn format_with(self, symbol: &str) -> String {
        format!("{symbol}{self}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PriceRepr {
            Number(f64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Option::<PriceRepr>::deserialize(deserializer)? {
            Some(PriceRepr::Number(value)) => Self::coerce_f64(value),
            Some(PriceRepr::Text(text)) => Self::coerce_str(&text),
            Some(PriceRepr::Other(_)) | None => Self::ZERO,
        })
    }
}

/// Opaque edit credential authorizing catalog mutations.
///
/// The token is never interpreted here; it is handed to the data store with
/// each admin mutation. Its memory is zeroized on drop and it never appears
/// in `Debug` output.
#[derive(Clone)]
pub struct EditToken(Zeroizing<String>);

impl EditToken {
    /// Wrap a token string.
    ///
    /// # Errors
    /// Returns error if the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfiguratorError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(ConfiguratorError::Validation(
                "edit token must not be blank".to_string(),
            ));
        }
        Ok(Self(token))
    }

    /// Borrow the raw token for transmission.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for EditToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EditToken(<redacted>)")
    }
}

/// Kind of product axis a category represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    /// Plain list of options
    #[default]
    Generic,
    /// Colors and swatches
    Color,
    /// Sizes and measurements
    Dimension,
    /// Materials
    Material,
    /// Optional features
    Feature,
    /// Add-on accessories
    Accessory,
    /// Power options
    Power,
    /// Free text such as engravings
    Text,
    /// Surface finishes
    Finish,
    /// Anything else
    Custom,
}

impl CategoryType {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Generic => "Generic",
            Self::Color => "Color",
            Self::Dimension => "Dimension",
            Self::Material => "Material",
            Self::Feature => "Feature",
            Self::Accessory => "Accessory",
            Self::Power => "Power",
            Self::Text => "Text",
            Self::Finish => "Finish",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
