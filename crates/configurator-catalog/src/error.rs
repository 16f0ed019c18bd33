//! Error types for the catalog subsystem.

use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Category not found
    #[error("category not found: {category_id}")]
    CategoryNotFound {
        /// The category ID that was not found
        category_id: String,
    },

    /// Option not found in its category
    #[error("option {option_id} not found in category {category_id}")]
    OptionNotFound {
        /// Owning category ID
        category_id: String,
        /// The option ID that was not found
        option_id: String,
    },

    /// A category with the same ID already exists
    #[error("duplicate category ID: {category_id}")]
    DuplicateCategory {
        /// The duplicated category ID
        category_id: String,
    },

    /// An option with the same ID already exists in the category
    #[error("duplicate option ID {option_id} in category {category_id}")]
    DuplicateOption {
        /// Owning category ID
        category_id: String,
        /// The duplicated option ID
        option_id: String,
    },

    /// More than one option in a category is flagged as default
    #[error("category {category_id} would have more than one default option")]
    MultipleDefaults {
        /// Category ID
        category_id: String,
    },

    /// Category type cannot change while the category has options
    #[error("cannot change type of category {category_id} while it has options")]
    CategoryTypeLocked {
        /// Category ID
        category_id: String,
    },

    /// Invalid category or option (validation failed)
    #[error("invalid {entity} {id}: {reason}")]
    ValidationError {
        /// Kind of entity ("category" or "option")
        entity: &'static str,
        /// Entity ID being validated
        id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Failed to parse a catalog snapshot
    #[error("failed to parse catalog snapshot {path}: {reason}")]
    ParseError {
        /// Path or source label of the snapshot
        path: String,
        /// Parser message
        reason: String,
    },

    /// Unsupported snapshot file extension
    #[error("unsupported catalog snapshot format: {path}")]
    UnsupportedFormat {
        /// Offending path
        path: String,
    },

    /// I/O error while reading snapshots
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid identifier or price
    #[error("invalid value: {0}")]
    InvalidValue(#[from] configurator_core::ConfiguratorError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
