//! Error types for the selection engine.

use configurator_catalog::CatalogError;
use configurator_core::ConfiguratorError;
use thiserror::Error;

/// Errors reported by a data store round trip.
///
/// A store failure never changes session state; callers may retry on their
/// own terms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store answered but refused the operation
    #[error("store rejected the request: {message}")]
    Rejected {
        /// Message returned by the store
        message: String,
        /// Machine-readable code, if the store sent one
        code: Option<String>,
    },

    /// The requested resource does not exist in the store
    #[error("{resource} not found in store: {id}")]
    NotFound {
        /// Kind of resource ("configurator", "category", ...)
        resource: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The store could not be reached
    #[error("store transport error: {0}")]
    Transport(String),

    /// The store answered with something we could not interpret
    #[error("invalid store response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for data store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Catalog mutation rejected by a catalog invariant
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Data store round trip failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Admin mutation attempted without an edit token
    #[error("an edit token is required for catalog changes")]
    MissingCredential,

    /// No configurator has been loaded into the session yet
    #[error("no configurator loaded")]
    NotLoaded,

    /// Required categories have no selection
    #[error("required categories have no selection: {}", .category_ids.join(", "))]
    IncompleteSelection {
        /// Categories that still need a selection
        category_ids: Vec<String>,
    },

    /// Invalid input (contact details, identifiers, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// Value rejected by a core newtype
    #[error(transparent)]
    InvalidValue(#[from] ConfiguratorError),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
