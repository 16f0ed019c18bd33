//! Configurator Catalog - Category/option model and incompatibility rules.
//!
//! This crate holds the read-mostly data a configurator session works
//! against: the ordered catalog of categories and options, and the symmetric
//! SKU incompatibility relation. It also parses configurator snapshots as
//! served by the data store or stored in fixture files.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Categories, options and attribute templates
//! - **Catalog** ([`catalog`]): Ordered catalog with invariant-checked mutations
//! - **Incompatibility** ([`incompatibility`]): Symmetric SKU relation
//! - **Loader** ([`loader`]): Snapshot parsing from JSON/TOML
//! - **Errors** ([`error`]): Catalog-specific error types
//!
//! # Example
//!
//! ```rust
//! use configurator_catalog::parse_snapshot_json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = parse_snapshot_json(
//!     r#"{"publicId": "desk", "categories": [], "incompatibilities": []}"#,
//!     "inline",
//! )?;
//! let loaded = snapshot.into_loaded();
//! assert!(loaded.catalog.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod definition;
pub mod error;
pub mod incompatibility;
pub mod loader;

// Re-export commonly used types
pub use catalog::Catalog;
pub use definition::{AttributeDefinition, AttributeType, Category, ConfigOption};
pub use error::{CatalogError, Result};
pub use incompatibility::{Incompatibility, IncompatibilityIndex};
pub use loader::{
    parse_snapshot_json, ConfiguratorInfo, ConfiguratorSnapshot, IncompatibilityEntry,
    LoadedCatalog, SnapshotLoader,
};
