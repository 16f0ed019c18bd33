//! Configurator Core - Foundation crate for the product configurator.
//!
//! This crate provides the shared vocabulary every other configurator crate
//! depends on: validated identifiers, the two-decimal [`Price`] type, the
//! opaque [`EditToken`], the central error type, and TOML configuration.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes and enums (`CategoryId`, `OptionId`, `Sku`, `Price`, `CategoryType`)
//!
//! # Example
//!
//! ```rust
//! use configurator_core::{CategoryId, Price};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let color = CategoryId::new("color")?;
//! let price = Price::parse("10.5")?;
//! assert_eq!(price.to_string(), "10.50");
//! assert_eq!(color.as_str(), "color");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, AppConfig, DisplayConfig, SessionConfig};
pub use error::{ConfigError, ConfigResult, ConfiguratorError, Result};
pub use types::{
    CategoryId, CategoryType, ConfiguratorId, EditToken, OptionId, Price, Sku,
};
