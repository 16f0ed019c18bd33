//! Configurator Client - HTTP data store for the configurator REST API
//!
//! Implements [`configurator_engine::DataStore`] over the API's JSON
//! endpoints. Every response is wrapped in an [`ApiResponse`] envelope; a
//! `success: false` envelope becomes [`configurator_engine::StoreError::Rejected`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use configurator_client::HttpDataStore;
//! use configurator_engine::Session;
//!
//! let store = HttpDataStore::from_config(&config.api)?;
//! let mut session = Session::new(Arc::new(store), &config.session);
//! session.load(&public_id).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Response envelope.
pub mod envelope;
/// Error types for client operations.
pub mod error;
/// HTTP data store.
pub mod http;
mod requests;

pub use envelope::ApiResponse;
pub use error::{ClientError, Result};
pub use http::HttpDataStore;
