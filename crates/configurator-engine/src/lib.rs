//! Configurator Engine - Selection state and incompatibility resolution
//!
//! This crate keeps a configurator session consistent: it holds the user's
//! choice per category, clears choices that become invalid or conflict with
//! each other, and aggregates the price of what is selected. Catalog edits
//! go through a [`DataStore`] and are applied locally only after the store
//! accepts them.
//!
//! ## Architecture
//!
//! Every change flows through one pure reducer:
//!
//! - **Selection**: Category to option mapping with change sequences
//! - **Reducer**: `Action` enum applied by [`reduce`], followed by a resolver pass
//! - **Resolver**: Simultaneous clearing of orphaned and conflicting selections
//! - **Pricing**: Total of the resolved selection
//! - **Session**: Owner of one configurator's state, store round trips and events
//!
//! ## Example
//!
//! ```rust,ignore
//! use configurator_engine::{MemoryStore, Session};
//!
//! let mut session = Session::new(Arc::new(store), &config.session);
//! session.load(&public_id).await?;
//!
//! let cleared = session.select_option(color, blue)?;
//! println!("total: {}", session.calculate_total());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Session state, actions and the reducer.
pub mod action;
/// Default selection policy.
pub mod defaults;
/// Error types for engine operations.
pub mod error;
/// Session event stream.
pub mod events;
/// Price aggregation.
pub mod pricing;
/// Quote snapshots and requests.
pub mod quote;
/// Consistency resolver.
pub mod resolver;
/// Category to option selection.
pub mod selection;
/// Session controller.
pub mod session;
/// Data store trait and in-memory store.
pub mod store;

pub use action::{reduce, Action, ConfigState, Transition};
pub use defaults::{default_option, default_selection};
pub use error::{EngineError, Result, StoreError, StoreResult};
pub use events::{EventBus, SessionEvent};
pub use pricing::calculate_total;
pub use quote::{
    ContactDetails, QuoteItem, QuotePayload, QuoteReceipt, QuoteRequest, QuoteSnapshot,
};
pub use resolver::{
    conflicting_categories, conflicts_with_selection, resolve, ClearReason, ClearedSelection,
    Resolution,
};
pub use selection::Selection;
pub use session::Session;
pub use store::{DataStore, MemoryStore};
