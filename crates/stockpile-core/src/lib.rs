#![deny(missing_docs)]

//! # stockpile-core: Foundational Types for Stockpile
//!
//! Defines the domain types every other crate in the workspace depends on.
//! It has no internal crate dependencies, only `serde`, `thiserror`,
//! `chrono` and `utoipa` (for OpenAPI schemas) from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** An [`ItemId`] is always a
//!    positive integer; the constructor rejects anything else, so code that
//!    holds an `ItemId` never re-checks it.
//!
//! 2. **Changes are explicit.** [`NewItem`] and [`ItemChanges`] describe
//!    writes; only fields that are `Some` in an `ItemChanges` are applied.
//!
//! 3. **[`Environment`] is a closed enum.** Deployment mode decides whether
//!    internal fault details may reach clients, so it must never be a free
//!    string.

pub mod environment;
pub mod error;
pub mod item;

pub use environment::Environment;
pub use error::{EnvironmentError, ItemIdError};
pub use item::{Item, ItemChanges, ItemId, NewItem, Page};
