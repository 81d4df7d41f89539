//! # stockpile-schema: Declarative Request Validation
//!
//! Turns untyped request payloads into typed, constraint-checked values.
//!
//! ## Pipeline
//!
//! ```text
//! raw JSON map ──► coerce every field ──► evaluate every active rule ──► Validated ──► DTO
//!                        │                          │
//!                        └──── violations ──────────┴──► FieldErrors (all of them)
//! ```
//!
//! - A [`Schema`] is an ordered, immutable list of field specs built once
//!   through [`SchemaBuilder`]. Each field may declare a [`Coercion`], be
//!   optional, and carry any number of [`Rule`]s.
//! - Rules may be gated by a [`Predicate`] over the coerced candidate, which
//!   is how cross-field conditions ("notes required when status is 10") are
//!   expressed. Predicates address siblings through [`FieldRef`] handles
//!   resolved when the schema is built, never by name at validation time.
//! - [`validate`] is pure and deterministic: the same input and schema always
//!   yield the same [`Validated`] value or the same [`FieldErrors`], in
//!   schema declaration order.
//! - A [`Dto`] binds a serde type to its `&'static` schema; [`Dto::parse`]
//!   runs the full pipeline.
//!
//! ## Crate Policy
//!
//! - No I/O, no async, no interior mutability. Schemas are shared read-only
//!   across concurrent requests.
//! - Validation failure is a value ([`FieldErrors`]), never a panic.

pub mod candidate;
pub mod dto;
pub mod engine;
pub mod error;
pub mod registry;
pub mod rule;
pub mod schema;

pub use candidate::{Candidate, Validated};
pub use dto::{CreateItem, Dto, DtoError, IdParam, ListItemsQuery, UpdateItem, DRAFT_STATUS_CODE};
pub use engine::validate;
pub use error::{FieldErrors, FieldViolation};
pub use registry::{RegistryError, SchemaRegistry};
pub use rule::{Predicate, Rule, RuleKind};
pub use schema::{Coercion, FieldBuilder, FieldRef, FieldSpec, Schema, SchemaBuilder};
