//! # Error Hierarchy
//!
//! Construction errors for the core newtypes, built with `thiserror`.

use thiserror::Error;

/// An item identifier was not a positive integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemIdError {
    /// Identifiers start at 1.
    #[error("item id must be positive, got {0}")]
    NotPositive(i64),
}

/// A deployment environment name was not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown environment \"{0}\" (expected development, qa, staging or production)")]
pub struct EnvironmentError(pub String);
