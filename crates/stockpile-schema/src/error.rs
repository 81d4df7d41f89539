//! # Field Error Sets
//!
//! [`FieldErrors`] is the aggregated result of a failed validation: every
//! violated message of every field, grouped by field in schema declaration
//! order. It serializes as a JSON array so clients see the same order the
//! schema declares.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Violated messages of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Wire name of the field.
    pub field: String,
    /// Every violated rule's message, in rule order.
    pub messages: Vec<String>,
}

/// All violations of one validation attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldViolation>);

impl FieldErrors {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. Messages for an already-listed field are appended
    /// to that field's entry.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|v| v.field == field) {
            Some(entry) => entry.messages.push(message),
            None => self.0.push(FieldViolation {
                field: field.to_string(),
                messages: vec![message],
            }),
        }
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of violated messages across all fields.
    pub fn message_count(&self) -> usize {
        self.0.iter().map(|v| v.messages.len()).sum()
    }

    /// Names of the failed fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|v| v.field.as_str())
    }

    /// Whether `field` has at least one violation.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// Messages recorded for `field`.
    pub fn messages_for(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.messages.as_slice())
    }

    /// Iterate the per-field entries.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldViolation> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for {}",
            self.fields().collect::<Vec<_>>().join(", ")
        )
    }
}

impl std::error::Error for FieldErrors {}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<FieldViolation> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldViolation>>(iter: I) -> Self {
        let mut errors = Self::new();
        for violation in iter {
            for message in violation.messages {
                errors.push(&violation.field, message);
            }
        }
        errors
    }
}
