//! # Item Domain Types
//!
//! The catalogue record and the write descriptions the service layer hands
//! to a repository.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ItemIdError;

/// Positive integer identifier of a stored item.
///
/// Serializes as a bare JSON number. Deserialization goes through
/// [`ItemId::new`], so a zero or negative id never reaches a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ItemId(i64);

impl ItemId {
    /// Create an identifier, rejecting values below 1.
    pub fn new(raw: i64) -> Result<Self, ItemIdError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ItemIdError::NotPositive(raw))
        }
    }

    /// Return the raw integer.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ItemId {
    type Error = ItemIdError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ItemId> for i64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored catalogue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Store-assigned identifier.
    #[schema(value_type = i64, minimum = 1)]
    pub id: ItemId,
    /// Display name, 1–255 characters, never blank.
    pub name: String,
    /// Free-form description, at most 1000 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the item was first stored.
    pub created_at: DateTime<Utc>,
    /// When the item was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Apply the fields present in `changes` and bump `updated_at`.
    ///
    /// Absent fields keep their current value. Returns `true` when at least
    /// one field was supplied.
    pub fn apply(&mut self, changes: &ItemChanges, now: DateTime<Utc>) -> bool {
        if changes.is_empty() {
            return false;
        }
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        self.updated_at = now;
        true
    }
}

/// Fields of an item about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial update of an item. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
}

impl ItemChanges {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Window into the newest-first item listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of items to return.
    pub limit: u32,
    /// Number of items to skip.
    pub offset: u32,
}

impl Page {
    /// Largest page a client may request.
    pub const MAX_LIMIT: u32 = 100;

    /// Create a page window.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::MAX_LIMIT,
            offset: 0,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every positive integer deserializes from its JSON form.
        #[test]
        fn positive_ids_deserialize(raw in 1i64..=i64::MAX) {
            let id: ItemId = serde_json::from_str(&raw.to_string()).unwrap();
            prop_assert_eq!(id.get(), raw);
        }

        /// Zero and negatives never construct.
        #[test]
        fn non_positive_ids_rejected(raw in i64::MIN..=0i64) {
            prop_assert!(ItemId::new(raw).is_err());
        }
    }
}
