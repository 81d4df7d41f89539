//! Named lookup of the schemas a process validates against.
//!
//! The registry is assembled once at startup and then only read. It holds
//! `&'static` schemas, so cloning the registry or handing schemas to
//! request handlers never copies field specs.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::dto::{CreateItem, Dto, IdParam, ListItemsQuery, UpdateItem};
use crate::schema::Schema;

/// Errors raised while assembling a [`SchemaRegistry`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two schemas were registered under the same name.
    #[error("schema {0:?} is already registered")]
    Duplicate(String),
}

/// Immutable-after-startup map from schema name to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, &'static Schema>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every request schema of the items service.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_dto::<CreateItem>()?;
        registry.register_dto::<UpdateItem>()?;
        registry.register_dto::<IdParam>()?;
        registry.register_dto::<ListItemsQuery>()?;
        Ok(registry)
    }

    /// Add a schema under its own name.
    pub fn register(&mut self, schema: &'static Schema) -> Result<(), RegistryError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(RegistryError::Duplicate(schema.name().to_string()));
        }
        self.schemas.insert(schema.name(), schema);
        Ok(())
    }

    /// Add the schema of a DTO type.
    pub fn register_dto<T: Dto>(&mut self) -> Result<(), RegistryError> {
        self.register(T::schema())
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<&'static Schema> {
        self.schemas.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
