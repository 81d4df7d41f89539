//! # Item Repository
//!
//! The persistence collaborator of the item service. Two backends exist:
//! an in-memory store for development and tests, and Postgres via
//! [`crate::db::items`]. The backend is chosen once at startup.
//!
//! "Not found" is never an error here: lookups return `Option` and deletes
//! return `bool`. Only infrastructure failures produce [`RepositoryError`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use sqlx::PgPool;
use stockpile_core::{Item, ItemChanges, ItemId, ItemIdError, NewItem, Page};
use thiserror::Error;

use crate::db;

/// Infrastructure failure while reading or writing items.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The database rejected or failed the query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not produce a valid identifier.
    #[error("invalid item id: {0}")]
    InvalidId(#[from] ItemIdError),
}

/// Thread-safe, cloneable in-memory item store.
///
/// The `parking_lot` lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<ItemId, Item>,
    last_id: i64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, page: Page) -> Vec<Item> {
        self.inner
            .read()
            .items
            .values()
            .rev()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }

    fn get(&self, id: ItemId) -> Option<Item> {
        self.inner.read().items.get(&id).cloned()
    }

    fn insert(&self, new: NewItem) -> Result<Item, ItemIdError> {
        let mut state = self.inner.write();
        let id = ItemId::new(state.last_id.wrapping_add(1))?;
        state.last_id = id.get();
        let now = Utc::now();
        let item = Item {
            id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    fn update(&self, id: ItemId, changes: &ItemChanges) -> Option<Item> {
        let mut state = self.inner.write();
        let item = state.items.get_mut(&id)?;
        item.apply(changes, Utc::now());
        Some(item.clone())
    }

    fn remove(&self, id: ItemId) -> bool {
        self.inner.write().items.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.inner.read().items.len()
    }
}

/// Item persistence, backed by memory or Postgres.
#[derive(Debug, Clone)]
pub enum ItemRepository {
    /// Process-local store.
    Memory(MemoryStore),
    /// Postgres pool.
    Postgres(PgPool),
}

impl ItemRepository {
    /// An empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Short backend name for health reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// A page of items, newest first.
    pub async fn find_all(&self, page: Page) -> Result<Vec<Item>, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.list(page)),
            Self::Postgres(pool) => Ok(db::items::list(pool, page).await?),
        }
    }

    pub async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.get(id)),
            Self::Postgres(pool) => Ok(db::items::get_by_id(pool, id).await?),
        }
    }

    /// Store a new item and return it with its assigned ID.
    pub async fn create(&self, item: NewItem) -> Result<Item, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.insert(item)?),
            Self::Postgres(pool) => Ok(db::items::insert(pool, &item).await?),
        }
    }

    /// Apply `changes`. Returns `None` when the item does not exist. An empty
    /// change set returns the item untouched.
    pub async fn update(
        &self,
        id: ItemId,
        changes: ItemChanges,
    ) -> Result<Option<Item>, RepositoryError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        match self {
            Self::Memory(store) => Ok(store.update(id, &changes)),
            Self::Postgres(pool) => Ok(db::items::update(pool, id, &changes).await?),
        }
    }

    /// Remove an item. Returns `false` when it did not exist.
    pub async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.remove(id)),
            Self::Postgres(pool) => Ok(db::items::delete(pool, id).await?),
        }
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        match self {
            Self::Memory(store) => Ok(store.len() as u64),
            Self::Postgres(pool) => Ok(db::items::count(pool).await?),
        }
    }

    /// Check that the backend is reachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(pool) => Ok(db::items::ping(pool).await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(name: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let repo = ItemRepository::in_memory();
        let a = repo.create(new_item("a")).await.unwrap();
        let b = repo.create(new_item("b")).await.unwrap();
        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = ItemRepository::in_memory();
        let a = repo.create(new_item("a")).await.unwrap();
        assert!(repo.delete(a.id).await.unwrap());
        let b = repo.create(new_item("b")).await.unwrap();
        assert_eq!(b.id.get(), 2);
    }

    #[tokio::test]
    async fn find_all_is_newest_first_and_paged() {
        let repo = ItemRepository::in_memory();
        for name in ["a", "b", "c", "d"] {
            repo.create(new_item(name)).await.unwrap();
        }
        let names = |items: Vec<Item>| items.into_iter().map(|i| i.name).collect::<Vec<_>>();

        let all = repo.find_all(Page::default()).await.unwrap();
        assert_eq!(names(all), ["d", "c", "b", "a"]);

        let page = repo.find_all(Page::new(2, 1)).await.unwrap();
        assert_eq!(names(page), ["c", "b"]);

        assert!(repo.find_all(Page::new(10, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_items_are_not_errors() {
        let repo = ItemRepository::in_memory();
        let id = ItemId::new(99).unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(repo
            .update(id, ItemChanges { name: Some("x".into()), description: None })
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let repo = ItemRepository::in_memory();
        let item = repo
            .create(NewItem {
                name: "Widget".into(),
                description: Some("small".into()),
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                item.id,
                ItemChanges {
                    name: Some("Gadget".into()),
                    description: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.description.as_deref(), Some("small"));
        assert!(updated.updated_at >= item.updated_at);

        let untouched = repo.update(item.id, ItemChanges::default()).await.unwrap().unwrap();
        assert_eq!(untouched, updated);
    }

    #[tokio::test]
    async fn memory_backend_is_always_reachable() {
        let repo = ItemRepository::in_memory();
        assert_eq!(repo.kind(), "memory");
        assert!(repo.ping().await.is_ok());
    }
}
