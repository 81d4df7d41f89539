//! # Item Service
//!
//! Business rules between the validated request DTOs and the repository:
//! names and descriptions are trimmed, a name that is blank after trimming
//! is rejected, and updates touch only the supplied fields.
//!
//! `statusCode` and `specialNotes` of an update are validated at the
//! boundary but not persisted.

use stockpile_core::{Item, ItemChanges, ItemId, NewItem, Page};
use stockpile_schema::{CreateItem, UpdateItem};
use thiserror::Error;

use crate::repository::{ItemRepository, RepositoryError};

/// Outcome of a service call that did not succeed.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No item with the requested ID.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// The request is well-formed but violates a business rule.
    #[error("{0}")]
    Invalid(String),

    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Item use cases.
#[derive(Debug, Clone)]
pub struct ItemService {
    repository: ItemRepository,
}

impl ItemService {
    pub fn new(repository: ItemRepository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    /// A page of items, newest first.
    pub async fn list(&self, page: Page) -> Result<Vec<Item>, ServiceError> {
        Ok(self.repository.find_all(page).await?)
    }

    pub async fn get(&self, id: ItemId) -> Result<Item, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Create an item from a validated request.
    pub async fn create(&self, request: CreateItem) -> Result<Item, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Item name is required".to_string()));
        }
        let item = self
            .repository
            .create(NewItem {
                name: name.to_string(),
                description: request.description.map(|d| d.trim().to_string()),
            })
            .await?;
        tracing::info!(id = %item.id, "item created");
        Ok(item)
    }

    /// Apply a validated partial update.
    pub async fn update(&self, id: ItemId, request: UpdateItem) -> Result<Item, ServiceError> {
        let draft = request.is_draft();
        let name = match request.name {
            Some(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ServiceError::Invalid("Item name cannot be empty".to_string()));
                }
                Some(name.to_string())
            }
            None => None,
        };
        let changes = ItemChanges {
            name,
            description: request.description.map(|d| d.trim().to_string()),
        };
        let item = self
            .repository
            .update(id, changes)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        tracing::info!(id = %item.id, draft, "item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: ItemId) -> Result<(), ServiceError> {
        if self.repository.delete(id).await? {
            tracing::info!(%id, "item deleted");
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ItemService {
        ItemService::new(ItemRepository::in_memory())
    }

    fn create(name: &str, description: Option<&str>) -> CreateItem {
        CreateItem {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_trims_input() {
        let item = service()
            .create(create("  Widget  ", Some("  small  ")))
            .await
            .unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.description.as_deref(), Some("small"));
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let err = service().create(create("   ", None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Item name is required"));
    }

    #[tokio::test]
    async fn update_rejects_blank_name() {
        let svc = service();
        let item = svc.create(create("Widget", None)).await.unwrap();
        let err = svc
            .update(
                item.id,
                UpdateItem {
                    name: Some("  ".into()),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Item name cannot be empty"));
    }

    #[tokio::test]
    async fn update_keeps_unsupplied_fields() {
        let svc = service();
        let item = svc.create(create("Widget", Some("small"))).await.unwrap();
        let updated = svc
            .update(
                item.id,
                UpdateItem {
                    description: Some(" large ".into()),
                    status_code: Some(3),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.description.as_deref(), Some("large"));
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let svc = service();
        let id = ItemId::new(5).unwrap();
        assert!(matches!(svc.get(id).await, Err(ServiceError::NotFound(i)) if i == id));
        assert!(matches!(
            svc.update(id, UpdateItem::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.delete(id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let item = svc.create(create("Widget", None)).await.unwrap();
        svc.delete(item.id).await.unwrap();
        assert!(matches!(svc.get(item.id).await, Err(ServiceError::NotFound(_))));
    }
}
