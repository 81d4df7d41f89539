//! Item persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `items` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use stockpile_core::{Item, ItemChanges, ItemId, NewItem, Page};

/// Columns selected for every item query.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = sqlx::Error;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let id = ItemId::new(row.id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Item {
            id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// List a page of items, newest first.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<Item>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ItemRow>(&format!(
        "SELECT {COLUMNS} FROM items ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(i64::from(page.limit))
    .bind(i64::from(page.offset))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Item::try_from).collect()
}

/// Fetch an item by ID.
pub async fn get_by_id(pool: &PgPool, id: ItemId) -> Result<Option<Item>, sqlx::Error> {
    let row = sqlx::query_as::<_, ItemRow>(&format!("SELECT {COLUMNS} FROM items WHERE id = $1"))
        .bind(id.get())
        .fetch_optional(pool)
        .await?;

    row.map(Item::try_from).transpose()
}

/// Insert an item and return it with its assigned ID and timestamps.
pub async fn insert(pool: &PgPool, item: &NewItem) -> Result<Item, sqlx::Error> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "INSERT INTO items (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(&item.name)
    .bind(&item.description)
    .fetch_one(pool)
    .await?;

    Item::try_from(row)
}

/// Apply the supplied fields of `changes`. Returns `None` if no row matched.
pub async fn update(
    pool: &PgPool,
    id: ItemId,
    changes: &ItemChanges,
) -> Result<Option<Item>, sqlx::Error> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "UPDATE items
         SET name = COALESCE($1, name),
             description = COALESCE($2, description),
             updated_at = NOW()
         WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    row.map(Item::try_from).transpose()
}

/// Delete an item. Returns `true` if a row was removed.
pub async fn delete(pool: &PgPool, id: ItemId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id.get())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Total number of items.
pub async fn count(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Round-trip a trivial query to check connectivity.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
