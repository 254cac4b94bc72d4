//! Repository for the `inventory_items` table.
//!
//! Every query takes the owning `user_id` and filters on it, so a row owned
//! by someone else behaves exactly like a row that does not exist.

use sqlx::PgPool;
use stockroom_core::search::substring_pattern;
use stockroom_core::types::DbId;

use crate::models::inventory_item::{
    CreateInventoryItem, InventoryItem, UpdateInventoryItem, UpdatedInventoryItem,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, quantity, price, category, image_filename, \
                       created_at, updated_at";

/// Most recently touched first; id breaks ties between rows written in the
/// same transaction timestamp.
const ORDER: &str = "ORDER BY updated_at DESC, id DESC";

/// Provides owner-scoped CRUD and search for inventory items.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Insert a new item owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateInventoryItem,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_items (user_id, name, quantity, price, category, image_filename)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.quantity)
            .bind(input.price)
            .bind(&input.category)
            .bind(&input.image_filename)
            .fetch_one(pool)
            .await
    }

    /// Find one of the user's items by id.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all of the user's items, most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE user_id = $1 {ORDER}");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring search over name and category.
    ///
    /// A blank query returns the same rows as [`InventoryRepo::list_for_user`].
    pub async fn search(
        pool: &PgPool,
        user_id: DbId,
        query_str: &str,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let Some(pattern) = substring_pattern(query_str) else {
            return Self::list_for_user(pool, user_id).await;
        };

        let query = format!(
            "SELECT {COLUMNS} FROM inventory_items
             WHERE user_id = $1 AND (name ILIKE $2 OR category ILIKE $2)
             {ORDER}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(user_id)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Replace an item's fields and bump `updated_at`.
    ///
    /// The row is locked before it is written, and the image reference it
    /// held at that moment comes back as `previous_image_filename`, so the
    /// caller removes the file the row actually stopped pointing at.
    ///
    /// Returns `None` if the user owns no item with the given `id`.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateInventoryItem,
    ) -> Result<Option<UpdatedInventoryItem>, sqlx::Error> {
        let query = format!(
            "WITH previous AS (
                SELECT id AS previous_id, image_filename AS previous_image_filename
                FROM inventory_items
                WHERE id = $1 AND user_id = $2
                FOR UPDATE
             )
             UPDATE inventory_items SET
                name = $3,
                quantity = $4,
                price = $5,
                category = $6,
                image_filename = CASE WHEN $7 THEN image_filename ELSE $8 END,
                updated_at = NOW()
             FROM previous
             WHERE id = previous.previous_id
             RETURNING {COLUMNS}, previous.previous_image_filename"
        );
        sqlx::query_as::<_, UpdatedInventoryItem>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.quantity)
            .bind(input.price)
            .bind(&input.category)
            .bind(input.image.keeps_current())
            .bind(input.image.new_filename())
            .fetch_optional(pool)
            .await
    }

    /// Delete one of the user's items, returning the removed row so the
    /// caller can clean up its image.
    ///
    /// Returns `None` if the user owns no item with the given `id`.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!(
            "DELETE FROM inventory_items WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
