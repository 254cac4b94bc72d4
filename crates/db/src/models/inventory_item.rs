//! Inventory item entity model and DTOs.

use rust_decimal::Decimal;
use sqlx::FromRow;
use stockroom_core::inventory::ItemFields;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `inventory_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryItem {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub category: String,
    pub image_filename: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InventoryItem {
    /// Quantity times unit price.
    pub fn line_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// DTO for inserting an item. The owner is passed separately.
#[derive(Debug, Clone)]
pub struct CreateInventoryItem {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub category: String,
    pub image_filename: Option<String>,
}

/// What an edit does to the item's image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    /// Leave whatever the row holds when the update runs.
    Keep,
    /// Point at a newly stored file.
    Replace(String),
    /// Drop the reference.
    Clear,
}

impl ImageChange {
    pub fn keeps_current(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// The filename to write when the current one is not kept.
    pub fn new_filename(&self) -> Option<&str> {
        match self {
            Self::Replace(filename) => Some(filename),
            Self::Keep | Self::Clear => None,
        }
    }
}

/// DTO for editing an item. The text columns are all replaced; the image
/// reference follows `image`.
#[derive(Debug, Clone)]
pub struct UpdateInventoryItem {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub category: String,
    pub image: ImageChange,
}

/// An updated row together with the image it referenced just before the
/// update, read under the same row lock.
#[derive(Debug, Clone, FromRow)]
pub struct UpdatedInventoryItem {
    #[sqlx(flatten)]
    pub item: InventoryItem,
    pub previous_image_filename: Option<String>,
}

impl CreateInventoryItem {
    pub fn new(fields: ItemFields, image_filename: Option<String>) -> Self {
        Self {
            name: fields.name,
            quantity: fields.quantity,
            price: fields.price,
            category: fields.category,
            image_filename,
        }
    }
}

impl UpdateInventoryItem {
    pub fn new(fields: ItemFields, image: ImageChange) -> Self {
        Self {
            name: fields.name,
            quantity: fields.quantity,
            price: fields.price,
            category: fields.category,
            image,
        }
    }
}
