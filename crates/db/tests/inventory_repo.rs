//! Integration tests for the owner-scoped inventory repository.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;
use stockroom_core::inventory::{InventoryTotals, ItemFields};
use stockroom_core::types::DbId;
use stockroom_db::models::inventory_item::{CreateInventoryItem, ImageChange, UpdateInventoryItem};
use stockroom_db::models::user::CreateUser;
use stockroom_db::repositories::{InventoryRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$placeholder".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

fn fields(name: &str, quantity: i32, price: &str, category: &str) -> ItemFields {
    ItemFields {
        name: name.to_string(),
        quantity,
        price: Decimal::from_str(price).unwrap(),
        category: category.to_string(),
    }
}

fn new_item(name: &str, quantity: i32, price: &str, category: &str) -> CreateInventoryItem {
    CreateInventoryItem::new(fields(name, quantity, price, category), None)
}

async fn totals(pool: &PgPool, user_id: DbId) -> InventoryTotals {
    let items = InventoryRepo::list_for_user(pool, user_id).await.unwrap();
    InventoryTotals::tally(items.iter().map(|i| (i.quantity, i.price)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get_round_trips(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateInventoryItem::new(
        fields("Spanner", 3, "7.25", "Tools"),
        Some("abc123.png".to_string()),
    );

    let created = InventoryRepo::create(&pool, alice, &input).await.unwrap();
    let fetched = InventoryRepo::find_for_user(&pool, alice, created.id)
        .await
        .unwrap()
        .expect("owner should find the item");

    assert_eq!(fetched.user_id, alice);
    assert_eq!(fetched.name, "Spanner");
    assert_eq!(fetched.quantity, 3);
    assert_eq!(fetched.price, Decimal::from_str("7.25").unwrap());
    assert_eq!(fetched.category, "Tools");
    assert_eq!(fetched.image_filename.as_deref(), Some("abc123.png"));
    assert_eq!(fetched.created_at, created.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_owner_sees_nothing(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let item = InventoryRepo::create(&pool, alice, &new_item("Ledger", 1, "5", "Office"))
        .await
        .unwrap();

    assert!(InventoryRepo::find_for_user(&pool, bob, item.id).await.unwrap().is_none());

    let update = UpdateInventoryItem::new(fields("Hijacked", 0, "0", "Bob"), ImageChange::Clear);
    assert!(InventoryRepo::update(&pool, bob, item.id, &update).await.unwrap().is_none());
    assert!(InventoryRepo::delete(&pool, bob, item.id).await.unwrap().is_none());
    assert!(InventoryRepo::list_for_user(&pool, bob).await.unwrap().is_empty());

    let still_there = InventoryRepo::find_for_user(&pool, alice, item.id).await.unwrap().unwrap();
    assert_eq!(still_there.name, "Ledger");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_fields_and_bumps_timestamp(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateInventoryItem::new(fields("Bolt", 10, "0.25", "Hardware"), Some("old.png".into()));
    let item = InventoryRepo::create(&pool, alice, &input).await.unwrap();

    let update = UpdateInventoryItem::new(fields("Hex Bolt", 4, "0.40", "Fasteners"), ImageChange::Clear);
    let updated = InventoryRepo::update(&pool, alice, item.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.previous_image_filename.as_deref(), Some("old.png"));
    let updated = updated.item;
    assert_eq!(updated.name, "Hex Bolt");
    assert_eq!(updated.quantity, 4);
    assert_eq!(updated.image_filename, None, "Clear drops the image reference");
    assert!(updated.updated_at >= item.updated_at);
    assert_eq!(updated.created_at, item.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_keep_follows_image_written_by_an_interleaved_edit(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateInventoryItem::new(fields("Poster", 1, "9", "Decor"), Some("first.png".into()));
    let item = InventoryRepo::create(&pool, alice, &input).await.unwrap();

    // One edit swaps the image.
    let replace = UpdateInventoryItem::new(
        fields("Poster", 1, "9", "Decor"),
        ImageChange::Replace("second.png".into()),
    );
    let replaced = InventoryRepo::update(&pool, alice, item.id, &replace)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.previous_image_filename.as_deref(), Some("first.png"));
    assert_eq!(replaced.item.image_filename.as_deref(), Some("second.png"));

    // A second edit, started from the older page, submits no new image.
    let keep = UpdateInventoryItem::new(fields("Framed Poster", 1, "12", "Decor"), ImageChange::Keep);
    let kept = InventoryRepo::update(&pool, alice, item.id, &keep)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.item.name, "Framed Poster");
    assert_eq!(kept.item.image_filename.as_deref(), Some("second.png"));
    assert_eq!(kept.previous_image_filename.as_deref(), Some("second.png"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_returns_removed_row(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateInventoryItem::new(fields("Mug", 1, "3", "Kitchen"), Some("mug.jpg".into()));
    let item = InventoryRepo::create(&pool, alice, &input).await.unwrap();

    let removed = InventoryRepo::delete(&pool, alice, item.id).await.unwrap().unwrap();

    assert_eq!(removed.id, item.id);
    assert_eq!(removed.image_filename.as_deref(), Some("mug.jpg"));
    assert!(InventoryRepo::find_for_user(&pool, alice, item.id).await.unwrap().is_none());
    assert!(InventoryRepo::delete(&pool, alice, item.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_most_recently_updated_first(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let first = InventoryRepo::create(&pool, alice, &new_item("First", 1, "1", "A")).await.unwrap();
    let second = InventoryRepo::create(&pool, alice, &new_item("Second", 1, "1", "A")).await.unwrap();

    let ids: Vec<_> = InventoryRepo::list_for_user(&pool, alice)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // Touching the older item moves it to the top.
    let update = UpdateInventoryItem::new(fields("First", 2, "1", "A"), ImageChange::Keep);
    InventoryRepo::update(&pool, alice, first.id, &update).await.unwrap();
    let top = InventoryRepo::list_for_user(&pool, alice).await.unwrap()[0].id;
    assert_eq!(top, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_name_or_category_case_insensitively(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    InventoryRepo::create(&pool, alice, &new_item("Claw Hammer", 1, "15", "Tools")).await.unwrap();
    InventoryRepo::create(&pool, alice, &new_item("Cord", 1, "8", "Electrical")).await.unwrap();
    InventoryRepo::create(&pool, bob, &new_item("Sledge Hammer", 1, "40", "Tools")).await.unwrap();

    let hits = InventoryRepo::search(&pool, alice, "HAMMER").await.unwrap();
    assert_eq!(hits.len(), 1, "other users' rows never match");
    assert_eq!(hits[0].name, "Claw Hammer");

    let hits = InventoryRepo::search(&pool, alice, "electric").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Cord");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    InventoryRepo::create(&pool, alice, &new_item("50% off voucher", 1, "0", "Promo")).await.unwrap();
    InventoryRepo::create(&pool, alice, &new_item("500 screws", 1, "4", "Hardware")).await.unwrap();
    InventoryRepo::create(&pool, alice, &new_item("snake_case mug", 1, "4", "Kitchen")).await.unwrap();

    let hits = InventoryRepo::search(&pool, alice, "50%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "50% off voucher");

    let hits = InventoryRepo::search(&pool, alice, "e_c").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "snake_case mug");

    assert!(InventoryRepo::search(&pool, alice, "%").await.unwrap().len() == 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_search_equals_list(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    InventoryRepo::create(&pool, alice, &new_item("One", 1, "1", "A")).await.unwrap();
    InventoryRepo::create(&pool, alice, &new_item("Two", 2, "2", "B")).await.unwrap();

    let listed: Vec<_> = InventoryRepo::list_for_user(&pool, alice)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    for query in ["", "   "] {
        let searched: Vec<_> = InventoryRepo::search(&pool, alice, query)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(searched, listed);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_totals_track_create_update_delete(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    InventoryRepo::create(&pool, bob, &new_item("Noise", 1000, "1000", "Bob")).await.unwrap();

    let a = InventoryRepo::create(&pool, alice, &new_item("A", 2, "1.50", "X")).await.unwrap();
    let b = InventoryRepo::create(&pool, alice, &new_item("B", 3, "10", "X")).await.unwrap();
    let t = totals(&pool, alice).await;
    assert_eq!((t.item_count, t.total_quantity), (2, 5));
    assert_eq!(t.total_value, Decimal::from_str("33.00").unwrap());

    let update = UpdateInventoryItem::new(fields("B", 1, "10", "X"), ImageChange::Keep);
    InventoryRepo::update(&pool, alice, b.id, &update).await.unwrap();
    let t = totals(&pool, alice).await;
    assert_eq!((t.item_count, t.total_quantity), (2, 3));
    assert_eq!(t.total_value, Decimal::from_str("13.00").unwrap());

    InventoryRepo::delete(&pool, alice, a.id).await.unwrap();
    let t = totals(&pool, alice).await;
    assert_eq!((t.item_count, t.total_quantity), (1, 1));
    assert_eq!(t.total_value, Decimal::from_str("10.00").unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_quantity_violates_check(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateInventoryItem::new(fields("Bad", -1, "1", "X"), None);

    let err = InventoryRepo::create(&pool, alice, &input).await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => assert_eq!(db_err.code().as_deref(), Some("23514")),
        other => panic!("expected check violation, got {other:?}"),
    }
}
