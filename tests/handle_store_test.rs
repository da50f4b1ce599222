//! Integration tests for the handle-addressed store
//!
//! Exercises create, handle lookup, existence checks, the transactional
//! merge-update, duplicate-handle policies, and update events against a real
//! PostgreSQL instance.
//!
//! These tests are ignored by default; run them with a live database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use handlehaus::prelude::*;
use sqlx::PgPool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[embedded]
pub struct Dimensions {
    #[field(merge)]
    pub width_mm: Option<i32>,

    #[field(merge)]
    pub height_mm: Option<i32>,
}

#[entity]
#[table(name = "store_test_products")]
pub struct Product {
    #[primary_key]
    pub id: Uuid,

    #[handle]
    pub handle: String,

    #[field(merge)]
    pub title: Option<String>,

    #[field(merge)]
    pub price_cents: Option<i64>,

    #[field(merge, nested)]
    pub dimensions: Option<Dimensions>,
}

fn product(handle: &str) -> Product {
    Product {
        id: Uuid::new_v4(),
        handle: handle.to_string(),
        title: Some("Runner".to_string()),
        price_cents: Some(4900),
        dimensions: Some(Dimensions {
            width_mm: Some(110),
            height_mm: Some(90),
        }),
    }
}

async fn setup_pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

async fn reset_table(pool: &PgPool) {
    let _ = sqlx::query("DROP TABLE IF EXISTS store_test_products CASCADE")
        .execute(pool)
        .await;
    sqlx::query(&Product::create_table_sql())
        .execute(pool)
        .await
        .expect("Failed to create table");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find_by_handle() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None);

    let created = store.create(product("shoe-1")).await.unwrap();
    assert_eq!(created.handle, "shoe-1");
    assert_eq!(created.title.as_deref(), Some("Runner"));

    let found = store.find_by_handle("shoe-1").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.dimensions.as_ref().unwrap().width_mm, Some(110));

    assert!(store.find_by_handle("no-such-handle").await.unwrap().is_none());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_exists() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None);

    let entity = product("shoe-2");
    assert!(!store.exists(&entity).await.unwrap());

    store.create(entity.clone()).await.unwrap();
    assert!(store.exists(&entity).await.unwrap());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_merges_only_populated_fields() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None);
    let created = store.create(product("shoe-3")).await.unwrap();

    let patch = Product {
        id: created.id,
        handle: "shoe-3".to_string(),
        title: None,
        price_cents: Some(5900),
        dimensions: Some(Dimensions {
            width_mm: None,
            height_mm: Some(95),
        }),
    };

    let updated = store.update(patch).await.unwrap();

    // Unset scalar survives, set scalar is replaced
    assert_eq!(updated.title.as_deref(), Some("Runner"));
    assert_eq!(updated.price_cents, Some(5900));

    // The nested object is merged field by field, not replaced
    let dims = updated.dimensions.as_ref().unwrap();
    assert_eq!(dims.width_mm, Some(110));
    assert_eq!(dims.height_mm, Some(95));

    let reloaded = store.find_by_handle("shoe-3").await.unwrap().unwrap();
    assert_eq!(reloaded.price_cents, Some(5900));
    assert_eq!(reloaded.dimensions.as_ref().unwrap().width_mm, Some(110));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_unknown_handle_fails() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None);

    let err = store.update(product("ghost")).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::EntityNotFound { .. }));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_handle_default_policy_yields_none() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None);
    store.create(product("dup")).await.unwrap();
    store.create(product("dup")).await.unwrap();

    // Historical behavior: an ambiguous handle reads as absent
    assert!(store.find_by_handle("dup").await.unwrap().is_none());

    let err = store.update(product("dup")).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::EntityNotFound { .. }));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_handle_strict_policy_errors() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None)
        .with_handle_policy(AmbiguousHandlePolicy::Error);
    store.create(product("dup-strict")).await.unwrap();
    store.create(product("dup-strict")).await.unwrap();

    let err = store.find_by_handle("dup-strict").await.unwrap_err();
    assert!(matches!(
        err,
        EntityStoreError::AmbiguousHandle { matches: 2, .. }
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_update_rolls_back() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    sqlx::query(
        "ALTER TABLE store_test_products ADD CONSTRAINT price_non_negative CHECK (price_cents >= 0)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let store = HandleStore::<Product>::new(pool.clone(), None);
    let created = store.create(product("shoe-4")).await.unwrap();

    let patch = Product {
        id: created.id,
        handle: "shoe-4".to_string(),
        title: Some("Broken".to_string()),
        price_cents: Some(-1),
        dimensions: None,
    };

    let err = store.update(patch).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::QueryExecution { .. }));

    // The rejected transaction left the stored row untouched
    let reloaded = store.find_by_handle("shoe-4").await.unwrap().unwrap();
    assert_eq!(reloaded.title.as_deref(), Some("Runner"));
    assert_eq!(reloaded.price_cents, Some(4900));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_emits_event_after_commit() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let signal_manager = Arc::new(SignalManager::new());
    let updates_seen = Arc::new(AtomicUsize::new(0));
    let counter = updates_seen.clone();
    signal_manager.add_callback(move |event: &EntityEvent| {
        if event.event_type == EventType::Updated {
            assert_eq!(event.table_name, "store_test_products");
            assert_eq!(event.handle.as_deref(), Some("shoe-5"));
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let store = HandleStore::<Product>::new(pool.clone(), Some(signal_manager));
    let created = store.create(product("shoe-5")).await.unwrap();

    let patch = Product {
        id: created.id,
        handle: "shoe-5".to_string(),
        title: Some("Walker".to_string()),
        price_cents: None,
        dimensions: None,
    };
    store.update(patch).await.unwrap();

    assert_eq!(updates_seen.load(Ordering::SeqCst), 1);

    // A failed update never notifies
    let err = store.update(product("missing")).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::EntityNotFound { .. }));
    assert_eq!(updates_seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_get_by_id() {
    let pool = setup_pool().await;
    reset_table(&pool).await;

    let store = HandleStore::<Product>::new(pool.clone(), None);
    let created = store.create(product("shoe-6")).await.unwrap();

    let fetched = store.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.handle, "shoe-6");

    assert!(store.get_by_id(&Uuid::new_v4()).await.unwrap().is_none());
}
