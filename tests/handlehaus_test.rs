//! Integration tests for the HandleHaus coordinator
//!
//! Drives the coordinator end to end against a real PostgreSQL instance:
//! migration, store registration, lookups through a registered store, and
//! registry bookkeeping.
//!
//! These tests are ignored by default; run them with a live database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use handlehaus::prelude::*;
use sqlx::PgPool;

#[entity]
#[table(name = "coordinator_products")]
pub struct Product {
    #[primary_key]
    pub id: Uuid,

    #[handle]
    pub handle: String,

    #[field(merge)]
    pub title: Option<String>,

    #[field(merge)]
    pub price_cents: Option<i64>,
}

async fn setup_pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_migrate_register_and_operate() {
    let pool = setup_pool().await;
    let mut haus = HandleHaus::from_pool(pool);

    haus.health_check().await.unwrap();

    let store = HandleStore::<Product>::new(haus.pool().clone(), None);
    haus.register_store_with_migration("products".to_string(), store, true)
        .await
        .unwrap();

    assert_eq!(haus.list_stores(), vec![&"products".to_string()]);

    let store = haus
        .get_store::<HandleStore<Product>>("products")
        .unwrap();

    let created = store
        .create(Product {
            id: Uuid::new_v4(),
            handle: "shoe-1".to_string(),
            title: Some("Runner".to_string()),
            price_cents: Some(4900),
        })
        .await
        .unwrap();

    let patch = Product {
        id: created.id,
        handle: "shoe-1".to_string(),
        title: None,
        price_cents: Some(5900),
    };
    let updated = store.update(patch).await.unwrap();
    assert_eq!(updated.title.as_deref(), Some("Runner"));
    assert_eq!(updated.price_cents, Some(5900));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_auto_migrate_creates_table_and_indexes() {
    let pool = setup_pool().await;
    let haus = HandleHaus::from_pool(pool);

    haus.auto_migrate::<Product>(true).await.unwrap();

    // The migrated table accepts the generated INSERT
    let store = HandleStore::<Product>::new(haus.pool().clone(), None);
    store
        .create(Product {
            id: Uuid::new_v4(),
            handle: "migrated".to_string(),
            title: None,
            price_cents: None,
        })
        .await
        .unwrap();
    assert_eq!(store.count().await.unwrap(), 1);

    // Re-running against the existing table is a no-op, not an error
    let haus2 = HandleHaus::from_pool(haus.pool().clone());
    haus2.auto_migrate::<Product>(false).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_store_registry_bookkeeping() {
    let pool = setup_pool().await;
    let mut haus = HandleHaus::from_pool(pool);
    haus.auto_migrate::<Product>(true).await.unwrap();

    let store = HandleStore::<Product>::new(haus.pool().clone(), None);
    haus.register_store("products".to_string(), store.clone())
        .unwrap();

    let err = haus
        .register_store("products".to_string(), store)
        .unwrap_err();
    assert!(matches!(err, HandleHausError::StoreAlreadyRegistered(_)));

    haus.unregister_store("products").unwrap();
    let err = haus
        .get_store::<HandleStore<Product>>("products")
        .unwrap_err();
    assert!(matches!(err, HandleHausError::StoreNotFound(_)));
}
