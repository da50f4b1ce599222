//! # HandleHaus
//!
//! A Rust persistence library for PostgreSQL built around handle-addressed
//! entities, with derived merge schemas, transactional partial updates, and
//! signals.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use handlehaus::prelude::*;
//!
//! #[entity]
//! #[table(name = "products")]
//! pub struct Product {
//!     #[primary_key]
//!     pub id: Uuid,
//!
//!     #[handle]
//!     pub handle: String,
//!
//!     #[field(merge)]
//!     pub title: Option<String>,
//!
//!     #[field(merge)]
//!     pub price_cents: Option<i64>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "handlehaus".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let mut haus = HandleHaus::new(config).await?;
//!     haus.auto_migrate::<Product>(true).await?;
//!
//!     let product_store = HandleStore::<Product>::new(
//!         haus.pool().clone(),
//!         None, // no signals
//!     );
//!
//!     haus.register_store("products".to_string(), product_store)?;
//!     let product_store = haus.get_store::<HandleStore<Product>>("products")?;
//!
//!     let product = Product {
//!         id: Uuid::new_v4(),
//!         handle: "shoe-1".to_string(),
//!         title: Some("Runner".to_string()),
//!         price_cents: Some(4900),
//!     };
//!
//!     let created = product_store.create(product).await?;
//!     println!("Created product: {}", created.handle);
//!
//!     // Partial update: unset fields keep their stored values
//!     let patch = Product {
//!         id: created.id,
//!         handle: "shoe-1".to_string(),
//!         title: None,
//!         price_cents: Some(5900),
//!     };
//!     let updated = product_store.update(patch).await?;
//!     println!("Updated price: {:?}", updated.price_cents);
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::HandleHaus;
pub use errors::HandleHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, StoreConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use entity_store;
pub use merge_derive;
pub use signal_system;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
