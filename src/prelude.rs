//! Convenience re-exports for common HandleHaus usage
//!
//! This prelude module re-exports the most commonly used items from the HandleHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use handlehaus::prelude::*;
//!
//! // Now you have access to all the common HandleHaus types and traits
//! ```

// Core HandleHaus components
pub use crate::core::HandleHaus;
pub use crate::errors::HandleHausError;
pub use crate::migration;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, StoreConfig};

// Re-export commonly used entity-store types for convenience
pub use entity_store::prelude::*;

// Re-export entity_store module for macro-generated code
pub use entity_store;

// Re-export signal system for event handling
pub use signal_system::prelude::*;

// Re-export the derive macros for entity definitions
pub use merge_derive::{Entity, Mergeable, embedded, entity};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{Decode, Encode, FromRow, PgPool, Postgres, Row, Transaction, Type};

// Commonly used value types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
