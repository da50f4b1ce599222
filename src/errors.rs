//! Error types for the HandleHaus crate
//!
//! This module contains all error types that can be returned by HandleHaus operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandleHausError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Store already registered: {0}")]
    StoreAlreadyRegistered(String),

    #[error(transparent)]
    Store(#[from] entity_store::EntityStoreError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}
