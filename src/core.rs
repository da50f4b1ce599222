//! Core HandleHaus functionality
//!
//! This module contains the main HandleHaus struct and its implementation,
//! providing centralized coordination for the connection pool, stores, and signals.

use entity_store::HandleableStore;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::HandleHausError;
use config::DatabaseConfig;

/// Main HandleHaus coordinator that manages the database connection and stores
pub struct HandleHaus {
    pool: PgPool,
    stores: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl HandleHaus {
    /// Create new HandleHaus with database connection
    pub async fn new(config: DatabaseConfig) -> Result<Self, HandleHausError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;

        Ok(Self {
            pool,
            stores: HashMap::new(),
        })
    }

    /// Create HandleHaus around an already-connected pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            stores: HashMap::new(),
        }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Register a store with a given name
    pub fn register_store<T>(&mut self, name: String, store: T) -> Result<(), HandleHausError>
    where
        T: HandleableStore + 'static,
    {
        if self.stores.contains_key(&name) {
            return Err(HandleHausError::StoreAlreadyRegistered(name));
        }

        self.stores.insert(name, Box::new(store));
        Ok(())
    }

    /// Get a registered store by name
    pub fn get_store<T>(&self, name: &str) -> Result<&T, HandleHausError>
    where
        T: HandleableStore + 'static,
    {
        self.stores
            .get(name)
            .and_then(|store| store.downcast_ref::<T>())
            .ok_or_else(|| HandleHausError::StoreNotFound(name.to_string()))
    }

    /// Get a mutable reference to a registered store by name
    pub fn get_store_mut<T>(&mut self, name: &str) -> Result<&mut T, HandleHausError>
    where
        T: HandleableStore + 'static,
    {
        self.stores
            .get_mut(name)
            .and_then(|store| store.downcast_mut::<T>())
            .ok_or_else(|| HandleHausError::StoreNotFound(name.to_string()))
    }

    /// List all registered store names
    pub fn list_stores(&self) -> Vec<&String> {
        self.stores.keys().collect()
    }

    /// Remove a store by name
    pub fn unregister_store(&mut self, name: &str) -> Result<(), HandleHausError> {
        self.stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| HandleHausError::StoreNotFound(name.to_string()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), HandleHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
