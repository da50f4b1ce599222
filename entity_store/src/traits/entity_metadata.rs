//! Trait definitions
//!
//! This module defines the metadata and execution traits every
//! handle-addressable entity type implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Metadata about a handle-addressable entity's table and generated SQL
///
/// This trait should be derived through the `#[entity]` attribute macro, which
/// automatically includes all necessary derives.
///
/// Recommended usage:
/// ```ignore
/// use merge_derive::entity;
///
/// #[entity]
/// #[table(name = "products")]
/// pub struct Product {
///     #[primary_key]
///     pub id: Uuid,
///
///     #[handle]
///     pub handle: String,
///
///     #[field(merge)]
///     pub name: Option<String>,
///
///     #[field(merge, nested)]
///     pub dimensions: Option<Dimensions>,
/// }
/// ```
pub trait EntityMetadata:
    Clone + Send + Sync + Debug + Serialize + for<'de> Deserialize<'de>
{
    /// The type used for the primary key
    type Id: Clone
        + Send
        + Sync
        + Debug
        + Unpin
        + for<'q> sqlx::Encode<'q, sqlx::Postgres>
        + for<'r> sqlx::Decode<'r, sqlx::Postgres>
        + sqlx::Type<sqlx::Postgres>;

    /// The table name in the database
    fn table_name() -> &'static str;

    /// The column holding the unique handle (secondary natural key)
    fn handle_field() -> &'static str;

    /// The primary key column name
    fn primary_key_field() -> &'static str;

    /// This instance's handle value
    fn handle(&self) -> &str;

    /// Extract the primary key from this instance
    fn extract_id(&self) -> Self::Id;

    /// SQL for INSERT (with placeholders)
    fn create_sql() -> &'static str;

    /// SQL for UPDATE keyed by handle (with placeholders)
    fn update_by_handle_sql() -> &'static str;

    /// SQL for SELECT filtered by exact handle equality
    fn select_by_handle_sql() -> &'static str;

    /// SQL for SELECT by primary key
    fn get_by_id_sql() -> &'static str;

    /// SQL for COUNT all rows
    fn count_all_sql() -> &'static str;

    /// Column names written on INSERT
    fn create_fields() -> Vec<&'static str>;

    /// Column names rewritten by a merge update
    fn update_fields() -> Vec<&'static str>;

    /// Generate CREATE TABLE SQL statement
    fn create_table_sql() -> String;

    /// Generate DROP TABLE SQL statement
    fn drop_table_sql() -> String {
        format!("DROP TABLE IF EXISTS {}", Self::table_name())
    }

    /// Generate CREATE INDEX SQL statements
    ///
    /// The generated handle index is deliberately non-unique: handle
    /// uniqueness is assumed, not enforced, so the ambiguous-lookup policy
    /// stays observable against real data.
    fn create_indexes_sql() -> Vec<String> {
        vec![]
    }
}

/// Async query execution for entity types
///
/// Separates database operations from metadata; implementations are generated
/// alongside `EntityMetadata` and bind each column in declaration order.
#[async_trait]
pub trait EntityExecutor: EntityMetadata {
    /// Execute the INSERT with bound parameters, returning the created row
    async fn execute_create(
        &self,
        pool: &sqlx::PgPool,
    ) -> Result<Self, crate::errors::EntityStoreError>
    where
        Self: Sized + Send + Sync,
        Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>;

    /// Execute the INSERT inside a transaction
    async fn execute_create_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Self, crate::errors::EntityStoreError>
    where
        Self: Sized + Send + Sync,
        Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>;

    /// Execute the handle-keyed UPDATE with bound parameters
    async fn execute_update_by_handle(
        &self,
        pool: &sqlx::PgPool,
    ) -> Result<Self, crate::errors::EntityStoreError>
    where
        Self: Sized + Send + Sync,
        Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>;

    /// Execute the handle-keyed UPDATE inside a transaction
    async fn execute_update_by_handle_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Self, crate::errors::EntityStoreError>
    where
        Self: Sized + Send + Sync,
        Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>;
}
