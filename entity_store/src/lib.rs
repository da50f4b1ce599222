//! Core store library for handle-addressable entities
//!
//! Entities here carry two keys: a primary key and a unique, human-readable
//! `handle` (a slug-like secondary key). This crate provides the generic
//! [`HandleStore`] over any entity with derived metadata, the recursive
//! partial-merge algorithm behind its transactional `update`, and the error
//! taxonomy every operation surfaces.

pub mod errors;
pub mod handle_store;
pub mod merge;
pub mod prelude;
pub mod traits;

pub use errors::EntityStoreError;
pub use handle_store::{AmbiguousHandlePolicy, HandleStore};
pub use merge::{copy_persistent_fields, FieldKind, FieldValue, MergeError, MergeField, Mergeable};
pub use traits::{EntityExecutor, EntityMetadata, HandleableStore};

/// PostgreSQL connection pool type used across stores
pub type DbPool = sqlx::PgPool;
