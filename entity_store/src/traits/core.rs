//! Trait definitions
//!
//! This module defines the caller-facing store trait for handle-addressable
//! entities.

use crate::EntityStoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Common operations for stores of handle-addressable entities
#[async_trait]
pub trait HandleableStore: Clone + Send + Sync + Debug {
    /// The entity type this store persists
    type Entity: Clone + Send + Sync + Debug + Serialize + for<'de> Deserialize<'de>;

    /// The primary key type of the entity
    type Id: Clone + Send + Sync + Debug;

    /// Persist a new entity, returning the created row
    async fn create(&self, entity: Self::Entity) -> Result<Self::Entity, EntityStoreError>;

    /// Get an entity by its primary key
    async fn get_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>, EntityStoreError>;

    /// Resolve the single entity carrying `handle`
    ///
    /// Zero matches yields `None`. More than one match is a data-integrity
    /// violation whose outcome depends on the store's ambiguous-handle
    /// policy: the default also yields `None`, the strict policy fails with
    /// [`EntityStoreError::AmbiguousHandle`].
    async fn find_by_handle(&self, handle: &str)
        -> Result<Option<Self::Entity>, EntityStoreError>;

    /// Whether an entity with this entity's handle is currently persisted
    async fn exists(&self, entity: &Self::Entity) -> Result<bool, EntityStoreError>;

    /// Merge the populated fields of `entity` onto the persisted entity
    /// sharing its handle, atomically
    ///
    /// The value object's absent (`None`) fields never overwrite persisted
    /// state; nested sub-objects are merged recursively under the same rule.
    /// The write transaction covers only the copy and commit: the initial
    /// handle lookup and the post-commit `Updated` notification sit outside
    /// it. No lock or version check spans lookup-to-commit, so two concurrent
    /// updates to one handle can race (last commit wins); callers needing
    /// stronger guarantees must serialize externally.
    ///
    /// Returns the merged entity as persisted. Fails with
    /// [`EntityStoreError::EntityNotFound`] when no entity carries the handle.
    async fn update(&self, entity: Self::Entity) -> Result<Self::Entity, EntityStoreError>;

    /// Count all persisted entities of this type
    async fn count(&self) -> Result<i64, EntityStoreError>;
}
