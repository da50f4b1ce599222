//! Generic store implementation
//!
//! This module implements the caller-facing store operations for any entity
//! type with derived metadata: handle lookup, existence check, creation, and
//! the transactional merge-update.

use super::core::{AmbiguousHandlePolicy, HandleStore};
use crate::errors::EntityStoreError;
use crate::merge::{copy_persistent_fields, Mergeable};
use crate::traits::entity_metadata::{EntityExecutor, EntityMetadata};
use crate::traits::HandleableStore;
use async_trait::async_trait;
use signal_system::{serialize_to_postgres_record, EntityEvent, EventType};
use sqlx::Row;

#[async_trait]
impl<T> HandleableStore for HandleStore<T>
where
    T: EntityMetadata
        + EntityExecutor
        + Mergeable
        + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
        + serde::Serialize
        + Unpin,
{
    type Entity = T;
    type Id = T::Id;

    async fn create(&self, entity: Self::Entity) -> Result<Self::Entity, EntityStoreError> {
        let created = entity.execute_create(&self.db_pool).await?;

        // Emit create signal if signal manager is present
        if self.signal_manager.is_some() {
            let mut event = EntityEvent::new(EventType::Created, T::table_name().to_string())
                .with_handle(created.handle().to_string());
            event.add_payload("__record__".to_string(), serialize_to_postgres_record(&created));
            self.emit_event(event);
        }

        Ok(created)
    }

    async fn get_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>, EntityStoreError> {
        let result = sqlx::query_as::<_, T>(T::get_by_id_sql())
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| EntityStoreError::query_execution(T::table_name(), "get_by_id", e))?;

        Ok(result)
    }

    async fn find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Self::Entity>, EntityStoreError> {
        // fetch_all rather than fetch_optional: the row count drives the
        // ambiguity policy below. The pooled connection is returned on every
        // exit path, including errors.
        let mut matches: Vec<T> = sqlx::query_as::<_, T>(T::select_by_handle_sql())
            .bind(handle)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                EntityStoreError::query_execution(T::table_name(), "find_by_handle", e)
            })?;

        match matches.len() {
            1 => Ok(matches.pop()),
            0 => Ok(None),
            n => match self.handle_policy {
                AmbiguousHandlePolicy::NotFound => {
                    tracing::warn!(
                        table = T::table_name(),
                        handle,
                        matches = n,
                        "handle matches multiple rows, treating as not found"
                    );
                    Ok(None)
                }
                AmbiguousHandlePolicy::Error => {
                    Err(EntityStoreError::ambiguous_handle(T::table_name(), handle, n))
                }
            },
        }
    }

    async fn exists(&self, entity: &Self::Entity) -> Result<bool, EntityStoreError> {
        Ok(self.find_by_handle(entity.handle()).await?.is_some())
    }

    async fn update(&self, entity: Self::Entity) -> Result<Self::Entity, EntityStoreError> {
        let handle = entity.handle().to_string();
        if handle.is_empty() {
            return Err(EntityStoreError::invalid_handle(
                "update requires a non-empty handle",
            ));
        }

        // Resolve the merge target outside the write transaction. The row is
        // not re-checked once the transaction opens, so a concurrent update to
        // the same handle can still win the race to commit.
        let mut existing = self
            .find_by_handle(&handle)
            .await?
            .ok_or_else(|| EntityStoreError::entity_not_found(T::table_name(), &handle))?;

        let mut tx = self
            .db_pool
            .begin()
            .await
            .map_err(|e| EntityStoreError::transaction(T::table_name(), "begin", e))?;

        match copy_persistent_fields(&mut existing, &entity) {
            Ok(copied) => {
                tracing::debug!(
                    table = T::table_name(),
                    handle = %handle,
                    fields_copied = copied,
                    "merged value object onto persisted entity"
                );
            }
            Err(e) => {
                // Best-effort rollback; the contract violation is what the
                // caller needs to see.
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        table = T::table_name(),
                        error = %rollback_err,
                        "rollback after merge failure also failed"
                    );
                }
                return Err(EntityStoreError::merge_contract(T::table_name(), e));
            }
        }

        let updated = match existing.execute_update_by_handle_tx(&mut tx).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        table = T::table_name(),
                        error = %rollback_err,
                        "rollback after update failure also failed"
                    );
                }
                return Err(e);
            }
        };

        tx.commit()
            .await
            .map_err(|e| EntityStoreError::transaction(T::table_name(), "commit", e))?;

        // Notification happens strictly after the commit: subscribers may
        // assume the update is durable.
        if self.signal_manager.is_some() {
            let mut event = EntityEvent::new(EventType::Updated, T::table_name().to_string())
                .with_handle(handle);
            event.add_payload("__record__".to_string(), serialize_to_postgres_record(&updated));
            self.emit_event(event);
        }

        Ok(updated)
    }

    async fn count(&self) -> Result<i64, EntityStoreError> {
        let result = sqlx::query(T::count_all_sql())
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| EntityStoreError::query_execution(T::table_name(), "count", e))?;

        let total: i64 = result.get("total");
        Ok(total)
    }
}
