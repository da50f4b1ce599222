//! Database migration functionality
//!
//! This module provides automatic table creation and migration utilities
//! for entity types managed by HandleHaus.

use crate::core::HandleHaus;
use crate::errors::HandleHausError;
use entity_store::{EntityMetadata, HandleableStore};

impl HandleHaus {
    /// Automatically create table and indexes for an entity type
    /// If recreate is true, drops existing table first
    pub async fn auto_migrate<T>(&self, recreate: bool) -> Result<(), HandleHausError>
    where
        T: EntityMetadata + Send + Sync,
    {
        let table_name = T::table_name();

        if recreate {
            let drop_sql = T::drop_table_sql();
            tracing::info!(table = table_name, sql = %drop_sql, "Dropping table");
            sqlx::query(&drop_sql).execute(self.pool()).await?;
        }

        let create_table_sql = T::create_table_sql();
        tracing::info!(table = table_name, sql = %create_table_sql, "Creating table");
        sqlx::query(&create_table_sql).execute(self.pool()).await?;

        // Create __updated_at__ trigger function if it doesn't exist
        let trigger_function_sql = r#"
        CREATE OR REPLACE FUNCTION update_updated_at_column()
        RETURNS TRIGGER AS $$
        BEGIN
            NEW.__updated_at__ = NOW();
            RETURN NEW;
        END;
        $$ language 'plpgsql';
        "#;
        sqlx::query(trigger_function_sql)
            .execute(self.pool())
            .await?;

        // Create __updated_at__ trigger for this table
        let trigger_sql = format!(
            "CREATE TRIGGER update_{}_updated_at
             BEFORE UPDATE ON {}
             FOR EACH ROW
             EXECUTE FUNCTION update_updated_at_column()",
            table_name, table_name
        );
        // Use IF NOT EXISTS equivalent for triggers
        let trigger_check_sql = format!(
            "DO $$
             BEGIN
                 IF NOT EXISTS (SELECT 1 FROM pg_trigger WHERE tgname = 'update_{}_updated_at') THEN
                     EXECUTE '{}';
                 END IF;
             END $$",
            table_name, trigger_sql
        );
        sqlx::query(&trigger_check_sql).execute(self.pool()).await?;

        for index_sql in T::create_indexes_sql() {
            tracing::info!(table = table_name, sql = %index_sql, "Creating index");
            sqlx::query(&index_sql).execute(self.pool()).await?;
        }

        Ok(())
    }

    /// Register store and auto-migrate its table
    pub async fn register_store_with_migration<S, T>(
        &mut self,
        name: String,
        store: S,
        recreate: bool,
    ) -> Result<(), HandleHausError>
    where
        S: HandleableStore<Entity = T> + 'static,
        T: EntityMetadata + Send + Sync,
    {
        // First, run auto-migration for the store's entity type
        self.auto_migrate::<T>(recreate).await?;

        // Then register the store
        self.register_store(name, store)
    }
}
