//! Code generation for entity metadata, query execution and merge schemas
//!
//! This module generates SQL strings at macro expansion time and the Rust
//! impls (`EntityMetadata`, `EntityExecutor`, `Mergeable`) that carry them,
//! based on the parsed table and field metadata.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::parsing::{EntityFieldInfo, MergeFieldSpec, ScalarKind, TableInfo};

/// Validate and escape a SQL identifier
///
/// Names are already validated at parse time; quoting protects against
/// keyword conflicts.
fn safe_sql_identifier(name: &str) -> String {
    if name.is_empty() {
        panic!("SQL identifier cannot be empty");
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        panic!("SQL identifier '{}' contains invalid characters", name);
    }

    format!("\"{}\"", name)
}

/// PostgreSQL column type for the primary key's Rust type
fn pk_pg_type(rust_type: &str) -> &'static str {
    match rust_type {
        "Uuid" | "uuid::Uuid" => "UUID",
        "i32" => "INTEGER",
        "i64" => "BIGINT",
        other => panic!("unsupported primary key type '{}'", other),
    }
}

pub fn generate_entity_metadata_impl(
    name: &Ident,
    table_info: &TableInfo,
    field_info: &EntityFieldInfo,
) -> TokenStream {
    let table_name = &table_info.name;
    let safe_table = safe_sql_identifier(table_name);

    let pk_field = &field_info.primary_key_field;
    let pk_field_str = pk_field.to_string();
    let handle_field = &field_info.handle_field;
    let handle_field_str = handle_field.to_string();

    let pk_type_tokens: TokenStream = field_info
        .primary_key_type
        .parse()
        .unwrap_or_else(|e| panic!("Failed to parse primary key type: {}", e));

    let merge_field_names: Vec<String> = field_info
        .merge_fields
        .iter()
        .map(|f| f.ident().to_string())
        .collect();

    // Generate INSERT SQL: primary key, handle, then every merge field, with
    // the system timestamps appended
    let create_fields: Vec<&str> = std::iter::once(pk_field_str.as_str())
        .chain(std::iter::once(handle_field_str.as_str()))
        .chain(merge_field_names.iter().map(|s| s.as_str()))
        .collect();
    let create_columns: Vec<String> = create_fields
        .iter()
        .map(|f| safe_sql_identifier(f))
        .collect();
    let create_placeholders: Vec<String> =
        (1..=create_fields.len()).map(|i| format!("${}", i)).collect();
    let create_sql = format!(
        "INSERT INTO {} ({}, __created_at__, __updated_at__) VALUES ({}, NOW(), NOW()) RETURNING *",
        safe_table,
        create_columns.join(", "),
        create_placeholders.join(", ")
    );

    // Generate handle-keyed UPDATE SQL over the merge fields only
    let update_assignments: Vec<String> = merge_field_names
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{} = ${}", safe_sql_identifier(field), i + 1))
        .collect();
    let update_by_handle_sql = format!(
        "UPDATE {} SET {}, __updated_at__ = NOW() WHERE {} = ${} RETURNING *",
        safe_table,
        update_assignments.join(", "),
        safe_sql_identifier(&handle_field_str),
        merge_field_names.len() + 1
    );

    let select_by_handle_sql = format!(
        "SELECT * FROM {} WHERE {} = $1",
        safe_table,
        safe_sql_identifier(&handle_field_str)
    );

    let get_by_id_sql = format!(
        "SELECT * FROM {} WHERE {} = $1",
        safe_table,
        safe_sql_identifier(&pk_field_str)
    );

    let count_all_sql = format!("SELECT COUNT(*) as total FROM {}", safe_table);

    // Generate CREATE TABLE SQL with all column types resolved at expansion time
    let mut column_definitions = Vec::new();
    let pk_column_type = pk_pg_type(&field_info.primary_key_type);
    if pk_column_type == "UUID" {
        column_definitions.push(format!(
            "{} UUID PRIMARY KEY DEFAULT gen_random_uuid()",
            safe_sql_identifier(&pk_field_str)
        ));
    } else {
        column_definitions.push(format!(
            "{} {} PRIMARY KEY",
            safe_sql_identifier(&pk_field_str),
            pk_column_type
        ));
    }
    column_definitions.push(format!(
        "{} VARCHAR NOT NULL",
        safe_sql_identifier(&handle_field_str)
    ));
    for spec in &field_info.merge_fields {
        let column = safe_sql_identifier(&spec.ident().to_string());
        // Merge fields are Option-typed, hence nullable columns
        match spec {
            MergeFieldSpec::Scalar { kind, .. } => {
                column_definitions.push(format!("{} {}", column, kind.pg_type()));
            }
            MergeFieldSpec::Nested { .. } => {
                column_definitions.push(format!("{} JSONB", column));
            }
        }
    }
    column_definitions.push("__created_at__ TIMESTAMP WITH TIME ZONE DEFAULT NOW()".to_string());
    column_definitions.push("__updated_at__ TIMESTAMP WITH TIME ZONE DEFAULT NOW()".to_string());
    let create_table_sql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        safe_table,
        column_definitions.join(", ")
    );

    // A non-unique index on the handle: uniqueness stays the schema owner's
    // responsibility, so ambiguous lookups remain possible and observable
    let handle_index_sql = format!(
        "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {} ({})",
        table_name,
        handle_field_str,
        safe_table,
        safe_sql_identifier(&handle_field_str)
    );
    let updated_at_index_sql = format!(
        "CREATE INDEX IF NOT EXISTS idx_{}_updated_at ON {} (\"__updated_at__\")",
        table_name, safe_table
    );

    let create_fields_vec = {
        let fields = &create_fields;
        quote! { vec![#(#fields),*] }
    };
    let update_fields_vec = {
        let fields = &merge_field_names;
        quote! { vec![#(#fields),*] }
    };

    quote! {
        impl entity_store::EntityMetadata for #name {
            type Id = #pk_type_tokens;

            fn table_name() -> &'static str {
                #table_name
            }

            fn handle_field() -> &'static str {
                #handle_field_str
            }

            fn primary_key_field() -> &'static str {
                #pk_field_str
            }

            fn handle(&self) -> &str {
                &self.#handle_field
            }

            fn extract_id(&self) -> Self::Id {
                self.#pk_field.clone()
            }

            fn create_sql() -> &'static str {
                #create_sql
            }

            fn update_by_handle_sql() -> &'static str {
                #update_by_handle_sql
            }

            fn select_by_handle_sql() -> &'static str {
                #select_by_handle_sql
            }

            fn get_by_id_sql() -> &'static str {
                #get_by_id_sql
            }

            fn count_all_sql() -> &'static str {
                #count_all_sql
            }

            fn create_fields() -> Vec<&'static str> {
                #create_fields_vec
            }

            fn update_fields() -> Vec<&'static str> {
                #update_fields_vec
            }

            fn create_table_sql() -> String {
                #create_table_sql.to_string()
            }

            fn create_indexes_sql() -> Vec<String> {
                vec![#handle_index_sql.to_string(), #updated_at_index_sql.to_string()]
            }
        }
    }
}

/// Generate one `.bind(...)` call per column, in the order the SQL expects
fn bind_calls(field_info: &EntityFieldInfo, include_keys_first: bool) -> Vec<TokenStream> {
    let mut calls = Vec::new();

    if include_keys_first {
        let pk_field = &field_info.primary_key_field;
        let handle_field = &field_info.handle_field;
        calls.push(quote! { .bind(self.#pk_field.clone()) });
        calls.push(quote! { .bind(self.#handle_field.clone()) });
    }

    for spec in &field_info.merge_fields {
        let ident = spec.ident();
        match spec {
            MergeFieldSpec::Scalar { .. } => {
                calls.push(quote! { .bind(self.#ident.clone()) });
            }
            // Embedded objects travel as JSONB
            MergeFieldSpec::Nested { .. } => {
                calls.push(quote! { .bind(self.#ident.clone().map(sqlx::types::Json)) });
            }
        }
    }

    calls
}

/// Generate the `EntityExecutor` trait implementation with async methods
pub fn generate_executor_impl(name: &Ident, field_info: &EntityFieldInfo) -> TokenStream {
    let create_binds = bind_calls(field_info, true);
    let update_binds = bind_calls(field_info, false);
    let handle_field = &field_info.handle_field;

    quote! {
        #[async_trait::async_trait]
        impl entity_store::EntityExecutor for #name {
            async fn execute_create(&self, pool: &sqlx::PgPool) -> Result<Self, entity_store::EntityStoreError>
            where
                Self: Sized + Send + Sync,
                Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
            {
                sqlx::query_as::<_, Self>(<Self as entity_store::EntityMetadata>::create_sql())
                    #(#create_binds)*
                    .fetch_one(pool)
                    .await
                    .map_err(|e| entity_store::EntityStoreError::query_execution(
                        <Self as entity_store::EntityMetadata>::table_name(), "create", e))
            }

            async fn execute_create_tx(&self, tx: &mut sqlx::Transaction<'_, sqlx::Postgres>) -> Result<Self, entity_store::EntityStoreError>
            where
                Self: Sized + Send + Sync,
                Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
            {
                sqlx::query_as::<_, Self>(<Self as entity_store::EntityMetadata>::create_sql())
                    #(#create_binds)*
                    .fetch_one(tx.as_mut())
                    .await
                    .map_err(|e| entity_store::EntityStoreError::query_execution(
                        <Self as entity_store::EntityMetadata>::table_name(), "create", e))
            }

            async fn execute_update_by_handle(&self, pool: &sqlx::PgPool) -> Result<Self, entity_store::EntityStoreError>
            where
                Self: Sized + Send + Sync,
                Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
            {
                sqlx::query_as::<_, Self>(<Self as entity_store::EntityMetadata>::update_by_handle_sql())
                    #(#update_binds)*
                    .bind(self.#handle_field.clone())
                    .fetch_one(pool)
                    .await
                    .map_err(|e| entity_store::EntityStoreError::query_execution(
                        <Self as entity_store::EntityMetadata>::table_name(), "update_by_handle", e))
            }

            async fn execute_update_by_handle_tx(&self, tx: &mut sqlx::Transaction<'_, sqlx::Postgres>) -> Result<Self, entity_store::EntityStoreError>
            where
                Self: Sized + Send + Sync,
                Self: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
            {
                sqlx::query_as::<_, Self>(<Self as entity_store::EntityMetadata>::update_by_handle_sql())
                    #(#update_binds)*
                    .bind(self.#handle_field.clone())
                    .fetch_one(tx.as_mut())
                    .await
                    .map_err(|e| entity_store::EntityStoreError::query_execution(
                        <Self as entity_store::EntityMetadata>::table_name(), "update_by_handle", e))
            }
        }
    }
}

/// Generate the static merge schema backing `Mergeable`
///
/// Each scalar field yields an accessor pair over the erased `FieldValue`
/// representation; each nested field yields the recursion hook the copy
/// algorithm dispatches to.
pub fn generate_mergeable_impl(name: &Ident, merge_fields: &[MergeFieldSpec]) -> TokenStream {
    let entries: Vec<TokenStream> = merge_fields
        .iter()
        .map(|spec| match spec {
            MergeFieldSpec::Scalar { ident, kind } => {
                let field_name = ident.to_string();
                let variant = Ident::new(kind.variant_name(), proc_macro2::Span::call_site());
                let variant_str = kind.variant_name();
                quote! {
                    entity_store::MergeField {
                        name: #field_name,
                        kind: entity_store::FieldKind::Scalar,
                        get: |entity: &#name| match entity.#ident.clone() {
                            Some(v) => entity_store::FieldValue::#variant(v),
                            None => entity_store::FieldValue::Absent,
                        },
                        set: |entity: &mut #name, value| match value {
                            entity_store::FieldValue::#variant(v) => {
                                entity.#ident = Some(v);
                                Ok(())
                            }
                            other => Err(entity_store::MergeError::type_mismatch(
                                #field_name,
                                #variant_str,
                                other.kind_name(),
                            )),
                        },
                        merge_nested: None,
                    }
                }
            }
            MergeFieldSpec::Nested { ident } => {
                let field_name = ident.to_string();
                quote! {
                    entity_store::MergeField {
                        name: #field_name,
                        kind: entity_store::FieldKind::Nested,
                        get: |_: &#name| entity_store::FieldValue::Absent,
                        set: |_: &mut #name, _| Err(entity_store::MergeError::missing_accessor(
                            #field_name,
                            entity_store::FieldKind::Nested,
                        )),
                        merge_nested: Some(|existing: &mut #name, incoming: &#name| {
                            let Some(src) = incoming.#ident.as_ref() else {
                                return Ok(0);
                            };
                            match existing.#ident.as_mut() {
                                Some(dst) => entity_store::copy_persistent_fields(dst, src),
                                None => {
                                    existing.#ident = Some(src.clone());
                                    Ok(1)
                                }
                            }
                        }),
                    }
                }
            }
        })
        .collect();

    quote! {
        impl entity_store::Mergeable for #name {
            fn merge_fields() -> &'static [entity_store::MergeField<Self>] {
                const FIELDS: &[entity_store::MergeField<#name>] = &[#(#entries),*];
                FIELDS
            }
        }
    }
}
