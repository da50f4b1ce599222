//! Error types for entity store operations
//!
//! Every failure a store can hit (backend query faults, transaction faults,
//! merge contract violations) is wrapped into the single `EntityStoreError`
//! category before it reaches a caller. A handle lookup that finds nothing is
//! `Ok(None)`, never an error.

use crate::merge::MergeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntityStoreError {
    #[error("Query failed on table '{table}' during {operation}: {source}")]
    QueryExecution {
        table: &'static str,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Transaction {operation} failed on table '{table}': {source}")]
    Transaction {
        table: &'static str,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Merge contract violation on table '{table}': {source}")]
    MergeContract {
        table: &'static str,
        #[source]
        source: MergeError,
    },

    #[error("No entity with handle '{handle}' exists in table '{table}'")]
    EntityNotFound {
        table: &'static str,
        handle: String,
    },

    #[error("Handle '{handle}' matches {matches} rows in table '{table}'")]
    AmbiguousHandle {
        table: &'static str,
        handle: String,
        matches: usize,
    },

    #[error("Invalid handle: {reason}")]
    InvalidHandle { reason: String },
}

impl EntityStoreError {
    pub fn query_execution(
        table: &'static str,
        operation: &'static str,
        source: sqlx::Error,
    ) -> Self {
        Self::QueryExecution {
            table,
            operation,
            source,
        }
    }

    pub fn transaction(table: &'static str, operation: &'static str, source: sqlx::Error) -> Self {
        Self::Transaction {
            table,
            operation,
            source,
        }
    }

    pub fn merge_contract(table: &'static str, source: MergeError) -> Self {
        Self::MergeContract { table, source }
    }

    pub fn entity_not_found(table: &'static str, handle: &str) -> Self {
        Self::EntityNotFound {
            table,
            handle: handle.to_string(),
        }
    }

    pub fn ambiguous_handle(table: &'static str, handle: &str, matches: usize) -> Self {
        Self::AmbiguousHandle {
            table,
            handle: handle.to_string(),
            matches,
        }
    }

    pub fn invalid_handle(reason: impl Into<String>) -> Self {
        Self::InvalidHandle {
            reason: reason.into(),
        }
    }
}
