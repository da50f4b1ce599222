//! Type definitions for the signal system
//!
//! This module contains the PostgreSQL-flavored value type used in event
//! payloads, plus the callback type subscribers register.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::event::EntityEvent;

/// A PostgreSQL-flavored value as carried in event payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostgresValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    Double(f64),
    Boolean(bool),
    Uuid(uuid::Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Json(serde_json::Value),
    Record(HashMap<String, PostgresValue>),
    Null,
}

/// Synchronous event callback type
///
/// Callbacks are invoked on the emitting thread, fire-and-forget; the store
/// never consumes a return value from them.
pub type EventCallback = Box<dyn Fn(&EntityEvent) + Send + Sync>;
