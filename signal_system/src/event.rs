//! Entity event types and definitions
//!
//! This module defines the structure of entity events
//! that flow through the signal system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::PostgresValue;

/// Entity event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Created,
    Updated,
}

/// Entity event
///
/// Emitted by a store strictly after the transaction that produced the change
/// has committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEvent {
    /// Event type
    pub event_type: EventType,
    /// Table name of the affected entity
    pub table_name: String,
    /// Handle of the affected entity (if available)
    pub handle: Option<String>,
    /// Additional data
    pub payload: HashMap<String, PostgresValue>,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl EntityEvent {
    pub fn new(event_type: EventType, table_name: String) -> Self {
        Self {
            event_type,
            table_name,
            handle: None,
            payload: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_handle(mut self, handle: String) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn with_payload(mut self, key: String, value: PostgresValue) -> Self {
        self.payload.insert(key, value);
        self
    }

    pub fn add_payload(&mut self, key: String, value: PostgresValue) {
        self.payload.insert(key, value);
    }
}
