//! Convenience re-exports for signal system usage

pub use crate::conversion::{serialize_to_postgres_payload, serialize_to_postgres_record};
pub use crate::event::{EntityEvent, EventType};
pub use crate::manager::SignalManager;
pub use crate::types::{EventCallback, PostgresValue};
