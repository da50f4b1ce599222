//! Signal system for entity event handling
//!
//! This crate provides synchronous signal handling and event delivery
//! for store operations in the HandleHaus ecosystem. Events are emitted
//! by stores after a successful commit, so subscribers can assume the
//! change they observe is durable.

pub mod conversion;
pub mod event;
pub mod manager;
pub mod prelude;
pub mod types;

pub use conversion::{serialize_to_postgres_payload, serialize_to_postgres_record};
pub use event::{EntityEvent, EventType};
pub use manager::SignalManager;
pub use types::{EventCallback, PostgresValue};
