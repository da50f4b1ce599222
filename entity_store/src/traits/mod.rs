//! Core traits for entity store operations

pub mod core;
pub mod entity_metadata;

pub use core::HandleableStore;
pub use entity_metadata::{EntityExecutor, EntityMetadata};
