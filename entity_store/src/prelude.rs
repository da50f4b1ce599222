//! Convenience re-exports for entity store usage

pub use crate::errors::EntityStoreError;
pub use crate::handle_store::{AmbiguousHandlePolicy, HandleStore};
pub use crate::merge::{
    copy_persistent_fields, FieldKind, FieldValue, MergeError, MergeField, Mergeable,
};
pub use crate::traits::{EntityExecutor, EntityMetadata, HandleableStore};
pub use crate::DbPool;
