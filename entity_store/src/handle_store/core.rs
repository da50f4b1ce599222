use crate::traits::entity_metadata::EntityMetadata;
use crate::DbPool;
use signal_system::{EntityEvent, SignalManager};
use std::sync::Arc;

/// What a handle lookup does when more than one row carries the same handle
///
/// Handle uniqueness is assumed to be enforced by whoever owns the schema;
/// this store only decides how to react when that assumption is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguousHandlePolicy {
    /// Treat the ambiguous result as not-found (historical behavior)
    #[default]
    NotFound,
    /// Surface a data-integrity error instead
    Error,
}

impl AmbiguousHandlePolicy {
    /// Map the `strict_handle_integrity` configuration flag onto a policy
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Error } else { Self::NotFound }
    }
}

/// Generic store for entities addressed by a unique handle
#[derive(Clone)]
pub struct HandleStore<T: EntityMetadata> {
    pub(crate) db_pool: DbPool,
    pub(crate) signal_manager: Option<Arc<SignalManager>>,
    pub(crate) handle_policy: AmbiguousHandlePolicy,
    pub(crate) _phantom: std::marker::PhantomData<T>,
}

impl<T: EntityMetadata> std::fmt::Debug for HandleStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleStore")
            .field("table", &T::table_name())
            .field("has_signals", &self.has_signals())
            .field("handle_policy", &self.handle_policy)
            .finish()
    }
}

impl<T: EntityMetadata> HandleStore<T> {
    pub fn new(db_pool: DbPool, signal_manager: Option<Arc<SignalManager>>) -> Self {
        Self {
            db_pool,
            signal_manager,
            handle_policy: AmbiguousHandlePolicy::default(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Override the ambiguous-handle policy for this store
    pub fn with_handle_policy(mut self, policy: AmbiguousHandlePolicy) -> Self {
        self.handle_policy = policy;
        self
    }

    /// Set signal manager for this store
    pub fn set_signal_manager(&mut self, signal_manager: Arc<SignalManager>) {
        self.signal_manager = Some(signal_manager);
    }

    /// Remove signal manager from this store
    pub fn remove_signal_manager(&mut self) {
        self.signal_manager = None;
    }

    /// Check if signal manager is set
    pub fn has_signals(&self) -> bool {
        self.signal_manager.is_some()
    }

    /// Current ambiguous-handle policy
    pub fn handle_policy(&self) -> AmbiguousHandlePolicy {
        self.handle_policy
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &DbPool {
        &self.db_pool
    }

    pub(crate) fn emit_event(&self, event: EntityEvent) {
        if let Some(signal_manager) = &self.signal_manager {
            signal_manager.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AmbiguousHandlePolicy;

    #[test]
    fn test_policy_from_strict_flag() {
        assert_eq!(
            AmbiguousHandlePolicy::from_strict(false),
            AmbiguousHandlePolicy::NotFound
        );
        assert_eq!(
            AmbiguousHandlePolicy::from_strict(true),
            AmbiguousHandlePolicy::Error
        );
        assert_eq!(
            AmbiguousHandlePolicy::default(),
            AmbiguousHandlePolicy::NotFound
        );
    }
}
