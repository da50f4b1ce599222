use crate::event::EntityEvent;
use crate::types::EventCallback;

/// Signal manager for entity event notifications
pub struct SignalManager {
    callbacks: std::sync::RwLock<Vec<EventCallback>>,
}

impl std::fmt::Debug for SignalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalManager")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl SignalManager {
    pub fn new() -> Self {
        Self {
            callbacks: std::sync::RwLock::new(Vec::new()),
        }
    }

    /// Add event callback
    pub fn add_callback<F>(&self, callback: F)
    where
        F: Fn(&EntityEvent) + Send + Sync + 'static,
    {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push(Box::new(callback));
        }
    }

    /// Emit event to all subscribers
    pub fn emit(&self, event: EntityEvent) {
        if let Ok(callbacks) = self.callbacks.read() {
            tracing::trace!(
                table = %event.table_name,
                subscribers = callbacks.len(),
                "emitting entity event"
            );
            for callback in callbacks.iter() {
                callback(&event);
            }
        }
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for SignalManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let manager = SignalManager::new();
        let seen = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            manager.add_callback(move |_event| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(manager.callback_count(), 3);

        manager.emit(EntityEvent::new(EventType::Updated, "products".to_string()));
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_callbacks_receive_handle_and_type() {
        let manager = SignalManager::new();
        let observed = Arc::new(std::sync::Mutex::new(None));

        let sink = Arc::clone(&observed);
        manager.add_callback(move |event| {
            *sink.lock().unwrap() = Some((event.event_type, event.handle.clone()));
        });

        manager.emit(
            EntityEvent::new(EventType::Created, "products".to_string())
                .with_handle("shoe-1".to_string()),
        );

        let observed = observed.lock().unwrap().clone();
        assert_eq!(
            observed,
            Some((EventType::Created, Some("shoe-1".to_string())))
        );
    }

    #[test]
    fn test_clear_callbacks() {
        let manager = SignalManager::new();
        manager.add_callback(|_| {});
        manager.clear_callbacks();
        assert_eq!(manager.callback_count(), 0);
    }
}
