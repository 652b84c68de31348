use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::trace;

use super::ConfigListener;

/// Global and per-plugin listener registries.
///
/// Both are additive for the registry's lifetime. Dispatch iterates over a
/// copy of the handle list, so a listener may register further listeners
/// while being notified.
#[derive(Default)]
pub struct ListenerRegistry {
    global: RwLock<Vec<Arc<dyn ConfigListener>>>,
    keyed: DashMap<String, Vec<Arc<dyn ConfigListener>>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("global", &self.global.read().len())
            .field("keyed", &self.keyed.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a global listener; registering the same handle twice is a no-op
    pub fn add_listener(
        &self,
        listener: Arc<dyn ConfigListener>,
    ) {
        let mut global = self.global.write();
        if !global.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            global.push(listener);
        }
    }

    pub fn add_keyed_listener(
        &self,
        key: impl Into<String>,
        listener: Arc<dyn ConfigListener>,
    ) {
        self.keyed.entry(key.into()).or_default().push(listener);
    }

    pub fn global_count(&self) -> usize {
        self.global.read().len()
    }

    pub fn keyed_count(
        &self,
        key: &str,
    ) -> usize {
        self.keyed.get(key).map(|l| l.len()).unwrap_or(0)
    }

    pub fn notify_global(&self) {
        let listeners = self.global.read().clone();
        trace!("notifying {} global listeners", listeners.len());
        Self::dispatch(&listeners);
    }

    pub fn notify_keyed(
        &self,
        key: &str,
    ) {
        // copy out so no shard lock is held while listeners run
        let listeners = self.keyed.get(key).map(|l| l.value().clone()).unwrap_or_default();
        trace!("notifying {} listeners of {}", listeners.len(), key);
        Self::dispatch(&listeners);
    }

    /// Notifies every keyed listener regardless of key
    pub fn notify_all_keyed(&self) {
        let listeners: Vec<Arc<dyn ConfigListener>> = self
            .keyed
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        trace!("notifying all {} keyed listeners", listeners.len());
        Self::dispatch(&listeners);
    }

    fn dispatch(listeners: &[Arc<dyn ConfigListener>]) {
        for listener in listeners {
            listener.on_change();
        }
    }
}
