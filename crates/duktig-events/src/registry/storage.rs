//! In-memory listener storage implementation

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::{
    error::{EventsError, Result},
    types::ListenerRegistration,
};

/// In-memory listener registry
///
/// Listeners for an event are kept in registration order. Clones share the
/// same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListenerProvider {
    listeners: Arc<RwLock<HashMap<String, Vec<ListenerRegistration>>>>,
}

impl InMemoryListenerProvider {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

impl super::ListenerProvider for InMemoryListenerProvider {
    fn add_listener(&self, event_name: &str, listener: ListenerRegistration) -> Result<()> {
        let mut listeners = self.listeners.write().map_err(|e| {
            EventsError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        listeners
            .entry(event_name.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }

    fn get_listeners(&self, event_name: &str) -> Result<Vec<ListenerRegistration>> {
        let listeners = self
            .listeners
            .read()
            .map_err(|e| EventsError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        Ok(listeners.get(event_name).cloned().unwrap_or_default())
    }

    fn event_names(&self) -> Result<Vec<String>> {
        let listeners = self
            .listeners
            .read()
            .map_err(|e| EventsError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        let mut names: Vec<String> = listeners
            .iter()
            .filter(|(_, registered)| !registered.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn remove_listeners(&self, event_name: &str) -> Result<usize> {
        let mut listeners = self.listeners.write().map_err(|e| {
            EventsError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(listeners.remove(event_name).map(|l| l.len()).unwrap_or(0))
    }
}
