use super::{Storage, StorageBus, StorageEvent, TabId};
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Process-local storage; every handle sharing it through an `Arc` acts as one origin.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    bus: StorageBus,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, origin: &TabId, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut items = self.items.lock().map_err(|_| StorageError::LockPoisoned)?;
            items.insert(key.to_string(), value.to_string());
        }
        self.bus.publish(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
            origin: origin.clone(),
        });
        Ok(())
    }

    async fn remove_item(&self, origin: &TabId, key: &str) -> Result<(), StorageError> {
        let removed = {
            let mut items = self.items.lock().map_err(|_| StorageError::LockPoisoned)?;
            items.remove(key).is_some()
        };
        // Removing a missing key is not a change
        if removed {
            self.bus.publish(StorageEvent {
                key: key.to_string(),
                new_value: None,
                origin: origin.clone(),
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.bus.subscribe()
    }
}
