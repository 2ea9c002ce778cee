//! Keyed string storage shared by every tab of one origin.
//!
//! Writers tag each change with their tab id; the change is broadcast on a
//! [`StorageBus`] and a tab's [`Subscription`] only yields changes made by
//! other tabs.

pub mod bus;
pub mod memory;

pub use bus::{StorageBus, Subscription};
pub use memory::MemoryStorage;

use crate::error::StorageError;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

pub const USER_KEY: &str = "scrumPointUser";
pub const SESSION_KEY: &str = "pokerSessionState";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabId(String);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TabId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
    pub origin: TabId,
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, origin: &TabId, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove_item(&self, origin: &TabId, key: &str) -> Result<(), StorageError>;

    /// Raw feed of every change, including the subscriber's own.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
