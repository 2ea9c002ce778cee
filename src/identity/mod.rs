use crate::error::SessionError;
use crate::models::{User, UserRole};
use crate::storage::{Storage, TabId, SESSION_KEY, USER_KEY};
use log::{info, warn};
use std::sync::Arc;

/// The local user of one tab.
pub struct Identity {
    storage: Arc<dyn Storage>,
    tab: TabId,
    user: Option<User>,
    is_loading: bool,
}

impl Identity {
    pub fn new(storage: Arc<dyn Storage>, tab: TabId) -> Self {
        Self {
            storage,
            tab,
            user: None,
            is_loading: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    // Read the stored identity; a corrupt entry is removed and treated as logged out
    pub async fn load(&mut self) -> Result<Option<&User>, SessionError> {
        if let Some(raw) = self.storage.get_item(USER_KEY).await? {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!("Restored identity {} ({})", user.username, user.role);
                    self.user = Some(user);
                }
                Err(e) => {
                    warn!("Failed to parse stored user, clearing it: {}", e);
                    self.storage.remove_item(&self.tab, USER_KEY).await?;
                    self.user = None;
                }
            }
        }
        self.is_loading = false;
        Ok(self.user.as_ref())
    }

    pub async fn login(&mut self, username: &str, role: UserRole) -> Result<User, SessionError> {
        let user = User::new(username.to_string(), role);
        let raw = serde_json::to_string(&user)?;
        self.storage.set_item(&self.tab, USER_KEY, &raw).await?;

        info!("Logged in as {} ({})", user.username, user.role);
        self.user = Some(user.clone());
        self.is_loading = false;
        Ok(user)
    }

    // Drops the identity and the shared session snapshot along with it
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(user) = self.user.take() {
            info!("Logging out {}", user.username);
        }
        self.storage.remove_item(&self.tab, USER_KEY).await?;
        self.storage.remove_item(&self.tab, SESSION_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn loading_until_identity_read() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut identity = Identity::new(storage, TabId::new());
        assert!(identity.is_loading());
        assert!(identity.load().await.unwrap().is_none());
        assert!(!identity.is_loading());
    }

    #[tokio::test]
    async fn login_survives_reload() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut first = Identity::new(Arc::clone(&storage), TabId::new());
        let user = first.login("Ann", UserRole::Admin).await.unwrap();

        let mut second = Identity::new(storage, TabId::new());
        let restored = second.load().await.unwrap().cloned();
        assert_eq!(restored, Some(user));
    }

    #[tokio::test]
    async fn corrupt_identity_is_cleared() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set_item(&TabId::new(), USER_KEY, "not json").await.unwrap();

        let mut identity = Identity::new(Arc::clone(&storage), TabId::new());
        assert!(identity.load().await.unwrap().is_none());
        assert_eq!(storage.get_item(USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn logout_clears_identity_and_session() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let tab = TabId::new();
        storage.set_item(&tab, SESSION_KEY, "{}").await.unwrap();

        let mut identity = Identity::new(Arc::clone(&storage), tab);
        identity.login("Bob", UserRole::Voter).await.unwrap();
        identity.logout().await.unwrap();

        assert!(identity.user().is_none());
        assert_eq!(storage.get_item(USER_KEY).await.unwrap(), None);
        assert_eq!(storage.get_item(SESSION_KEY).await.unwrap(), None);
    }
}
