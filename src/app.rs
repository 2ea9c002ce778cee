use crate::error::SessionError;
use crate::identity::Identity;
use crate::models::User;
use crate::session::SessionStore;
use crate::storage::{Storage, StorageEvent, Subscription, TabId};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Loading,
    Login,
    Room,
}

/// Everything one tab holds: its identity and, once logged in, its handle on
/// the shared session.
pub struct PokerApp {
    storage: Arc<dyn Storage>,
    tab: TabId,
    identity: Identity,
    session: Option<SessionStore>,
}

impl PokerApp {
    pub fn new(storage: Arc<dyn Storage>, tab: TabId) -> Self {
        let identity = Identity::new(Arc::clone(&storage), tab.clone());
        Self {
            storage,
            tab,
            identity,
            session: None,
        }
    }

    // Restore a stored identity and go straight to the room if there is one
    pub async fn start(&mut self) -> Result<Route, SessionError> {
        if self.identity.load().await?.is_some() {
            self.enter_room().await?;
        }
        Ok(self.route())
    }

    pub fn route(&self) -> Route {
        if self.identity.is_loading() {
            Route::Loading
        } else if self.identity.user().is_some() {
            Route::Room
        } else {
            Route::Login
        }
    }

    pub fn tab(&self) -> &TabId {
        &self.tab
    }

    pub fn user(&self) -> Option<&User> {
        self.identity.user()
    }

    pub fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    pub fn session(&self) -> Option<&SessionStore> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SessionStore> {
        self.session.as_mut()
    }

    /// Changes made by other tabs sharing this tab's storage.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.storage.subscribe(), self.tab.clone())
    }

    pub async fn enter_room(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.identity.user().cloned() else {
            return Ok(());
        };
        let mut session = SessionStore::open(Arc::clone(&self.storage), self.tab.clone()).await?;
        session.add_participant(&user).await?;
        self.session = Some(session);
        Ok(())
    }

    pub async fn leave_room(&mut self) -> Result<(), SessionError> {
        self.session = None;
        self.identity.logout().await
    }

    pub fn apply_storage_event(&mut self, event: &StorageEvent) -> bool {
        match self.session.as_mut() {
            Some(session) => session.apply_storage_event(event),
            None => false,
        }
    }
}
