use crate::error::SessionError;
use crate::models::User;
use crate::session::SessionState;
use crate::storage::{Storage, StorageEvent, TabId, SESSION_KEY};
use log::{info, warn};
use std::sync::Arc;

/// A tab's handle on the shared round. Mutations are applied to the local
/// snapshot, then the whole snapshot is written back to storage, which
/// notifies the other tabs.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    tab: TabId,
    state: SessionState,
}

impl SessionStore {
    /// Adopts whatever snapshot is already stored. Unreadable data is dropped
    /// and the store starts from an empty session.
    pub async fn open(storage: Arc<dyn Storage>, tab: TabId) -> Result<Self, SessionError> {
        let state = match storage.get_item(SESSION_KEY).await? {
            Some(raw) => match parse_snapshot(&raw) {
                Some(state) => state,
                None => {
                    storage.remove_item(&tab, SESSION_KEY).await?;
                    SessionState::default()
                }
            },
            None => SessionState::default(),
        };

        info!(
            "Tab {} joined session with {} participant(s)",
            tab,
            state.participants.len()
        );

        Ok(Self { storage, tab, state })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn tab(&self) -> &TabId {
        &self.tab
    }

    pub fn participant_vote(&self, user_id: &str) -> Option<&str> {
        self.state.participant_vote(user_id)
    }

    pub async fn add_participant(&mut self, user: &User) -> Result<bool, SessionError> {
        let changed = self.state.add_participant(user);
        self.commit(changed).await
    }

    pub async fn remove_participant(&mut self, user_id: &str) -> Result<bool, SessionError> {
        let changed = self.state.remove_participant(user_id);
        self.commit(changed).await
    }

    pub async fn cast_vote(&mut self, user_id: &str, value: &str) -> Result<bool, SessionError> {
        let changed = self.state.cast_vote(user_id, value);
        self.commit(changed).await
    }

    pub async fn start_new_story(&mut self, story_name: &str) -> Result<bool, SessionError> {
        let changed = self.state.start_new_story(story_name);
        self.commit(changed).await
    }

    pub async fn reveal_votes(&mut self) -> Result<bool, SessionError> {
        let changed = self.state.reveal_votes();
        self.commit(changed).await
    }

    pub async fn reset_round(&mut self) -> Result<bool, SessionError> {
        let changed = self.state.reset_round();
        self.commit(changed).await
    }

    /// Replaces the local snapshot with one written by another tab. Returns
    /// whether anything was applied.
    pub fn apply_storage_event(&mut self, event: &StorageEvent) -> bool {
        if event.key != SESSION_KEY {
            return false;
        }
        match event.new_value.as_deref() {
            Some(raw) => match parse_snapshot(raw) {
                Some(state) => {
                    self.state = state;
                    true
                }
                // Keep what we have; the next good snapshot will replace it
                None => false,
            },
            None => {
                info!("Session cleared by tab {}", event.origin);
                self.state = SessionState::default();
                true
            }
        }
    }

    async fn commit(&self, changed: bool) -> Result<bool, SessionError> {
        if changed {
            let raw = serde_json::to_string(&self.state)?;
            self.storage.set_item(&self.tab, SESSION_KEY, &raw).await?;
        }
        Ok(changed)
    }
}

fn parse_snapshot(raw: &str) -> Option<SessionState> {
    match serde_json::from_str::<SessionState>(raw) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("Discarding unreadable session snapshot: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::storage::{MemoryStorage, Subscription};

    fn user(name: &str, role: UserRole) -> User {
        User::new(name.to_string(), role)
    }

    #[tokio::test]
    async fn persists_every_change() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = SessionStore::open(Arc::clone(&storage), TabId::new()).await.unwrap();
        let ann = user("Ann", UserRole::Voter);

        store.add_participant(&ann).await.unwrap();
        store.start_new_story("US-7").await.unwrap();
        store.cast_vote(&ann.id, "8").await.unwrap();

        let raw = storage.get_item(SESSION_KEY).await.unwrap().expect("snapshot");
        let stored: SessionState = serde_json::from_str(&raw).unwrap();
        assert_eq!(&stored, store.state());
        assert_eq!(stored.participant_vote(&ann.id), Some("8"));
    }

    #[tokio::test]
    async fn ignored_transitions_are_not_written() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let tab = TabId::new();
        let mut store = SessionStore::open(Arc::clone(&storage), tab).await.unwrap();
        let mut other = Subscription::new(storage.subscribe(), TabId::new());

        assert!(!store.reveal_votes().await.unwrap());
        assert!(!store.cast_vote("nobody", "5").await.unwrap());

        assert!(other.try_recv().is_none());
        assert_eq!(storage.get_item(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_snapshot_falls_back_to_defaults() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let writer = TabId::new();
        storage
            .set_item(&writer, SESSION_KEY, r#"{"participants":"not a list"}"#)
            .await
            .unwrap();

        let store = SessionStore::open(Arc::clone(&storage), TabId::new()).await.unwrap();
        assert_eq!(store.state(), &SessionState::default());
        assert_eq!(storage.get_item(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn partial_snapshot_is_merged_over_defaults() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage
            .set_item(&TabId::new(), SESSION_KEY, r#"{"storyName":"US-3","votingOpen":true}"#)
            .await
            .unwrap();

        let store = SessionStore::open(storage, TabId::new()).await.unwrap();
        assert_eq!(store.state().story_name.as_deref(), Some("US-3"));
        assert!(store.state().voting_open);
        assert!(store.state().participants.is_empty());
    }

    #[tokio::test]
    async fn storage_events_replace_or_clear_snapshot() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = SessionStore::open(storage, TabId::new()).await.unwrap();
        let origin = TabId::new();

        let mut incoming = SessionState::default();
        incoming.start_new_story("Remote");
        let applied = store.apply_storage_event(&StorageEvent {
            key: SESSION_KEY.to_string(),
            new_value: Some(serde_json::to_string(&incoming).unwrap()),
            origin: origin.clone(),
        });
        assert!(applied);
        assert_eq!(store.state(), &incoming);

        // Garbage is ignored, the current snapshot stays
        assert!(!store.apply_storage_event(&StorageEvent {
            key: SESSION_KEY.to_string(),
            new_value: Some("{oops".to_string()),
            origin: origin.clone(),
        }));
        assert_eq!(store.state(), &incoming);

        // Unrelated keys are ignored
        assert!(!store.apply_storage_event(&StorageEvent {
            key: "other".to_string(),
            new_value: None,
            origin: origin.clone(),
        }));

        assert!(store.apply_storage_event(&StorageEvent {
            key: SESSION_KEY.to_string(),
            new_value: None,
            origin,
        }));
        assert_eq!(store.state(), &SessionState::default());
    }
}
