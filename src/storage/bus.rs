use super::{StorageEvent, TabId};
use log::{debug, warn};
use tokio::sync::broadcast;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Publish/subscribe channel carrying storage changes between tabs.
#[derive(Debug, Clone)]
pub struct StorageBus {
    tx: broadcast::Sender<StorageEvent>,
}

impl StorageBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    // Fire-and-forget: no subscribers is fine
    pub fn publish(&self, event: StorageEvent) {
        debug!("Publishing change to '{}' from tab {}", event.key, event.origin);
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.tx.subscribe()
    }
}

impl Default for StorageBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

/// A tab's view of the bus: changes written by the tab itself are skipped.
pub struct Subscription {
    rx: broadcast::Receiver<StorageEvent>,
    tab: TabId,
}

impl Subscription {
    pub fn new(rx: broadcast::Receiver<StorageEvent>, tab: TabId) -> Self {
        Self { rx, tab }
    }

    /// Next change made by another tab, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin == self.tab => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Snapshots replace each other whole, the next one catches us up
                    warn!("Tab {} missed {} storage change(s)", self.tab, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.origin == self.tab => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Tab {} missed {} storage change(s)", self.tab, skipped);
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(origin: &TabId, value: &str) -> StorageEvent {
        StorageEvent {
            key: "k".to_string(),
            new_value: Some(value.to_string()),
            origin: origin.clone(),
        }
    }

    #[tokio::test]
    async fn skips_own_writes() {
        let bus = StorageBus::default();
        let mine = TabId::new();
        let theirs = TabId::new();
        let mut sub = Subscription::new(bus.subscribe(), mine.clone());

        bus.publish(event(&mine, "1"));
        bus.publish(event(&theirs, "2"));

        let received = sub.recv().await.expect("event");
        assert_eq!(received.new_value.as_deref(), Some("2"));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn recovers_after_lagging() {
        let bus = StorageBus::new(2);
        let theirs = TabId::new();
        let mut sub = Subscription::new(bus.subscribe(), TabId::new());

        for i in 0..5 {
            bus.publish(event(&theirs, &i.to_string()));
        }

        let received = sub.recv().await.expect("event");
        assert_eq!(received.new_value.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn ends_when_bus_dropped() {
        let bus = StorageBus::default();
        let mut sub = Subscription::new(bus.subscribe(), TabId::new());
        drop(bus);
        assert!(sub.recv().await.is_none());
    }
}
