use crate::db::Database;
use crate::error::StorageError;
use crate::storage::StorageEvent;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Relays writes made by other processes into this process's storage bus.
/// Starts from the current revision, so only changes made after start-up are
/// forwarded.
pub async fn watch_foreign_changes(database: Arc<Database>, every: Duration) {
    let mut last_seen = match database.latest_revision().await {
        Ok(revision) => revision,
        Err(e) => {
            error!("Storage watcher could not read the current revision: {}", e);
            0
        }
    };
    info!("Starting storage watcher at revision {} (every {:?})", last_seen, every);

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match relay_changes(&database, last_seen).await {
            Ok(revision) => last_seen = revision,
            Err(e) => error!("Failed to poll storage for changes: {}", e),
        }
    }
}

/// Publishes every foreign change newer than `since` and returns the newest
/// revision seen.
pub async fn relay_changes(database: &Database, since: i64) -> Result<i64, StorageError> {
    let changes = database.foreign_changes_since(since).await?;
    let mut last_seen = since;

    for change in changes {
        debug!("Relaying change to '{}' at revision {}", change.key, change.revision);
        last_seen = last_seen.max(change.revision);
        database.bus().publish(StorageEvent {
            key: change.key,
            new_value: change.value,
            origin: change.origin,
        });
    }

    Ok(last_seen)
}
