use crate::error::StorageError;
use crate::storage::{Storage, StorageBus, StorageEvent, TabId};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions}, Row, Sqlite};
use tokio::sync::broadcast;
use uuid::Uuid;

// A row written by some process, as seen by the storage watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChange {
    pub key: String,
    pub value: Option<String>,
    pub revision: i64,
    pub origin: TabId,
}

/// SQLite-backed storage origin. Several processes may open the same file;
/// each `Database` gets its own instance id so the watcher can tell its own
/// writes from everyone else's.
pub struct Database {
    pool: SqlitePool,
    instance_id: String,
    bus: StorageBus,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self, StorageError> {
        let in_memory = db_url.contains(":memory:");

        // Create database if it doesn't exist
        if !in_memory && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        // Every pooled connection to ":memory:" would be a separate database
        let mut options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
        if in_memory {
            options = options.idle_timeout(None).max_lifetime(None);
        }
        let pool = options.connect(db_url).await?;

        Self::init_schema(&pool).await?;

        Ok(Self {
            pool,
            instance_id: Uuid::new_v4().to_string(),
            bus: StorageBus::default(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn bus(&self) -> &StorageBus {
        &self.bus
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StorageError> {
        // NULL value marks a removed key so other processes still see the change
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT,
                revision INTEGER NOT NULL,
                instance_id TEXT NOT NULL,
                origin TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Upsert a value (or tombstone) under the next global revision
    async fn write(&self, origin: &TabId, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, revision, instance_id, origin, updated_at)
            VALUES (?, ?, (SELECT COALESCE(MAX(revision), 0) + 1 FROM local_storage), ?, ?, ?)
            ON CONFLICT(key)
            DO UPDATE SET value = excluded.value,
                          revision = excluded.revision,
                          instance_id = excluded.instance_id,
                          origin = excluded.origin,
                          updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&self.instance_id)
        .bind(origin.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Wrote '{}' for tab {}", key, origin);
        Ok(())
    }

    pub async fn latest_revision(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COALESCE(MAX(revision), 0) AS revision FROM local_storage")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("revision"))
    }

    // Changes newer than `revision` made by other processes, oldest first
    pub async fn foreign_changes_since(&self, revision: i64) -> Result<Vec<StoredChange>, StorageError> {
        let changes = sqlx::query(
            r#"
            SELECT key, value, revision, origin
            FROM local_storage
            WHERE revision > ? AND instance_id != ?
            ORDER BY revision
            "#,
        )
        .bind(revision)
        .bind(&self.instance_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| StoredChange {
            key: row.get::<String, _>("key"),
            value: row.get::<Option<String>, _>("value"),
            revision: row.get::<i64, _>("revision"),
            origin: TabId::from(row.get::<String, _>("origin")),
        })
        .collect();

        Ok(changes)
    }
}

#[async_trait]
impl Storage for Database {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .and_then(|row| row.get::<Option<String>, _>("value"));
        Ok(value)
    }

    async fn set_item(&self, origin: &TabId, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(origin, key, Some(value)).await?;
        self.bus.publish(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
            origin: origin.clone(),
        });
        Ok(())
    }

    async fn remove_item(&self, origin: &TabId, key: &str) -> Result<(), StorageError> {
        if self.get_item(key).await?.is_none() {
            return Ok(());
        }
        self.write(origin, key, None).await?;
        self.bus.publish(StorageEvent {
            key: key.to_string(),
            new_value: None,
            origin: origin.clone(),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.bus.subscribe()
    }
}
