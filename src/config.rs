use crate::storage::TabId;
use std::env;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:scrum_point.db";
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub watch_interval: Duration,
    pub tab_id: TabId,
}

impl Config {
    // Read settings from the environment (after `.env` has been loaded)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let watch_interval_ms = lookup("SCRUM_POINT_WATCH_INTERVAL_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_WATCH_INTERVAL_MS);

        let tab_id = lookup("SCRUM_POINT_TAB_ID")
            .filter(|id| !id.trim().is_empty())
            .map(TabId::from)
            .unwrap_or_default();

        Self {
            database_url,
            watch_interval: Duration::from_millis(watch_interval_ms),
            tab_id,
        }
    }
}
