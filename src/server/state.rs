//! Application state shared across handlers
//!
//! Requests share nothing but the read-only configuration; every forecast
//! owns its dataset.

use chrono::{DateTime, Utc};

use super::ServerConfig;

pub struct AppState {
    pub config: ServerConfig,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}
