use std::time::Duration;

/// Runtime configuration, loaded from the environment (`.env` supported).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub webhook_url: Option<String>,
    pub target_event: String,
    pub max_events: usize,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env");

        let max_events = std::env::var("MAX_EVENTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);
        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Config {
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "data/fights.sqlite".into()),
            webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
            target_event: std::env::var("TARGET_EVENT").unwrap_or_else(|_| "Fight Night:".into()),
            max_events,
            http_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
