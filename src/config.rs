use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::Level;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON dump of `{ "users": [...], "cards": [...] }` fetched from the store.
    pub snapshot_path: PathBuf,
    pub log_dir: String,
    pub log_file: String,
    pub log_level: Level,
    /// Restrict the report to one user id.
    pub report_user: Option<String>,
    /// Close every open session before reporting, as the end-of-day sweep does.
    pub auto_checkout: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            snapshot_path: env::var("SNAPSHOT_PATH")
                .context("SNAPSHOT_PATH must be set")?
                .into(),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "report.log".to_string()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .context("LOG_LEVEL must be one of trace, debug, info, warn, error")?,
            report_user: env::var("REPORT_USER")
                .ok()
                .filter(|user| !user.trim().is_empty()),
            auto_checkout: env::var("AUTO_CHECKOUT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("AUTO_CHECKOUT must be true or false")?,
        })
    }
}
