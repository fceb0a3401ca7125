use std::fs;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};
use tracing_appender::rolling;

use rfid_attendance::config::Config;
use rfid_attendance::report::{build_report, Snapshot};
use rfid_attendance::utils::format::date_key;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(path = %config.snapshot_path.display(), "Loading snapshot");

    let raw = fs::read_to_string(&config.snapshot_path)
        .with_context(|| format!("reading {}", config.snapshot_path.display()))?;
    let mut snapshot: Snapshot = serde_json::from_str(&raw).context("parsing snapshot")?;

    // sample the clock once for the whole report
    let now = Local::now();

    if config.auto_checkout {
        let closed = snapshot.auto_checkout(&date_key(&now), now.timestamp());
        info!(closed, "Auto checkout applied");
    }

    let mut report = build_report(&snapshot, &now);

    if let Some(user_id) = &config.report_user {
        report.users.retain(|user| &user.standing.id == user_id);
        if report.users.is_empty() {
            warn!(user_id = %user_id, "No such user in snapshot");
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
