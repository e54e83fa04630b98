//! Log file setup.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "walk.log";

/// Writes tracing output to `<cache>/level-walk/logs/<session>/walk.log`.
///
/// Stdout stays reserved for the walk report. The filter comes from
/// `LEVEL_LOG` and defaults to `info`. Keep the guard alive until exit so
/// buffered lines reach the file.
pub fn init(session_id: Option<&str>) -> Result<(PathBuf, WorkerGuard)> {
    let session = session_id.map_or_else(
        || {
            let started = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();
            format!("walk_{started}")
        },
        str::to_owned,
    );

    let dir = directories::ProjectDirs::from("", "", "level-walk")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("level-walk"))
        .join(&session);
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LEVEL_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!(%session, "logging initialized");
    Ok((dir.join(LOG_FILE), guard))
}
