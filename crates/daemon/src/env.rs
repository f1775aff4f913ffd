//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Resolve the data root: `PM0_HOME` env var, else `$HOME/.pm0`.
pub fn data_root() -> Result<PathBuf, crate::config::ConfigError> {
    if let Ok(dir) = std::env::var("PM0_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|_| crate::config::ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".pm0"))
}

/// Failure-restart delay override, for fast tests (default 5s).
pub fn restart_delay() -> Duration {
    std::env::var("PM0_RESTART_DELAY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Follow-mode poll interval override, for fast tests (default 1s).
pub fn follow_poll_interval() -> Duration {
    std::env::var("PM0_FOLLOW_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(1))
}
