//! Daemon configuration: filesystem layout and runtime knobs.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine data root: $HOME is not set")]
    NoHome,
}

/// Resolved filesystem layout and runtime knobs for one daemon instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data root, e.g. `$HOME/.pm0`.
    pub data_root: PathBuf,
    /// Path to the daemon's sled database.
    pub db_path: PathBuf,
    /// Directory holding one `<unit_id>.log` file per unit.
    pub logs_dir: PathBuf,
    /// Daemon log file.
    pub log_path: PathBuf,
    /// Exclusive lock file preventing two daemons sharing a data root.
    pub lock_path: PathBuf,
    /// Address the RPC listener binds, overridable for tests.
    pub rpc_addr: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let data_root = crate::env::data_root()?;
        Ok(Self {
            db_path: data_root.join("pm0_daemon.db"),
            logs_dir: data_root.join("logs"),
            log_path: data_root.join("daemon.log"),
            lock_path: data_root.join("daemon.pid"),
            rpc_addr: pm0_wire::daemon_addr(),
            data_root,
        })
    }

    /// Path to a specific unit's append-only log file.
    pub fn unit_log_path(&self, unit_id: u64) -> PathBuf {
        self.logs_dir.join(format!("{unit_id}.log"))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
