//! Daemon startup: lock acquisition, storage, RPC listener, and relaunch
//! of units persisted by a previous daemon generation.

use std::fs::File;
use std::path::Path;

use fs2::FileExt;
use pm0_core::{Pm0Error, SystemClock, UnitModel};
use pm0_storage::Db;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::supervisor::Supervisor;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to resolve configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("pm0d is already running for this data root")]
    LockFailed(#[source] std::io::Error),
    #[error("failed to open storage: {0}")]
    Storage(#[from] pm0_storage::StorageError),
    #[error("failed to bind RPC listener at {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log path has no parent directory or file name")]
    NoStateDir,
}

pub struct Startup {
    pub supervisor: Supervisor<SystemClock>,
    pub listener: TcpListener,
    /// Held for the process lifetime; the exclusive lock is released on drop.
    #[allow(dead_code)]
    pub lock_file: File,
}

/// Acquire the data root, bind the RPC listener, and relaunch every unit
/// this daemon's previous generation had persisted.
pub async fn bootstrap(config: Config) -> Result<Startup, LifecycleError> {
    std::fs::create_dir_all(&config.data_root)?;
    std::fs::create_dir_all(&config.logs_dir)?;

    let lock_file = acquire_lock(&config.lock_path)?;

    let db = Db::open(&config.db_path)?;
    let listener = TcpListener::bind(&config.rpc_addr)
        .await
        .map_err(|e| LifecycleError::Bind(config.rpc_addr.clone(), e))?;

    let supervisor = Supervisor::new(db.clone(), config.clone(), std::sync::Arc::new(SystemClock));

    let persisted = db.load_all()?;
    info!(count = persisted.len(), "relaunching persisted units");
    let handles: Vec<_> = persisted
        .into_iter()
        .map(|model| {
            let supervisor = supervisor.clone();
            tokio::task::spawn_blocking(move || {
                let id = model.id;
                (id, relaunch_persisted(&supervisor, model))
            })
        })
        .collect();
    for handle in handles {
        match handle.await {
            Ok((id, Ok(()))) => {}
            Ok((id, Err(e))) => warn!(unit_id = id, error = %e, "failed to relaunch persisted unit"),
            Err(e) => warn!(error = %e, "relaunch task panicked"),
        }
    }

    Ok(Startup { supervisor, listener, lock_file })
}

fn acquire_lock(lock_path: &Path) -> Result<File, LifecycleError> {
    use std::io::Write;

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut file = file;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

/// Relaunch a unit persisted by a previous daemon generation. This is the
/// initial launch of this generation, not a restart of a live process, so
/// it does not bump `restarts_count`.
fn relaunch_persisted(supervisor: &Supervisor<SystemClock>, model: UnitModel) -> Result<(), Pm0Error> {
    let log_path = supervisor.config().unit_log_path(model.id);
    let launched = crate::supervisor::launch(&model, &log_path, supervisor.clock.unix_seconds())?;
    let id = model.id;
    let (child, live) = launched.split(model);
    supervisor.table().write().insert(id, live);
    crate::watcher::spawn(id, child, supervisor.clone());
    Ok(())
}

/// Terminate every live unit, best-effort. Called on daemon shutdown so a
/// later bootstrap relaunches them fresh rather than finding duplicates.
pub fn terminate_all(supervisor: &Supervisor<SystemClock>) {
    let table = supervisor.table();
    let table = table.read();
    for unit in table.values() {
        if unit.status().is_running() {
            if let Err(e) = unit.request_terminate(true) {
                warn!(unit_id = unit.model.id, error = %e, "failed to signal unit during shutdown");
            }
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
