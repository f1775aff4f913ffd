//! The in-memory representation of a unit with a launched child process.

use std::os::unix::fs::OpenOptionsExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pm0_core::{Pm0Error, UnitModel, UnitStatus};
use pm0_wire::UnitWire;

/// A unit with a process currently (or formerly) attached to it.
///
/// `exit` and `log_file` are shared with the watcher task that owns the
/// actual [`tokio::process::Child`]: the table never holds the child
/// itself, only its pid (for signaling) and these two cells (for status
/// derivation and log access while the child may still be writing).
pub struct LiveUnit {
    pub model: UnitModel,
    pub pid: u32,
    pub started_at: i64,
    pub stopped: bool,
    /// `None` while running; `Some(code)` once the child has exited.
    /// `-1` is the signaled-exit convention.
    pub exit: Arc<Mutex<Option<i32>>>,
    /// Open handle to the unit's log file; cleared by the watcher once the
    /// child exits.
    pub log_file: Arc<Mutex<Option<std::fs::File>>>,
    /// Guards at-most-once delivery of a termination signal.
    pub terminate_once: Arc<AtomicBool>,
}

impl LiveUnit {
    pub fn status(&self) -> UnitStatus {
        let exit = *self.exit.lock();
        UnitStatus::derive(exit, self.stopped)
    }

    pub fn to_wire(&self) -> UnitWire {
        let status = self.status();
        UnitWire {
            id: self.model.id,
            name: self.model.name.clone(),
            pid: status.is_running().then_some(self.pid),
            status: status as u32,
            restarts_count: self.model.restarts_count,
            started_at: self.started_at,
        }
    }

    /// Request termination of the attached process. Idempotent: a second
    /// call after the first is a no-op.
    pub fn request_terminate(&self, force: bool) -> Result<(), Pm0Error> {
        if self.terminate_once.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let signal = if force {
            nix::sys::signal::Signal::SIGTERM
        } else {
            nix::sys::signal::Signal::SIGINT
        };
        nix::sys::signal::kill(nix::unistd::Pid::from_raw(self.pid as i32), signal)
            .map_err(|e| Pm0Error::Internal(format!("failed to signal pid {}: {e}", self.pid)))
    }

    /// Truncate the unit's log file to zero length, if it is still open.
    pub fn clear_log(&self) -> Result<(), Pm0Error> {
        let guard = self.log_file.lock();
        if let Some(file) = guard.as_ref() {
            file.set_len(0)?;
        }
        Ok(())
    }
}

/// A freshly spawned child, not yet inserted into the unit table.
pub struct LaunchedUnit {
    pub child: tokio::process::Child,
    pub pid: u32,
    pub log_file: std::fs::File,
    pub started_at: i64,
}

impl LaunchedUnit {
    /// Splits a freshly launched child into the owned [`tokio::process::Child`]
    /// (handed to the watcher) and the table-facing [`LiveUnit`] built
    /// around `model`.
    pub fn split(self, model: UnitModel) -> (tokio::process::Child, LiveUnit) {
        let live = LiveUnit {
            model,
            pid: self.pid,
            started_at: self.started_at,
            stopped: false,
            exit: Arc::new(Mutex::new(None)),
            log_file: Arc::new(Mutex::new(Some(self.log_file))),
            terminate_once: Arc::new(AtomicBool::new(false)),
        };
        (self.child, live)
    }
}

/// Opens (creating if absent) the log file for `model` at `log_path`,
/// mode 0o660, and spawns the child process redirected to it.
pub fn launch(
    model: &UnitModel,
    log_path: &std::path::Path,
    now: i64,
) -> Result<LaunchedUnit, Pm0Error> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .append(true)
        .mode(0o660)
        .open(log_path)?;
    let stdout_file = log_file.try_clone()?;
    let stderr_file = log_file.try_clone()?;

    let mut cmd = tokio::process::Command::new(&model.bin);
    cmd.args(&model.args).current_dir(&model.cwd);
    if !model.env.is_empty() {
        cmd.env_clear();
        for (key, value) in model.env_pairs() {
            cmd.env(key, value);
        }
    }
    cmd.stdout(std::process::Stdio::from(stdout_file));
    cmd.stderr(std::process::Stdio::from(stderr_file));

    let child = cmd
        .spawn()
        .map_err(|e| Pm0Error::InvalidArgument(format!("failed to launch {}: {e}", model.bin)))?;
    let pid = child
        .id()
        .ok_or_else(|| Pm0Error::Internal("child exited before its pid could be read".into()))?;

    Ok(LaunchedUnit {
        child,
        pid,
        log_file,
        started_at: now,
    })
}
