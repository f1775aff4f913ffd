//! The watcher task: one per live child, waits for its exit and drives
//! auto-restart on failure.
//!
//! The delicate invariant here is the one described for the table write
//! lock: once the restart delay has elapsed, the watcher must check that
//! its unit is still present *and* still the same launch (not already
//! replaced by an explicit restart) and, if so, install the replacement,
//! all under one uninterrupted hold of the write lock. Launching a child
//! is a synchronous, non-blocking syscall, so the whole check-then-replace
//! step never needs to cross an `.await` point.

use std::sync::Arc;

use pm0_core::{Clock, UnitStatus};
use tracing::{info, warn};

use crate::supervisor::Supervisor;

fn exit_code(result: std::io::Result<std::process::ExitStatus>) -> i32 {
    match result {
        Ok(status) => status.code().unwrap_or(-1),
        Err(_) => -1,
    }
}

pub fn spawn<C: Clock + 'static>(id: u64, child: tokio::process::Child, supervisor: Supervisor<C>) {
    tokio::spawn(run(id, child, supervisor));
}

async fn run<C: Clock + 'static>(id: u64, mut child: tokio::process::Child, sup: Supervisor<C>) {
    let (exit_cell, log_cell) = {
        let table = sup.table.read();
        match table.get(&id) {
            Some(unit) => (Arc::clone(&unit.exit), Arc::clone(&unit.log_file)),
            None => return,
        }
    };

    let wait_result = child.wait().await;
    let code = exit_code(wait_result);
    *log_cell.lock() = None;
    *exit_cell.lock() = Some(code);

    let stopped = {
        let table = sup.table.read();
        table.get(&id).map(|u| u.stopped).unwrap_or(true)
    };
    let status = UnitStatus::derive(Some(code), stopped);
    info!(unit_id = id, %status, exit_code = code, "unit exited");
    if !status.is_failed() {
        return;
    }

    tokio::time::sleep(crate::env::restart_delay()).await;

    // Launching a child is a synchronous, non-blocking syscall (spawn, not
    // wait), so the presence check and the table replacement below happen
    // under one uninterrupted write-lock hold with no gap a concurrent
    // delete could land in.
    let new_child = {
        let mut table = sup.table.write();
        let Some(unit) = table.get(&id) else {
            info!(unit_id = id, "unit deleted before auto-restart, giving up");
            return;
        };
        if !Arc::ptr_eq(&unit.exit, &exit_cell) {
            // Superseded by a concurrent explicit restart; that launch
            // owns this id now.
            return;
        }
        if unit.stopped {
            return;
        }
        let model = unit.model.clone();
        let log_path = sup.config.unit_log_path(id);
        let launched = match crate::supervisor::launch(&model, &log_path, sup.clock.unix_seconds()) {
            Ok(launched) => launched,
            Err(e) => {
                warn!(unit_id = id, error = %e, "auto-restart failed to relaunch");
                return;
            }
        };
        let (new_child, new_unit) = launched.split(model);
        table.insert(id, new_unit);
        new_child
    };

    if let Err(e) = sup.db.increment_restarts(id) {
        warn!(unit_id = id, error = %e, "failed to persist restart count");
    }
    info!(unit_id = id, "unit auto-restarted");
    spawn(id, new_child, sup);
}
