//! Bulk operations (stop/restart/delete, individually or "all except").

use pm0_core::Clock;
use pm0_wire::UnitWire;
use tracing::{info, warn};

use super::Supervisor;

pub struct BulkResult {
    pub unit_id: u64,
    pub unit: Option<UnitWire>,
    pub error: Option<String>,
}

fn ok(unit_id: u64, unit: UnitWire) -> BulkResult {
    BulkResult { unit_id, unit: Some(unit), error: None }
}

fn err(unit_id: u64, message: impl Into<String>) -> BulkResult {
    BulkResult { unit_id, unit: None, error: Some(message.into()) }
}

fn all_ids<C: Clock + 'static>(sup: &Supervisor<C>, except: &[u64]) -> Vec<u64> {
    sup.table
        .read()
        .keys()
        .copied()
        .filter(|id| !except.contains(id))
        .collect()
}

fn stop_one<C: Clock + 'static>(sup: &Supervisor<C>, id: u64, force: bool) -> BulkResult {
    let mut table = sup.table.write();
    let Some(unit) = table.get_mut(&id) else {
        return err(id, format!("unit {id} not found"));
    };
    let was_running = unit.status().is_running();
    unit.stopped = true;
    if was_running {
        if let Err(e) = unit.request_terminate(force) {
            warn!(unit_id = id, error = %e, "failed to signal unit");
            return err(id, e.as_message());
        }
    }
    ok(id, unit.to_wire())
}

pub fn stop_many<C: Clock + 'static>(sup: &Supervisor<C>, ids: &[u64], force: bool) -> Vec<BulkResult> {
    ids.iter().map(|&id| stop_one(sup, id, force)).collect()
}

pub fn stop_all<C: Clock + 'static>(sup: &Supervisor<C>, except: &[u64]) -> Vec<BulkResult> {
    stop_many(sup, &all_ids(sup, except), true)
}

fn restart_one<C: Clock + 'static>(sup: &Supervisor<C>, id: u64, force: bool) -> BulkResult {
    let model = {
        let table = sup.table.read();
        match table.get(&id) {
            Some(unit) => unit.model.clone(),
            None => return err(id, format!("unit {id} not found")),
        }
    };

    // Signal the running child, if any; the replacement entry below carries
    // its own fresh `stopped = false`, so this is only for the signal.
    stop_one(sup, id, force);

    let log_path = sup.config.unit_log_path(id);
    let launched = match super::launch(&model, &log_path, sup.clock.unix_seconds()) {
        Ok(launched) => launched,
        Err(e) => {
            warn!(unit_id = id, error = %e, "restart failed to relaunch");
            return err(id, e.as_message());
        }
    };

    let model = match sup.db.increment_restarts(id) {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            // Deleted between the read above and now: abandon, the child
            // we just launched becomes an orphan we must still reap.
            let (mut child, _) = launched.split(model);
            let _ = child.start_kill();
            return err(id, format!("unit {id} not found"));
        }
        Err(e) => {
            warn!(unit_id = id, error = %e, "failed to persist restart count");
            model
        }
    };

    let (child, live) = launched.split(model);
    let wire = live.to_wire();
    {
        let mut table = sup.table.write();
        table.insert(id, live);
    }
    info!(unit_id = id, "unit restarted");
    crate::watcher::spawn(id, child, sup.clone());
    ok(id, wire)
}

pub fn restart_many<C: Clock + 'static>(sup: &Supervisor<C>, ids: &[u64], force: bool) -> Vec<BulkResult> {
    ids.iter().map(|&id| restart_one(sup, id, force)).collect()
}

pub fn restart_all<C: Clock + 'static>(sup: &Supervisor<C>, except: &[u64]) -> Vec<BulkResult> {
    restart_many(sup, &all_ids(sup, except), true)
}

fn delete_one<C: Clock + 'static>(sup: &Supervisor<C>, id: u64, force: bool) -> BulkResult {
    let removed = {
        let mut table = sup.table.write();
        table.remove(&id)
    };
    let Some(unit) = removed else {
        return err(id, format!("unit {id} not found"));
    };
    if unit.status().is_running() {
        if let Err(e) = unit.request_terminate(force) {
            warn!(unit_id = id, error = %e, "failed to signal unit during delete");
        }
    }
    if let Err(e) = sup.db.delete(id) {
        warn!(unit_id = id, error = %e, "failed to remove persisted unit record");
    }
    let log_path = sup.config.unit_log_path(id);
    let _ = std::fs::remove_file(log_path);
    info!(unit_id = id, "unit deleted");
    ok(id, unit.to_wire())
}

pub fn delete_many<C: Clock + 'static>(sup: &Supervisor<C>, ids: &[u64], force: bool) -> Vec<BulkResult> {
    ids.iter().map(|&id| delete_one(sup, id, force)).collect()
}

pub fn delete_all<C: Clock + 'static>(sup: &Supervisor<C>, except: &[u64]) -> Vec<BulkResult> {
    delete_many(sup, &all_ids(sup, except), true)
}

impl From<BulkResult> for pm0_wire::BulkElement {
    fn from(r: BulkResult) -> Self {
        pm0_wire::BulkElement { unit_id: r.unit_id, unit: r.unit, error: r.error }
    }
}
