//! The supervisor: the in-memory unit table and the lifecycle operations
//! (start, list, show, update, bulk stop/restart/delete) that act on it.
//!
//! The hard invariant this module upholds is described in [`crate::watcher`]:
//! any operation that replaces or removes a table entry must do so while
//! holding the table's write lock for the entire check-then-act step.

mod bulk;
mod unit;

pub use bulk::BulkResult;
pub use unit::{launch, LaunchedUnit, LiveUnit};

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use pm0_core::{Clock, Pm0Error, UnitModel};
use pm0_storage::Db;
use pm0_wire::{ShowInfo, UnitWire};
use tracing::info;

use crate::config::Config;

pub type UnitTable = Arc<RwLock<HashMap<u64, LiveUnit>>>;

pub struct Supervisor<C: Clock> {
    pub(crate) table: UnitTable,
    pub(crate) db: Db,
    pub(crate) config: Config,
    pub(crate) clock: Arc<C>,
}

impl<C: Clock> Clone for Supervisor<C> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            db: self.db.clone(),
            config: self.config.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock + 'static> Supervisor<C> {
    pub fn new(db: Db, config: Config, clock: Arc<C>) -> Self {
        Self {
            table: Arc::new(RwLock::new(HashMap::new())),
            db,
            config,
            clock,
        }
    }

    pub fn table(&self) -> UnitTable {
        Arc::clone(&self.table)
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reserve an id, launch the process, persist the unit, then publish it
    /// to the table and spawn its watcher. If persistence fails after a
    /// successful launch, the just-launched child is killed and nothing is
    /// left behind — the closest analogue to a transaction rollback that a
    /// spawned OS process allows.
    pub fn start(
        &self,
        name: String,
        cwd: String,
        bin: String,
        args: Vec<String>,
        env: Vec<String>,
    ) -> Result<UnitWire, Pm0Error> {
        let id = self.db.reserve_id().map_err(|e| Pm0Error::Internal(e.to_string()))?;
        let mut model = UnitModel::new(name, cwd, bin, args, env);
        model.id = id;

        let launched = launch(&model, &self.config.unit_log_path(id), self.clock.unix_seconds())?;

        if let Err(e) = self.db.save(&model) {
            let (mut child, _) = launched.split(model);
            let _ = child.start_kill();
            return Err(Pm0Error::Internal(e.to_string()));
        }

        let (child, live) = launched.split(model);
        let wire = live.to_wire();
        self.table.write().insert(id, live);
        info!(unit_id = id, "unit started");
        crate::watcher::spawn(id, child, self.clone());
        Ok(wire)
    }

    pub fn list(&self) -> Vec<UnitWire> {
        let table = self.table.read();
        let mut units: Vec<_> = table.values().map(LiveUnit::to_wire).collect();
        units.sort_by_key(|u| u.id);
        units
    }

    pub fn show(&self, id: u64) -> Result<ShowInfo, Pm0Error> {
        let table = self.table.read();
        let unit = table.get(&id).ok_or(Pm0Error::NotFound(id))?;
        Ok(ShowInfo {
            id: unit.model.id,
            name: unit.model.name.clone(),
            cwd: unit.model.cwd.clone(),
            command: unit.model.command_string(),
            env: unit.model.env.clone(),
        })
    }

    pub fn update(&self, id: u64, name: Option<String>, env: Vec<String>) -> Result<String, Pm0Error> {
        let mut table = self.table.write();
        let unit = table.get_mut(&id).ok_or(Pm0Error::NotFound(id))?;
        if let Some(name) = name {
            unit.model.name = name;
        }
        if !env.is_empty() {
            unit.model.merge_env(&env);
        }
        self.db
            .save(&unit.model)
            .map_err(|e| Pm0Error::Internal(e.to_string()))?;
        Ok(unit.model.name.clone())
    }

    pub fn logs_clear(&self, ids: &[u64]) -> Vec<(u64, Result<(), Pm0Error>)> {
        let table = self.table.read();
        ids.iter()
            .map(|&id| {
                let result = match table.get(&id) {
                    Some(unit) => unit.clear_log(),
                    None => Err(Pm0Error::NotFound(id)),
                };
                (id, result)
            })
            .collect()
    }

    pub fn stop(&self, ids: &[u64], force: bool) -> Vec<BulkResult> {
        bulk::stop_many(self, ids, force)
    }

    pub fn stop_all(&self, except: &[u64]) -> Vec<BulkResult> {
        bulk::stop_all(self, except)
    }

    pub fn restart(&self, ids: &[u64], force: bool) -> Vec<BulkResult> {
        bulk::restart_many(self, ids, force)
    }

    pub fn restart_all(&self, except: &[u64]) -> Vec<BulkResult> {
        bulk::restart_all(self, except)
    }

    pub fn delete(&self, ids: &[u64], force: bool) -> Vec<BulkResult> {
        bulk::delete_many(self, ids, force)
    }

    pub fn delete_all(&self, except: &[u64]) -> Vec<BulkResult> {
        bulk::delete_all(self, except)
    }
}
