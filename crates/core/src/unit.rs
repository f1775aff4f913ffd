//! The persisted unit definition.

use serde::{Deserialize, Serialize};

/// A unit's persisted definition.
///
/// `id` is assigned once by the storage layer (an auto-incrementing
/// key) and never changes; everything else can be mutated in place by
/// `Update` (name, env) or bumped by restart bookkeeping
/// (`restarts_count`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitModel {
    pub id: u64,
    pub name: String,
    pub cwd: String,
    pub bin: String,
    pub args: Vec<String>,
    /// `KEY=VALUE` entries. Empty means the child inherits the daemon's
    /// environment.
    pub env: Vec<String>,
    pub restarts_count: u32,
}

impl UnitModel {
    /// A new, not-yet-persisted unit. `id` is a placeholder until the
    /// storage layer assigns the real auto-incremented id.
    pub fn new(name: String, cwd: String, bin: String, args: Vec<String>, env: Vec<String>) -> Self {
        Self {
            id: 0,
            name,
            cwd,
            bin,
            args,
            env,
            restarts_count: 0,
        }
    }

    /// `bin` followed by `args`, joined by single spaces — the
    /// `command` field of `Show`.
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.args.len());
        parts.push(self.bin.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }

    /// Parse `env` into `(KEY, VALUE)` pairs for `Command::envs`.
    /// Entries without an `=` are skipped: they can't arise from
    /// `Update` (which always splits on `=`) but a hand-edited
    /// persisted record could contain one.
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        self.env
            .iter()
            .filter_map(|entry| entry.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Merge `updates` (each `KEY=VALUE`, split on the *first* `=`)
    /// into this unit's env. An entry with an empty value deletes that
    /// key; otherwise the key is set (added or replaced). Order of
    /// pre-existing, untouched keys is preserved; newly added keys are
    /// appended in `updates` order.
    pub fn merge_env(&mut self, updates: &[String]) {
        let mut pairs = self.env_pairs();
        for update in updates {
            let Some((key, value)) = update.split_once('=') else {
                continue;
            };
            pairs.retain(|(k, _)| k != key);
            if !value.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
        self.env = pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
    }
}

#[cfg(test)]
#[path = "unit_tests.rs"]
mod tests;
