//! Derived unit status.
//!
//! Status is never stored — it is computed on demand from whether the
//! child has exited, its exit code, and the `stopped` flag an operator
//! or the watcher sets.

use serde::{Deserialize, Serialize};

/// The wire-level status of a unit.
///
/// The numeric discriminants (`0=RUNNING,1=EXITED,2=FAILED,3=STOPPED`)
/// are a stable wire encoding, so `as u32` can be sent directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum UnitStatus {
    Running = 0,
    Exited = 1,
    Failed = 2,
    Stopped = 3,
}

impl UnitStatus {
    /// Derive status from whether the child has exited, its exit code
    /// (by the source's convention, -1 means "terminated by signal"),
    /// and whether the unit was explicitly stopped.
    ///
    /// `stopped` takes priority even if the child hasn't exited yet:
    /// Stop requests termination and sets `stopped` before the child
    /// is observed to have actually exited.
    pub fn derive(exit_code: Option<i32>, stopped: bool) -> Self {
        if stopped {
            return UnitStatus::Stopped;
        }
        match exit_code {
            None => UnitStatus::Running,
            Some(0) => UnitStatus::Exited,
            Some(-1) => UnitStatus::Stopped,
            Some(_) => UnitStatus::Failed,
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, UnitStatus::Running)
    }

    pub fn is_failed(self) -> bool {
        matches!(self, UnitStatus::Failed)
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnitStatus::Running => "RUNNING",
            UnitStatus::Exited => "EXITED",
            UnitStatus::Failed => "FAILED",
            UnitStatus::Stopped => "STOPPED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
