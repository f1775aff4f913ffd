//! pm0 daemon library: supervisor engine, watcher, log subsystem, RPC
//! facade, and bootstrap, consumed by the `pm0d` binary and by
//! integration tests.

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod logs;
pub mod rpc;
pub mod supervisor;
pub mod watcher;

pub use config::Config;
pub use supervisor::Supervisor;
