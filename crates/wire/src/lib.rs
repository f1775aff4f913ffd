//! Wire types and framing for the pm0 daemon/CLI RPC surface.
//!
//! Fixes the message shapes and transport parameters (length-prefixed
//! JSON over loopback TCP, port 7777, 8 MiB max frame) and keeps them
//! separate from the supervisor, so the codec could be swapped
//! (bincode, a real RPC framework) without touching daemon logic.

mod codec;
mod types;

pub use codec::{read_message, write_message, FrameError};
pub use types::{BulkElement, Request, Response, ShowInfo, UnitWire};

/// Default loopback address the daemon binds and the CLI dials.
/// Overridable via `PM0_DAEMON_ADDR` so tests don't fight over the
/// shared port.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7777";

/// Maximum accepted frame size.
pub const MAX_FRAME_SIZE: usize = 8 * 1024 * 1024;

/// Resolve the daemon address: `PM0_DAEMON_ADDR` env var, else the
/// well-known default.
pub fn daemon_addr() -> String {
    std::env::var("PM0_DAEMON_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string())
}
