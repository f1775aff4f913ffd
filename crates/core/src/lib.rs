//! pm0-core: shared types for the pm0 process supervisor.
//!
//! This crate has no I/O of its own — it defines the unit model, the
//! derived status machine, the clock abstraction used for testable
//! timestamps, and the error taxonomy shared by `pm0-storage`,
//! `pm0-daemon`, and `pm0-wire`.

pub mod clock;
pub mod error;
pub mod status;
pub mod unit;

pub use clock::{Clock, SystemClock};
pub use error::Pm0Error;
pub use status::UnitStatus;
pub use unit::UnitModel;
