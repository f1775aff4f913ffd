// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Persistent unit store for pm0, backed by `sled`.
//!
//! `sled` gives us durable auto-incrementing keys (`Db::reserve_id`,
//! via `sled::Db::generate_id`) and atomic read-modify-write
//! (`Db::increment_restarts`, via a sled transaction) without
//! hand-rolling either.

mod db;
mod error;

pub use db::Db;
pub use error::StorageError;
