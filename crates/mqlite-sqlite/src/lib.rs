//! SQLite-backed log store for mqlite.
//!
//! Implements the `LogStore` contract over a single SQLite connection:
//! - Per-topic gap-free index assignment inside an IMMEDIATE transaction
//! - Per-(consumer, topic) cursors via `INSERT OR REPLACE`
//! - WAL mode for crash safety, configurable synchronous level
//!
//! The connection lives behind a mutex; SQLite's single-writer discipline
//! plus the transaction around each append batch gives the all-or-nothing
//! and total-order guarantees the contract requires.

pub mod config;
pub mod schema;
pub mod store;

pub use config::{SqliteConfig, SynchronousMode};
pub use store::SqliteLogStore;
