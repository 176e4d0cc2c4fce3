//! Core abstractions for the mqlite message queue.
//!
//! This crate defines what every part of the queue agrees on:
//! - [`Topic`] and [`Message`]: named streams and the immutable entries
//!   appended to them
//! - [`LogStore`]: the contract a durable backend must satisfy (append,
//!   fetch-after-cursor, cursor commit)
//! - [`StoreError`]: the failure taxonomy backends report through
//! - [`MemoryLogStore`]: a non-durable in-memory backend for tests and
//!   ephemeral queues
//!
//! The coordination layer (blocking reads, wake-up notification) lives in the
//! `mqlite` crate; the SQLite backend lives in `mqlite-sqlite`.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryLogStore;
pub use store::LogStore;
pub use types::{Message, Topic};
