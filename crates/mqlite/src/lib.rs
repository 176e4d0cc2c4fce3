//! # mqlite
//!
//! A persistent, multi-consumer message queue: producers append byte
//! messages to named topics, and each consumer tracks its own cursor into a
//! topic's append-only log, advancing it explicitly with [`Queue::commit`].
//! Consumers can block for new messages with [`Queue::read_wait`] instead of
//! polling.
//!
//! This crate is the coordination layer: the [`Queue`] coordinator and the
//! [`TopicNotifier`] wake-up hub. Durable storage is behind the
//! [`LogStore`] trait — use `mqlite-sqlite` for a durable backend or
//! [`MemoryLogStore`] for an ephemeral one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mqlite::{CancellationToken, MemoryLogStore, Queue, Topic};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), mqlite::QueueError> {
//! let queue = Queue::new(MemoryLogStore::new());
//! let topic = Topic::from("jobs");
//!
//! queue.write(&topic, &[b"hello".to_vec()]).await?;
//!
//! let cancel = CancellationToken::new();
//! let msgs = queue
//!     .read_wait("worker-1", &topic, 16, Duration::from_millis(500), &cancel)
//!     .await?;
//! if let Some(last) = msgs.last() {
//!     queue.commit("worker-1", &topic, last.index).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod notifier;
pub mod queue;

pub use error::{QueueError, Result};
pub use notifier::TopicNotifier;
pub use queue::Queue;

pub use mqlite_core::{LogStore, MemoryLogStore, Message, StoreError, Topic};
pub use tokio_util::sync::CancellationToken;
