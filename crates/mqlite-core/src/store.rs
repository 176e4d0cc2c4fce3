use crate::error::Result;
use crate::types::{Message, Topic};
use async_trait::async_trait;

/// Contract a durable log backend must satisfy.
///
/// Any conforming implementation can back a queue: an embedded relational
/// store (`mqlite-sqlite`), an in-memory map ([`MemoryLogStore`]), a log
/// file. The backend owns all durable state (messages and cursors) and is
/// responsible for its own internal serialization: all three operations must
/// be safe to call concurrently from any number of tasks, and a partial
/// append must never be observable from a concurrent fetch.
///
/// Once `append` or `commit` reports success the effect must survive a
/// crash-and-restart of the store; how that is achieved (WAL, fsync policy)
/// is the backend's concern.
///
/// [`MemoryLogStore`]: crate::MemoryLogStore
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Atomically append `payloads` to `topic`, in input order.
    ///
    /// Each payload receives the next consecutive index for the topic
    /// (continuing from the current max, or 0 for a fresh topic). All-or-
    /// nothing: on failure none of the batch is applied. Concurrent appends
    /// to the same topic must be serialized so no index is duplicated or
    /// skipped.
    async fn append(&self, topic: &Topic, payloads: &[Vec<u8>]) -> Result<()>;

    /// Return up to `limit` messages for `topic` with index strictly greater
    /// than the consumer's committed cursor, ascending by index.
    ///
    /// With no cursor for `(consumer_id, topic)` the scan starts at index 0.
    /// Returns an empty vec (not an error) when nothing is available, and
    /// must not mutate the cursor.
    async fn fetch_next(
        &self,
        consumer_id: &str,
        topic: &Topic,
        limit: usize,
    ) -> Result<Vec<Message>>;

    /// Durably set the consumer's cursor for `topic` to `index`, replacing
    /// any prior value.
    ///
    /// Monotonicity is not enforced: committing an index lower than the
    /// current cursor succeeds and rewinds visibility, redelivering the
    /// messages above it on the next fetch.
    async fn commit(&self, consumer_id: &str, topic: &Topic, index: u64) -> Result<()>;
}
