//! Queue coordinator: composes a [`LogStore`] with a [`TopicNotifier`] to
//! turn a passive, polling log into a queue with blocking reads.

use crate::error::{QueueError, Result};
use crate::notifier::TopicNotifier;
use mqlite_core::{LogStore, Message, Topic};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Public surface of the message queue.
///
/// Producers [`write`](Queue::write), consumers [`read`](Queue::read) or
/// [`read_wait`](Queue::read_wait) and then [`commit`](Queue::commit) the
/// highest index they have processed. There is no global lock: the store and
/// the notifier each serialize their own state, and independent producers
/// and consumers interleave freely.
///
/// Every store failure is propagated annotated with the failing
/// sub-operation; the coordinator never retries — retry policy belongs to
/// the caller.
pub struct Queue<S> {
    store: S,
    notifier: TopicNotifier,
}

impl<S: LogStore> Queue<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: TopicNotifier::new(),
        }
    }

    /// Append `payloads` to `topic` and wake its waiters.
    ///
    /// One emit per call regardless of batch size (even an empty batch, which
    /// appends nothing but still emits on success). On store failure nothing
    /// is emitted.
    pub async fn write(&self, topic: &Topic, payloads: &[Vec<u8>]) -> Result<()> {
        self.store
            .append(topic, payloads)
            .await
            .map_err(|e| QueueError::store("append", e))?;
        self.notifier.emit(topic);
        Ok(())
    }

    /// Non-blocking read: whatever is available past the consumer's cursor,
    /// up to `limit`, possibly empty. Does not move the cursor.
    ///
    /// `limit == 0` deterministically returns an empty vec.
    pub async fn read(
        &self,
        consumer_id: &str,
        topic: &Topic,
        limit: usize,
    ) -> Result<Vec<Message>> {
        self.store
            .fetch_next(consumer_id, topic, limit)
            .await
            .map_err(|e| QueueError::store("fetchnext", e))
    }

    /// Blocking read: like [`read`](Queue::read), but if nothing is
    /// available, wait up to `timeout` for a write to `topic` and then fetch
    /// exactly once more.
    ///
    /// Timeout and cancellation are not errors — both resolve to the empty
    /// result. There is no retry loop: worst-case blocking is a single wait
    /// cycle, and if the post-wake fetch is empty again (another consumer
    /// raced us to the data, or the emit came from an empty batch) that
    /// empty result is returned. Repeated polling is the caller's concern.
    pub async fn read_wait(
        &self,
        consumer_id: &str,
        topic: &Topic,
        limit: usize,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>> {
        let msgs = self.read(consumer_id, topic, limit).await?;
        if !msgs.is_empty() || timeout.is_zero() {
            return Ok(msgs);
        }

        // An emit landing between the fetch above and the registration
        // inside `wait` is missed: the data is still visible on the next
        // fetch, but this call may wait out its full timeout once.
        if !self.notifier.wait(topic, timeout, cancel).await {
            return Ok(msgs);
        }

        tracing::trace!(topic = %topic, consumer_id, "woken, re-fetching");
        self.read(consumer_id, topic, limit).await
    }

    /// Durably set the consumer's cursor for `topic` to `index`.
    ///
    /// Subsequent reads return only messages above `index`. Committing below
    /// the current cursor is accepted and rewinds visibility (redelivery).
    pub async fn commit(&self, consumer_id: &str, topic: &Topic, index: u64) -> Result<()> {
        self.store
            .commit(consumer_id, topic, index)
            .await
            .map_err(|e| QueueError::store("commit", e))
    }
}
