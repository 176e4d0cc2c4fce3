//! Per-topic wake-up hub for blocked consumers.
//!
//! Producers call [`TopicNotifier::emit`] after appending; consumers block
//! in [`TopicNotifier::wait`] until the next emit, a timeout, or
//! cancellation. Signals are one-shot and non-persistent: an emit with no
//! waiters is lost, so a woken consumer must always re-check the log store
//! rather than treat the signal as proof of new data.

use mqlite_core::Topic;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

type WaiterId = u64;

/// In-memory broadcast/wait primitive, keyed by topic.
///
/// Each pending wait is a single-use signal cell (`oneshot`): the sender
/// half sits in the notifier's map, the receiver half with the waiting task.
/// An emit drains the topic's senders, waking every current waiter exactly
/// once; every exit path of `wait` removes its own registration, so the map
/// holds entries only while someone is actually blocked.
///
/// `emit` and `wait` are infallible by design — the worst outcomes are a
/// spurious wake or a lost signal, both tolerated by the queue protocol.
#[derive(Default)]
pub struct TopicNotifier {
    waiters: Mutex<HashMap<Topic, HashMap<WaiterId, oneshot::Sender<()>>>>,
    next_id: AtomicU64,
}

impl TopicNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake every consumer currently waiting on `topic` and clear the
    /// topic's waiter set. Never blocks; a no-op with zero waiters.
    pub fn emit(&self, topic: &Topic) {
        let woken = {
            let mut waiters = self.waiters.lock().unwrap();
            waiters.remove(topic)
        };
        if let Some(set) = woken {
            let count = set.len();
            for (_, tx) in set {
                // The receiver may already be gone (timed out or cancelled
                // between our map removal and this send); that's fine.
                let _ = tx.send(());
            }
            tracing::trace!(topic = %topic, count, "woke waiters");
        }
    }

    /// Block until the next emit on `topic` (→ `true`), until `timeout`
    /// elapses, or until `cancel` fires (both → `false`).
    ///
    /// The registration is removed on every exit path; abandoned waits leave
    /// nothing behind.
    pub async fn wait(&self, topic: &Topic, timeout: Duration, cancel: &CancellationToken) -> bool {
        let (id, rx) = self.subscribe(topic);

        let signaled = tokio::select! {
            res = rx => res.is_ok(),
            _ = tokio::time::sleep(timeout) => false,
            _ = cancel.cancelled() => false,
        };

        self.unsubscribe(topic, id);
        signaled
    }

    fn subscribe(&self, topic: &Topic) -> (WaiterId, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut waiters = self.waiters.lock().unwrap();
        waiters.entry(topic.clone()).or_default().insert(id, tx);
        (id, rx)
    }

    fn unsubscribe(&self, topic: &Topic, id: WaiterId) {
        let mut waiters = self.waiters.lock().unwrap();
        if let Some(set) = waiters.get_mut(topic) {
            set.remove(&id);
            if set.is_empty() {
                waiters.remove(topic);
            }
        }
    }

    #[cfg(test)]
    fn waiter_count(&self, topic: &Topic) -> usize {
        self.waiters
            .lock()
            .unwrap()
            .get(topic)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.waiters.lock().unwrap().is_empty()
    }
}
