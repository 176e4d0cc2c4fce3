//! In-memory log store.
//!
//! Conforms to the [`LogStore`] contract but keeps everything in process
//! memory: nothing survives a restart. Intended for tests and for ephemeral
//! queues where durability is not wanted.

use crate::error::Result;
use crate::store::LogStore;
use crate::types::{Message, Topic};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Per-topic append-only log; a payload's index is its position.
    logs: HashMap<Topic, Vec<Vec<u8>>>,
    /// Highest acknowledged index per (consumer, topic).
    cursors: HashMap<(String, Topic), u64>,
}

/// Non-durable [`LogStore`] backed by maps behind a single `RwLock`.
#[derive(Default)]
pub struct MemoryLogStore {
    inner: RwLock<Inner>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, topic: &Topic, payloads: &[Vec<u8>]) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let log = inner.logs.entry(topic.clone()).or_default();
        log.extend(payloads.iter().cloned());
        Ok(())
    }

    async fn fetch_next(
        &self,
        consumer_id: &str,
        topic: &Topic,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let inner = self.inner.read().unwrap();
        let log = match inner.logs.get(topic) {
            Some(log) => log,
            None => return Ok(Vec::new()),
        };
        let start = match inner.cursors.get(&(consumer_id.to_string(), topic.clone())) {
            // The cursor is an arbitrary u64 (commit accepts any value, even
            // past the end of the log); clamp instead of overflowing.
            Some(&committed) => match usize::try_from(committed.saturating_add(1)) {
                Ok(next) => next,
                Err(_) => return Ok(Vec::new()),
            },
            None => 0,
        };
        let msgs = log
            .iter()
            .enumerate()
            .skip(start)
            .take(limit)
            .map(|(index, data)| Message {
                topic: topic.clone(),
                index: index as u64,
                data: data.clone(),
            })
            .collect();
        Ok(msgs)
    }

    async fn commit(&self, consumer_id: &str, topic: &Topic, index: u64) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner
            .cursors
            .insert((consumer_id.to_string(), topic.clone()), index);
        Ok(())
    }
}
