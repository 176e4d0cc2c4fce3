use mqlite_core::StoreError;
use thiserror::Error;

/// Failures surfaced by [`Queue`](crate::Queue) operations.
///
/// The coordinator adds no failure modes of its own: every error is a log
/// store failure, annotated with the sub-operation that failed. Timeouts and
/// cancellations are not errors; `read_wait` resolves to an empty result
/// instead.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("store.{op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl QueueError {
    pub(crate) fn store(op: &'static str, source: StoreError) -> Self {
        Self::Store { op, source }
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
