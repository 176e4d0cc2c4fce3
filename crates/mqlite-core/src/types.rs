use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an independently ordered message stream.
///
/// Topics are plain identifiers; the queue enforces no reserved characters
/// and creates topics implicitly on first append. Ordering is only ever
/// guaranteed within a single topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single queue entry.
///
/// `index` is assigned by the store at append time: unique and gap-free
/// within a topic, starting at 0, never reused or reassigned. Messages are
/// immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub topic: Topic,
    pub index: u64,
    pub data: Vec<u8>,
}
