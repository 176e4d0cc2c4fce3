use crate::config::SqliteConfig;
use crate::schema;
use async_trait::async_trait;
use chrono::Utc;
use mqlite_core::{LogStore, Message, Result, StoreError, Topic};
use rusqlite::{params, Connection, OpenFlags, TransactionBehavior};
use std::sync::{Arc, Mutex};

/// SQLite-backed log store
///
/// A single read-write connection behind a mutex. Appends run inside an
/// IMMEDIATE transaction so the `MAX(topic_index) + 1` assignment is
/// serialized against concurrent writers and the batch is all-or-nothing;
/// fetches and commits are single statements and rely on SQLite's own
/// statement atomicity.
pub struct SqliteLogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLogStore {
    /// Open (or create) the database at `config.path` and initialize the
    /// schema.
    pub fn open(config: SqliteConfig) -> Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Self::configure_connection(&conn, &config)?;
        schema::init(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory database. Nothing survives drop; useful for
    /// tests and ephemeral queues.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Backend(e.to_string()))?;
        schema::init(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn configure_connection(conn: &Connection, config: &SqliteConfig) -> Result<()> {
        if config.wal_mode {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| StoreError::Config(e.to_string()))?;
        }

        conn.pragma_update(None, "synchronous", config.synchronous.as_pragma())
            .map_err(|e| StoreError::Config(e.to_string()))?;

        conn.pragma_update(None, "cache_size", config.cache_size)
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl LogStore for SqliteLogStore {
    async fn append(&self, topic: &Topic, payloads: &[Vec<u8>]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO messages (topic, topic_index, created_on, data)
                     VALUES (
                         ?1,
                         (SELECT COALESCE(MAX(topic_index) + 1, 0) FROM messages WHERE topic = ?1),
                         ?2,
                         ?3
                     )",
                )
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            let created_on = Utc::now().to_rfc3339();
            for data in payloads {
                stmt.execute(params![topic.as_str(), created_on, data])
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::trace!(topic = %topic, count = payloads.len(), "appended batch");
        Ok(())
    }

    async fn fetch_next(
        &self,
        consumer_id: &str,
        topic: &Topic,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare_cached(
                "SELECT topic_index, data
                 FROM messages
                 WHERE topic = ?1
                   AND topic_index > COALESCE(
                       (SELECT topic_index FROM consumer_cursors
                        WHERE consumer_id = ?2 AND topic = ?1),
                       -1
                   )
                 ORDER BY topic_index ASC
                 LIMIT ?3",
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // SQLite treats a negative LIMIT as "unlimited"; clamp instead of
        // letting an oversized usize wrap negative.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![topic.as_str(), consumer_id, limit], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut msgs = Vec::new();
        for row in rows {
            let (index, data) = row.map_err(|e| StoreError::Backend(e.to_string()))?;
            msgs.push(Message {
                topic: topic.clone(),
                index: index as u64,
                data,
            });
        }
        Ok(msgs)
    }

    async fn commit(&self, consumer_id: &str, topic: &Topic, index: u64) -> Result<()> {
        // Stored indices never exceed i64::MAX (they start at 0 and grow by
        // one per append), so clamping an out-of-range cursor keeps it past
        // every message rather than wrapping negative and redelivering all.
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO consumer_cursors (consumer_id, topic, topic_index)
             VALUES (?1, ?2, ?3)",
            params![consumer_id, topic.as_str(), index],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payloads(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| format!("message_{:03}", i).into_bytes()).collect()
    }

    #[tokio::test]
    async fn append_and_fetch_in_order() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");

        store.append(&topic, &payloads(10)).await.unwrap();

        let msgs = store.fetch_next("client_1", &topic, 100).await.unwrap();
        assert_eq!(msgs.len(), 10);
        for (i, m) in msgs.iter().enumerate() {
            assert_eq!(m.index, i as u64);
            assert_eq!(m.data, format!("message_{:03}", i).into_bytes());
            assert_eq!(m.topic, topic);
        }
    }

    #[tokio::test]
    async fn indices_continue_across_batches() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");

        store.append(&topic, &payloads(3)).await.unwrap();
        store.append(&topic, &[b"late".to_vec()]).await.unwrap();

        let msgs = store.fetch_next("c1", &topic, 100).await.unwrap();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[3].index, 3);
        assert_eq!(msgs[3].data, b"late");
    }

    #[tokio::test]
    async fn fetch_is_scoped_to_topic() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let t1 = Topic::from("topic_1");
        let t2 = Topic::from("topic_2");

        store.append(&t1, &[b"a".to_vec()]).await.unwrap();
        store.append(&t2, &[b"b".to_vec()]).await.unwrap();
        store.append(&t1, &[b"c".to_vec()]).await.unwrap();

        let msgs = store.fetch_next("c1", &t1, 100).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].data, b"a");
        assert_eq!(msgs[1].data, b"c");

        let msgs = store.fetch_next("c1", &t2, 100).await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].index, 0);
    }

    #[tokio::test]
    async fn cursor_advances_and_rewinds() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");
        store.append(&topic, &payloads(5)).await.unwrap();

        store.commit("c1", &topic, 2).await.unwrap();
        let msgs = store.fetch_next("c1", &topic, 100).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].index, 3);

        // A lower commit is accepted and redelivers.
        store.commit("c1", &topic, 0).await.unwrap();
        let msgs = store.fetch_next("c1", &topic, 100).await.unwrap();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0].index, 1);
    }

    #[tokio::test]
    async fn consumers_have_independent_cursors() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");
        store.append(&topic, &payloads(4)).await.unwrap();

        store.commit("c1", &topic, 3).await.unwrap();
        assert!(store.fetch_next("c1", &topic, 10).await.unwrap().is_empty());
        assert_eq!(store.fetch_next("c2", &topic, 10).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn limit_zero_returns_empty() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");
        store.append(&topic, &payloads(3)).await.unwrap();

        assert!(store.fetch_next("c1", &topic, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_limit_and_cursor_are_clamped() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");
        store.append(&topic, &payloads(3)).await.unwrap();

        // A limit beyond i64 range means "everything", not SQLite's
        // negative-LIMIT "unlimited" by accident of wrapping.
        let msgs = store.fetch_next("c1", &topic, usize::MAX).await.unwrap();
        assert_eq!(msgs.len(), 3);

        // A cursor beyond i64 range stays past every message instead of
        // wrapping negative and redelivering the whole topic.
        store.commit("c1", &topic, u64::MAX).await.unwrap();
        assert!(store.fetch_next("c1", &topic, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_and_cursors_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("queue.db");

        {
            let store = SqliteLogStore::open(SqliteConfig::new(&path)).unwrap();
            let topic = Topic::from("topic_1");
            store.append(&topic, &payloads(5)).await.unwrap();
            store.commit("c1", &topic, 1).await.unwrap();
        }

        let store = SqliteLogStore::open(SqliteConfig::new(&path)).unwrap();
        let topic = Topic::from("topic_1");
        let msgs = store.fetch_next("c1", &topic, 100).await.unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].index, 2);

        // Appends continue from the persisted max index.
        store.append(&topic, &[b"after".to_vec()]).await.unwrap();
        let msgs = store.fetch_next("c1", &topic, 100).await.unwrap();
        assert_eq!(msgs.last().unwrap().index, 5);
    }

    #[tokio::test]
    async fn empty_batch_is_a_noop_append() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let topic = Topic::from("topic_1");
        store.append(&topic, &[]).await.unwrap();
        assert!(store.fetch_next("c1", &topic, 10).await.unwrap().is_empty());
    }
}
