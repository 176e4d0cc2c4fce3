use mqlite_core::{Result, StoreError};
use rusqlite::Connection;

/// Initialize tables if needed.
///
/// `messages` is the append-only per-topic log; `(topic, topic_index)` is the
/// primary key, so a duplicate index assignment fails the transaction instead
/// of corrupting the log. `consumer_cursors` holds one row per
/// (consumer, topic) with the highest acknowledged index.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS messages (
            topic        TEXT NOT NULL,
            topic_index  INTEGER NOT NULL,
            created_on   TEXT NOT NULL,
            data         BLOB NOT NULL,
            PRIMARY KEY (topic, topic_index)
        );

        CREATE TABLE IF NOT EXISTS consumer_cursors (
            consumer_id  TEXT NOT NULL,
            topic        TEXT NOT NULL,
            topic_index  INTEGER NOT NULL,
            PRIMARY KEY (consumer_id, topic)
        );",
    )
    .map_err(|e| StoreError::Backend(e.to_string()))?;

    Ok(())
}
