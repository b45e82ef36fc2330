use crate::errors::AppError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub fn is_sent(conn: &Connection, key_hash: &str) -> Result<bool, AppError> {
    conn.query_row(
        "SELECT 1 FROM sent_messages WHERE key_hash = ?1",
        params![key_hash],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(|e| AppError::Db(e.to_string()))
}

pub fn mark_sent(
    conn: &Connection,
    key_hash: &str,
    channel: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    conn.execute(
        "INSERT OR IGNORE INTO sent_messages (key_hash, channel, sent_at) VALUES (?1, ?2, ?3)",
        params![key_hash, channel, now],
    )
    .map_err(|e| AppError::Db(e.to_string()))?;
    Ok(())
}
