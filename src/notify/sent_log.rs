use super::Channel;
use crate::db::{sent_messages, Database};
use crate::errors::AppError;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::str::FromStr;

/// How message bodies are keyed for duplicate suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupScope {
    /// One set for every channel: a body sent anywhere is never sent again.
    #[default]
    Global,
    /// The same body may go out once per channel.
    PerChannel,
}

impl FromStr for DedupScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(DedupScope::Global),
            "per-channel" | "per_channel" => Ok(DedupScope::PerChannel),
            other => Err(AppError::Config(format!("unknown dedup scope {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SentKey {
    channel: Option<Channel>,
    body: String,
}

/// Bodies already delivered during this process, optionally mirrored
/// to SQLite so later runs see them too.
#[derive(Debug, Default)]
pub struct SentLog {
    scope: DedupScope,
    seen: HashSet<SentKey>,
    store: Option<Database>,
    /// Consult the store but never write to it (dry runs).
    read_only: bool,
}

impl SentLog {
    pub fn new(scope: DedupScope) -> Self {
        Self {
            scope,
            seen: HashSet::new(),
            store: None,
            read_only: false,
        }
    }

    /// Backs the log with a database (schema must already be applied).
    pub fn with_store(mut self, db: Database) -> Self {
        self.store = Some(db);
        self.read_only = false;
        self
    }

    /// Like `with_store`, but recorded keys stay in memory only.
    pub fn with_read_only_store(mut self, db: Database) -> Self {
        self.store = Some(db);
        self.read_only = true;
        self
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn key(&self, channel: Channel, body: &str) -> SentKey {
        SentKey {
            channel: match self.scope {
                DedupScope::Global => None,
                DedupScope::PerChannel => Some(channel),
            },
            body: body.to_string(),
        }
    }

    pub fn contains(&self, channel: Channel, body: &str) -> Result<bool, AppError> {
        let key = self.key(channel, body);
        if self.seen.contains(&key) {
            return Ok(true);
        }

        match &self.store {
            Some(db) => {
                let hash = key_hash(&key);
                db.with_conn(|conn| sent_messages::is_sent(conn, &hash))
            }
            None => Ok(false),
        }
    }

    pub fn record(&mut self, channel: Channel, body: &str) -> Result<(), AppError> {
        let key = self.key(channel, body);

        if let Some(db) = self.store.as_ref().filter(|_| !self.read_only) {
            let hash = key_hash(&key);
            db.with_conn(|conn| {
                sent_messages::mark_sent(conn, &hash, channel.as_str(), Utc::now())
            })?;
        }

        self.seen.insert(key);
        Ok(())
    }
}

fn key_hash(key: &SentKey) -> String {
    let mut hasher = Sha256::new();
    if let Some(channel) = key.channel {
        hasher.update(channel.as_str().as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(key.body.as_bytes());

    let mut out = String::with_capacity(64);
    for byte in hasher.finalize() {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
