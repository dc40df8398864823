//! Ledger traits and record types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Included in the next publication's backlog
    #[serde(default)]
    pub publication_worthy: bool,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>, publication_worthy: bool) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            publication_worthy,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Time- and flag-filtered view over the journal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalQuery {
    /// Only entries strictly newer than this instant
    pub since: Option<DateTime<Utc>>,
    /// Only entries with this publication-worthy flag
    pub publication_worthy: Option<bool>,
}

impl JournalQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// Publication-worthy entries, optionally only those after `since`.
    pub fn backlog(since: Option<DateTime<Utc>>) -> Self {
        Self {
            since,
            publication_worthy: Some(true),
        }
    }

    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(since) = self.since {
            if entry.timestamp <= since {
                return false;
            }
        }
        if let Some(flag) = self.publication_worthy {
            if entry.publication_worthy != flag {
                return false;
            }
        }
        true
    }
}

/// Record of a successful publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationLogEntry {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only journal.
#[async_trait]
pub trait Journal: Send + Sync {
    /// Append a line and return it as stored.
    async fn append(&self, text: &str, publication_worthy: bool) -> anyhow::Result<JournalEntry>;

    /// Entries matching `query`, oldest first.
    async fn query(&self, query: &JournalQuery) -> anyhow::Result<Vec<JournalEntry>>;
}

/// Single free-text memory blob.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Current blob; empty when nothing was ever stored.
    async fn get(&self) -> anyhow::Result<String>;

    /// Replace the whole blob. Nothing of the previous value is kept.
    async fn replace(&self, blob: &str) -> anyhow::Result<()>;
}

/// Log of publications, used to compute the cooldown.
#[async_trait]
pub trait PublicationLog: Send + Sync {
    async fn append(&self, content: &str, timestamp: DateTime<Utc>) -> anyhow::Result<()>;

    /// All entries in no particular order; callers sort.
    async fn list(&self) -> anyhow::Result<Vec<PublicationLogEntry>>;
}

/// Token mints the agent chose to hold.
///
/// Tokens bought or launched by the agent are added; everything else in the
/// wallet (airdrops, dust) is left out of the cycle's balance view.
#[async_trait]
pub trait TokenWhitelist: Send + Sync {
    /// Add a mint. Adding one already present is not an error.
    async fn add(&self, mint: &str) -> anyhow::Result<()>;

    async fn list(&self) -> anyhow::Result<Vec<String>>;
}
