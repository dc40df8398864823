//! In-process ledger backend.

use crate::traits::{
    Journal, JournalEntry, JournalQuery, MemoryStore, PublicationLog, PublicationLogEntry,
    TokenWhitelist,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tokio::sync::RwLock;

/// Every ledger store held in memory.
#[derive(Default)]
pub struct InMemoryLedger {
    journal: RwLock<Vec<JournalEntry>>,
    memory: RwLock<String>,
    publications: RwLock<Vec<PublicationLogEntry>>,
    whitelist: RwLock<BTreeSet<String>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing memory blob.
    pub fn with_memory(blob: impl Into<String>) -> Self {
        Self {
            memory: RwLock::new(blob.into()),
            ..Self::default()
        }
    }

    /// Insert a pre-built entry, keeping timestamp order.
    pub async fn seed_journal(&self, entry: JournalEntry) {
        let mut journal = self.journal.write().await;
        let pos = journal.partition_point(|e| e.timestamp <= entry.timestamp);
        journal.insert(pos, entry);
    }

    /// Every journal line, oldest first.
    pub async fn journal_entries(&self) -> Vec<JournalEntry> {
        self.journal.read().await.clone()
    }

    pub async fn publications(&self) -> Vec<PublicationLogEntry> {
        self.publications.read().await.clone()
    }
}

#[async_trait]
impl Journal for InMemoryLedger {
    async fn append(&self, text: &str, publication_worthy: bool) -> anyhow::Result<JournalEntry> {
        let mut journal = self.journal.write().await;
        // never step backwards if the wall clock does
        let now = Utc::now();
        let timestamp = journal
            .last()
            .map_or(now, |last| if now < last.timestamp { last.timestamp } else { now });
        let entry = JournalEntry {
            text: text.to_string(),
            timestamp,
            publication_worthy,
        };
        journal.push(entry.clone());
        Ok(entry)
    }

    async fn query(&self, query: &JournalQuery) -> anyhow::Result<Vec<JournalEntry>> {
        let journal = self.journal.read().await;
        Ok(journal.iter().filter(|e| query.matches(e)).cloned().collect())
    }
}

#[async_trait]
impl MemoryStore for InMemoryLedger {
    async fn get(&self) -> anyhow::Result<String> {
        Ok(self.memory.read().await.clone())
    }

    async fn replace(&self, blob: &str) -> anyhow::Result<()> {
        *self.memory.write().await = blob.to_string();
        Ok(())
    }
}

#[async_trait]
impl PublicationLog for InMemoryLedger {
    async fn append(&self, content: &str, timestamp: DateTime<Utc>) -> anyhow::Result<()> {
        self.publications.write().await.push(PublicationLogEntry {
            content: content.to_string(),
            timestamp,
        });
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<PublicationLogEntry>> {
        Ok(self.publications.read().await.clone())
    }
}

#[async_trait]
impl TokenWhitelist for InMemoryLedger {
    async fn add(&self, mint: &str) -> anyhow::Result<()> {
        self.whitelist.write().await.insert(mint.to_string());
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.whitelist.read().await.iter().cloned().collect())
    }
}
