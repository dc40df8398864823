//! Cooldown-gated publication trigger.
//!
//! Runs once per cycle after the decision delegate. The latest entry of the
//! publication log debounces posting; the journal entries flagged
//! publication-worthy since that entry form the backlog. A failed post
//! leaves no log entry, so the same backlog is offered again next cycle.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use vigil_agent::ContentComposer;
use vigil_common::util::fit_to_chars;
use vigil_ledger::{Journal, JournalQuery, PublicationLog, PublicationLogEntry};
use vigil_tools::SocialService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// No backlog under consideration
    Idle,
    /// Evaluating cooldown and backlog
    Considering,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublicationOutcome {
    /// Latest publication is younger than the cooldown
    CoolingDown { remaining: Duration },
    /// Nothing publication-worthy since the latest publication
    NoBacklog,
    Published {
        id: Option<String>,
        content: String,
        backlog_size: usize,
    },
    /// Composing or posting failed; the backlog stays eligible
    Failed { reason: String },
}

pub struct PublicationTrigger {
    journal: Arc<dyn Journal>,
    publications: Arc<dyn PublicationLog>,
    composer: Arc<dyn ContentComposer>,
    social: Arc<dyn SocialService>,
    cooldown: Duration,
    max_chars: usize,
    state: RwLock<TriggerState>,
}

/// Most recent entry after a stable descending sort by timestamp.
pub fn latest_publication(mut entries: Vec<PublicationLogEntry>) -> Option<PublicationLogEntry> {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.into_iter().next()
}

impl PublicationTrigger {
    pub fn new(
        journal: Arc<dyn Journal>,
        publications: Arc<dyn PublicationLog>,
        composer: Arc<dyn ContentComposer>,
        social: Arc<dyn SocialService>,
        cooldown: Duration,
        max_chars: usize,
    ) -> Self {
        Self {
            journal,
            publications,
            composer,
            social,
            cooldown,
            max_chars,
            state: RwLock::new(TriggerState::Idle),
        }
    }

    pub async fn state(&self) -> TriggerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: TriggerState) {
        *self.state.write().await = state;
    }

    /// Evaluate the trigger at `now`. Always returns to `Idle`.
    ///
    /// A publication is recorded at `now`, so journal entries written after
    /// the evaluation started stay in the next backlog.
    pub async fn consider(&self, now: DateTime<Utc>) -> anyhow::Result<PublicationOutcome> {
        self.set_state(TriggerState::Considering).await;
        let result = self.evaluate(now).await;
        self.set_state(TriggerState::Idle).await;
        result
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> anyhow::Result<PublicationOutcome> {
        let latest = latest_publication(self.publications.list().await?);

        if let Some(ref latest) = latest {
            // A timestamp in the future counts as zero elapsed
            let elapsed = (now - latest.timestamp).to_std().unwrap_or(Duration::ZERO);
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                tracing::debug!(remaining_secs = remaining.as_secs(), "Publication cooling down");
                return Ok(PublicationOutcome::CoolingDown { remaining });
            }
        }

        let since = latest.map(|entry| entry.timestamp);
        let backlog = self.journal.query(&JournalQuery::backlog(since)).await?;
        if backlog.is_empty() {
            tracing::debug!("No publication backlog");
            return Ok(PublicationOutcome::NoBacklog);
        }

        let backlog_size = backlog.len();
        let lines: Vec<String> = backlog.into_iter().map(|entry| entry.text).collect();

        let content = match self.composer.compose(&lines).await {
            Ok(content) => fit_to_chars(&content, self.max_chars),
            Err(e) => {
                tracing::warn!(backlog_size, error = %e, "Composing publication failed");
                return Ok(PublicationOutcome::Failed {
                    reason: format!("{e:#}"),
                });
            }
        };

        let receipt = match self.social.post(&content).await {
            Ok(receipt) if receipt.success => receipt,
            Ok(receipt) => {
                let reason = receipt
                    .error
                    .unwrap_or_else(|| "social service refused the post".to_string());
                tracing::warn!(backlog_size, reason = %reason, "Publication refused");
                return Ok(PublicationOutcome::Failed { reason });
            }
            Err(e) => {
                tracing::warn!(backlog_size, error = %e, "Publication failed");
                return Ok(PublicationOutcome::Failed {
                    reason: format!("{e:#}"),
                });
            }
        };

        self.publications.append(&content, now).await?;
        let line = match receipt.url {
            Some(ref url) => format!("Published a new post: {url}"),
            None => "Published a new post".to_string(),
        };
        self.journal.append(&line, false).await?;

        tracing::info!(backlog_size, id = receipt.id.as_deref().unwrap_or("-"), "Publication posted");
        Ok(PublicationOutcome::Published {
            id: receipt.id,
            content,
            backlog_size,
        })
    }
}
