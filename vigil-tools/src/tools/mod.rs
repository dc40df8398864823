//! Tool implementations.
//!
//! Handlers run their work through [`journaled`], which owns the
//! one-journal-line-per-run rule: the line is written after the work
//! settles, on the success path and on every error path.

mod balances;
mod buy;
mod edit_memory;
mod launch;
mod post_bounty;
mod post_tweet;
mod search_token;
mod sell;
mod trade;
mod transfer;
mod web_search;

#[cfg(test)]
pub(crate) mod test_support;

pub use balances::BalancesTool;
pub use buy::BuyTool;
pub use edit_memory::EditMemoryTool;
pub use launch::LaunchTool;
pub use post_bounty::PostBountyTool;
pub use post_tweet::PostTweetTool;
pub use search_token::SearchTokenTool;
pub use sell::SellTool;
pub use trade::TradeTool;
pub use transfer::TransferTool;
pub use web_search::WebSearchTool;

use crate::traits::ToolOutcome;
use serde_json::Value;
use std::future::Future;
use vigil_ledger::Journal;

/// What a successful handler hands back to [`journaled`].
pub(crate) struct ActionReport {
    /// Appended to the journal line after "success"
    pub summary: Option<String>,
    pub payload: Value,
}

impl ActionReport {
    pub fn new(payload: Value) -> Self {
        Self {
            summary: None,
            payload,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// Run `work` and write exactly one `[TOOL] <action>, result: ...` line.
///
/// A failed journal write is logged and does not change the outcome.
pub(crate) async fn journaled<F>(
    journal: &dyn Journal,
    action: &str,
    publication_worthy: bool,
    work: F,
) -> ToolOutcome
where
    F: Future<Output = anyhow::Result<ActionReport>>,
{
    let (line, outcome) = match work.await {
        Ok(report) => {
            let line = match report.summary {
                Some(summary) => format!("[TOOL] {action}, result: success. {summary}"),
                None => format!("[TOOL] {action}, result: success"),
            };
            (line, ToolOutcome::success(report.payload))
        }
        Err(e) => {
            let message = format!("{e:#}");
            (
                format!("[TOOL] {action}, result: failed ({message})"),
                ToolOutcome::failure(message),
            )
        }
    };

    if let Err(e) = journal.append(&line, publication_worthy).await {
        tracing::warn!(action = %action, error = %e, "Failed to write journal line");
    }

    outcome
}

/// Required string argument. Shape is already checked by the registry.
pub(crate) fn str_arg<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
}

/// Parse a decimal amount the model supplied as text.
pub(crate) fn amount_arg(raw: &str, what: &str) -> anyhow::Result<f64> {
    vigil_common::util::parse_positive_amount(raw).ok_or_else(|| {
        anyhow::anyhow!("invalid {what} '{raw}': expected a positive number")
    })
}
