//! Token lookup by name, symbol or mint.

use super::{journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::TokenSearch;
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::Journal;

/// Results handed back to the model per search.
const MAX_RESULTS: usize = 5;

pub struct SearchTokenTool {
    search: Arc<dyn TokenSearch>,
    journal: Arc<dyn Journal>,
}

impl SearchTokenTool {
    pub fn new(search: Arc<dyn TokenSearch>, journal: Arc<dyn Journal>) -> Self {
        Self { search, journal }
    }
}

#[async_trait]
impl Tool for SearchTokenTool {
    fn name(&self) -> &str {
        "SEARCH_TOKEN"
    }

    fn description(&self) -> &str {
        "Search for tokens and get relevant details such as price in USD, token mint address, and market cap."
    }

    fn similes(&self) -> &[&'static str] {
        &[
            "get token price",
            "search tokens",
            "token value",
            "get price in usd",
            "get token address",
            "get token data",
        ]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"query": "dogwifhat"}),
            output: json!([{
                "mintAddress": "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm",
                "holderCount": 2342610,
                "mcap": 772753520.79,
                "name": "dogwifhat",
                "symbol": "$WIF",
                "usdPrice": 0.77
            }]),
            explanation: "Search for the token dogwifhat and get relevant details".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The search query for token. Can be the name, symbol, or mint address."
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, _ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let query = str_arg(&args, "query")?;
        let action = format!("Searching for token {query}");

        let outcome = journaled(self.journal.as_ref(), &action, false, async {
            let mut tokens = self.search.search(query).await?;
            tokens.truncate(MAX_RESULTS);
            let count = tokens.len();
            Ok(ActionReport::new(serde_json::to_value(tokens)?)
                .with_summary(format!("Found {count} tokens")))
        })
        .await;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{ctx, StubTokenSearch};
    use vigil_ledger::InMemoryLedger;

    #[tokio::test]
    async fn caps_results() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = SearchTokenTool::new(Arc::new(StubTokenSearch::with_count(8)), ledger.clone());

        let outcome = tool.execute(&ctx(), json!({"query": "dog"})).await.unwrap();
        let ToolOutcome::Success { payload } = outcome else {
            panic!("expected success");
        };
        let rows = payload.as_array().unwrap();
        assert_eq!(rows.len(), MAX_RESULTS);
        assert_eq!(rows[0]["mintAddress"], "Mint0");

        let entries = ledger.journal_entries().await;
        assert_eq!(
            entries[0].text,
            "[TOOL] Searching for token dog, result: success. Found 5 tokens"
        );
        assert!(!entries[0].publication_worthy);
    }

    #[tokio::test]
    async fn no_match_is_still_success() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = SearchTokenTool::new(Arc::new(StubTokenSearch::with_count(0)), ledger);

        let outcome = tool.execute(&ctx(), json!({"query": "zzz"})).await.unwrap();
        assert_eq!(outcome, ToolOutcome::success(json!([])));
    }
}
