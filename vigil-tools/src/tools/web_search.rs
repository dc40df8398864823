//! Web search.

use super::{journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::WebSearch;
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::Journal;

const DEFAULT_COUNT: usize = 5;
const MAX_COUNT: usize = 20;

pub struct WebSearchTool {
    search: Arc<dyn WebSearch>,
    journal: Arc<dyn Journal>,
}

impl WebSearchTool {
    pub fn new(search: Arc<dyn WebSearch>, journal: Arc<dyn Journal>) -> Self {
        Self { search, journal }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "BRAVE_SEARCH"
    }

    fn description(&self) -> &str {
        "Search the web using Brave Search API to get real-time information, news, and search results from the internet."
    }

    fn similes(&self) -> &[&'static str] {
        &[
            "search web",
            "web search",
            "search internet",
            "find information",
            "look up",
            "research",
            "brave search",
        ]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"query": "Solana blockchain news", "count": 2}),
            output: json!({
                "status": "success",
                "query": "Solana blockchain news",
                "results": [
                    {"title": "Latest Solana Blockchain Updates", "url": "https://example.com/solana-news", "description": "Recent developments in the Solana ecosystem..."},
                    {"title": "Solana Price Analysis", "url": "https://example.com/solana-price", "description": "Current market analysis for SOL..."}
                ],
                "totalResults": 2
            }),
            explanation: "Successfully searched for Solana blockchain news and returned relevant results".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The search query to look up on the web"
                },
                "count": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_COUNT,
                    "description": "Number of results to return (default 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, _ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let query = str_arg(&args, "query")?;
        let count = args
            .get("count")
            .and_then(|v| v.as_u64())
            .map_or(DEFAULT_COUNT, |c| (c as usize).min(MAX_COUNT));
        let action = format!("Searching the web for {query}");

        let outcome = journaled(self.journal.as_ref(), &action, false, async {
            let mut results = self.search.search(query, count).await?;
            results.truncate(count);
            let total = results.len();
            Ok(ActionReport::new(json!({
                "query": query,
                "results": results,
                "totalResults": total,
            }))
            .with_summary(format!("Found {total} results")))
        })
        .await;

        Ok(outcome)
    }
}
