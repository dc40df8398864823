//! Replacement of the memory blob. The only writer of memory.

use super::{journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_common::util::truncate_with_ellipsis;
use vigil_ledger::{Journal, MemoryStore};

/// Memory shown in the journal line before it is cut off.
const JOURNAL_PREVIEW_CHARS: usize = 200;

pub struct EditMemoryTool {
    memory: Arc<dyn MemoryStore>,
    journal: Arc<dyn Journal>,
}

impl EditMemoryTool {
    pub fn new(memory: Arc<dyn MemoryStore>, journal: Arc<dyn Journal>) -> Self {
        Self { memory, journal }
    }
}

#[async_trait]
impl Tool for EditMemoryTool {
    fn name(&self) -> &str {
        "EDIT_MEMORY"
    }

    fn description(&self) -> &str {
        "Edit your memory. This will FULLY REPLACE your memory with the new memory so make sure to include everything from your current memory you would like to remember"
    }

    fn similes(&self) -> &[&'static str] {
        &["edit memory", "add to memory"]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"memory": "Your full memory"}),
            output: json!({"status": "success"}),
            explanation: "Successfully set your memory to 'Your full memory'".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory": {
                    "type": "string",
                    "description": "The string you would like to replace your memory with"
                }
            },
            "required": ["memory"]
        })
    }

    async fn execute(&self, _ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let memory = str_arg(&args, "memory")?;
        let action = format!(
            "Editing memory to: {}",
            truncate_with_ellipsis(memory, JOURNAL_PREVIEW_CHARS)
        );

        let outcome = journaled(self.journal.as_ref(), &action, false, async {
            self.memory.replace(memory).await?;
            Ok(ActionReport::new(json!({"chars": memory.chars().count()})))
        })
        .await;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::ctx;
    use vigil_ledger::InMemoryLedger;

    #[tokio::test]
    async fn replaces_whole_blob() {
        let ledger = Arc::new(InMemoryLedger::with_memory("old notes"));
        let tool = EditMemoryTool::new(ledger.clone(), ledger.clone());

        let outcome = tool
            .execute(&ctx(), json!({"memory": "new notes"}))
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(ledger.get().await.unwrap(), "new notes");

        let entries = ledger.journal_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text,
            "[TOOL] Editing memory to: new notes, result: success"
        );
    }

    #[tokio::test]
    async fn empty_memory_is_allowed() {
        let ledger = Arc::new(InMemoryLedger::with_memory("something"));
        let tool = EditMemoryTool::new(ledger.clone(), ledger.clone());

        tool.execute(&ctx(), json!({"memory": ""})).await.unwrap();
        assert_eq!(ledger.get().await.unwrap(), "");
    }

    #[tokio::test]
    async fn long_memory_is_cut_in_journal_only() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = EditMemoryTool::new(ledger.clone(), ledger.clone());
        let long = "m".repeat(500);

        tool.execute(&ctx(), json!({"memory": long})).await.unwrap();
        assert_eq!(ledger.get().await.unwrap().len(), 500);
        let entries = ledger.journal_entries().await;
        assert!(entries[0].text.len() < 300);
    }
}
