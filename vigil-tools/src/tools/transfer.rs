//! Native asset transfer.

use super::{amount_arg, journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::ExecutionService;
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::Journal;

pub struct TransferTool {
    execution: Arc<dyn ExecutionService>,
    journal: Arc<dyn Journal>,
}

impl TransferTool {
    pub fn new(execution: Arc<dyn ExecutionService>, journal: Arc<dyn Journal>) -> Self {
        Self { execution, journal }
    }
}

#[async_trait]
impl Tool for TransferTool {
    fn name(&self) -> &str {
        "TRANSFER_FUNDS"
    }

    fn description(&self) -> &str {
        "Transfer SOL from your wallet to another wallet address. Transfers cannot be undone."
    }

    fn similes(&self) -> &[&'static str] {
        &["send sol", "transfer sol", "pay wallet"]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"toAddress": "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin", "amount": "0.1"}),
            output: json!({"status": "success", "amount": 0.1, "signature": "XYZ789..."}),
            explanation: "Sent 0.1 SOL to the given wallet".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "toAddress": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Wallet address to send SOL to"
                },
                "amount": {
                    "type": "string",
                    "description": "Amount of SOL to send"
                }
            },
            "required": ["toAddress", "amount"]
        })
    }

    async fn execute(&self, _ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let to_address = str_arg(&args, "toAddress")?;
        let raw_amount = str_arg(&args, "amount")?;
        let action = format!("Transferring {raw_amount} SOL to {to_address}");

        let outcome = journaled(self.journal.as_ref(), &action, true, async {
            let amount = amount_arg(raw_amount, "amount")?;
            let receipt = self.execution.transfer(to_address, amount).await?;
            if !receipt.success {
                anyhow::bail!(receipt.failure_reason());
            }

            Ok(ActionReport::new(json!({
                "toAddress": to_address,
                "amount": amount,
                "signature": receipt.signature,
            })))
        })
        .await;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{ctx, StubExecution};
    use vigil_ledger::InMemoryLedger;

    #[tokio::test]
    async fn transfers_and_journals() {
        let ledger = Arc::new(InMemoryLedger::new());
        let execution = Arc::new(StubExecution::succeeding(0.25));
        let tool = TransferTool::new(execution.clone(), ledger.clone());

        let outcome = tool
            .execute(&ctx(), json!({"toAddress": "Dest", "amount": "0.25"}))
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(execution.calls(), vec!["transfer Dest 0.25"]);

        let entries = ledger.journal_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text,
            "[TOOL] Transferring 0.25 SOL to Dest, result: success"
        );
        assert!(entries[0].publication_worthy);
    }

    #[tokio::test]
    async fn bad_amount_never_reaches_executor() {
        let ledger = Arc::new(InMemoryLedger::new());
        let execution = Arc::new(StubExecution::succeeding(0.0));
        let tool = TransferTool::new(execution.clone(), ledger.clone());

        let outcome = tool
            .execute(&ctx(), json!({"toAddress": "Dest", "amount": "-3"}))
            .await
            .unwrap();
        assert!(!outcome.is_success());
        assert!(execution.calls().is_empty());
        assert_eq!(ledger.journal_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn rejected_receipt_is_failure() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = TransferTool::new(
            Arc::new(StubExecution::rejecting("insufficient funds")),
            ledger.clone(),
        );

        let outcome = tool
            .execute(&ctx(), json!({"toAddress": "Dest", "amount": "5"}))
            .await
            .unwrap();
        assert_eq!(outcome.error_message(), Some("insufficient funds"));
        let entries = ledger.journal_entries().await;
        assert!(entries[0].text.ends_with("result: failed (insufficient funds)"));
    }
}
