//! Token swap at market price.

use super::{amount_arg, journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::{ExecutionService, NATIVE_MINT};
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::Journal;

pub struct TradeTool {
    execution: Arc<dyn ExecutionService>,
    journal: Arc<dyn Journal>,
}

impl TradeTool {
    pub fn new(execution: Arc<dyn ExecutionService>, journal: Arc<dyn Journal>) -> Self {
        Self { execution, journal }
    }
}

#[async_trait]
impl Tool for TradeTool {
    fn name(&self) -> &str {
        "TRADE_TOKENS"
    }

    fn description(&self) -> &str {
        "Trade tokens on the solana blockchain using Jupiter. You can swap tokens for other tokens at current market price."
    }

    fn similes(&self) -> &[&'static str] {
        &["trade tokens", "buy tokens", "sell tokens", "swap tokens"]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({
                "inputMint": NATIVE_MINT,
                "outputMint": "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm",
                "inputAmount": "0.1"
            }),
            output: json!({
                "status": "success",
                "inputMint": NATIVE_MINT,
                "inputAmount": "0.1",
                "outputMint": "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm",
                "outputAmount": 1274698
            }),
            explanation: "Swap 0.1 SOL for 1274698 WIF".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "inputMint": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The token mint address of the token you want to swap"
                },
                "outputMint": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The token mint address of the token you want to swap to"
                },
                "inputAmount": {
                    "type": "string",
                    "description": "The amount of the input token to swap (in SOL for SOL)"
                }
            },
            "required": ["inputMint", "outputMint", "inputAmount"]
        })
    }

    async fn execute(&self, _ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let input_mint = str_arg(&args, "inputMint")?;
        let output_mint = str_arg(&args, "outputMint")?;
        let raw_amount = str_arg(&args, "inputAmount")?;
        let action = format!("Trading {raw_amount} of {input_mint} for {output_mint}");

        let outcome = journaled(self.journal.as_ref(), &action, true, async {
            let amount = amount_arg(raw_amount, "inputAmount")?;
            if input_mint == output_mint {
                anyhow::bail!("input and output mint are the same");
            }

            let receipt = self.execution.swap(input_mint, output_mint, amount).await?;
            if !receipt.success {
                anyhow::bail!(receipt.failure_reason());
            }

            let mut report = ActionReport::new(json!({
                "inputMint": input_mint,
                "inputAmount": raw_amount,
                "outputMint": output_mint,
                "outputAmount": receipt.resulting_amount,
                "signature": receipt.signature,
            }));
            if let Some(received) = receipt.resulting_amount {
                report = report.with_summary(format!("Received {received} of {output_mint}"));
            }
            Ok(report)
        })
        .await;

        Ok(outcome)
    }
}
