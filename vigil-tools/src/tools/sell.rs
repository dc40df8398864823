//! Pump.fun sale back into the native asset.

use super::{amount_arg, journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::{ExecutionService, WalletService};
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::Journal;

pub struct SellTool {
    execution: Arc<dyn ExecutionService>,
    wallet: Arc<dyn WalletService>,
    journal: Arc<dyn Journal>,
}

impl SellTool {
    pub fn new(
        execution: Arc<dyn ExecutionService>,
        wallet: Arc<dyn WalletService>,
        journal: Arc<dyn Journal>,
    ) -> Self {
        Self {
            execution,
            wallet,
            journal,
        }
    }
}

#[async_trait]
impl Tool for SellTool {
    fn name(&self) -> &str {
        "SELL_PUMPFUN_TOKEN"
    }

    fn description(&self) -> &str {
        "Sell tokens on Pump.fun to receive SOL. You cannot sell more than you own and they are in normal units, not raw units."
    }

    fn similes(&self) -> &[&'static str] {
        &["sell pumpfun token", "exit pumpfun position", "sell memecoin"]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"mintAddress": "ABC123...", "sellAmount": "1000"}),
            output: json!({
                "status": "success",
                "mintAddress": "ABC123...",
                "sellAmount": "1000",
                "solReceived": 0.06,
                "newSolBalance": 5.43,
                "signature": "XYZ789..."
            }),
            explanation: "Successfully sold 1,000 ABC123... tokens for 0.06 SOL resulting in a new SOL balance of 5.43".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "mintAddress": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The mint address of the token to sell"
                },
                "sellAmount": {
                    "type": "string",
                    "description": "Amount of tokens to sell"
                }
            },
            "required": ["mintAddress", "sellAmount"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let mint = str_arg(&args, "mintAddress")?;
        let raw_amount = str_arg(&args, "sellAmount")?;
        let action = format!("Selling pump.fun token {mint} with {raw_amount} tokens");

        let outcome = journaled(self.journal.as_ref(), &action, true, async {
            let amount = amount_arg(raw_amount, "sellAmount")?;
            let receipt = self.execution.sell(mint, amount).await?;
            if !receipt.success {
                anyhow::bail!(receipt.failure_reason());
            }

            let sol_balance = match self.wallet.balances(&ctx.wallet_address).await {
                Ok(snapshot) => Some(snapshot.native_amount),
                Err(e) => {
                    tracing::warn!(mint = %mint, error = %e, "Could not refresh balances after sell");
                    None
                }
            };

            let mut report = ActionReport::new(json!({
                "mintAddress": mint,
                "sellAmount": raw_amount,
                "solReceived": receipt.resulting_amount,
                "newSolBalance": sol_balance,
                "signature": receipt.signature,
            }));
            if let Some(received) = receipt.resulting_amount {
                report = report.with_summary(format!("Received {received} SOL"));
            }
            Ok(report)
        })
        .await;

        Ok(outcome)
    }
}
