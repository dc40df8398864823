//! Pump.fun purchase with the native asset.

use super::{amount_arg, journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::{ExecutionService, WalletService};
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::{Journal, TokenWhitelist};

pub struct BuyTool {
    execution: Arc<dyn ExecutionService>,
    wallet: Arc<dyn WalletService>,
    whitelist: Arc<dyn TokenWhitelist>,
    journal: Arc<dyn Journal>,
}

impl BuyTool {
    pub fn new(
        execution: Arc<dyn ExecutionService>,
        wallet: Arc<dyn WalletService>,
        whitelist: Arc<dyn TokenWhitelist>,
        journal: Arc<dyn Journal>,
    ) -> Self {
        Self {
            execution,
            wallet,
            whitelist,
            journal,
        }
    }
}

#[async_trait]
impl Tool for BuyTool {
    fn name(&self) -> &str {
        "BUY_PUMPFUN_TOKEN"
    }

    fn description(&self) -> &str {
        "Buy an existing token on Pump.fun using SOL. This allows you to invest in memecoins and build your position."
    }

    fn similes(&self) -> &[&'static str] {
        &["buy pumpfun token", "buy memecoin"]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"mintAddress": "ABC123...", "buyAmountSol": "0.05"}),
            output: json!({
                "status": "success",
                "mintAddress": "ABC123...",
                "buyAmountSol": "0.05",
                "newTokenBalance": 1000000,
                "newSolBalance": 5.43,
                "signature": "XYZ789..."
            }),
            explanation: "Successfully bought ABC123... mint tokens with 0.05 SOL resulting in a new SOL balance of 5.43 and new ABC123... mint token balance of 1000000".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "mintAddress": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The mint address of the token to buy"
                },
                "buyAmountSol": {
                    "type": "string",
                    "description": "Amount of SOL to spend buying the token"
                }
            },
            "required": ["mintAddress", "buyAmountSol"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let mint = str_arg(&args, "mintAddress")?;
        let raw_amount = str_arg(&args, "buyAmountSol")?;
        let action = format!("Buying pump.fun token {mint} with {raw_amount} SOL");

        let outcome = journaled(self.journal.as_ref(), &action, true, async {
            let amount = amount_arg(raw_amount, "buyAmountSol")?;
            let receipt = self.execution.buy(mint, amount).await?;
            if !receipt.success {
                anyhow::bail!(receipt.failure_reason());
            }
            if let Err(e) = self.whitelist.add(mint).await {
                tracing::warn!(mint = %mint, error = %e, "Could not whitelist bought token");
            }

            // Post-trade balances are informational; the buy already settled.
            let (token_balance, sol_balance) =
                match self.wallet.balances(&ctx.wallet_address).await {
                    Ok(snapshot) => (
                        Some(snapshot.token_amount(mint)),
                        Some(snapshot.native_amount),
                    ),
                    Err(e) => {
                        tracing::warn!(mint = %mint, error = %e, "Could not refresh balances after buy");
                        (None, None)
                    }
                };

            let mut report = ActionReport::new(json!({
                "mintAddress": mint,
                "buyAmountSol": raw_amount,
                "newTokenBalance": token_balance,
                "newSolBalance": sol_balance,
                "signature": receipt.signature,
            }));
            if let Some(balance) = token_balance {
                report = report.with_summary(format!("New token balance is {balance} tokens"));
            }
            Ok(report)
        })
        .await;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{ctx, StubExecution, StubWallet};
    use vigil_ledger::InMemoryLedger;

    #[tokio::test]
    async fn buy_reports_new_balances() {
        let ledger = Arc::new(InMemoryLedger::new());
        let execution = Arc::new(StubExecution::succeeding(0.05));
        let wallet = Arc::new(StubWallet::holding(5.43, &[("ABC", 1000.0)]));
        let tool = BuyTool::new(execution.clone(), wallet, ledger.clone(), ledger.clone());

        let outcome = tool
            .execute(&ctx(), json!({"mintAddress": "ABC", "buyAmountSol": "0.05"}))
            .await
            .unwrap();
        let ToolOutcome::Success { payload } = outcome else {
            panic!("expected success");
        };
        assert_eq!(payload["newTokenBalance"], 1000.0);
        assert_eq!(payload["newSolBalance"], 5.43);
        assert_eq!(execution.calls(), vec!["buy ABC 0.05"]);

        let entries = ledger.journal_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text,
            "[TOOL] Buying pump.fun token ABC with 0.05 SOL, result: success. New token balance is 1000 tokens"
        );
        assert_eq!(TokenWhitelist::list(ledger.as_ref()).await.unwrap(), vec!["ABC"]);
    }

    #[tokio::test]
    async fn balance_refresh_failure_keeps_success() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = BuyTool::new(
            Arc::new(StubExecution::succeeding(0.05)),
            Arc::new(StubWallet::failing()),
            ledger.clone(),
            ledger.clone(),
        );

        let outcome = tool
            .execute(&ctx(), json!({"mintAddress": "ABC", "buyAmountSol": "0.05"}))
            .await
            .unwrap();
        assert!(outcome.is_success());
        let entries = ledger.journal_entries().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.ends_with("result: success"));
    }

    #[tokio::test]
    async fn failed_buy_journals_once() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = BuyTool::new(
            Arc::new(StubExecution::rejecting("slippage exceeded")),
            Arc::new(StubWallet::holding(1.0, &[])),
            ledger.clone(),
            ledger.clone(),
        );

        let outcome = tool
            .execute(&ctx(), json!({"mintAddress": "ABC", "buyAmountSol": "0.05"}))
            .await
            .unwrap();
        assert_eq!(outcome.error_message(), Some("slippage exceeded"));
        assert_eq!(ledger.journal_entries().await.len(), 1);
        assert!(TokenWhitelist::list(ledger.as_ref()).await.unwrap().is_empty());
    }
}
