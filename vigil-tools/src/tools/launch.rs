//! New pump.fun token, created and bought in one go.

use super::{amount_arg, journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::{ExecutionService, TokenLaunch, WalletService};
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::{Journal, TokenWhitelist};

pub struct LaunchTool {
    execution: Arc<dyn ExecutionService>,
    wallet: Arc<dyn WalletService>,
    whitelist: Arc<dyn TokenWhitelist>,
    journal: Arc<dyn Journal>,
}

impl LaunchTool {
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
impl Tool for LaunchTool {
    fn name(&self) -> &str {
        "LAUNCH_PUMPFUN_TOKEN"
    }

    fn description(&self) -> &str {
        "Create a new token on Pump.fun and buy it with SOL. This launches a new memecoin that you can trade."
    }

    fn similes(&self) -> &[&'static str] {
        &["launch pumpfun token", "start memecoin", "start new token"]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({
                "tokenName": "MyMemecoin",
                "tokenSymbol": "MEME",
                "tokenDescription": "MyMemecoin is a memecoin that I want to launch",
                "buyAmountSol": "0.1"
            }),
            output: json!({
                "status": "success",
                "mintAddress": "ABC123...",
                "tokenName": "MyMemecoin",
                "tokenSymbol": "MEME",
                "buyAmountSol": "0.1",
                "newSolBalance": 5.43,
                "signature": "XYZ789...",
                "tokenBalance": 1000
            }),
            explanation: "Successfully created and bought a new token called MyMemecoin resulting in a new SOL balance of 5.43 and 1000 MyMemecoin tokens".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tokenName": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The name of the token to create"
                },
                "tokenSymbol": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The symbol/ticker of the token"
                },
                "tokenDescription": {
                    "type": "string",
                    "description": "The description of the token"
                },
                "buyAmountSol": {
                    "type": "string",
                    "description": "Amount of SOL to spend buying the token"
                }
            },
            "required": ["tokenName", "tokenSymbol", "tokenDescription", "buyAmountSol"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let token = TokenLaunch {
            name: str_arg(&args, "tokenName")?.to_string(),
            symbol: str_arg(&args, "tokenSymbol")?.to_string(),
            description: str_arg(&args, "tokenDescription")?.to_string(),
        };
        let raw_amount = str_arg(&args, "buyAmountSol")?;
        let action = format!(
            "Creating pump.fun token {} with symbol {} and description {} and buying it with {raw_amount} SOL",
            token.name, token.symbol, token.description
        );

        let outcome = journaled(self.journal.as_ref(), &action, true, async {
            let amount = amount_arg(raw_amount, "buyAmountSol")?;
            let receipt = self.execution.launch(&token, amount).await?;
            if !receipt.success {
                anyhow::bail!(receipt.failure_reason());
            }

            let token_balance = match receipt.mint {
                Some(ref mint) => {
                    if let Err(e) = self.whitelist.add(mint).await {
                        tracing::warn!(mint = %mint, error = %e, "Could not whitelist launched token");
                    }
                    match self.wallet.balances(&ctx.wallet_address).await {
                        Ok(snapshot) => Some(snapshot.token_amount(mint)),
                        Err(e) => {
                            tracing::warn!(mint = %mint, error = %e, "Could not refresh balances after launch");
                            None
                        }
                    }
                }
                None => {
                    tracing::warn!(symbol = %token.symbol, "Launch settled without reporting a mint");
                    None
                }
            };

            let mut report = ActionReport::new(json!({
                "mintAddress": receipt.mint,
                "tokenName": &token.name,
                "tokenSymbol": &token.symbol,
                "buyAmountSol": raw_amount,
                "tokenBalance": token_balance,
                "signature": receipt.signature,
            }));
            if let Some(balance) = token_balance {
                report = report.with_summary(format!("Received {balance} tokens"));
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

    fn args(amount: &str) -> Value {
        json!({
            "tokenName": "Vigil",
            "tokenSymbol": "VGL",
            "tokenDescription": "Stays awake",
            "buyAmountSol": amount
        })
    }

    #[tokio::test]
    async fn launch_whitelists_new_mint() {
        let ledger = Arc::new(InMemoryLedger::new());
        let execution = Arc::new(StubExecution::succeeding(0.1));
        let tool = LaunchTool::new(
            execution.clone(),
            Arc::new(StubWallet::holding(2.0, &[("NewM1nt", 1000.0)])),
            ledger.clone(),
            ledger.clone(),
        );

        let outcome = tool.execute(&ctx(), args("0.1")).await.unwrap();
        let ToolOutcome::Success { payload } = outcome else {
            panic!("expected success");
        };
        assert_eq!(payload["mintAddress"], "NewM1nt");
        assert_eq!(payload["tokenBalance"], 1000.0);
        assert_eq!(execution.calls(), vec!["launch VGL 0.1"]);
        assert_eq!(TokenWhitelist::list(ledger.as_ref()).await.unwrap(), vec!["NewM1nt"]);

        let entries = ledger.journal_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text,
            "[TOOL] Creating pump.fun token Vigil with symbol VGL and description Stays awake and buying it with 0.1 SOL, result: success. Received 1000 tokens"
        );
        assert!(entries[0].publication_worthy);
    }

    #[tokio::test]
    async fn bad_amount_never_reaches_executor() {
        let ledger = Arc::new(InMemoryLedger::new());
        let execution = Arc::new(StubExecution::succeeding(0.1));
        let tool = LaunchTool::new(
            execution.clone(),
            Arc::new(StubWallet::holding(2.0, &[])),
            ledger.clone(),
            ledger.clone(),
        );

        let outcome = tool.execute(&ctx(), args("-1")).await.unwrap();
        assert!(!outcome.is_success());
        assert!(execution.calls().is_empty());
        assert_eq!(ledger.journal_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn rejected_launch_is_not_whitelisted() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = LaunchTool::new(
            Arc::new(StubExecution::rejecting("insufficient funds")),
            Arc::new(StubWallet::holding(0.05, &[])),
            ledger.clone(),
            ledger.clone(),
        );

        let outcome = tool.execute(&ctx(), args("0.1")).await.unwrap();
        assert_eq!(outcome.error_message(), Some("insufficient funds"));
        assert!(TokenWhitelist::list(ledger.as_ref()).await.unwrap().is_empty());
        assert!(ledger.journal_entries().await[0].text.ends_with("result: failed (insufficient funds)"));
    }
}
