//! Wallet balance lookup.

use super::{journaled, ActionReport};
use crate::context::ToolContext;
use crate::ports::{WalletService, NATIVE_MINT};
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_ledger::Journal;

/// Reports the native balance and every token holding of the agent's wallet.
pub struct BalancesTool {
    wallet: Arc<dyn WalletService>,
    journal: Arc<dyn Journal>,
}

impl BalancesTool {
    pub fn new(wallet: Arc<dyn WalletService>, journal: Arc<dyn Journal>) -> Self {
        Self { wallet, journal }
    }
}

#[async_trait]
impl Tool for BalancesTool {
    fn name(&self) -> &str {
        "CHECK_BALANCES"
    }

    fn description(&self) -> &str {
        "Get all token balances including SOL balance and SPL token balances."
    }

    fn similes(&self) -> &[&'static str] {
        &[
            "get token balances",
            "get wallet balances",
            "check token holdings",
        ]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({}),
            output: json!([
                {"tokenMint": NATIVE_MINT, "amount": "1.234567"},
                {"tokenMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "amount": "100"}
            ]),
            explanation: "Got SOL balance and USDC balance".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, ctx: &ToolContext, _args: Value) -> anyhow::Result<ToolOutcome> {
        let outcome = journaled(self.journal.as_ref(), "Getting balances", false, async {
            let snapshot = self.wallet.balances(&ctx.wallet_address).await?;

            let mut holdings = vec![json!({
                "tokenMint": NATIVE_MINT,
                "amount": snapshot.native_amount.to_string(),
            })];
            holdings.extend(snapshot.tokens.iter().map(|t| {
                json!({
                    "tokenMint": t.mint,
                    "amount": t.amount.to_string(),
                })
            }));

            Ok(ActionReport::new(Value::Array(holdings)))
        })
        .await;

        Ok(outcome)
    }
}
