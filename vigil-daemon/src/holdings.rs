//! Whitelist-filtered view of the wallet for the cycle context.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use vigil_ledger::TokenWhitelist;
use vigil_tools::{BalanceSnapshot, WalletService};

/// Keeps only tokens the agent acquired on purpose. The native balance is
/// always passed through, so the balance gate sees the real amount.
pub struct WhitelistedWallet {
    inner: Arc<dyn WalletService>,
    whitelist: Arc<dyn TokenWhitelist>,
}

impl WhitelistedWallet {
    pub fn new(inner: Arc<dyn WalletService>, whitelist: Arc<dyn TokenWhitelist>) -> Self {
        Self { inner, whitelist }
    }
}

#[async_trait]
impl WalletService for WhitelistedWallet {
    async fn balances(&self, owner: &str) -> anyhow::Result<BalanceSnapshot> {
        let snapshot = self.inner.balances(owner).await?;
        let allowed: HashSet<String> = self.whitelist.list().await?.into_iter().collect();

        let before = snapshot.tokens.len();
        let tokens: Vec<_> = snapshot
            .tokens
            .into_iter()
            .filter(|t| allowed.contains(&t.mint))
            .collect();
        if tokens.len() < before {
            tracing::debug!(hidden = before - tokens.len(), "Hid tokens not on the whitelist");
        }

        Ok(BalanceSnapshot::new(snapshot.native_amount, tokens))
    }
}
