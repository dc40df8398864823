//! Signing executor: transfers and trades on the agent's wallet.
//!
//! The executor holds the key and talks to the chain; this client only
//! forwards requests. Calls are never retried here.

use super::send_checked;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use vigil_common::http::{build_client, join_url, read_json};
use vigil_tools::{ExecutionReceipt, ExecutionService, TokenLaunch};

pub struct ExecutorClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExecutorClient {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Option<Duration>,
    ) -> vigil_common::Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.map(String::from),
            client: build_client(timeout)?,
        })
    }

    fn add_auth_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn execute(&self, operation: &str, body: &impl Serialize) -> anyhow::Result<ExecutionReceipt> {
        let url = join_url(&self.base_url, &format!("{operation}/"));
        let request = self.add_auth_headers(self.client.post(&url).json(body));
        let response = send_checked("executor", request).await?;
        let receipt: ExecutionReceipt = read_json(response).await?;

        tracing::info!(
            operation,
            success = receipt.success,
            signature = receipt.signature.as_deref().unwrap_or("-"),
            "Executor request settled"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl ExecutionService for ExecutorClient {
    async fn transfer(&self, to_address: &str, amount: f64) -> anyhow::Result<ExecutionReceipt> {
        self.execute("transfer", &json!({"toAddress": to_address, "amount": amount}))
            .await
    }

    async fn buy(&self, mint: &str, amount_native: f64) -> anyhow::Result<ExecutionReceipt> {
        self.execute("buy", &json!({"mint": mint, "amountSol": amount_native}))
            .await
    }

    async fn sell(&self, mint: &str, amount: f64) -> anyhow::Result<ExecutionReceipt> {
        self.execute("sell", &json!({"mint": mint, "amount": amount}))
            .await
    }

    async fn swap(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: f64,
    ) -> anyhow::Result<ExecutionReceipt> {
        self.execute(
            "swap",
            &json!({"inputMint": input_mint, "outputMint": output_mint, "amount": amount}),
        )
        .await
    }

    async fn launch(
        &self,
        token: &TokenLaunch,
        amount_native: f64,
    ) -> anyhow::Result<ExecutionReceipt> {
        self.execute(
            "launch",
            &json!({
                "name": token.name,
                "symbol": token.symbol,
                "description": token.description,
                "amountSol": amount_native
            }),
        )
        .await
    }
}
