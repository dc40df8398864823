//! Jupiter Ultra API: wallet balances and token search.

use super::send_checked;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use vigil_common::http::{build_client, join_url, read_json};
use vigil_tools::{BalanceSnapshot, TokenHolding, TokenInfo, TokenSearch, WalletService};

/// Key Jupiter uses for the native asset in balance responses.
const NATIVE_KEY: &str = "SOL";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceEntry {
    ui_amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    usd_price: Option<f64>,
    #[serde(default)]
    mcap: Option<f64>,
    #[serde(default)]
    holder_count: Option<u64>,
    #[serde(default)]
    total_supply: Option<f64>,
}

impl From<SearchEntry> for TokenInfo {
    fn from(entry: SearchEntry) -> Self {
        Self {
            mint_address: entry.id,
            name: entry.name,
            symbol: entry.symbol.unwrap_or_default(),
            usd_price: entry.usd_price,
            mcap: entry.mcap,
            holder_count: entry.holder_count,
            total_supply: entry.total_supply,
        }
    }
}

pub struct JupiterClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl JupiterClient {
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
            Some(ref key) => request.header("x-api-key", key.as_str()),
            None => request,
        }
    }
}

#[async_trait]
impl WalletService for JupiterClient {
    async fn balances(&self, owner: &str) -> anyhow::Result<BalanceSnapshot> {
        let url = join_url(&self.base_url, &format!("ultra/v1/balances/{owner}"));
        let request = self.add_auth_headers(self.client.get(&url));
        let response = send_checked("jupiter", request).await?;

        let entries: HashMap<String, BalanceEntry> = read_json(response).await?;

        let mut native = 0.0;
        let mut tokens = Vec::with_capacity(entries.len());
        for (mint, entry) in entries {
            if mint == NATIVE_KEY {
                native = entry.ui_amount;
            } else {
                tokens.push(TokenHolding {
                    mint,
                    amount: entry.ui_amount,
                });
            }
        }

        tracing::debug!(owner = %owner, native, tokens = tokens.len(), "Fetched balances");
        Ok(BalanceSnapshot::new(native, tokens))
    }
}

#[async_trait]
impl TokenSearch for JupiterClient {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<TokenInfo>> {
        let url = join_url(&self.base_url, "ultra/v1/search");
        let request = self.add_auth_headers(self.client.get(&url).query(&[("query", query)]));
        let response = send_checked("jupiter", request).await?;

        let entries: Vec<SearchEntry> = read_json(response).await?;
        Ok(entries.into_iter().map(TokenInfo::from).collect())
    }
}
