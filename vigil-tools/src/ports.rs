//! External collaborators the tools act through.
//!
//! Each trait is a request/response contract; concrete clients live in the
//! daemon. Failed business outcomes (a rejected trade, a refused post) come
//! back as receipts with `success == false`, transport problems as `Err`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Mint address of wrapped SOL, used to label the native asset.
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// Amount held of one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub mint: String,
    pub amount: f64,
}

/// Wallet holdings at one instant. Fetched fresh each cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub native_amount: f64,
    /// Ordered by mint
    #[serde(default)]
    pub tokens: Vec<TokenHolding>,
}

impl BalanceSnapshot {
    pub fn new(native_amount: f64, mut tokens: Vec<TokenHolding>) -> Self {
        tokens.sort_by(|a, b| a.mint.cmp(&b.mint));
        Self {
            native_amount,
            tokens,
        }
    }

    /// Amount of `mint` held, zero when absent.
    pub fn token_amount(&self, mint: &str) -> f64 {
        if mint == NATIVE_MINT {
            return self.native_amount;
        }
        self.tokens
            .iter()
            .find(|t| t.mint == mint)
            .map_or(0.0, |t| t.amount)
    }
}

#[async_trait]
pub trait WalletService: Send + Sync {
    async fn balances(&self, owner: &str) -> anyhow::Result<BalanceSnapshot>;
}

/// Outcome reported by the execution service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReceipt {
    pub success: bool,
    /// Amount received (sell, swap) or sent (transfer, buy)
    #[serde(default)]
    pub resulting_amount: Option<f64>,
    #[serde(default)]
    pub signature: Option<String>,
    /// Mint created by a launch
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionReceipt {
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "execution service reported failure".to_string())
    }
}

/// Metadata for a token the agent creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLaunch {
    pub name: String,
    pub symbol: String,
    pub description: String,
}

/// Transfers and trades signed on the agent's behalf.
///
/// Never retried automatically; a failure is reported once.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    async fn transfer(&self, to_address: &str, amount: f64) -> anyhow::Result<ExecutionReceipt>;

    async fn buy(&self, mint: &str, amount_native: f64) -> anyhow::Result<ExecutionReceipt>;

    async fn sell(&self, mint: &str, amount: f64) -> anyhow::Result<ExecutionReceipt>;

    async fn swap(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: f64,
    ) -> anyhow::Result<ExecutionReceipt>;

    /// Create a new pump.fun token and buy into it. The receipt names the new mint.
    async fn launch(
        &self,
        token: &TokenLaunch,
        amount_native: f64,
    ) -> anyhow::Result<ExecutionReceipt>;
}

/// Market data for one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub mint_address: String,
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub usd_price: Option<f64>,
    #[serde(default)]
    pub mcap: Option<f64>,
    #[serde(default)]
    pub holder_count: Option<u64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
}

#[async_trait]
pub trait TokenSearch: Send + Sync {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<TokenInfo>>;
}

/// Outcome reported by the social service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[async_trait]
pub trait SocialService: Send + Sync {
    async fn post(&self, text: &str) -> anyhow::Result<PostReceipt>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: Option<String>,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> anyhow::Result<Vec<WebResult>>;
}

/// Request for outside help, paid in the native asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    pub id: String,
    pub tool_description: String,
    pub amount: f64,
    pub requirements: String,
    pub posted_by: String,
}

#[async_trait]
pub trait BountyBoard: Send + Sync {
    async fn post(&self, bounty: &Bounty) -> anyhow::Result<()>;
}
