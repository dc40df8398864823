//! Stub collaborators shared by the tool tests.

use crate::context::ToolContext;
use crate::ports::{
    BalanceSnapshot, Bounty, BountyBoard, ExecutionReceipt, ExecutionService, PostReceipt,
    SocialService, TokenHolding, TokenInfo, TokenLaunch, TokenSearch, WalletService, WebResult,
    WebSearch,
};
use async_trait::async_trait;
use std::sync::Mutex;

pub fn ctx() -> ToolContext {
    ToolContext::new("cycle-test", "AgentWa11et")
}

pub struct StubWallet {
    pub snapshot: Mutex<BalanceSnapshot>,
    pub fail: bool,
}

impl StubWallet {
    pub fn holding(native: f64, tokens: &[(&str, f64)]) -> Self {
        let tokens = tokens
            .iter()
            .map(|(mint, amount)| TokenHolding {
                mint: (*mint).to_string(),
                amount: *amount,
            })
            .collect();
        Self {
            snapshot: Mutex::new(BalanceSnapshot::new(native, tokens)),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            snapshot: Mutex::new(BalanceSnapshot::default()),
            fail: true,
        }
    }
}

#[async_trait]
impl WalletService for StubWallet {
    async fn balances(&self, _owner: &str) -> anyhow::Result<BalanceSnapshot> {
        if self.fail {
            anyhow::bail!("balance service unavailable");
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

/// Records every request and answers with a fixed receipt.
pub struct StubExecution {
    pub receipt: ExecutionReceipt,
    pub calls: Mutex<Vec<String>>,
}

impl StubExecution {
    pub fn succeeding(resulting_amount: f64) -> Self {
        Self {
            receipt: ExecutionReceipt {
                success: true,
                resulting_amount: Some(resulting_amount),
                signature: Some("5igNaTuRe".into()),
                mint: Some("NewM1nt".into()),
                error: None,
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            receipt: ExecutionReceipt {
                success: false,
                resulting_amount: None,
                signature: None,
                mint: None,
                error: Some(reason.to_string()),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> anyhow::Result<ExecutionReceipt> {
        self.calls.lock().unwrap().push(call);
        Ok(self.receipt.clone())
    }
}

#[async_trait]
impl ExecutionService for StubExecution {
    async fn transfer(&self, to_address: &str, amount: f64) -> anyhow::Result<ExecutionReceipt> {
        self.record(format!("transfer {to_address} {amount}"))
    }

    async fn buy(&self, mint: &str, amount_native: f64) -> anyhow::Result<ExecutionReceipt> {
        self.record(format!("buy {mint} {amount_native}"))
    }

    async fn sell(&self, mint: &str, amount: f64) -> anyhow::Result<ExecutionReceipt> {
        self.record(format!("sell {mint} {amount}"))
    }

    async fn swap(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: f64,
    ) -> anyhow::Result<ExecutionReceipt> {
        self.record(format!("swap {input_mint} {output_mint} {amount}"))
    }

    async fn launch(
        &self,
        token: &TokenLaunch,
        amount_native: f64,
    ) -> anyhow::Result<ExecutionReceipt> {
        self.record(format!("launch {} {amount_native}", token.symbol))
    }
}

pub struct StubTokenSearch {
    pub results: Vec<TokenInfo>,
}

impl StubTokenSearch {
    pub fn with_count(n: usize) -> Self {
        let results = (0..n)
            .map(|i| TokenInfo {
                mint_address: format!("Mint{i}"),
                name: format!("Token {i}"),
                symbol: format!("T{i}"),
                usd_price: Some(1.0 + i as f64),
                mcap: None,
                holder_count: Some(10),
                total_supply: None,
            })
            .collect();
        Self { results }
    }
}

#[async_trait]
impl TokenSearch for StubTokenSearch {
    async fn search(&self, _query: &str) -> anyhow::Result<Vec<TokenInfo>> {
        Ok(self.results.clone())
    }
}

pub struct StubSocial {
    pub receipt: PostReceipt,
    pub posts: Mutex<Vec<String>>,
}

impl StubSocial {
    pub fn accepting() -> Self {
        Self {
            receipt: PostReceipt {
                success: true,
                id: Some("1346889436626259968".into()),
                url: Some("https://x.com/i/status/1346889436626259968".into()),
                error: None,
            },
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            receipt: PostReceipt {
                success: false,
                id: None,
                url: None,
                error: Some(reason.to_string()),
            },
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialService for StubSocial {
    async fn post(&self, text: &str) -> anyhow::Result<PostReceipt> {
        self.posts.lock().unwrap().push(text.to_string());
        Ok(self.receipt.clone())
    }
}

pub struct StubWebSearch {
    pub requested: Mutex<Vec<(String, usize)>>,
}

impl StubWebSearch {
    pub fn new() -> Self {
        Self {
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WebSearch for StubWebSearch {
    async fn search(&self, query: &str, count: usize) -> anyhow::Result<Vec<WebResult>> {
        self.requested
            .lock()
            .unwrap()
            .push((query.to_string(), count));
        Ok((0..count)
            .map(|i| WebResult {
                title: format!("{query} #{i}"),
                url: format!("https://example.com/{i}"),
                description: String::new(),
                published: None,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct StubBountyBoard {
    pub posted: Mutex<Vec<Bounty>>,
}

#[async_trait]
impl BountyBoard for StubBountyBoard {
    async fn post(&self, bounty: &Bounty) -> anyhow::Result<()> {
        self.posted.lock().unwrap().push(bounty.clone());
        Ok(())
    }
}
