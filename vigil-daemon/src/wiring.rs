//! Builds the cycle runner from configuration.

use crate::clients::{BraveClient, ExecutorClient, JupiterClient, TracingBountyBoard, TwitterClient};
use crate::cycle::CycleRunner;
use crate::gate::{BalanceGate, SelfFunding};
use crate::holdings::WhitelistedWallet;
use crate::publication::PublicationTrigger;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use vigil_agent::{LlmComposer, OpenAiProvider, Provider, ReactDelegate};
use vigil_common::config::Config;
use vigil_ledger::{
    InMemoryLedger, Journal, LedgerClient, MemoryStore, PublicationLog, TokenWhitelist,
};
use vigil_tools::{ExecutionService, ToolPorts, ToolRegistry, WalletService, WebSearch};

/// The ledger stores, possibly backed by one service.
#[derive(Clone)]
pub struct LedgerPorts {
    pub journal: Arc<dyn Journal>,
    pub memory: Arc<dyn MemoryStore>,
    pub publications: Arc<dyn PublicationLog>,
    pub whitelist: Arc<dyn TokenWhitelist>,
}

impl LedgerPorts {
    pub fn shared<L>(ledger: Arc<L>) -> Self
    where
        L: Journal + MemoryStore + PublicationLog + TokenWhitelist + 'static,
    {
        Self {
            journal: ledger.clone(),
            memory: ledger.clone(),
            publications: ledger.clone(),
            whitelist: ledger,
        }
    }

    /// Hosted ledger when an endpoint is configured, otherwise in process.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.endpoints.ledger.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                tracing::info!(url = %url, "Using hosted ledger");
                let client = LedgerClient::new(
                    url,
                    config.secrets.ledger_api_key.as_deref(),
                    config.network.call_timeout(),
                )
                .context("Failed to build ledger client")?;
                Ok(Self::shared(Arc::new(client)))
            }
            _ => {
                tracing::warn!("No ledger endpoint configured, state will not survive a restart");
                Ok(Self::shared(Arc::new(InMemoryLedger::new())))
            }
        }
    }
}

/// Read the delegate's system prompt. An empty file is an error.
pub fn load_system_prompt(path: &Path) -> anyhow::Result<String> {
    let prompt = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read system prompt from {}", path.display()))?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        anyhow::bail!("System prompt at {} is empty", path.display());
    }
    Ok(prompt.to_string())
}

/// Wire every collaborator and return a runner for the configured wallet.
pub fn build_runner(config: &Config, system_prompt: &str) -> anyhow::Result<CycleRunner> {
    build_runner_with(config, system_prompt, LedgerPorts::from_config(config)?)
}

pub fn build_runner_with(
    config: &Config,
    system_prompt: &str,
    ledger: LedgerPorts,
) -> anyhow::Result<CycleRunner> {
    let timeout = config.network.call_timeout();
    let endpoints = &config.endpoints;
    let secrets = &config.secrets;

    let jupiter = Arc::new(
        JupiterClient::new(&endpoints.jupiter, secrets.jupiter_api_key.as_deref(), timeout)
            .context("Failed to build Jupiter client")?,
    );

    let execution: Option<Arc<dyn ExecutionService>> = match endpoints.executor.as_deref() {
        Some(url) if !url.trim().is_empty() => Some(Arc::new(
            ExecutorClient::new(url, secrets.executor_api_key.as_deref(), timeout)
                .context("Failed to build executor client")?,
        )),
        _ => {
            tracing::warn!("No executor endpoint configured, transfers and trades are disabled");
            None
        }
    };

    let web_search: Option<Arc<dyn WebSearch>> =
        match secrets.brave_api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => Some(Arc::new(
                BraveClient::new(&endpoints.brave, key, timeout)
                    .context("Failed to build Brave client")?,
            )),
            None => None,
        };

    let social = Arc::new(
        TwitterClient::new(&endpoints.twitter, secrets.twitter_bearer_token.as_deref(), timeout)
            .context("Failed to build X client")?,
    );

    let registry = ToolRegistry::with_defaults(ToolPorts {
        journal: ledger.journal.clone(),
        memory: ledger.memory.clone(),
        publications: ledger.publications.clone(),
        whitelist: ledger.whitelist.clone(),
        wallet: jupiter.clone(),
        token_search: jupiter.clone(),
        social: social.clone(),
        bounty_board: Arc::new(TracingBountyBoard),
        execution: execution.clone(),
        web_search,
    })?;
    tracing::info!(tools = ?registry.names(), "Tool registry ready");

    let api_key = secrets
        .openai_api_key
        .as_deref()
        .context("secrets.openai_api_key is required")?;
    let provider: Arc<dyn Provider> = Arc::new(
        OpenAiProvider::from_config(&config.llm, api_key, timeout)
            .context("Failed to build LLM provider")?,
    );
    let delegate = Arc::new(ReactDelegate::new(
        provider.clone(),
        system_prompt,
        config.agent.max_steps,
    ));

    let mut gate = BalanceGate::new(config.agent.solvency_threshold, ledger.journal.clone());
    let funding = &config.agent.self_funding;
    if funding.enabled {
        match (funding.address.as_deref(), execution.clone()) {
            (Some(address), Some(execution)) if !address.is_empty() => {
                gate = gate.with_self_funding(SelfFunding {
                    address: address.to_string(),
                    amount: funding.amount,
                    execution,
                });
            }
            _ => tracing::warn!(
                "Self-funding is enabled but needs both an address and an executor, skipping"
            ),
        }
    }

    let holdings: Arc<dyn WalletService> = if config.agent.whitelist_holdings {
        Arc::new(WhitelistedWallet::new(jupiter, ledger.whitelist.clone()))
    } else {
        jupiter
    };

    let mut runner = CycleRunner::new(
        config.agent.wallet_address.clone(),
        holdings,
        ledger.journal.clone(),
        ledger.memory.clone(),
        gate,
        Arc::new(registry),
        delegate,
        config.agent.cycle_interval(),
    );

    if config.publication.enabled {
        let composer = Arc::new(LlmComposer::new(provider, config.publication.max_chars));
        runner = runner.with_publication_trigger(PublicationTrigger::new(
            ledger.journal,
            ledger.publications,
            composer,
            social,
            config.publication.cooldown(),
            config.publication.max_chars,
        ));
    }

    Ok(runner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.agent.wallet_address = "AgentWa11et".into();
        config.secrets.openai_api_key = Some("sk-test".into());
        config
    }

    #[test]
    fn prompt_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  You are a wallet agent.  ").unwrap();
        let prompt = load_system_prompt(file.path()).unwrap();
        assert_eq!(prompt, "You are a wallet agent.");
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_system_prompt(file.path()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn missing_prompt_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let err = load_system_prompt(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.txt"));
    }

    #[test]
    fn builds_without_optional_services() {
        let config = test_config();
        let ledger = LedgerPorts::shared(Arc::new(InMemoryLedger::new()));
        assert!(build_runner_with(&config, "prompt", ledger).is_ok());
    }

    #[test]
    fn missing_llm_key_fails() {
        let mut config = test_config();
        config.secrets.openai_api_key = None;
        let ledger = LedgerPorts::shared(Arc::new(InMemoryLedger::new()));
        assert!(build_runner_with(&config, "prompt", ledger).is_err());
    }

    #[test]
    fn self_funding_without_executor_still_builds() {
        let mut config = test_config();
        config.agent.self_funding.enabled = true;
        config.agent.self_funding.address = Some("Dest".into());
        let ledger = LedgerPorts::shared(Arc::new(InMemoryLedger::new()));
        assert!(build_runner_with(&config, "prompt", ledger).is_ok());
    }

    #[test]
    fn hosted_ledger_with_timeout_builds() {
        let mut config = test_config();
        config.endpoints.ledger = Some("https://ledger.example".into());
        config.network.call_timeout_secs = Some(15);
        let ledger = LedgerPorts::from_config(&config).unwrap();
        assert!(build_runner_with(&config, "prompt", ledger).is_ok());
    }

    #[test]
    fn unfiltered_holdings_build() {
        let mut config = test_config();
        config.agent.whitelist_holdings = false;
        let ledger = LedgerPorts::shared(Arc::new(InMemoryLedger::new()));
        assert!(build_runner_with(&config, "prompt", ledger).is_ok());
    }
}
