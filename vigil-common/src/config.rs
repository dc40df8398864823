//! Configuration management for the vigil agent.
//!
//! The daemon reads a single file at `~/.vigil/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! ## Runtime
//! - `VIGIL_LOG_LEVEL` → observability.log_level
//! - `VIGIL_LOG_FORMAT` → observability.log_format
//! - `VIGIL_WALLET_ADDRESS` → agent.wallet_address
//! - `VIGIL_CYCLE_INTERVAL_SECS` → agent.cycle_interval_secs
//! - `VIGIL_SOLVENCY_THRESHOLD` → agent.solvency_threshold
//! - `VIGIL_PUBLICATION_COOLDOWN_SECS` → publication.cooldown_secs
//! - `TRANSFER_ADDRESS` → agent.self_funding.address
//!
//! ## Credentials (→ secrets.*)
//! - `OPENAI_API_KEY`, `LEDGER_API_KEY`, `JUPITER_API_KEY`, `BRAVE_API_KEY`,
//!   `TWITTER_BEARER_TOKEN`, `EXECUTOR_API_KEY`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".vigil"),
        |dirs| dirs.home_dir().join(".vigil"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Observability
// ============================================================================

/// Operator logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============================================================================
// Agent
// ============================================================================

/// Fixed transfer issued by the balance gate on every solvent cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfFundingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Destination wallet
    #[serde(default)]
    pub address: Option<String>,
    /// Native-asset amount per cycle
    #[serde(default = "default_self_funding_amount")]
    pub amount: f64,
}

fn default_self_funding_amount() -> f64 {
    0.01
}

impl Default for SelfFundingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: None,
            amount: default_self_funding_amount(),
        }
    }
}

/// Control loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Wallet whose holdings are inspected every cycle
    #[serde(default)]
    pub wallet_address: String,

    /// Sleep between cycles
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,

    /// Minimum native-asset balance required to keep operating
    #[serde(default = "default_solvency_threshold")]
    pub solvency_threshold: f64,

    /// Upper bound on reason/act rounds per decision
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// File holding the decision delegate's system prompt
    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: String,

    /// Show the delegate only whitelisted tokens (ones it bought or launched)
    #[serde(default = "default_true")]
    pub whitelist_holdings: bool,

    #[serde(default)]
    pub self_funding: SelfFundingConfig,
}

fn default_cycle_interval_secs() -> u64 {
    30
}

fn default_solvency_threshold() -> f64 {
    0.01
}

fn default_max_steps() -> usize {
    10
}

fn default_system_prompt_path() -> String {
    "prompt.txt".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            wallet_address: String::new(),
            cycle_interval_secs: default_cycle_interval_secs(),
            solvency_threshold: default_solvency_threshold(),
            max_steps: default_max_steps(),
            system_prompt_path: default_system_prompt_path(),
            whitelist_holdings: true,
            self_funding: SelfFundingConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    /// System prompt path with `~` and env vars expanded.
    pub fn system_prompt_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::full(&self.system_prompt_path).map_or_else(
            |_| self.system_prompt_path.clone(),
            |expanded| expanded.into_owned(),
        ))
    }
}

// ============================================================================
// Publication
// ============================================================================

/// Cooldown-gated publication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum time between publications. The design target was two hours;
    /// the running agent used thirty minutes.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Hard length limit of the social service
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_cooldown_secs() -> u64 {
    30 * 60
}

fn default_max_chars() -> usize {
    280
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_secs: default_cooldown_secs(),
            max_chars: default_max_chars(),
        }
    }
}

impl PublicationConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

// ============================================================================
// LLM
// ============================================================================

/// OpenAI-compatible chat completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Omitted from requests when unset (some models only accept the default)
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-5".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: None,
        }
    }
}

// ============================================================================
// External endpoints & credentials
// ============================================================================

/// Base URLs of the external services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Journal / memory / publication-log API. Unset keeps state in process.
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default = "default_jupiter_endpoint")]
    pub jupiter: String,
    /// Transaction signing executor. Unset disables transfers and trades.
    #[serde(default)]
    pub executor: Option<String>,
    #[serde(default = "default_twitter_endpoint")]
    pub twitter: String,
    #[serde(default = "default_brave_endpoint")]
    pub brave: String,
}

fn default_jupiter_endpoint() -> String {
    "https://api.jup.ag".to_string()
}

fn default_twitter_endpoint() -> String {
    "https://api.x.com".to_string()
}

fn default_brave_endpoint() -> String {
    "https://api.search.brave.com".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            ledger: None,
            jupiter: default_jupiter_endpoint(),
            executor: None,
            twitter: default_twitter_endpoint(),
            brave: default_brave_endpoint(),
        }
    }
}

/// API keys and tokens.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub ledger_api_key: Option<String>,
    #[serde(default)]
    pub jupiter_api_key: Option<String>,
    #[serde(default)]
    pub brave_api_key: Option<String>,
    #[serde(default)]
    pub twitter_bearer_token: Option<String>,
    #[serde(default)]
    pub executor_api_key: Option<String>,
}

/// Transport settings shared by every HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    /// Per-call timeout. Unset leaves the transport default in place.
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,
}

impl NetworkConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub publication: PublicationConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("VIGIL_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("VIGIL_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(address) = lookup("VIGIL_WALLET_ADDRESS") {
            self.agent.wallet_address = address;
        }
        if let Some(secs) = lookup("VIGIL_CYCLE_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            self.agent.cycle_interval_secs = secs;
        }
        if let Some(threshold) = lookup("VIGIL_SOLVENCY_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.agent.solvency_threshold = threshold;
        }
        if let Some(secs) = lookup("VIGIL_PUBLICATION_COOLDOWN_SECS").and_then(|v| v.parse().ok())
        {
            self.publication.cooldown_secs = secs;
        }
        if let Some(address) = lookup("TRANSFER_ADDRESS") {
            self.agent.self_funding.address = Some(address);
        }

        self.apply_secret_fallbacks(&lookup);
    }

    fn apply_secret_fallbacks(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.secrets.openai_api_key = Some(key);
        }
        if let Some(key) = lookup("LEDGER_API_KEY") {
            self.secrets.ledger_api_key = Some(key);
        }
        if let Some(key) = lookup("JUPITER_API_KEY") {
            self.secrets.jupiter_api_key = Some(key);
        }
        if let Some(key) = lookup("BRAVE_API_KEY") {
            self.secrets.brave_api_key = Some(key);
        }
        if let Some(token) = lookup("TWITTER_BEARER_TOKEN") {
            self.secrets.twitter_bearer_token = Some(token);
        }
        if let Some(key) = lookup("EXECUTOR_API_KEY") {
            self.secrets.executor_api_key = Some(key);
        }
    }
}
