//! Tool registry and invocation wrapper.
//!
//! `invoke` is the single boundary between the decision delegate and the
//! tools: arguments that do not match a tool's schema are rejected before the
//! handler runs (and so never reach the journal), and handler errors are
//! folded into `ToolOutcome::Failure`. Nothing propagates past it.
//!
//! Invocations are sequential within a cycle; the registry holds no locks.

use crate::context::ToolContext;
use crate::ports::{
    BountyBoard, ExecutionService, SocialService, TokenSearch, WalletService, WebSearch,
};
use crate::tools::{
    BalancesTool, BuyTool, EditMemoryTool, LaunchTool, PostBountyTool, PostTweetTool,
    SearchTokenTool, SellTool, TradeTool, TransferTool, WebSearchTool,
};
use crate::traits::{Tool, ToolOutcome, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use vigil_ledger::{Journal, MemoryStore, PublicationLog, TokenWhitelist};

/// Registry-level errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{0}' is already registered")]
    Duplicate(String),

    #[error("tool '{tool}' has an invalid parameter schema: {reason}")]
    InvalidSchema { tool: String, reason: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

/// Record of one call made during a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Value,
    pub outcome: ToolOutcome,
}

struct RegisteredTool {
    tool: Arc<dyn Tool>,
    validator: jsonschema::Validator,
}

/// Registry of available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    order: Vec<String>,
}

/// Collaborators needed by the default tool set.
pub struct ToolPorts {
    pub journal: Arc<dyn Journal>,
    pub memory: Arc<dyn MemoryStore>,
    pub publications: Arc<dyn PublicationLog>,
    pub whitelist: Arc<dyn TokenWhitelist>,
    pub wallet: Arc<dyn WalletService>,
    pub token_search: Arc<dyn TokenSearch>,
    pub social: Arc<dyn SocialService>,
    pub bounty_board: Arc<dyn BountyBoard>,
    /// Without an executor the transfer and trading tools are not offered
    pub execution: Option<Arc<dyn ExecutionService>>,
    pub web_search: Option<Arc<dyn WebSearch>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names are unique and the schema must compile.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::Duplicate(name));
        }

        let schema = tool.parameters_schema();
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| ToolError::InvalidSchema {
                tool: name.clone(),
                reason: e.to_string(),
            })?;

        self.order.push(name.clone());
        self.tools.insert(name, RegisteredTool { tool, validator });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|r| Arc::clone(&r.tool))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tool definitions for the LLM, in registration order.
    pub fn definitions(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|r| r.tool.spec())
            .collect()
    }

    /// Check `args` against the tool's schema without running it.
    pub fn validate(&self, name: &str, args: &Value) -> Result<(), ToolError> {
        let registered = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let errors: Vec<String> = registered
            .validator
            .iter_errors(args)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ToolError::InvalidArguments {
                tool: name.to_string(),
                reason: errors.join("; "),
            })
        }
    }

    /// Validate and run a tool. Always returns an outcome.
    pub async fn invoke(&self, ctx: &ToolContext, name: &str, args: Value) -> ToolOutcome {
        if let Err(e) = self.validate(name, &args) {
            tracing::warn!(cycle_id = %ctx.cycle_id, tool = %name, error = %e, "Tool call rejected");
            return ToolOutcome::failure(e.to_string());
        }

        let Some(registered) = self.tools.get(name) else {
            return ToolOutcome::failure(ToolError::UnknownTool(name.to_string()).to_string());
        };

        let started = Instant::now();
        let outcome = match registered.tool.execute(ctx, args).await {
            Ok(outcome) => outcome,
            Err(e) => ToolOutcome::failure(format!("{e:#}")),
        };

        tracing::info!(
            cycle_id = %ctx.cycle_id,
            tool = %name,
            success = outcome.is_success(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Tool invoked"
        );
        if let Some(message) = outcome.error_message() {
            tracing::debug!(tool = %name, error = %message, "Tool reported failure");
        }

        outcome
    }

    /// Invoke and keep a record of the call.
    pub async fn invoke_recorded(&self, ctx: &ToolContext, name: &str, args: Value) -> ToolInvocation {
        let outcome = self.invoke(ctx, name, args.clone()).await;
        ToolInvocation {
            name: name.to_string(),
            arguments: args,
            outcome,
        }
    }

    /// Registry with every tool the agent ships with.
    pub fn with_defaults(ports: ToolPorts) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        let journal = &ports.journal;

        registry.register(Arc::new(BalancesTool::new(
            Arc::clone(&ports.wallet),
            Arc::clone(journal),
        )))?;

        if let Some(ref execution) = ports.execution {
            registry.register(Arc::new(TransferTool::new(
                Arc::clone(execution),
                Arc::clone(journal),
            )))?;
            registry.register(Arc::new(LaunchTool::new(
                Arc::clone(execution),
                Arc::clone(&ports.wallet),
                Arc::clone(&ports.whitelist),
                Arc::clone(journal),
            )))?;
            registry.register(Arc::new(BuyTool::new(
                Arc::clone(execution),
                Arc::clone(&ports.wallet),
                Arc::clone(&ports.whitelist),
                Arc::clone(journal),
            )))?;
            registry.register(Arc::new(SellTool::new(
                Arc::clone(execution),
                Arc::clone(&ports.wallet),
                Arc::clone(journal),
            )))?;
            registry.register(Arc::new(TradeTool::new(
                Arc::clone(execution),
                Arc::clone(journal),
            )))?;
        }

        registry.register(Arc::new(SearchTokenTool::new(
            Arc::clone(&ports.token_search),
            Arc::clone(journal),
        )))?;
        registry.register(Arc::new(PostTweetTool::new(
            Arc::clone(&ports.social),
            Arc::clone(&ports.publications),
            Arc::clone(journal),
        )))?;
        registry.register(Arc::new(EditMemoryTool::new(
            Arc::clone(&ports.memory),
            Arc::clone(journal),
        )))?;

        if let Some(ref web_search) = ports.web_search {
            registry.register(Arc::new(WebSearchTool::new(
                Arc::clone(web_search),
                Arc::clone(journal),
            )))?;
        }

        registry.register(Arc::new(PostBountyTool::new(
            Arc::clone(&ports.bounty_board),
            Arc::clone(journal),
        )))?;

        Ok(registry)
    }
}
