//! Per-cycle context handed to the decision delegate.

use chrono::{DateTime, SecondsFormat, Utc};
use vigil_tools::{BalanceSnapshot, ToolContext};

/// Built fresh each cycle from the balance snapshot, the memory blob and the
/// current time; dropped when the cycle ends.
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub cycle_id: String,
    pub wallet_address: String,
    pub timestamp: DateTime<Utc>,
    pub balances: BalanceSnapshot,
    pub memory: String,
}

impl CycleContext {
    pub fn new(
        cycle_id: &str,
        wallet_address: &str,
        balances: BalanceSnapshot,
        memory: String,
    ) -> Self {
        Self {
            cycle_id: cycle_id.to_string(),
            wallet_address: wallet_address.to_string(),
            timestamp: Utc::now(),
            balances,
            memory,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The single user message the delegate receives.
    pub fn compose_message(&self) -> String {
        let balances = serde_json::to_string(&self.balances)
            .unwrap_or_else(|_| format!("{{\"nativeAmount\":{}}}", self.balances.native_amount));
        format!(
            "Balances: <Balances>{balances}</Balances> \
             Current memory is within the memory tags: <Memory>{}</Memory> \
             Current time: <Time>{}</Time> \
             Take your next actions and then describe what you did and the results.",
            self.memory,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    /// Context for tool invocations made during this cycle.
    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(&self.cycle_id, &self.wallet_address)
    }
}
