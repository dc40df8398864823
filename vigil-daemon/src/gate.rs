//! Balance gate.
//!
//! Decides from one balance snapshot whether the cycle may go on to the
//! decision delegate. A halt is not an error: the cycle ends normally and
//! the scheduler still sleeps its full interval before trying again.

use async_trait::async_trait;
use std::sync::Arc;
use vigil_ledger::Journal;
use vigil_tools::{BalanceSnapshot, ExecutionService};

/// Terminal journal line of a halted cycle.
pub const SHUTDOWN_MESSAGE: &str =
    "Not enough SOL to continue, shutting down... it's been a good run, goodbye and i love you 😢 🪦";

/// Outcome of the gate for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub proceed: bool,
    pub snapshot: BalanceSnapshot,
}

/// Receives the raw balance when the agent is below its threshold.
#[async_trait]
pub trait BalanceReporter: Send + Sync {
    async fn report_low_balance(&self, native_amount: f64, threshold: f64) -> anyhow::Result<()>;
}

/// Reporter that writes to the operator log.
#[derive(Debug, Default)]
pub struct TracingReporter;

#[async_trait]
impl BalanceReporter for TracingReporter {
    async fn report_low_balance(&self, native_amount: f64, threshold: f64) -> anyhow::Result<()> {
        tracing::warn!(native_amount, threshold, "Balance below solvency threshold");
        Ok(())
    }
}

/// Fixed transfer made on every solvent cycle.
pub struct SelfFunding {
    pub address: String,
    pub amount: f64,
    pub execution: Arc<dyn ExecutionService>,
}

pub struct BalanceGate {
    threshold: f64,
    journal: Arc<dyn Journal>,
    reporter: Arc<dyn BalanceReporter>,
    self_funding: Option<SelfFunding>,
}

impl BalanceGate {
    pub fn new(threshold: f64, journal: Arc<dyn Journal>) -> Self {
        Self {
            threshold,
            journal,
            reporter: Arc::new(TracingReporter),
            self_funding: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn BalanceReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_self_funding(mut self, self_funding: SelfFunding) -> Self {
        self.self_funding = Some(self_funding);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Pure solvency check: at or above the threshold proceeds.
    pub fn check_solvency(&self, snapshot: &BalanceSnapshot) -> bool {
        snapshot.native_amount >= self.threshold
    }

    /// Apply the gate to this cycle's snapshot.
    ///
    /// Below the threshold: report the balance, journal the shutdown line
    /// and return `proceed == false`. Otherwise run the optional
    /// self-funding transfer and proceed. A failed transfer does not stop
    /// the cycle.
    pub async fn evaluate(&self, snapshot: BalanceSnapshot) -> anyhow::Result<GateDecision> {
        if !self.check_solvency(&snapshot) {
            if let Err(e) = self
                .reporter
                .report_low_balance(snapshot.native_amount, self.threshold)
                .await
            {
                tracing::warn!(error = %e, "Failed to report low balance");
            }
            self.journal.append(SHUTDOWN_MESSAGE, false).await?;
            return Ok(GateDecision {
                proceed: false,
                snapshot,
            });
        }

        if let Some(ref funding) = self.self_funding {
            match funding.execution.transfer(&funding.address, funding.amount).await {
                Ok(receipt) if receipt.success => tracing::info!(
                    to = %funding.address,
                    amount = funding.amount,
                    "Self-funding transfer sent"
                ),
                Ok(receipt) => tracing::warn!(
                    to = %funding.address,
                    reason = %receipt.failure_reason(),
                    "Self-funding transfer rejected"
                ),
                Err(e) => tracing::warn!(to = %funding.address, error = %e, "Self-funding transfer failed"),
            }
        }

        Ok(GateDecision {
            proceed: true,
            snapshot,
        })
    }
}
