//! One cycle of the control loop as an ordered pipeline.
//!
//! wake → snapshot → gate → memory → context → decide → narrative →
//! publication trigger → nap
//!
//! Each step returns before the next starts. A gate halt ends the cycle
//! early and normally; an `Err` from any step ends it as a failed cycle,
//! which the scheduler logs.

use crate::gate::BalanceGate;
use crate::publication::{PublicationOutcome, PublicationTrigger};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use vigil_agent::{CycleContext, DecisionDelegate};
use vigil_common::logging::generate_cycle_id;
use vigil_ledger::{Journal, MemoryStore};
use vigil_tools::{ToolRegistry, WalletService};

pub const WAKE_MESSAGE: &str = "Waking up... 🫩";

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Balance gate stopped the cycle before the delegate ran
    Halted { native_amount: f64 },
    Completed {
        actions_taken: usize,
        publication: Option<PublicationOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle_id: String,
    pub outcome: CycleOutcome,
}

pub struct CycleRunner {
    wallet_address: String,
    wallet: Arc<dyn WalletService>,
    journal: Arc<dyn Journal>,
    memory: Arc<dyn MemoryStore>,
    gate: BalanceGate,
    registry: Arc<ToolRegistry>,
    delegate: Arc<dyn DecisionDelegate>,
    trigger: Option<PublicationTrigger>,
    nap: Duration,
}

impl CycleRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wallet_address: impl Into<String>,
        wallet: Arc<dyn WalletService>,
        journal: Arc<dyn Journal>,
        memory: Arc<dyn MemoryStore>,
        gate: BalanceGate,
        registry: Arc<ToolRegistry>,
        delegate: Arc<dyn DecisionDelegate>,
        nap: Duration,
    ) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            wallet,
            journal,
            memory,
            gate,
            registry,
            delegate,
            trigger: None,
            nap,
        }
    }

    pub fn with_publication_trigger(mut self, trigger: PublicationTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Run one cycle inside a `cycle` span carrying a fresh cycle id.
    pub async fn run_cycle(&self) -> anyhow::Result<CycleReport> {
        let cycle_id = generate_cycle_id();
        let span = tracing::info_span!("cycle", cycle_id = %cycle_id);
        self.run_pipeline(cycle_id).instrument(span).await
    }

    async fn run_pipeline(&self, cycle_id: String) -> anyhow::Result<CycleReport> {
        tracing::info!("Cycle started");
        self.journal
            .append(WAKE_MESSAGE, false)
            .await
            .context("journaling wake-up")?;

        let snapshot = self
            .wallet
            .balances(&self.wallet_address)
            .await
            .context("fetching balances")?;
        tracing::info!(
            native_amount = snapshot.native_amount,
            tokens = snapshot.tokens.len(),
            "Balances fetched"
        );

        let gate = self.gate.evaluate(snapshot).await.context("balance gate")?;
        if !gate.proceed {
            tracing::warn!(
                native_amount = gate.snapshot.native_amount,
                threshold = self.gate.threshold(),
                "Cycle halted by balance gate"
            );
            return Ok(CycleReport {
                cycle_id,
                outcome: CycleOutcome::Halted {
                    native_amount: gate.snapshot.native_amount,
                },
            });
        }

        let memory = self.memory.get().await.context("reading memory")?;
        let context = CycleContext::new(&cycle_id, &self.wallet_address, gate.snapshot, memory);

        let decision = self
            .delegate
            .decide(&context, &self.registry)
            .await
            .context("decision delegate")?;
        tracing::info!(actions_taken = decision.actions_taken.len(), "Decision made");

        if !decision.narrative.trim().is_empty() {
            self.journal
                .append(&decision.narrative, true)
                .await
                .context("journaling narrative")?;
        }

        let publication = match self.trigger {
            Some(ref trigger) => match trigger.consider(Utc::now()).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    tracing::warn!(error = %format!("{e:#}"), "Publication trigger failed");
                    None
                }
            },
            None => None,
        };

        self.journal
            .append(&nap_message(self.nap), false)
            .await
            .context("journaling nap")?;
        tracing::info!("Cycle completed");

        Ok(CycleReport {
            cycle_id,
            outcome: CycleOutcome::Completed {
                actions_taken: decision.actions_taken.len(),
                publication,
            },
        })
    }
}

/// "Taking a 30 second nap! 😴"
pub fn nap_message(nap: Duration) -> String {
    let secs = nap.as_secs();
    let (n, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    format!("Taking a {n} {unit} nap! 😴")
}
