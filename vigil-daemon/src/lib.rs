//! Vigil Daemon - the autonomous wallet agent's control loop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Scheduler (fixed interval)                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  CycleRunner                                                 │
//! │   wake → balances → BalanceGate → memory → DecisionDelegate  │
//! │        → narrative → PublicationTrigger → nap                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  clients: Jupiter, Executor, Twitter, Brave, bounty board    │
//! │  ledger:  Journal, MemoryStore, PublicationLog, whitelist    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A cycle that fails is logged and the next one still runs. Only the
//! balance gate stops the agent from acting, and it does so per cycle.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod clients;
pub mod cycle;
pub mod gate;
pub mod holdings;
pub mod publication;
pub mod scheduler;
pub mod wiring;

pub use cycle::{nap_message, CycleOutcome, CycleReport, CycleRunner, WAKE_MESSAGE};
pub use gate::{BalanceGate, BalanceReporter, GateDecision, SelfFunding, TracingReporter, SHUTDOWN_MESSAGE};
pub use holdings::WhitelistedWallet;
pub use publication::{PublicationOutcome, PublicationTrigger, TriggerState};
pub use scheduler::{shutdown_signal, Scheduler};
pub use wiring::{build_runner, build_runner_with, load_system_prompt, LedgerPorts};
