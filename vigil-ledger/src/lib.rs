//! Vigil Ledger - the agent's cross-cycle state.
//!
//! Four append-mostly stores live behind traits so the control loop never
//! depends on where they are hosted:
//! - `Journal`: append-only log of what the agent did, also the publication backlog
//! - `MemoryStore`: one free-text blob, replaced wholesale
//! - `PublicationLog`: one entry per successful publication
//! - `TokenWhitelist`: mints the agent acquired on purpose
//!
//! Backends:
//! - `InMemoryLedger` keeps everything in process (offline runs, tests)
//! - `LedgerClient` talks to the hosted REST API

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod client;
pub mod in_memory;
pub mod traits;

pub use client::LedgerClient;
pub use in_memory::InMemoryLedger;
pub use traits::{
    Journal, JournalEntry, JournalQuery, MemoryStore, PublicationLog, PublicationLogEntry,
    TokenWhitelist,
};
