//! Vigil Common - Shared types, utilities, and configuration for the vigil agent.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration validation
//! - Errors for calls to external services
//! - Logging setup
//! - HTTP client construction for external collaborators
//! - String utilities shared by the journal and publication paths

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    AgentConfig, Config, EndpointsConfig, LlmConfig, NetworkConfig, ObservabilityConfig,
    PublicationConfig, SecretsConfig, SelfFundingConfig,
};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
