//! Configuration validation.
//!
//! A configuration that fails here is the one fatal condition of the daemon:
//! it refuses to start instead of looping on a broken setup.

use thiserror::Error;

use crate::config::{AgentConfig, Config, ObservabilityConfig, PublicationConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.agent.validate() {
            errors.push(e);
        }

        if let Err(e) = self.publication.validate() {
            errors.push(e);
        }

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if self.secrets.openai_api_key.as_deref().map_or(true, str::is_empty) {
            errors.push(ValidationError::MissingField {
                field: "secrets.openai_api_key".into(),
            });
        }

        if self.network.call_timeout_secs == Some(0) {
            errors.push(ValidationError::InvalidValue {
                field: "network.call_timeout_secs".into(),
                reason: "must be greater than 0 when set".into(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Validate for AgentConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.wallet_address.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "agent.wallet_address".into(),
            });
        }

        if self.cycle_interval_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "agent.cycle_interval_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if !self.solvency_threshold.is_finite() || self.solvency_threshold < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "agent.solvency_threshold".into(),
                reason: "must be a non-negative number".into(),
            });
        }

        if self.max_steps == 0 {
            return Err(ValidationError::InvalidValue {
                field: "agent.max_steps".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.self_funding.enabled {
            if self.self_funding.address.as_deref().map_or(true, str::is_empty) {
                return Err(ValidationError::MissingField {
                    field: "agent.self_funding.address".into(),
                });
            }
            if !self.self_funding.amount.is_finite() || self.self_funding.amount <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: "agent.self_funding.amount".into(),
                    reason: "must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for PublicationConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.cooldown_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "publication.cooldown_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.max_chars == 0 {
            return Err(ValidationError::InvalidValue {
                field: "publication.max_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        match self.log_format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("unknown format '{other}', expected 'json' or 'pretty'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.agent.wallet_address = "Wa11et".into();
        config.secrets.openai_api_key = Some("sk-test".into());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_wallet_and_key() {
        let err = Config::default().validate().unwrap_err();
        match err {
            ValidationError::Multiple(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = valid_config();
        config.agent.cycle_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("agent.cycle_interval_secs"));
    }

    #[test]
    fn test_self_funding_requires_address() {
        let mut config = valid_config();
        config.agent.self_funding.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("agent.self_funding.address"));

        config.agent.self_funding.address = Some("Dest1".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cooldown_rejected() {
        let mut config = valid_config();
        config.publication.cooldown_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = valid_config();
        config.observability.log_format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("xml"));
    }
}
