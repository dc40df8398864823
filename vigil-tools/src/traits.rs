//! Core Tool trait and types.
//!
//! All tools implement the `Tool` trait, providing a uniform interface
//! for the registry to validate and invoke them.

use crate::context::ToolContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ToolOutcome {
    #[serde(rename = "success")]
    Success { payload: Value },
    #[serde(rename = "error")]
    Failure { message: String },
}

impl ToolOutcome {
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => Some(message),
            Self::Success { .. } => None,
        }
    }

    /// JSON text handed back to the model.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"status":"error","message":"unserializable tool output: {e}"}}"#)
        })
    }
}

/// One worked example shown to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExample {
    pub input: Value,
    pub output: Value,
    pub explanation: String,
}

/// Tool specification for LLM function calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name (must match `name()` method).
    pub name: String,
    /// Description for the LLM, including similes and examples.
    pub description: String,
    /// JSON Schema for the tool's parameters.
    pub parameters: Value,
}

/// Trait for agent tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Description shown to the LLM.
    fn description(&self) -> &str;

    /// Other phrasings of the action, to help the model pick the tool.
    fn similes(&self) -> &[&'static str] {
        &[]
    }

    fn examples(&self) -> Vec<ToolExample> {
        Vec::new()
    }

    /// JSON Schema for parameters.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. `args` has already passed `parameters_schema`.
    async fn execute(&self, ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome>;

    /// Generate a ToolSpec for function calling.
    fn spec(&self) -> ToolSpec {
        let mut description = self.description().to_string();

        let similes = self.similes();
        if !similes.is_empty() {
            description.push_str("\n\nSimiles: ");
            description.push_str(&similes.join(", "));
        }

        let examples = self.examples();
        if !examples.is_empty() {
            description.push_str("\n\nExamples:");
            for example in examples {
                description.push_str(&format!(
                    "\n  Input: {}\n  Output: {}\n  Explanation: {}",
                    example.input, example.output, example.explanation
                ));
            }
        }

        ToolSpec {
            name: self.name().to_string(),
            description,
            parameters: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Described;

    #[async_trait]
    impl Tool for Described {
        fn name(&self) -> &str {
            "DESCRIBED"
        }

        fn description(&self) -> &str {
            "Does a thing."
        }

        fn similes(&self) -> &[&'static str] {
            &["do thing", "perform thing"]
        }

        fn examples(&self) -> Vec<ToolExample> {
            vec![ToolExample {
                input: json!({"x": 1}),
                output: json!({"status": "success"}),
                explanation: "Did the thing".into(),
            }]
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, _ctx: &ToolContext, _args: Value) -> anyhow::Result<ToolOutcome> {
            Ok(ToolOutcome::success(Value::Null))
        }
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let ok = ToolOutcome::success(json!({"tweetId": "1"}));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["payload"]["tweetId"], "1");

        let err = ToolOutcome::failure("insufficient funds");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "insufficient funds");
        assert_eq!(err.error_message(), Some("insufficient funds"));
        assert!(!err.is_success());
    }

    #[test]
    fn spec_embeds_similes_and_examples() {
        let spec = Described.spec();
        assert_eq!(spec.name, "DESCRIBED");
        assert!(spec.description.starts_with("Does a thing."));
        assert!(spec.description.contains("Similes: do thing, perform thing"));
        assert!(spec.description.contains("Explanation: Did the thing"));
        assert_eq!(spec.parameters["type"], "object");
    }

    #[test]
    fn spec_without_extras_is_plain_description() {
        struct Bare;

        #[async_trait]
        impl Tool for Bare {
            fn name(&self) -> &str {
                "BARE"
            }
            fn description(&self) -> &str {
                "Plain."
            }
            fn parameters_schema(&self) -> Value {
                json!({"type": "object"})
            }
            async fn execute(&self, _ctx: &ToolContext, _args: Value) -> anyhow::Result<ToolOutcome> {
                Ok(ToolOutcome::success(Value::Null))
            }
        }

        assert_eq!(Bare.spec().description, "Plain.");
    }
}
