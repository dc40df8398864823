//! Decision delegates.
//!
//! The delegate is opaque to the cycle: it gets a `CycleContext`, may call
//! any number of tools through the registry while it reasons, and returns a
//! narrative plus the ordered record of what it invoked. An `Err` from
//! `decide` fails the whole cycle; tool calls already made are not retried.

use crate::context::CycleContext;
use crate::provider::{ChatMessage, Provider};
use async_trait::async_trait;
use std::sync::Arc;
use vigil_tools::{ToolInvocation, ToolRegistry};

/// Default bound on reason/act rounds per cycle.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// What the delegate did this cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub narrative: String,
    pub actions_taken: Vec<ToolInvocation>,
}

#[async_trait]
pub trait DecisionDelegate: Send + Sync {
    async fn decide(&self, context: &CycleContext, registry: &ToolRegistry) -> anyhow::Result<Decision>;
}

/// Reason/act loop over a chat provider with function calling.
///
/// Each round sends the transcript; every tool call in the reply is run
/// through the registry in order and its outcome appended. The loop ends
/// when the model answers without tool calls.
pub struct ReactDelegate {
    provider: Arc<dyn Provider>,
    system_prompt: String,
    max_steps: usize,
}

impl ReactDelegate {
    pub fn new(provider: Arc<dyn Provider>, system_prompt: impl Into<String>, max_steps: usize) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            max_steps: max_steps.max(1),
        }
    }
}

#[async_trait]
impl DecisionDelegate for ReactDelegate {
    async fn decide(&self, context: &CycleContext, registry: &ToolRegistry) -> anyhow::Result<Decision> {
        let tool_ctx = context.tool_context();
        let tools = registry.definitions();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(context.compose_message()),
        ];
        let mut actions_taken = Vec::new();
        let mut last_content: Option<String> = None;

        for step in 1..=self.max_steps {
            let response = self.provider.chat(&messages, &tools).await?;

            if !response.has_tool_calls() {
                tracing::debug!(cycle_id = %context.cycle_id, step, "Delegate finished");
                return Ok(Decision {
                    narrative: response.content.unwrap_or_default(),
                    actions_taken,
                });
            }

            if response.content.is_some() {
                last_content = response.content.clone();
            }
            messages.push(ChatMessage::assistant(
                response.content,
                response.tool_calls.clone(),
            ));

            for call in response.tool_calls {
                tracing::info!(cycle_id = %context.cycle_id, step, tool = %call.name, "Executing tool");
                let invocation = registry
                    .invoke_recorded(&tool_ctx, &call.name, call.arguments)
                    .await;
                messages.push(ChatMessage::tool_result(
                    call.id,
                    invocation.outcome.to_json_string(),
                ));
                actions_taken.push(invocation);
            }
        }

        tracing::warn!(
            cycle_id = %context.cycle_id,
            max_steps = self.max_steps,
            "Delegate reached max steps"
        );
        Ok(Decision {
            narrative: last_content.unwrap_or_else(|| {
                format!(
                    "Stopped after {} steps and {} tool calls.",
                    self.max_steps,
                    actions_taken.len()
                )
            }),
            actions_taken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatResponse, ToolCall};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use vigil_ledger::{InMemoryLedger, MemoryStore};
    use vigil_tools::{BalanceSnapshot, EditMemoryTool, ToolSpec};

    /// Replays canned responses and records each transcript it was sent.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<ChatResponse>>,
        transcripts: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<ChatResponse>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                transcripts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn chat(&self, messages: &[ChatMessage], _tools: &[ToolSpec]) -> anyhow::Result<ChatResponse> {
            self.transcripts.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    fn edit_call(id: &str, memory: &str) -> ChatResponse {
        ChatResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.into(),
                name: "EDIT_MEMORY".into(),
                arguments: json!({"memory": memory}),
            }],
        }
    }

    fn setup() -> (Arc<InMemoryLedger>, ToolRegistry, CycleContext) {
        let ledger = Arc::new(InMemoryLedger::new());
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(EditMemoryTool::new(ledger.clone(), ledger.clone())))
            .unwrap();
        let ctx = CycleContext::new("c1", "Wa11et", BalanceSnapshot::new(1.0, vec![]), String::new());
        (ledger, registry, ctx)
    }

    #[tokio::test]
    async fn runs_tools_then_returns_narrative() {
        let (ledger, registry, ctx) = setup();
        let provider = Arc::new(ScriptedProvider::new(vec![
            edit_call("call_1", "first"),
            ChatResponse::text("I updated my memory."),
        ]));
        let delegate = ReactDelegate::new(provider.clone(), "You are an agent.", DEFAULT_MAX_STEPS);

        let decision = delegate.decide(&ctx, &registry).await.unwrap();
        assert_eq!(decision.narrative, "I updated my memory.");
        assert_eq!(decision.actions_taken.len(), 1);
        assert_eq!(decision.actions_taken[0].name, "EDIT_MEMORY");
        assert!(decision.actions_taken[0].outcome.is_success());
        assert_eq!(ledger.get().await.unwrap(), "first");

        // Second round carries the assistant call and the tool result
        let transcripts = provider.transcripts.lock().unwrap();
        assert_eq!(transcripts.len(), 2);
        let second = &transcripts[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
        assert!(second[3].content.as_deref().unwrap().contains("\"status\":\"success\""));
    }

    #[tokio::test]
    async fn zero_tool_calls_is_fine() {
        let (ledger, registry, ctx) = setup();
        let provider = Arc::new(ScriptedProvider::new(vec![ChatResponse::text("Nothing to do.")]));
        let delegate = ReactDelegate::new(provider, "sys", DEFAULT_MAX_STEPS);

        let decision = delegate.decide(&ctx, &registry).await.unwrap();
        assert_eq!(decision.narrative, "Nothing to do.");
        assert!(decision.actions_taken.is_empty());
        assert!(ledger.journal_entries().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_call_is_reported_back_to_model() {
        let (ledger, registry, ctx) = setup();
        let provider = Arc::new(ScriptedProvider::new(vec![
            ChatResponse {
                content: None,
                tool_calls: vec![ToolCall {
                    id: "call_1".into(),
                    name: "EDIT_MEMORY".into(),
                    arguments: json!({}),
                }],
            },
            ChatResponse::text("That failed."),
        ]));
        let delegate = ReactDelegate::new(provider, "sys", DEFAULT_MAX_STEPS);

        let decision = delegate.decide(&ctx, &registry).await.unwrap();
        assert!(!decision.actions_taken[0].outcome.is_success());
        assert!(ledger.journal_entries().await.is_empty());
    }

    #[tokio::test]
    async fn step_bound_stops_the_loop() {
        let (_ledger, registry, ctx) = setup();
        let provider = Arc::new(ScriptedProvider::new(vec![
            edit_call("a", "1"),
            edit_call("b", "2"),
            edit_call("c", "3"),
        ]));
        let delegate = ReactDelegate::new(provider.clone(), "sys", 2);

        let decision = delegate.decide(&ctx, &registry).await.unwrap();
        assert_eq!(decision.actions_taken.len(), 2);
        assert_eq!(decision.narrative, "Stopped after 2 steps and 2 tool calls.");
        assert_eq!(provider.transcripts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn provider_error_fails_decision() {
        let (_ledger, registry, ctx) = setup();
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let delegate = ReactDelegate::new(provider, "sys", DEFAULT_MAX_STEPS);

        let err = delegate.decide(&ctx, &registry).await.unwrap_err();
        assert_eq!(err.to_string(), "script exhausted");
    }
}
