//! Tool-less content composition for publications.

use crate::provider::{ChatMessage, Provider};
use async_trait::async_trait;
use std::sync::Arc;
use vigil_common::util::fit_to_chars;

const COMPOSER_PROMPT: &str = "You write short social media posts about what you have been doing. \
Write in the first person, in your own voice, as one post. \
Do not use hashtags. Reply with the post text only.";

/// Turns a journal backlog into one post.
#[async_trait]
pub trait ContentComposer: Send + Sync {
    async fn compose(&self, backlog: &[String]) -> anyhow::Result<String>;
}

/// Composer backed by a chat provider, offered no tools.
pub struct LlmComposer {
    provider: Arc<dyn Provider>,
    max_chars: usize,
}

impl LlmComposer {
    pub fn new(provider: Arc<dyn Provider>, max_chars: usize) -> Self {
        Self { provider, max_chars }
    }
}

#[async_trait]
impl ContentComposer for LlmComposer {
    async fn compose(&self, backlog: &[String]) -> anyhow::Result<String> {
        let request = format!(
            "Here is what you did since your last post:\n\n{}\n\n\
             Write a new post of at most {} characters about it.",
            backlog.join("\n"),
            self.max_chars
        );

        let response = self
            .provider
            .chat(&[ChatMessage::system(COMPOSER_PROMPT), ChatMessage::user(request)], &[])
            .await?;

        let text = response.content.unwrap_or_default();
        let text = text.trim().trim_matches('"').trim();
        if text.is_empty() {
            anyhow::bail!("composer returned empty content");
        }
        Ok(fit_to_chars(text, self.max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatResponse;
    use std::sync::Mutex;
    use vigil_tools::ToolSpec;

    struct FixedProvider {
        reply: String,
        seen: Mutex<Vec<(Vec<ChatMessage>, usize)>>,
    }

    impl FixedProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn chat(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> anyhow::Result<ChatResponse> {
            self.seen.lock().unwrap().push((messages.to_vec(), tools.len()));
            Ok(ChatResponse::text(self.reply.clone()))
        }
    }

    #[tokio::test]
    async fn composes_from_backlog_without_tools() {
        let provider = Arc::new(FixedProvider::new("  \"Bought some WIF today.\"  "));
        let composer = LlmComposer::new(provider.clone(), 280);

        let post = composer
            .compose(&["[TOOL] Buying WIF".into(), "Sold it again".into()])
            .await
            .unwrap();
        assert_eq!(post, "Bought some WIF today.");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].1, 0);
        let user = seen[0].0[1].content.clone().unwrap();
        assert!(user.contains("[TOOL] Buying WIF\nSold it again"));
    }

    #[tokio::test]
    async fn long_output_is_truncated() {
        let provider = Arc::new(FixedProvider::new(&"word ".repeat(100)));
        let composer = LlmComposer::new(provider, 50);

        let post = composer.compose(&["x".into()]).await.unwrap();
        assert!(post.chars().count() <= 50);
        assert!(post.ends_with("..."));
    }

    #[tokio::test]
    async fn empty_output_is_an_error() {
        let composer = LlmComposer::new(Arc::new(FixedProvider::new("   ")), 280);
        assert!(composer.compose(&["x".into()]).await.is_err());
    }
}
