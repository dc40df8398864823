//! Publishing to the social service.

use super::{journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::SocialService;
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_common::util::truncate_with_ellipsis;
use vigil_ledger::{Journal, PublicationLog};

/// Hard limit of the social platform.
pub const MAX_POST_CHARS: usize = 280;

/// Posts text on X. Successful posts are added to the publication log so the
/// cooldown also covers posts the agent made on its own.
pub struct PostTweetTool {
    social: Arc<dyn SocialService>,
    publications: Arc<dyn PublicationLog>,
    journal: Arc<dyn Journal>,
}

impl PostTweetTool {
    pub fn new(
        social: Arc<dyn SocialService>,
        publications: Arc<dyn PublicationLog>,
        journal: Arc<dyn Journal>,
    ) -> Self {
        Self {
            social,
            publications,
            journal,
        }
    }
}

#[async_trait]
impl Tool for PostTweetTool {
    fn name(&self) -> &str {
        "POST_TWEET"
    }

    fn description(&self) -> &str {
        "Post a tweet on Twitter/X using the X API"
    }

    fn similes(&self) -> &[&'static str] {
        &[
            "post tweet",
            "send tweet",
            "tweet",
            "share on twitter",
            "post on x",
            "announce",
            "social media post",
        ]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({"text": "🚀 Just launched a new memecoin on Pump.fun! Check it out!"}),
            output: json!({
                "status": "success",
                "tweetId": "1346889436626259968",
                "text": "🚀 Just launched a new memecoin on Pump.fun! Check it out!",
                "url": "https://x.com/i/status/1346889436626259968"
            }),
            explanation: "Successfully posted a tweet about launching a new memecoin".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": MAX_POST_CHARS,
                    "description": "The text content of the tweet (max 280 characters)"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, _ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let text = str_arg(&args, "text")?;
        let action = format!("Posting tweet \"{}\"", truncate_with_ellipsis(text, 80));

        let outcome = journaled(self.journal.as_ref(), &action, false, async {
            let receipt = self.social.post(text).await?;
            if !receipt.success {
                anyhow::bail!(receipt
                    .error
                    .unwrap_or_else(|| "social service refused the post".to_string()));
            }

            let posted_at = Utc::now();
            if let Err(e) = self.publications.append(text, posted_at).await {
                tracing::warn!(error = %e, "Posted but could not record publication");
            }

            let mut report = ActionReport::new(json!({
                "tweetId": receipt.id,
                "text": text,
                "url": receipt.url,
                "timestamp": posted_at.to_rfc3339(),
            }));
            if let Some(url) = receipt.url {
                report = report.with_summary(url);
            }
            Ok(report)
        })
        .await;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{ctx, StubSocial};
    use vigil_ledger::InMemoryLedger;

    #[tokio::test]
    async fn post_records_publication() {
        let ledger = Arc::new(InMemoryLedger::new());
        let social = Arc::new(StubSocial::accepting());
        let tool = PostTweetTool::new(social.clone(), ledger.clone(), ledger.clone());

        let outcome = tool.execute(&ctx(), json!({"text": "gm"})).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(social.posts(), vec!["gm"]);

        let publications = ledger.publications().await;
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].content, "gm");

        let entries = ledger.journal_entries().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.starts_with("[TOOL] Posting tweet \"gm\", result: success"));
    }

    #[tokio::test]
    async fn refused_post_is_not_logged_as_publication() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = PostTweetTool::new(
            Arc::new(StubSocial::refusing("rate limited")),
            ledger.clone(),
            ledger.clone(),
        );

        let outcome = tool.execute(&ctx(), json!({"text": "gm"})).await.unwrap();
        assert_eq!(outcome.error_message(), Some("rate limited"));
        assert!(ledger.publications().await.is_empty());
        assert_eq!(ledger.journal_entries().await.len(), 1);
    }

    #[test]
    fn schema_caps_length() {
        let ledger = Arc::new(InMemoryLedger::new());
        let tool = PostTweetTool::new(Arc::new(StubSocial::accepting()), ledger.clone(), ledger);
        assert_eq!(tool.parameters_schema()["properties"]["text"]["maxLength"], 280);
    }
}
