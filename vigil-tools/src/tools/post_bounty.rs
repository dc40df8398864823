//! Development bounties.

use super::{amount_arg, journaled, str_arg, ActionReport};
use crate::context::ToolContext;
use crate::ports::{Bounty, BountyBoard};
use crate::traits::{Tool, ToolExample, ToolOutcome};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use vigil_common::util::truncate_with_ellipsis;
use vigil_ledger::Journal;

/// Offers SOL to whoever builds a tool the agent is missing.
pub struct PostBountyTool {
    board: Arc<dyn BountyBoard>,
    journal: Arc<dyn Journal>,
}

impl PostBountyTool {
    pub fn new(board: Arc<dyn BountyBoard>, journal: Arc<dyn Journal>) -> Self {
        Self { board, journal }
    }
}

fn bounty_id() -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!("bounty_{}_{}", Utc::now().timestamp_millis(), &nonce[..9])
}

#[async_trait]
impl Tool for PostBountyTool {
    fn name(&self) -> &str {
        "POST_BOUNTY"
    }

    fn description(&self) -> &str {
        "Post a development bounty offering SOL to anyone who builds a specific tool or feature."
    }

    fn similes(&self) -> &[&'static str] {
        &[
            "create bounty",
            "offer reward",
            "request tool",
            "hire developer",
            "crowdsource development",
            "offer SOL for tool",
        ]
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            input: json!({
                "toolDescription": "A tool that allows me to access Discord channels and send messages to them",
                "bountyAmount": "0.5",
                "requirements": "Must include a way to get access to key crypto discord servers and channels."
            }),
            output: json!({"status": "success"}),
            explanation: "Successfully posted a bounty for 0.5 SOL to build a Discord messaging tool".into(),
        }]
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "toolDescription": {
                    "type": "string",
                    "minLength": 10,
                    "maxLength": 1000,
                    "description": "Detailed description of the tool or feature you want built"
                },
                "bountyAmount": {
                    "type": "string",
                    "description": "Amount of SOL to offer as bounty reward"
                },
                "requirements": {
                    "type": "string",
                    "description": "Specific technical requirements or constraints for the tool"
                }
            },
            "required": ["toolDescription", "bountyAmount", "requirements"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> anyhow::Result<ToolOutcome> {
        let description = str_arg(&args, "toolDescription")?;
        let raw_amount = str_arg(&args, "bountyAmount")?;
        let requirements = str_arg(&args, "requirements")?;
        let action = format!(
            "Posting bounty of {raw_amount} SOL for: {}",
            truncate_with_ellipsis(description, 120)
        );

        let outcome = journaled(self.journal.as_ref(), &action, true, async {
            let amount = amount_arg(raw_amount, "bountyAmount")?;
            let bounty = Bounty {
                id: bounty_id(),
                tool_description: description.to_string(),
                amount,
                requirements: requirements.to_string(),
                posted_by: ctx.wallet_address.clone(),
            };
            self.board.post(&bounty).await?;

            Ok(ActionReport::new(json!({"bountyId": bounty.id}))
                .with_summary(format!("Bounty id {}", bounty.id)))
        })
        .await;

        Ok(outcome)
    }
}
