//! Bounty announcements.

use async_trait::async_trait;
use vigil_tools::{Bounty, BountyBoard};

/// Announces bounties in the operator log. There is no hosted board; the
/// tool's own journal line is the public record.
#[derive(Debug, Default)]
pub struct TracingBountyBoard;

#[async_trait]
impl BountyBoard for TracingBountyBoard {
    async fn post(&self, bounty: &Bounty) -> anyhow::Result<()> {
        tracing::info!(
            bounty_id = %bounty.id,
            amount = bounty.amount,
            posted_by = %bounty.posted_by,
            tool_description = %bounty.tool_description,
            requirements = %bounty.requirements,
            "New development bounty posted"
        );
        Ok(())
    }
}
