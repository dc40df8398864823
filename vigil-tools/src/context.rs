//! Per-invocation context handed to every tool.

/// Context passed to tools.
///
/// Identifies the cycle the invocation belongs to and the wallet the agent
/// acts for.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub cycle_id: String,
    pub wallet_address: String,
}

impl ToolContext {
    pub fn new(cycle_id: &str, wallet_address: &str) -> Self {
        Self {
            cycle_id: cycle_id.to_string(),
            wallet_address: wallet_address.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_context_creation() {
        let ctx = ToolContext::new("cycle-1", "Wa11et");
        assert_eq!(ctx.cycle_id, "cycle-1");
        assert_eq!(ctx.wallet_address, "Wa11et");
    }
}
