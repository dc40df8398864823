//! Vigil Tools - the actions the agent can take.
//!
//! Every tool sits behind the same contract:
//! - a JSON Schema the raw arguments are validated against before anything runs
//! - a handler that returns `ToolOutcome::Success` or `ToolOutcome::Failure`
//! - exactly one `[TOOL] ...` journal line per handler run, success or failure
//!
//! External collaborators (wallet, execution, search, social) are reached
//! through the traits in [`ports`].

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod context;
pub mod ports;
pub mod registry;
pub mod tools;
pub mod traits;

pub use context::ToolContext;
pub use ports::{
    BalanceSnapshot, Bounty, BountyBoard, ExecutionReceipt, ExecutionService, PostReceipt,
    SocialService, TokenHolding, TokenInfo, TokenLaunch, TokenSearch, WalletService, WebResult,
    WebSearch, NATIVE_MINT,
};
pub use registry::{ToolError, ToolInvocation, ToolPorts, ToolRegistry};
pub use traits::{Tool, ToolExample, ToolOutcome, ToolSpec};

// Re-export tool implementations
pub use tools::{
    BalancesTool, BuyTool, EditMemoryTool, LaunchTool, PostBountyTool, PostTweetTool,
    SearchTokenTool, SellTool, TradeTool, TransferTool, WebSearchTool,
};
