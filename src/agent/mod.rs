//! Agent module: a bounded ReAct reasoning loop over any provider, plus the
//! tool registry it dispatches through.

pub mod react;

pub use react::{ReActAgent, ReActAgentBuilder, ReActOutcome, ToolRegistry};
