//! Convenience re-exports.

pub use crate::client::{AgentClient, AgentDefinition, RestAgentClient};
pub use crate::config::Config;
pub use crate::error::{KaiwaError, Result};
pub use crate::session::{SessionManager, INTERNAL_ERROR_REPLY, NO_RESPONSE_REPLY};
pub use crate::tools::{default_registry, ToolDefinition, ToolRegistry};
pub use crate::types::{MessageContent, Role, Run, RunStatus, ThreadMessage};
