//! Facade over the remote agent service.

pub mod http;
pub mod rest;

pub use rest::RestAgentClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::tools::ToolDefinition;
use crate::types::{Role, Run, ThreadMessage};

/// Everything needed to create one remote agent.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolDefinition>,
    /// Extra headers sent with the creation request (feature opt-ins).
    pub headers: Vec<(String, String)>,
}

impl AgentDefinition {
    pub fn new(
        model: impl Into<String>,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Attach the declared toolset.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Opt in to the service's preview feature set.
    pub fn with_preview_features(mut self) -> Self {
        self.headers
            .push(("x-ms-enable-preview".to_string(), "true".to_string()));
        self
    }
}

/// The remote operations the session core consumes.
///
/// Every call is attempted exactly once per logical step; the core never
/// retries on its own. `create_and_process_run` resolves all internal
/// polling itself, so callers only ever observe terminal runs.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Create an agent, returning its service-owned identifier.
    async fn create_agent(&self, definition: &AgentDefinition) -> Result<String>;

    /// Create a new, empty thread.
    async fn create_thread(&self) -> Result<String>;

    /// Append a message to a thread, returning the message identifier.
    async fn create_message(&self, thread_id: &str, role: Role, content: &str) -> Result<String>;

    /// Run the agent against the thread and await a terminal status.
    async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<Run>;

    /// Full ordered message log for a thread, most-recent-last.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// Delete a thread.
    async fn delete_thread(&self, thread_id: &str) -> Result<()>;

    /// Delete an agent.
    async fn delete_agent(&self, agent_id: &str) -> Result<()>;
}
