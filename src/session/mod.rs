//! Session lifecycle management: one agent and one thread per session.

pub mod extract;

pub use extract::{latest_text_reply, ExtractedReply};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::client::{AgentClient, AgentDefinition};
use crate::config::Config;
use crate::error::Result;
use crate::tools::ToolRegistry;
use crate::types::{Role, RunStatus};

/// Reply used when a message arrives before the session is established
/// (or after it ended). No remote call is made in that case.
pub const INTERNAL_ERROR_REPLY: &str =
    "An internal error occurred. Please end this session and start a new one.";

/// Reply used when the thread holds no extractable assistant text.
pub const NO_RESPONSE_REPLY: &str = "No response was obtained from the agent.";

const AGENT_NAME: &str = "Simple Chat Agent";

const DEFAULT_INSTRUCTIONS: &str = "\
You are a polite assistant. You perform the following duties:
- answer with the current time
- provide weather information
- look up and report user information

# Reply rules
- When you call a function, end the reply with a line break followed by \
Called Function : \"<function name>\"

# Constraints
- Extract information faithfully from the user's message and base your \
reply on it
- Do not add information the user did not provide, and do not insert \
unnecessary line breaks";

/// The deployment-fixed agent definition: configured model, instruction
/// text, the declared toolset, and the preview-feature opt-in.
pub fn default_agent_definition(config: &Config, tools: &ToolRegistry) -> AgentDefinition {
    AgentDefinition::new(&config.model, AGENT_NAME, DEFAULT_INSTRUCTIONS)
        .with_tools(tools.definitions())
        .with_preview_features()
}

/// Remote identifiers recorded for one session.
///
/// Both start as `None`; a session is only ready to relay messages once
/// both are present. A populated `agent_id` with no `thread_id` means
/// setup failed partway and the agent still needs deleting at cleanup.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub agent_id: Option<String>,
    pub thread_id: Option<String>,
}

/// Maps chat sessions to their remote agent/thread pair and drives the
/// full lifecycle: creation on start, relay + run on each message,
/// teardown on end.
///
/// The map is the only shared mutable state; each key is written only by
/// its own session's start/end handlers, and identifiers are cloned out
/// of the lock before any await so concurrent sessions never contend
/// across suspension points.
pub struct SessionManager {
    client: Arc<dyn AgentClient>,
    definition: AgentDefinition,
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl SessionManager {
    pub fn new(client: Arc<dyn AgentClient>, definition: AgentDefinition) -> Self {
        Self {
            client,
            definition,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a session has both remote identifiers recorded.
    pub fn is_ready(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .unwrap()
            .get(session_id)
            .map(|s| s.agent_id.is_some() && s.thread_id.is_some())
            .unwrap_or(false)
    }

    /// Create the session's agent and thread.
    ///
    /// The agent identifier is recorded before the thread is requested,
    /// so a failure between the two still leaves the agent deletable by
    /// [`end_session`](Self::end_session) instead of orphaned remotely.
    pub async fn start_session(&self, session_id: &str) -> Result<()> {
        let agent_id = self.client.create_agent(&self.definition).await?;
        {
            let mut sessions = self.sessions.write().unwrap();
            let state = sessions.entry(session_id.to_string()).or_default();
            state.agent_id = Some(agent_id.clone());
        }

        let thread_id = self.client.create_thread().await?;
        {
            let mut sessions = self.sessions.write().unwrap();
            let state = sessions.entry(session_id.to_string()).or_default();
            state.thread_id = Some(thread_id.clone());
        }

        info!(session_id, agent_id = %agent_id, thread_id = %thread_id, "session started");
        Ok(())
    }

    /// Relay one user message and produce exactly one reply string.
    ///
    /// A failed run is logged and the turn degrades to whatever text the
    /// thread still holds; an empty extraction degrades to
    /// [`NO_RESPONSE_REPLY`]. Transport failures propagate.
    pub async fn handle_message(&self, session_id: &str, content: &str) -> Result<String> {
        let (agent_id, thread_id) = {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(session_id) {
                Some(SessionState {
                    agent_id: Some(agent_id),
                    thread_id: Some(thread_id),
                }) => (agent_id.clone(), thread_id.clone()),
                _ => {
                    warn!(session_id, "message received without an established session");
                    return Ok(INTERNAL_ERROR_REPLY.to_string());
                }
            }
        };

        self.client
            .create_message(&thread_id, Role::User, content)
            .await?;

        let run = self
            .client
            .create_and_process_run(&thread_id, &agent_id)
            .await?;
        debug!(run_id = %run.id, status = ?run.status, "run finished");
        if run.status == RunStatus::Failed {
            warn!(
                run_id = %run.id,
                error = ?run.last_error,
                "run failed; surfacing last available message"
            );
        }

        let messages = self.client.list_messages(&thread_id).await?;
        match latest_text_reply(&messages) {
            Some(reply) => {
                debug!(role = reply.role.as_str(), "reply extracted");
                Ok(reply.text)
            }
            None => Ok(NO_RESPONSE_REPLY.to_string()),
        }
    }

    /// Tear down the session's remote resources, best-effort.
    ///
    /// Each deletion is attempted independently and failures are only
    /// logged; calling this twice, or for a session that never finished
    /// starting, is a safe no-op for whatever is missing.
    pub async fn end_session(&self, session_id: &str) {
        let state = self.sessions.write().unwrap().remove(session_id);
        let Some(state) = state else {
            debug!(session_id, "end requested for unknown session");
            return;
        };

        if let Some(thread_id) = state.thread_id {
            if let Err(err) = self.client.delete_thread(&thread_id).await {
                warn!(session_id, thread_id = %thread_id, error = %err, "failed to delete thread");
            }
        }
        if let Some(agent_id) = state.agent_id {
            if let Err(err) = self.client.delete_agent(&agent_id).await {
                warn!(session_id, agent_id = %agent_id, error = %err, "failed to delete agent");
            }
        }
        info!(session_id, "session ended");
    }
}
