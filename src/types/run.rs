//! Run types: one execution of an agent against a thread.

use serde::{Deserialize, Serialize};

/// A run of an agent over a thread's current message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RunError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
}

/// Run lifecycle status as reported by the remote service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
}

impl RunStatus {
    /// Whether the run has reached a state it will never leave.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired
        )
    }
}

/// Error detail attached to a failed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// Callback the service raises mid-run when it wants declared function
/// tools executed and their outputs submitted back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredAction {
    SubmitToolOutputs {
        submit_tool_outputs: SubmitToolOutputs,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<RequiredToolCall>,
}

/// One function invocation requested by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequiredToolCall {
    pub id: String,
    pub function: RequiredFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequiredFunctionCall {
    pub name: String,
    /// JSON-encoded argument object, exactly as the service sends it.
    pub arguments: String,
}
