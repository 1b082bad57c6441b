//! Wire and data types for the remote agent service.

pub mod message;
pub mod run;

pub use message::{ImageFileContent, MessageContent, Role, TextContent, ThreadMessage};
pub use run::{
    RequiredAction, RequiredFunctionCall, RequiredToolCall, Run, RunError, RunStatus,
    SubmitToolOutputs,
};
