//! Thread message types.

use serde::{Deserialize, Serialize};

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One turn in a thread. Threads are ordered append-only logs; the
/// position of a message in the listing is its insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl ThreadMessage {
    /// The text of the final content block, if that block is textual.
    pub fn last_text(&self) -> Option<&str> {
        match self.content.last() {
            Some(MessageContent::Text { text }) => Some(text.value.as_str()),
            _ => None,
        }
    }
}

/// A single content block inside a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    ImageFile { image_file: ImageFileContent },
}

impl MessageContent {
    pub fn text(value: impl Into<String>) -> Self {
        MessageContent::Text {
            text: TextContent {
                value: value.into(),
                annotations: Vec::new(),
            },
        }
    }
}

/// Textual content with service-side annotations (citations etc.).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// A file-backed image block produced by the code interpreter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageFileContent {
    pub file_id: String,
}
