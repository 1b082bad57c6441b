//! Response extraction from a thread's message log.

use crate::types::{Role, ThreadMessage};

/// A reply selected from the thread, with the role that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReply {
    pub role: Role,
    pub text: String,
}

/// Select the text to display from an oldest-first message log.
///
/// Every message whose final content block is textual is a candidate,
/// and later candidates overwrite earlier ones, so the last qualifying
/// message in thread order wins. Messages with an empty content list
/// are skipped rather than treated as errors.
pub fn latest_text_reply(messages: &[ThreadMessage]) -> Option<ExtractedReply> {
    let mut reply = None;
    for message in messages {
        if let Some(text) = message.last_text() {
            reply = Some(ExtractedReply {
                role: message.role,
                text: text.to_string(),
            });
        }
    }
    reply
}
