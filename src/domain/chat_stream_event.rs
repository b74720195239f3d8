use super::ConversationId;

/// One downstream frame of a relayed chat response.
///
/// A relay emits `Start`, then any number of `Content`, then exactly one of
/// `End` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStreamEvent {
    Start { conversation_id: ConversationId },
    Content { text: String },
    End,
    Error { message: String },
}

impl ChatStreamEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ChatStreamEvent::Start { .. } => "start",
            ChatStreamEvent::Content { .. } => "content",
            ChatStreamEvent::End => "end",
            ChatStreamEvent::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatStreamEvent::End | ChatStreamEvent::Error { .. })
    }
}
