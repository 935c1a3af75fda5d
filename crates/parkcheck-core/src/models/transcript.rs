use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Fixed instruction that opens every conversation.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful medical assistant. Only answer questions related to Parkinson’s disease.";

/// One entry of a chat transcript, tagged by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "role", content = "content", rename_all = "snake_case")]
#[ts(export)]
pub enum ChatEntry {
    System(String),
    User(String),
    Assistant(String),
}

impl ChatEntry {
    pub fn role(&self) -> &'static str {
        match self {
            Self::System(_) => "system",
            Self::User(_) => "user",
            Self::Assistant(_) => "assistant",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::System(text) | Self::User(text) | Self::Assistant(text) => text,
        }
    }
}

/// Ordered conversation history.
///
/// The first entry is always the system instruction. Entries can only be
/// appended through [`push_user`](Self::push_user) and
/// [`push_assistant`](Self::push_assistant), so the system entry can never
/// move or be duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            entries: vec![ChatEntry::System(system.into())],
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.entries.push(ChatEntry::User(text.into()));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.entries.push(ChatEntry::Assistant(text.into()));
    }

    /// Drop every turn, keeping only the system instruction.
    pub fn reset(&mut self) {
        self.entries.truncate(1);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Entries shown to the user: everything after the system instruction.
    pub fn visible(&self) -> &[ChatEntry] {
        &self.entries[1..]
    }

    pub fn system(&self) -> &str {
        self.entries[0].content()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when only the system instruction is present.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(SYSTEM_INSTRUCTION)
    }
}
