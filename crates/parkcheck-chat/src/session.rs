//! Conversation state for one session.
//!
//! ```text
//!            begin            finish(Ok)
//!   Empty ─────────▶ AwaitingReply ─────────▶ Ready
//!     ▲                   │                    │
//!     │                   │ finish(Err)        │ begin
//!     │                   ▼                    ▼
//!     │                Failed ──── begin ──▶ AwaitingReply
//!     │
//!     └──────────── clear (from any state)
//! ```
//!
//! A failed exchange keeps the user's message but adds no assistant entry.
//! The next `begin` is accepted without a reset.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use parkcheck_core::models::transcript::{ChatEntry, Transcript};

use crate::ChatBackend;
use crate::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChatState {
    Empty,
    AwaitingReply,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Transcript,
    state: ChatState,
}

impl ChatSession {
    /// New conversation opened by the default system instruction.
    pub fn new() -> Self {
        Self::with_transcript(Transcript::default())
    }

    pub fn with_instruction(instruction: impl Into<String>) -> Self {
        Self::with_transcript(Transcript::new(instruction))
    }

    fn with_transcript(transcript: Transcript) -> Self {
        Self {
            transcript,
            state: ChatState::Empty,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Append the user's message and return the request to send.
    pub fn begin(&mut self, text: &str) -> Result<Vec<ChatEntry>, ChatError> {
        if self.state == ChatState::AwaitingReply {
            return Err(ChatError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.transcript.push_user(text);
        self.state = ChatState::AwaitingReply;
        Ok(self.transcript.entries().to_vec())
    }

    /// Record the outcome of the request started by [`begin`](Self::begin).
    pub fn finish(&mut self, result: Result<String, ChatError>) -> Result<String, ChatError> {
        if self.state != ChatState::AwaitingReply {
            return Err(ChatError::NothingPending);
        }

        match result {
            Ok(reply) => {
                self.transcript.push_assistant(reply.clone());
                self.state = ChatState::Ready;
                info!(entries = self.transcript.len(), "chat reply received");
                Ok(reply)
            }
            Err(e) => {
                self.state = ChatState::Failed;
                warn!(error = %e, "chat exchange failed");
                Err(e)
            }
        }
    }

    /// Send one message through `backend` and record the reply.
    pub fn send(&mut self, backend: &dyn ChatBackend, text: &str) -> Result<String, ChatError> {
        let request = self.begin(text)?;
        let result = backend.complete(&request);
        self.finish(result)
    }

    /// Drop every turn, keeping only the system instruction.
    pub fn clear(&mut self) {
        self.transcript.reset();
        self.state = ChatState::Empty;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
