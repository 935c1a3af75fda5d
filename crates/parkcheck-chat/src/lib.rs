//! parkcheck-chat
//!
//! Topic-constrained chat helper: the per-session conversation state
//! machine and the hosted chat transport.

pub mod cohere;
pub mod error;
pub mod session;

use parkcheck_core::models::transcript::ChatEntry;

use crate::error::ChatError;

/// A hosted chat model.
///
/// Receives the full transcript (system instruction first, newest user
/// message last) and returns the assistant's reply text. Implementations
/// block the calling thread.
pub trait ChatBackend: Send + Sync {
    fn complete(&self, messages: &[ChatEntry]) -> Result<String, ChatError>;

    /// Whether requests can be attempted at all (e.g. credentials present).
    fn is_configured(&self) -> bool {
        true
    }
}
