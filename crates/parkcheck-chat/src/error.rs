use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Transport(String),

    #[error("chat service is not configured (missing API key)")]
    NotConfigured,

    #[error("a reply to the previous message is still pending")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,

    #[error("no message is awaiting a reply")]
    NothingPending,
}
