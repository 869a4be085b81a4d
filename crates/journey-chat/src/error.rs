//! Error types for the conversational core.
//!
//! None of these reach the person chatting: the remote client turns every
//! transport failure into a fallback reply, the controller turns anything an
//! [`Assistant`](crate::client::Assistant) still reports into a synthetic
//! assistant turn, and rejected submissions are no-ops.

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a reply is already pending")]
    Busy,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    MalformedReply(String),
    #[error("reply belongs to another conversation")]
    ForeignReply,
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else if let Some(status) = err.status() {
            ChatError::Status(status.as_u16())
        } else if err.is_decode() {
            ChatError::MalformedReply(err.to_string())
        } else {
            ChatError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::MalformedReply(err.to_string())
    }
}
