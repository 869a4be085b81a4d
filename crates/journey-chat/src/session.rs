//! Session identity for one open conversation view.
//!
//! A token is minted once when the view opens and reused for every outbound
//! call until the view closes, so the remote workflow can correlate turns.

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Fixed namespace prefix of every session token.
pub const TOKEN_PREFIX: &str = "travel_agent_";

/// Length of the random suffix.
const RANDOM_SUFFIX_LEN: usize = 9;

/// Create a fresh session token: prefix, epoch milliseconds, random suffix.
pub fn create_session_token() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}_{}", TOKEN_PREFIX, millis, suffix)
}

/// Identity of one open conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user_id: Option<String>,
    opened_at: DateTime<Utc>,
}

impl Session {
    /// Open a new session with a freshly minted token.
    pub fn open(user_id: Option<String>) -> Self {
        let session = Self {
            token: create_session_token(),
            user_id,
            opened_at: Utc::now(),
        };
        tracing::debug!(session = %session.token, "Session opened");
        session
    }

    /// Opaque token sent as `sessionId`.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Optional caller-supplied user identifier.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}
