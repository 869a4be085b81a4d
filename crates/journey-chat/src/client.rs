//! Remote assistant client for the travel workflow webhook.
//!
//! [`RemoteAssistantClient::send`] is total: a missing or placeholder endpoint,
//! a transport error, a non-2xx status or an unparseable body all end in a
//! local fallback reply. Callers never branch on failure.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use journey_core::AssistantConfig;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;
use crate::fallback::FallbackEngine;
use crate::session::Session;

/// Reply used when a well-formed body carries no usable text.
pub const DEFAULT_ACKNOWLEDGEMENT: &str = "I'm here to help with your travel planning!";

/// Endpoint substrings left over from setup guides.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "your-n8n-instance.com",
    "your-actual-n8n-instance.com",
    "your-webhook",
];

/// Reserved documentation domains.
const EXAMPLE_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

// =============================================================================
// Assistant seam
// =============================================================================

/// Anything that can answer a user turn.
///
/// The conversation controller is written against this trait. An `Err` here
/// becomes a synthetic "having trouble connecting" turn, never a crash.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn respond(&self, user_text: &str, session: &Session) -> Result<String, ChatError>;
}

// =============================================================================
// Endpoint resolution
// =============================================================================

/// Why a client runs without the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    Placeholder,
    Loopback,
    Invalid,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FallbackReason::NotConfigured => "no endpoint configured",
            FallbackReason::Placeholder => "endpoint is a placeholder",
            FallbackReason::Loopback => "endpoint is a local loopback address",
            FallbackReason::Invalid => "endpoint is not a valid http(s) URL",
        };
        f.write_str(s)
    }
}

/// Where replies come from, decided once when the client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointMode {
    Remote(Url),
    FallbackOnly(FallbackReason),
}

impl EndpointMode {
    /// Classify a raw endpoint setting.
    pub fn resolve(raw: Option<&str>, allow_local: bool) -> Self {
        let raw = match raw.map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => return EndpointMode::FallbackOnly(FallbackReason::NotConfigured),
        };

        let lower = raw.to_ascii_lowercase();
        if PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m)) {
            return EndpointMode::FallbackOnly(FallbackReason::Placeholder);
        }

        let url = match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return EndpointMode::FallbackOnly(FallbackReason::Invalid),
        };
        let host = match url.host_str() {
            Some(h) => h.to_ascii_lowercase(),
            None => return EndpointMode::FallbackOnly(FallbackReason::Invalid),
        };

        if EXAMPLE_DOMAINS
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
        {
            return EndpointMode::FallbackOnly(FallbackReason::Placeholder);
        }

        if !allow_local && is_local_host(&host) {
            return EndpointMode::FallbackOnly(FallbackReason::Loopback);
        }

        EndpointMode::Remote(url)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, EndpointMode::Remote(_))
    }
}

fn is_local_host(host: &str) -> bool {
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    match bare.parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback() || ip.is_unspecified(),
        Err(_) => false,
    }
}

// =============================================================================
// Wire format
// =============================================================================

/// JSON body posted to the webhook.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload<'a> {
    pub message: &'a str,
    /// ISO-8601, UTC, millisecond precision.
    pub timestamp: String,
    pub session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

impl<'a> WebhookPayload<'a> {
    pub fn new(message: &'a str, session: &'a Session) -> Self {
        Self {
            message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            session_id: session.token(),
            user_id: session.user_id(),
        }
    }
}

/// Extract reply text from a webhook response body.
///
/// Invalid JSON is an error. Valid JSON without a usable `response` or
/// `message` string (directly, or in the n8n `[{"output": {...}}]` form)
/// yields [`DEFAULT_ACKNOWLEDGEMENT`].
pub fn parse_reply_body(body: &str) -> Result<String, ChatError> {
    let value: Value = serde_json::from_str(body)?;
    Ok(extract_reply(&value)
        .unwrap_or(DEFAULT_ACKNOWLEDGEMENT)
        .to_string())
}

fn extract_reply(value: &Value) -> Option<&str> {
    match value {
        Value::Object(_) => text_field(value).or_else(|| value.get("output").and_then(text_field)),
        Value::Array(items) => items.first().and_then(extract_reply),
        _ => None,
    }
}

fn text_field(value: &Value) -> Option<&str> {
    ["response", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

// =============================================================================
// RemoteAssistantClient
// =============================================================================

/// Webhook client with a built-in fallback path.
pub struct RemoteAssistantClient {
    http: Client,
    mode: EndpointMode,
    fallback: FallbackEngine,
    timeout: Duration,
}

impl RemoteAssistantClient {
    pub fn new(mode: EndpointMode, fallback: FallbackEngine, timeout: Duration) -> Self {
        if let EndpointMode::FallbackOnly(reason) = &mode {
            tracing::warn!(%reason, "Assistant webhook unavailable, using fallback replies");
        }
        Self {
            http: Client::new(),
            mode,
            fallback,
            timeout,
        }
    }

    /// Build a client from the `[assistant]` config section.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let mode = EndpointMode::resolve(
            Some(config.webhook_url.as_str()),
            config.allow_local_endpoints,
        );
        Self::new(
            mode,
            FallbackEngine::new(config.fallback),
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub fn mode(&self) -> &EndpointMode {
        &self.mode
    }

    pub fn fallback(&self) -> &FallbackEngine {
        &self.fallback
    }

    /// Send one user utterance. Always resolves to reply text.
    ///
    /// At most one HTTP attempt is made; there is no retry.
    pub async fn send(&self, user_text: &str, session: &Session) -> String {
        let url = match &self.mode {
            EndpointMode::Remote(url) => url,
            EndpointMode::FallbackOnly(_) => return self.fallback.reply(user_text),
        };

        match self.post(url, user_text, session).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, session = %session.token(), "Webhook call failed, using fallback reply");
                self.fallback.reply(user_text)
            }
        }
    }

    async fn post(&self, url: &Url, user_text: &str, session: &Session) -> Result<String, ChatError> {
        let payload = WebhookPayload::new(user_text, session);

        let response = self
            .http
            .post(url.clone())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply = parse_reply_body(&body)?;
        tracing::debug!(status = status.as_u16(), len = reply.len(), "Webhook reply received");
        Ok(reply)
    }
}

#[async_trait]
impl Assistant for RemoteAssistantClient {
    async fn respond(&self, user_text: &str, session: &Session) -> Result<String, ChatError> {
        Ok(self.send(user_text, session).await)
    }
}
