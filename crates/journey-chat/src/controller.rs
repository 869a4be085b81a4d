//! Conversation controller: owns one open conversation view.
//!
//! Lifecycle per view:
//! open -> Idle -> (submit) AwaitingReply -> (reply or abandon) Idle -> ... -> close
//!
//! A submit while a reply is pending, or with blank input, is ignored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use journey_core::AssistantConfig;

use crate::client::{Assistant, RemoteAssistantClient};
use crate::error::ChatError;
use crate::hints;
use crate::session::Session;
use crate::store::MessageStore;
use crate::types::ConversationTurn;

/// Shown when an assistant reports an error instead of a reply.
pub const CONNECTION_TROUBLE_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment!";

/// Welcome turn seeded into a new conversation.
pub const GREETING: &str = "Hi! I'm your AI travel assistant. I can help you plan your perfect journey, find destinations, create itineraries, and answer any travel questions you have.

Here are some things you can ask me:
• \"Plan a 7-day trip to Japan\"
• \"What's the best time to visit Bali?\"
• \"Create a budget itinerary for Europe\"
• \"Suggest romantic destinations for couples\"
• \"Help me pack for a winter trip to Iceland\"

How can I help you today?";

/// Starter prompts offered before the first user turn.
pub const QUICK_SUGGESTIONS: &[&str] = &[
    "Plan a 7-day trip to Japan",
    "Best time to visit Bali?",
    "Budget travel tips for Europe",
    "Romantic getaways for couples",
];

/// Where the view is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingReply,
}

/// An accepted submission whose reply has not arrived yet.
///
/// Holds everything needed to fetch the reply without borrowing the
/// controller, so a UI loop can keep running while it resolves. Hand it back
/// to [`ConversationController::complete`] to finish the turn.
///
/// The owning view stays busy exactly as long as this value lives. Dropping
/// it without completing (a cancelled await, an abandoned UI task) returns the
/// view to idle and leaves the user turn unanswered.
pub struct PendingReply {
    user_text: String,
    session: Session,
    assistant: Arc<dyn Assistant>,
    busy: Arc<AtomicBool>,
    completed: bool,
}

impl PendingReply {
    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    /// Ask the assistant for a reply. Never fails.
    pub async fn fetch(&self) -> String {
        match self.assistant.respond(&self.user_text, &self.session).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, session = %self.session.token(), "Error getting assistant reply");
                CONNECTION_TROUBLE_REPLY.to_string()
            }
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if !self.completed {
            tracing::debug!(session = %self.session.token(), "Pending reply abandoned");
        }
        self.busy.store(false, Ordering::Release);
    }
}

/// What is left of a conversation after its view closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub session_token: String,
    pub turn_count: usize,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

/// Orchestrates the turn lifecycle of a single conversation view.
pub struct ConversationController {
    session: Session,
    store: MessageStore,
    assistant: Arc<dyn Assistant>,
    /// Set while a [`PendingReply`] for this view is alive.
    busy: Arc<AtomicBool>,
}

impl ConversationController {
    /// Open a new view with a fresh session and an empty store.
    pub fn open(assistant: Arc<dyn Assistant>, user_id: Option<String>) -> Self {
        let session = Session::open(user_id);
        tracing::info!(session = %session.token(), "Conversation opened");
        Self {
            session,
            store: MessageStore::new(),
            assistant,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open a view backed by the webhook client described by `config`.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let assistant = Arc::new(RemoteAssistantClient::from_config(config));
        let controller = Self::open(assistant, config.user_id().map(str::to_string));
        if config.greeting {
            controller.with_greeting()
        } else {
            controller
        }
    }

    /// Seed the store with the welcome turn.
    pub fn with_greeting(mut self) -> Self {
        if self.store.is_empty() {
            self.store.push_assistant(GREETING, None);
        }
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read-only view of all turns, in conversation order.
    pub fn turns(&self) -> &[ConversationTurn] {
        self.store.turns()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn state(&self) -> ConversationState {
        if self.is_busy() {
            ConversationState::AwaitingReply
        } else {
            ConversationState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starter prompts, offered only until the first user turn.
    pub fn quick_suggestions(&self) -> &'static [&'static str] {
        if self.store.iter().any(ConversationTurn::is_user) {
            &[]
        } else {
            QUICK_SUGGESTIONS
        }
    }

    /// Accept a submission: append the user turn and mark the view busy.
    ///
    /// Fails with [`ChatError::EmptyMessage`] for blank input and
    /// [`ChatError::Busy`] while a reply is still pending; neither changes
    /// the view.
    pub fn try_begin(&mut self, input: &str) -> Result<PendingReply, ChatError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.is_busy() {
            return Err(ChatError::Busy);
        }

        self.store.push_user(text);
        self.busy.store(true, Ordering::Release);
        tracing::debug!(session = %self.session.token(), turns = self.store.len(), "User turn appended");

        Ok(PendingReply {
            user_text: text.to_string(),
            session: self.session.clone(),
            assistant: Arc::clone(&self.assistant),
            busy: Arc::clone(&self.busy),
            completed: false,
        })
    }

    /// Like [`try_begin`](Self::try_begin), treating a rejected submission
    /// as a no-op.
    pub fn begin(&mut self, input: &str) -> Option<PendingReply> {
        match self.try_begin(input) {
            Ok(pending) => Some(pending),
            Err(e) => {
                tracing::debug!(error = %e, "Submission ignored");
                None
            }
        }
    }

    /// Finish a pending turn: append the assistant reply and return to idle.
    ///
    /// A pending reply opened by another view is refused and dropped, which
    /// frees that view instead of this one.
    pub fn complete(
        &mut self,
        mut pending: PendingReply,
        reply: String,
    ) -> Result<&ConversationTurn, ChatError> {
        if pending.session.token() != self.session.token() {
            return Err(ChatError::ForeignReply);
        }

        pending.completed = true;
        let reply_hints = hints::derive(&reply);
        let turn = self.store.push_assistant(reply, reply_hints);
        drop(pending);
        tracing::debug!(turn_id = %turn.id, "Assistant turn appended");
        Ok(turn)
    }

    /// Submit input and wait for the reply turn.
    ///
    /// Returns the assistant turn, or `None` if the submission was ignored.
    /// Dropping the returned future mid-flight leaves the view idle.
    pub async fn submit(&mut self, input: &str) -> Option<&ConversationTurn> {
        let pending = self.begin(input)?;
        let reply = pending.fetch().await;
        self.complete(pending, reply).ok()
    }

    /// Tear the view down, discarding its store and session.
    pub fn close(self) -> ConversationSummary {
        let summary = ConversationSummary {
            session_token: self.session.token().to_string(),
            turn_count: self.store.len(),
            opened_at: self.session.opened_at(),
            closed_at: Utc::now(),
        };
        tracing::info!(
            session = %summary.session_token,
            turns = summary.turn_count,
            "Conversation closed"
        );
        summary
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sender;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes the input and records the session token of every call.
    #[derive(Default)]
    struct EchoAssistant {
        tokens: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Assistant for EchoAssistant {
        async fn respond(&self, user_text: &str, session: &Session) -> Result<String, ChatError> {
            self.tokens.lock().unwrap().push(session.token().to_string());
            Ok(format!("echo: {}", user_text))
        }
    }

    struct FailingAssistant;

    /// Never answers within any test's patience.
    struct StalledAssistant;

    #[async_trait]
    impl Assistant for StalledAssistant {
        async fn respond(&self, _user_text: &str, _session: &Session) -> Result<String, ChatError> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    #[async_trait]
    impl Assistant for FailingAssistant {
        async fn respond(&self, _user_text: &str, _session: &Session) -> Result<String, ChatError> {
            Err(ChatError::Http("connection reset".to_string()))
        }
    }

    fn echo_controller() -> (ConversationController, Arc<EchoAssistant>) {
        let echo = Arc::new(EchoAssistant::default());
        let controller = ConversationController::open(echo.clone(), None);
        (controller, echo)
    }

    // ---- Opening ----

    #[test]
    fn test_open_is_idle_and_empty() {
        let (controller, _) = echo_controller();
        assert_eq!(controller.state(), ConversationState::Idle);
        assert!(controller.turns().is_empty());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_with_greeting_seeds_one_turn() {
        let (controller, _) = echo_controller();
        let controller = controller.with_greeting();
        assert_eq!(controller.turns().len(), 1);
        assert_eq!(controller.turns()[0].sender, Sender::Assistant);
        assert_eq!(controller.turns()[0].text, GREETING);
        assert!(controller.turns()[0].hints.is_none());
    }

    // ---- Submit lifecycle ----

    #[tokio::test]
    async fn test_submit_appends_user_then_assistant() {
        let (mut controller, _) = echo_controller();
        let reply = controller.submit("  hello there  ").await.unwrap();
        assert_eq!(reply.text, "echo: hello there");

        let turns = controller.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].sender, Sender::User);
        assert_eq!(turns[0].text, "hello there");
        assert_eq!(turns[1].sender, Sender::Assistant);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_begin_appends_user_turn_synchronously() {
        let (mut controller, _) = echo_controller();
        let pending = controller.begin("Plan a trip").unwrap();
        assert_eq!(pending.user_text(), "Plan a trip");
        assert_eq!(controller.turns().len(), 1);
        assert!(controller.turns()[0].is_user());
        assert_eq!(controller.state(), ConversationState::AwaitingReply);
    }

    #[test]
    fn test_begin_while_busy_is_noop() {
        let (mut controller, _) = echo_controller();
        let _pending = controller.begin("first").unwrap();
        let before = controller.turns().to_vec();

        assert!(controller.begin("second").is_none());
        assert_eq!(controller.turns(), before.as_slice());
        assert_eq!(controller.state(), ConversationState::AwaitingReply);
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let (mut controller, echo) = echo_controller();
        assert!(controller.submit("").await.is_none());
        assert!(controller.submit("   \n\t").await.is_none());
        assert!(controller.turns().is_empty());
        assert_eq!(controller.state(), ConversationState::Idle);
        assert!(echo.tokens.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_clears_busy() {
        let (mut controller, _) = echo_controller();
        let pending = controller.begin("hi").unwrap();
        let reply = pending.fetch().await;
        controller.complete(pending, reply).unwrap();
        assert_eq!(controller.state(), ConversationState::Idle);
        assert!(controller.begin("again").is_some());
    }

    #[test]
    fn test_try_begin_reports_rejections() {
        let (mut controller, _) = echo_controller();
        assert!(matches!(controller.try_begin("  "), Err(ChatError::EmptyMessage)));

        let _pending = controller.try_begin("first").unwrap();
        assert!(matches!(controller.try_begin("second"), Err(ChatError::Busy)));
        assert_eq!(controller.turns().len(), 1);
    }

    #[test]
    fn test_dropped_pending_reply_frees_view() {
        let (mut controller, _) = echo_controller();
        let pending = controller.begin("first").unwrap();
        drop(pending);

        assert!(!controller.is_busy());
        assert_eq!(controller.state(), ConversationState::Idle);
        assert!(controller.begin("second").is_some());
        assert_eq!(controller.turns().len(), 2);
        assert!(controller.turns().iter().all(ConversationTurn::is_user));
    }

    #[tokio::test]
    async fn test_cancelled_submit_frees_view() {
        let mut controller = ConversationController::open(Arc::new(StalledAssistant), None);
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            controller.submit("hello"),
        )
        .await;
        assert!(waited.is_err());

        assert!(!controller.is_busy());
        assert_eq!(controller.turns().len(), 1);
        assert!(controller.begin("again").is_some());
    }

    #[tokio::test]
    async fn test_complete_refuses_reply_from_other_view() {
        let (mut a, _) = echo_controller();
        let (mut b, _) = echo_controller();

        let pending = a.begin("for a").unwrap();
        let reply = pending.fetch().await;
        let result = b.complete(pending, reply);

        assert!(matches!(result, Err(ChatError::ForeignReply)));
        assert!(b.turns().is_empty());
        assert_eq!(a.turns().len(), 1);
        assert!(!a.is_busy());
    }

    #[tokio::test]
    async fn test_assistant_error_becomes_synthetic_turn() {
        let mut controller = ConversationController::open(Arc::new(FailingAssistant), None);
        let reply = controller.submit("hello").await.unwrap();
        assert_eq!(reply.text, CONNECTION_TROUBLE_REPLY);
        assert_eq!(reply.sender, Sender::Assistant);
        assert!(!controller.is_busy());
        assert_eq!(controller.turns().len(), 2);
    }

    // ---- Session identity ----

    #[tokio::test]
    async fn test_session_token_stable_across_sends() {
        let (mut controller, echo) = echo_controller();
        let token = controller.session().token().to_string();
        for msg in ["one", "two", "three"] {
            controller.submit(msg).await.unwrap();
        }
        let seen = echo.tokens.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|t| *t == token));
        assert_eq!(controller.session().token(), token);
    }

    #[test]
    fn test_views_have_independent_sessions() {
        let (a, _) = echo_controller();
        let (b, _) = echo_controller();
        assert_ne!(a.session().token(), b.session().token());
    }

    // ---- Ordering ----

    #[tokio::test]
    async fn test_turns_alternate_in_order() {
        let (mut controller, _) = echo_controller();
        for i in 0..5 {
            controller.submit(&format!("message {}", i)).await.unwrap();
        }
        let turns = controller.turns();
        assert_eq!(turns.len(), 10);
        for (i, pair) in turns.chunks(2).enumerate() {
            assert_eq!(pair[0].text, format!("message {}", i));
            assert_eq!(pair[1].text, format!("echo: message {}", i));
        }
    }

    // ---- Hints ----

    #[tokio::test]
    async fn test_assistant_turn_gets_hints_for_places() {
        let (mut controller, _) = echo_controller();
        let reply = controller.submit("Ubud rice terraces").await.unwrap();
        let hints = reply.hints.as_ref().unwrap();
        assert!(hints.has_map);
        assert!(!hints.related_questions.is_empty());
    }

    #[tokio::test]
    async fn test_assistant_turn_without_places_has_no_hints() {
        let (mut controller, _) = echo_controller();
        let reply = controller.submit("hello").await.unwrap();
        assert!(reply.hints.is_none());
    }

    // ---- Quick suggestions ----

    #[tokio::test]
    async fn test_quick_suggestions_until_first_user_turn() {
        let (controller, _) = echo_controller();
        let mut controller = controller.with_greeting();
        assert_eq!(controller.quick_suggestions(), QUICK_SUGGESTIONS);
        controller.submit("hi").await.unwrap();
        assert!(controller.quick_suggestions().is_empty());
    }

    // ---- Teardown ----

    #[tokio::test]
    async fn test_close_reports_summary() {
        let (mut controller, _) = echo_controller();
        let token = controller.session().token().to_string();
        controller.submit("hi").await.unwrap();
        let summary = controller.close();
        assert_eq!(summary.session_token, token);
        assert_eq!(summary.turn_count, 2);
        assert!(summary.closed_at >= summary.opened_at);
    }

    #[test]
    fn test_reopen_gets_fresh_state() {
        let (first, _) = echo_controller();
        let first_token = first.session().token().to_string();
        first.close();
        let (second, _) = echo_controller();
        assert!(second.turns().is_empty());
        assert_ne!(second.session().token(), first_token);
    }

    // ---- End to end with the fallback path ----

    #[tokio::test]
    async fn test_unconfigured_japan_request_gets_itinerary() {
        let config = AssistantConfig::default();
        let mut controller = ConversationController::from_config(&config);
        assert_eq!(controller.turns().len(), 1); // greeting

        let reply = controller
            .submit("Plan a 7-day trip to Japan")
            .await
            .unwrap()
            .clone();
        assert!(reply.text.contains("Japan"));
        assert!(reply.text.contains("Kyoto"));
        assert!(!reply.text.starts_with("I'm here to help you plan"));
        assert_eq!(controller.turns().len(), 3);
        assert!(!controller.is_busy());
    }
}
