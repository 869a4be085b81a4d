//! Conversational core of the Journey travel assistant.
//!
//! Owns the turn lifecycle of one open conversation view: session identity,
//! the append-only message store, the remote webhook client with its local
//! fallback replies, and the classifier that splits reply text into
//! presentation blocks.

pub mod classifier;
pub mod client;
pub mod controller;
pub mod error;
pub mod fallback;
pub mod hints;
pub mod session;
pub mod store;
pub mod types;

pub use classifier::BlockClassifier;
pub use client::{Assistant, EndpointMode, FallbackReason, RemoteAssistantClient};
pub use controller::{ConversationController, ConversationSummary, PendingReply};
pub use error::ChatError;
pub use fallback::FallbackEngine;
pub use session::Session;
pub use store::MessageStore;
pub use types::{BlockKind, ClassifiedBlock, ConversationTurn, Sender, TurnHints};
