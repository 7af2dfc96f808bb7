//! Chat message types for the conversation session
//!
//! Messages form an ordered, append-only sequence. The one sanctioned
//! mutation is resolving a `pending` assistant placeholder in place once its
//! asynchronous reply settles, which preserves list identity and order for
//! the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Delivery status of a message
///
/// `Pending` only ever appears on the newest assistant placeholder while a
/// turn is in flight; resolution settles it to `Sent` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Pending,
    Failed,
}

/// A single entry in the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A user message, settled immediately on submission
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        }
    }

    /// A settled assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        }
    }

    /// The optimistic assistant placeholder appended while a turn is in flight
    pub fn pending_assistant() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            status: MessageStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Settled messages are part of the context handed to the boundary
    pub fn is_settled(&self) -> bool {
        matches!(self.status, MessageStatus::Sent | MessageStatus::Failed)
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}
