//! Conversation session: ordered history and single-flight turn-taking
//!
//! The session owns the transcript and an `awaiting_reply` gate. Submitting
//! a message appends the user entry plus a pending assistant placeholder and
//! arms the gate; nothing else may start until the turn resolves. Because
//! only one turn is ever in flight, message order is exactly submission
//! order - no interleaving of replies is possible. That total order is the
//! property everything else here leans on.
//!
//! Resolution mutates the placeholder in place (reply text on success, a
//! fixed fallback notice on failure) so the list identity the presentation
//! layer holds stays stable. The user message is never retracted; only the
//! assistant's side of a turn can fail.

use crate::errors::CompanionError;
use crate::types::{ChatMessage, MessageStatus, Role};
use uuid::Uuid;

/// Greeting seeded into every fresh session
pub const GREETING: &str = "Hi! I'm your learning companion. I can help answer \
questions about your plan or explain concepts. What are we working on?";

/// Fallback notice shown when the assistant's turn fails
pub const FALLBACK_NOTICE: &str = "I'm having trouble connecting to my brain \
right now. Please try again in a moment.";

/// Default cap on settled messages handed to the boundary per turn
pub const DEFAULT_MAX_CONTEXT_MESSAGES: usize = 64;

/// Session tuning knobs
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Most recent settled messages included in each turn's context;
    /// 0 means unlimited. The full transcript is always kept for display.
    pub max_context_messages: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_context_messages: DEFAULT_MAX_CONTEXT_MESSAGES,
        }
    }
}

/// Handle identifying one chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTicket {
    id: u64,
}

/// Everything the caller needs for exactly one boundary call
///
/// `history` is the transcript as it existed before this turn's messages
/// were appended - the boundary contract is "prior context + new user text",
/// never the unresolved placeholder.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub ticket: TurnTicket,
    pub history: Vec<ChatMessage>,
    pub text: String,
}

/// Owner of the ordered chat history for one dashboard visit
///
/// Created when the dashboard is entered, dropped when it is exited;
/// nothing persists across sessions.
#[derive(Debug)]
pub struct ConversationSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
    next_turn: u64,
    current_turn: Option<u64>,
    config: SessionConfig,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::assistant(GREETING)],
            awaiting_reply: false,
            next_turn: 0,
            current_turn: None,
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Read-only transcript for the presentation layer
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True while a turn is in flight
    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Submit a user message and arm the single-flight gate
    ///
    /// Rejected as a no-op (None, transcript untouched) while a reply is
    /// outstanding or when `text` is empty/whitespace. On acceptance the
    /// transcript grows by exactly two entries - the user message and the
    /// pending placeholder - and the returned request carries the context
    /// snapshot for one `send_turn` call.
    pub fn post_user_message(&mut self, text: &str) -> Option<TurnRequest> {
        if self.awaiting_reply || text.trim().is_empty() {
            return None;
        }

        // Snapshot before anything is appended
        let history = self.context_snapshot();

        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::pending_assistant());
        self.awaiting_reply = true;

        let id = self.next_turn;
        self.next_turn += 1;
        self.current_turn = Some(id);

        Some(TurnRequest {
            ticket: TurnTicket { id },
            history,
            text: text.to_string(),
        })
    }

    /// Settle the turn identified by `ticket`
    ///
    /// Replaces the pending placeholder in place: the reply with status
    /// `sent` on success, the fallback notice with status `failed` on
    /// failure. Either way the gate drops. A stale ticket (session cleared
    /// since submission) is ignored and returns false.
    pub fn resolve_turn(
        &mut self,
        ticket: TurnTicket,
        result: Result<String, CompanionError>,
    ) -> bool {
        if !self.awaiting_reply || self.current_turn != Some(ticket.id) {
            return false;
        }

        let placeholder = self
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.role == Role::Assistant && m.is_pending());

        let Some(placeholder) = placeholder else {
            // Gate armed without a placeholder cannot happen through the
            // public API; drop the gate and report nothing applied.
            self.awaiting_reply = false;
            self.current_turn = None;
            return false;
        };

        match result {
            Ok(reply) => {
                placeholder.content = reply;
                placeholder.status = MessageStatus::Sent;
            }
            Err(_) => {
                placeholder.content = FALLBACK_NOTICE.to_string();
                placeholder.status = MessageStatus::Failed;
            }
        }

        self.awaiting_reply = false;
        self.current_turn = None;
        true
    }

    /// Reset to a fresh transcript
    ///
    /// Any in-flight turn is orphaned: its ticket no longer matches, so a
    /// late resolution is suppressed.
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::assistant(GREETING)];
        self.awaiting_reply = false;
        self.current_turn = None;
    }

    /// Settled transcript handed to the boundary, oldest first
    ///
    /// Includes every settled message (sent and failed, role-tagged) up to
    /// the configured cap, taken from the most recent end.
    fn context_snapshot(&self) -> Vec<ChatMessage> {
        let settled: Vec<ChatMessage> = self
            .messages
            .iter()
            .filter(|m| m.is_settled())
            .cloned()
            .collect();

        let cap = self.config.max_context_messages;
        if cap == 0 || settled.len() <= cap {
            settled
        } else {
            settled[settled.len() - cap..].to_vec()
        }
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
