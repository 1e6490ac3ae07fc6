use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    SystemError,
}

/// Per-message lifecycle. `Composing` is the composer-side state of a draft
/// that has not been accepted into the session yet; accepted messages enter
/// the list in `Sent` state and only move forward from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageLifecycle {
    Composing,
    Sent,
    AwaitingResponse,
    Rendered,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    pub lifecycle: MessageLifecycle,
}

/// Transient placeholder shown while an assistant response is pending. Not a
/// Message: it is destroyed exactly once and never enters the message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingIndicator {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRejection {
    EmptyInput,
    TurnInFlight,
}

/// Handle for the single in-flight turn. Completion and failure only apply
/// when the ticket still matches the session's current turn, so a response
/// that arrives after the session moved on is discarded instead of rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    pub turn_id: u64,
    pub user_message_id: String,
    pub typing_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub conversation_id: String,
    pub messages: Vec<Message>,
    pub typing: Option<TypingIndicator>,
    #[serde(skip)]
    current_turn: Option<u64>,
    #[serde(skip)]
    next_local_id: u64,
}

impl ConversationSession {
    /// Creates the session for this page load. Time-based uniqueness is
    /// sufficient for the conversation identifier; the backend only uses it
    /// to correlate turns within one visit.
    pub fn new(now_unix_ms: u64) -> Self {
        Self {
            conversation_id: format!("conv-{now_unix_ms}"),
            messages: Vec::new(),
            typing: None,
            current_turn: None,
            next_local_id: 1,
        }
    }

    pub fn turn_in_flight(&self) -> bool {
        self.current_turn.is_some()
    }

    /// Seeds the greeting as an ordinary rendered assistant message.
    pub fn append_welcome(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() || !self.messages.is_empty() {
            return;
        }
        self.push_message(
            MessageRole::Assistant,
            trimmed.to_string(),
            MessageLifecycle::Rendered,
        );
    }

    /// Accepts one user submission and opens a turn: the user message is
    /// appended in `sent` state and exactly one typing indicator is created.
    /// A second submission while a turn is in flight is rejected; turns are
    /// strictly serialized.
    pub fn begin_turn(&mut self, input: &str) -> Result<TurnTicket, TurnRejection> {
        let text = input.trim().to_string();
        if text.is_empty() {
            return Err(TurnRejection::EmptyInput);
        }
        if self.current_turn.is_some() {
            return Err(TurnRejection::TurnInFlight);
        }

        let user_message_id =
            self.push_message(MessageRole::User, text.clone(), MessageLifecycle::Sent);
        let typing_id = format!("typing:{}", self.take_local_id());
        self.typing = Some(TypingIndicator {
            id: typing_id.clone(),
        });

        let turn_id = self.take_local_id();
        self.current_turn = Some(turn_id);
        Ok(TurnTicket {
            turn_id,
            user_message_id,
            typing_id,
            text,
        })
    }

    /// Marks the turn's user message as awaiting the remote response. Called
    /// once the network request has actually been issued.
    pub fn mark_awaiting(&mut self, ticket: &TurnTicket) {
        if !self.is_current(ticket) {
            return;
        }
        self.set_lifecycle(&ticket.user_message_id, MessageLifecycle::AwaitingResponse);
    }

    /// Closes the turn on success: the typing indicator is destroyed, the
    /// assistant reply is appended in `rendered` state, and the user message
    /// is settled. A stale ticket is ignored.
    pub fn complete_turn(&mut self, ticket: &TurnTicket, response_text: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.typing = None;
        self.current_turn = None;
        self.set_lifecycle(&ticket.user_message_id, MessageLifecycle::Rendered);
        self.push_message(
            MessageRole::Assistant,
            response_text.trim().to_string(),
            MessageLifecycle::Rendered,
        );
        true
    }

    /// Closes the turn on failure: the typing indicator is destroyed and a
    /// system-error message describing the failure is appended. A stale
    /// ticket is ignored.
    pub fn fail_turn(&mut self, ticket: &TurnTicket, error_text: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.typing = None;
        self.current_turn = None;
        self.set_lifecycle(&ticket.user_message_id, MessageLifecycle::Failed);
        self.push_message(
            MessageRole::SystemError,
            error_text.trim().to_string(),
            MessageLifecycle::Failed,
        );
        true
    }

    fn is_current(&self, ticket: &TurnTicket) -> bool {
        self.current_turn == Some(ticket.turn_id)
    }

    fn set_lifecycle(&mut self, message_id: &str, lifecycle: MessageLifecycle) {
        if let Some(message) = self
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
        {
            message.lifecycle = lifecycle;
        }
    }

    fn push_message(&mut self, role: MessageRole, text: String, lifecycle: MessageLifecycle) -> String {
        let id = format!("msg:{}", self.take_local_id());
        self.messages.push(Message {
            id: id.clone(),
            role,
            text,
            lifecycle,
        });
        id
    }

    fn take_local_id(&mut self) -> u64 {
        let current = self.next_local_id;
        self.next_local_id = self.next_local_id.saturating_add(1);
        current
    }
}
