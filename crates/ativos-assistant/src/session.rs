//! Chat session: append-only transcript with a single-flight turn pipeline.
//!
//! A session owns the transcript, the pending input buffer, and the
//! idle/generating phase. `submit` runs the whole turn: guard, append the
//! user message, gather context and generate, append the reply. Surfaces
//! subscribe to [`SessionEvent`] to follow transcript growth.

use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use ativos_core::config::AssistantConfig;
use ativos_core::types::Identity;

use crate::context::ContextAggregator;

/// Broadcast buffer for session events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Transcript types
// =============================================================================

/// Originator of a transcript message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    User,
    Assistant,
}

impl std::fmt::Display for MessageSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSender::User => write!(f, "user"),
            MessageSender::Assistant => write!(f, "assistant"),
        }
    }
}

/// One transcript entry. Never edited or removed once appended; its only
/// identity is its position in the transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: MessageSender,
    pub text: String,
    /// Unix seconds at append time.
    pub created_at: i64,
}

impl Message {
    fn user(text: impl Into<String>) -> Self {
        Self {
            sender: MessageSender::User,
            text: text.into(),
            created_at: Utc::now().timestamp(),
        }
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: MessageSender::Assistant,
            text: text.into(),
            created_at: Utc::now().timestamp(),
        }
    }
}

// =============================================================================
// Phase state machine
// =============================================================================

/// Where a session is in its request cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Ready for input.
    #[default]
    Idle,
    /// A generation request is in flight.
    Generating,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Generating => write!(f, "generating"),
        }
    }
}

impl SessionPhase {
    /// Check whether a transition to `target` is allowed.
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        matches!(
            (self, target),
            (SessionPhase::Idle, SessionPhase::Generating)
                | (SessionPhase::Generating, SessionPhase::Idle)
        )
    }
}

// =============================================================================
// Submission outcome and events
// =============================================================================

/// Result of a [`ChatSession::submit`] call.
///
/// Rejected submissions are quiet no-ops rather than errors: session state
/// is untouched and the caller may simply submit again later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The turn completed and the reply was appended.
    Answered,
    /// The turn failed; the error text was appended as the reply.
    Failed,
    /// The input buffer was empty or whitespace-only.
    IgnoredEmpty,
    /// A request was already in flight.
    IgnoredBusy,
}

/// Notification that observable session state changed.
///
/// Emitted on every transcript append and phase flip so a surface can keep
/// its viewport pinned to the latest entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SessionEvent {
    MessageAppended { index: usize },
    PhaseChanged { generating: bool },
}

impl SessionEvent {
    /// Stable name for logging and host-side dispatch.
    pub fn event_name(&self) -> &'static str {
        match self {
            SessionEvent::MessageAppended { .. } => "message_appended",
            SessionEvent::PhaseChanged { .. } => "phase_changed",
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Mutable state guarded by the session lock.
#[derive(Debug, Default)]
struct ChatState {
    transcript: Vec<Message>,
    pending_input: String,
    phase: SessionPhase,
}

/// One open conversation with the assistant.
///
/// The transcript only grows, and at most one generation request is in
/// flight: the phase guard and the user-message append happen under the same
/// lock, so concurrent submits cannot both dispatch. The lock is never held
/// across the generation await.
pub struct ChatSession {
    id: Uuid,
    aggregator: ContextAggregator,
    identity: Identity,
    quick_prompts: Vec<String>,
    state: Mutex<ChatState>,
    events: broadcast::Sender<SessionEvent>,
}

// Manual impl: `aggregator` holds an `Arc<dyn AssistantBackend>`, which has
// no `Debug` bound, so the derive is unavailable.
impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("quick_prompts", &self.quick_prompts)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Create a session seeded from the assistant configuration.
    pub(crate) fn new(
        aggregator: ContextAggregator,
        identity: Identity,
        config: &AssistantConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut transcript = Vec::new();
        if !config.greeting.is_empty() {
            transcript.push(Message::assistant(config.greeting.clone()));
        }
        let session = Self {
            id: Uuid::new_v4(),
            aggregator,
            identity,
            quick_prompts: config.quick_prompts.clone(),
            state: Mutex::new(ChatState {
                transcript,
                pending_input: String::new(),
                phase: SessionPhase::Idle,
            }),
            events,
        };
        debug!(session = %session.id, "chat session created");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the transcript, oldest first.
    pub fn transcript(&self) -> Vec<Message> {
        self.state
            .lock()
            .map(|state| state.transcript.clone())
            .unwrap_or_default()
    }

    pub fn pending_input(&self) -> String {
        self.state
            .lock()
            .map(|state| state.pending_input.clone())
            .unwrap_or_default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state
            .lock()
            .map(|state| state.phase)
            .unwrap_or_default()
    }

    pub fn is_generating(&self) -> bool {
        self.phase() == SessionPhase::Generating
    }

    /// The suggested prompts configured for this session.
    pub fn quick_prompts(&self) -> &[String] {
        &self.quick_prompts
    }

    /// Replace the pending input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.pending_input = text.into();
        }
    }

    /// Copy the quick prompt at `index` into the input buffer.
    ///
    /// Returns false when the index is out of range. Does not submit.
    pub fn apply_quick_prompt(&self, index: usize) -> bool {
        match self.quick_prompts.get(index) {
            Some(prompt) => {
                self.set_input(prompt.clone());
                true
            }
            None => false,
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Run one full turn from the pending input buffer.
    ///
    /// Busy and empty submissions return without touching any state. A
    /// dispatched turn appends the user message first, then the reply (or
    /// the error text) once generation settles, and always ends idle.
    pub async fn submit(&self) -> SubmitOutcome {
        let (prompt, user_index) = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(e) => {
                    error!(session = %self.id, "session lock poisoned: {}", e);
                    return SubmitOutcome::Failed;
                }
            };
            if state.phase == SessionPhase::Generating {
                debug!(session = %self.id, "submit ignored: request already in flight");
                return SubmitOutcome::IgnoredBusy;
            }
            let prompt = state.pending_input.trim().to_string();
            if prompt.is_empty() {
                debug!(session = %self.id, "submit ignored: empty input");
                return SubmitOutcome::IgnoredEmpty;
            }

            state.transcript.push(Message::user(prompt.clone()));
            state.pending_input.clear();
            self.transition(&mut state, SessionPhase::Generating);
            (prompt, state.transcript.len() - 1)
        };
        self.notify(SessionEvent::MessageAppended { index: user_index });
        self.notify(SessionEvent::PhaseChanged { generating: true });

        let result = self.aggregator.generate_answer(&prompt, &self.identity).await;

        let (outcome, reply_index) = {
            // A bail here would strand the phase at Generating, so a poisoned
            // lock is recovered rather than propagated.
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(poisoned) => {
                    error!(session = %self.id, "session lock poisoned, recovering state");
                    self.state.clear_poison();
                    poisoned.into_inner()
                }
            };
            let (outcome, reply) = match result {
                Ok(report) => (SubmitOutcome::Answered, Message::assistant(report.report)),
                Err(e) => {
                    warn!(session = %self.id, error = %e, "turn failed");
                    (SubmitOutcome::Failed, Message::assistant(e.user_message()))
                }
            };
            state.transcript.push(reply);
            self.transition(&mut state, SessionPhase::Idle);
            (outcome, state.transcript.len() - 1)
        };
        self.notify(SessionEvent::MessageAppended { index: reply_index });
        self.notify(SessionEvent::PhaseChanged { generating: false });

        info!(session = %self.id, outcome = ?outcome, "turn finished");
        outcome
    }

    /// Apply a phase transition, ignoring any that the machine forbids.
    fn transition(&self, state: &mut ChatState, target: SessionPhase) {
        if !state.phase.can_transition_to(&target) {
            warn!(
                session = %self.id,
                from = %state.phase,
                to = %target,
                "invalid phase transition ignored"
            );
            return;
        }
        debug!(session = %self.id, from = %state.phase, to = %target, "phase transition");
        state.phase = target;
    }

    fn notify(&self, event: SessionEvent) {
        // Send fails only when there are no subscribers.
        let _ = self.events.send(event);
    }
}

// =============================================================================
// Tests
// =============================================================================
