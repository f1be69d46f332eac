//! Per-turn pipeline: classify, plan, generate, apply.
//!
//! The session's mutex is held for the whole turn, so a second request for
//! the same session waits instead of racing. Generation failures degrade to
//! a deterministic fallback reply; the planned state update still applies,
//! since it reflects only actions that actually happened during planning.

use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use scheduling_cell::ScheduleStore;
use shared_config::AppConfig;

use crate::error::DialogueError;
use crate::models::{
    BookingStatus, ChatMessage, ConversationPhase, ConversationState, MessageResponse,
    MessageRole, SessionHistoryResponse,
};
use crate::prompts;
use crate::services::generation::GenerationClient;
use crate::services::intent;
use crate::services::session::SessionStore;
use crate::services::state::{apply_update, StateMachine};

pub struct DialogueOrchestrator {
    sessions: SessionStore,
    machine: StateMachine,
    generation: GenerationClient,
}

impl DialogueOrchestrator {
    pub fn new(config: &AppConfig, store: Arc<ScheduleStore>) -> Self {
        Self {
            sessions: SessionStore::new(config.session_ttl_minutes),
            machine: StateMachine::new(config, store),
            generation: GenerationClient::new(config),
        }
    }

    /// Run one conversation turn and return the reply plus machine-readable
    /// status.
    pub async fn process_message(
        &self,
        message: &str,
        session_id: Option<String>,
    ) -> Result<MessageResponse, DialogueError> {
        let (session_id, handle) = self.sessions.get_or_create(session_id).await;
        let mut state = handle.lock().await;

        let today = Local::now().date_naive();
        let (intent, entities) = intent::classify(message, state.phase, today);
        debug!(
            "Session {} turn: intent {} in phase {}",
            session_id, intent, state.phase
        );

        let plan = self.machine.plan_turn(intent, &entities, message, &state).await;

        let reply = match self.generation.reply(&state.messages, message, &plan.context).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Generation collaborator unavailable, using fallback: {}", e);
                contextual_fallback(message, &plan.context).to_string()
            }
        };

        state.messages.push(ChatMessage {
            role: MessageRole::User,
            content: message.to_string(),
            timestamp: Utc::now(),
        });
        apply_update(&mut state, plan.update);
        state.messages.push(ChatMessage {
            role: MessageRole::Assistant,
            content: reply.clone(),
            timestamp: Utc::now(),
        });

        info!(
            "Session {} now in phase {} (intent {})",
            session_id, state.phase, intent
        );

        Ok(MessageResponse {
            message: reply,
            session_id,
            intent,
            phase: state.phase,
            booking_status: booking_status(&state),
        })
    }

    pub async fn session_history(
        &self,
        session_id: &str,
    ) -> Result<SessionHistoryResponse, DialogueError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or_else(|| DialogueError::SessionNotFound(session_id.to_string()))?;
        let state = handle.lock().await;

        Ok(SessionHistoryResponse {
            session_id: session_id.to_string(),
            messages: state.messages.clone(),
            current_phase: state.phase,
        })
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), DialogueError> {
        if self.sessions.remove(session_id).await {
            info!("Deleted session {}", session_id);
            Ok(())
        } else {
            Err(DialogueError::SessionNotFound(session_id.to_string()))
        }
    }
}

fn booking_status(state: &ConversationState) -> Option<BookingStatus> {
    let slot = state.selected_slot.as_ref()?;

    if state.phase == ConversationPhase::Completed {
        Some(BookingStatus {
            status: "completed".to_string(),
            phase: None,
            date: slot.date,
            time: slot.start_time,
        })
    } else {
        Some(BookingStatus {
            status: "in_progress".to_string(),
            phase: Some(state.phase),
            date: slot.date,
            time: slot.start_time,
        })
    }
}

/// Deterministic reply used when the generation collaborator is down or not
/// configured. Keyed off the user's message and the planned context.
fn contextual_fallback(message: &str, context: &str) -> &'static str {
    let lower = message.to_lowercase();

    if ["schedule", "book", "appointment", "see doctor"]
        .iter()
        .any(|w| lower.contains(w))
    {
        if context.contains("Available") {
            return prompts::FALLBACK_SCHEDULE_WITH_SLOTS;
        }
        return prompts::FALLBACK_SCHEDULE;
    }

    if ["hi", "hello", "hey", "good morning", "good afternoon"]
        .iter()
        .any(|w| lower.contains(w))
    {
        return prompts::FALLBACK_GREETING;
    }

    if [
        "morning",
        "afternoon",
        "tomorrow",
        "today",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
    ]
    .iter()
    .any(|w| lower.contains(w))
    {
        return prompts::FALLBACK_DATE_TIME;
    }

    prompts::FALLBACK_DEFAULT
}
