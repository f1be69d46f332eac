// libs/dialogue-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use scheduling_cell::models::{hhmm, AppointmentType, TimePreference, TimeSlot};

// ==============================================================================
// INTENTS AND PHASES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Greeting,
    Faq,
    Schedule,
    Reschedule,
    Cancel,
    ProvideInfo,
    SelectSlot,
    Confirm,
    Decline,
    Other,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::Greeting => "GREETING",
            Intent::Faq => "FAQ",
            Intent::Schedule => "SCHEDULE",
            Intent::Reschedule => "RESCHEDULE",
            Intent::Cancel => "CANCEL",
            Intent::ProvideInfo => "PROVIDE_INFO",
            Intent::SelectSlot => "SELECT_SLOT",
            Intent::Confirm => "CONFIRM",
            Intent::Decline => "DECLINE",
            Intent::Other => "OTHER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationPhase {
    Greeting,
    UnderstandingNeeds,
    CollectingPreferences,
    SlotRecommendation,
    CollectingInfo,
    Confirmation,
    Completed,
    Faq,
}

impl fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationPhase::Greeting => "GREETING",
            ConversationPhase::UnderstandingNeeds => "UNDERSTANDING_NEEDS",
            ConversationPhase::CollectingPreferences => "COLLECTING_PREFERENCES",
            ConversationPhase::SlotRecommendation => "SLOT_RECOMMENDATION",
            ConversationPhase::CollectingInfo => "COLLECTING_INFO",
            ConversationPhase::Confirmation => "CONFIRMATION",
            ConversationPhase::Completed => "COMPLETED",
            ConversationPhase::Faq => "FAQ",
        };
        f.write_str(s)
    }
}

// ==============================================================================
// ENTITIES
// ==============================================================================

/// Everything the classifier may extract from one utterance. Absent matches
/// stay `None`; `time_preference` uses `Any` as its absent sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntities {
    pub date: Option<NaiveDate>,
    pub time_preference: TimePreference,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub time_selection: Option<String>,
    pub date_selection: Option<String>,
}

impl Default for ExtractedEntities {
    fn default() -> Self {
        Self {
            date: None,
            time_preference: TimePreference::Any,
            email: None,
            phone: None,
            time_selection: None,
            date_selection: None,
        }
    }
}

impl ExtractedEntities {
    pub fn has_date_or_time(&self) -> bool {
        self.date.is_some() || self.time_preference != TimePreference::Any
    }
}

// ==============================================================================
// CONVERSATION STATE
// ==============================================================================

/// The slot a user settled on, resolved from free text against the cached
/// availability list when possible. Bookings are keyed by date and start
/// time, so this pair is the whole selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSlot {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
}

/// Contact details filled in one field per turn during COLLECTING_INFO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PatientDraft {
    pub fn is_complete(&self) -> bool {
        let filled = |f: &Option<String>| f.as_deref().is_some_and(|v| !v.is_empty());
        filled(&self.name) && filled(&self.phone) && filled(&self.email)
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.phone.is_none() {
            missing.push("phone number");
        }
        if self.email.is_none() {
            missing.push("email address");
        }
        missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// One session's full conversation record. Every field the turn logic may
/// read or write is declared here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: String,
    pub phase: ConversationPhase,
    pub appointment_type: Option<AppointmentType>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time_of_day: Option<TimePreference>,
    pub selected_slot: Option<SelectedSlot>,
    pub patient: PatientDraft,
    pub reason_for_visit: Option<String>,
    /// Slots last shown to the user; advisory only, re-validated at booking.
    pub available_slots: Option<Vec<TimeSlot>>,
    /// An FAQ interrupted a scheduling flow; offer to resume.
    pub pending_faq: bool,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            phase: ConversationPhase::Greeting,
            appointment_type: None,
            preferred_date: None,
            preferred_time_of_day: None,
            selected_slot: None,
            patient: PatientDraft::default(),
            reason_for_visit: None,
            available_slots: None,
            pending_faq: false,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<ConversationPhase>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub session_id: String,
    pub intent: Intent,
    pub phase: ConversationPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub current_phase: ConversationPhase,
}
