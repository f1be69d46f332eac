//! Turn planning for the conversation state machine.
//!
//! Each turn produces a `TurnPlan`: the context string handed to the
//! generation collaborator plus a `StateUpdate` describing every field that
//! changes this turn. Planning may read availability and place bookings, but
//! it never mutates `ConversationState`; the update is applied only after
//! the reply is produced, so a failed turn leaves no partial state.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveTime, Utc};
use tracing::{info, warn};

use scheduling_cell::models::{
    AppointmentType, BookingRequest, PatientInfo, TimePreference, TimeSlot,
};
use scheduling_cell::services::availability::filter_by_preference;
use scheduling_cell::services::{AvailabilityService, BookingService};
use scheduling_cell::ScheduleStore;
use shared_config::AppConfig;

use crate::models::{
    ConversationPhase, ConversationState, ExtractedEntities, Intent, SelectedSlot,
};
use crate::services::parsers;
use crate::services::retrieval::RetrievalClient;

const SLOT_DISPLAY_LIMIT: usize = 5;
const ALTERNATIVE_DATE_LIMIT: usize = 3;
const UPCOMING_DIGEST_DAYS: i64 = 5;
const ALTERNATIVE_SCAN_DAYS: i64 = 14;

const SELECTION_DAY_TOKENS: [&str; 9] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "tomorrow",
    "today",
];

#[derive(Debug, Default, Clone)]
pub struct StateUpdate {
    pub phase: Option<ConversationPhase>,
    pub appointment_type: Option<AppointmentType>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time_of_day: Option<TimePreference>,
    pub reason_for_visit: Option<String>,
    pub selected_slot: Option<SelectedSlot>,
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_email: Option<String>,
    pub available_slots: Option<Vec<TimeSlot>>,
    pub pending_faq: Option<bool>,
}

pub struct TurnPlan {
    pub context: String,
    pub update: StateUpdate,
}

/// Apply a planned update to the session state. Fields left `None` in the
/// update keep their current value.
pub fn apply_update(state: &mut ConversationState, update: StateUpdate) {
    if let Some(phase) = update.phase {
        state.phase = phase;
    }
    if let Some(appointment_type) = update.appointment_type {
        state.appointment_type = Some(appointment_type);
    }
    if let Some(date) = update.preferred_date {
        state.preferred_date = Some(date);
    }
    if let Some(pref) = update.preferred_time_of_day {
        state.preferred_time_of_day = Some(pref);
    }
    if let Some(reason) = update.reason_for_visit {
        state.reason_for_visit = Some(reason);
    }
    if let Some(slot) = update.selected_slot {
        state.selected_slot = Some(slot);
    }
    if let Some(name) = update.patient_name {
        state.patient.name = Some(name);
    }
    if let Some(phone) = update.patient_phone {
        state.patient.phone = Some(phone);
    }
    if let Some(email) = update.patient_email {
        state.patient.email = Some(email);
    }
    if let Some(slots) = update.available_slots {
        state.available_slots = Some(slots);
    }
    if let Some(pending) = update.pending_faq {
        state.pending_faq = pending;
    }
    state.updated_at = Utc::now();
}

/// Reason keywords map to the shortest appointment type that covers them.
pub fn infer_appointment_type(reason: &str) -> AppointmentType {
    let lower = reason.to_lowercase();
    if ["follow up", "follow-up", "results", "medication"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        AppointmentType::FollowUp
    } else if ["physical", "annual", "checkup", "check-up"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        AppointmentType::PhysicalExam
    } else if ["specialist", "complex", "detailed"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        AppointmentType::SpecialistConsultation
    } else {
        AppointmentType::GeneralConsultation
    }
}

pub struct StateMachine {
    availability: AvailabilityService,
    booking: BookingService,
    retrieval: RetrievalClient,
    clinic_phone: String,
}

impl StateMachine {
    pub fn new(config: &AppConfig, store: Arc<ScheduleStore>) -> Self {
        Self {
            availability: AvailabilityService::new(Arc::clone(&store)),
            booking: BookingService::new(config, store),
            retrieval: RetrievalClient::new(config),
            clinic_phone: config.clinic_phone.clone(),
        }
    }

    /// Plan one turn from the classified intent. Never touches `state`.
    pub async fn plan_turn(
        &self,
        intent: Intent,
        entities: &ExtractedEntities,
        message: &str,
        state: &ConversationState,
    ) -> TurnPlan {
        let today = Local::now().date_naive();
        let mut context = vec![format!("Current conversation phase: {}", state.phase)];
        let mut update = StateUpdate::default();

        // Resuming a scheduling flow closes out any pending FAQ detour.
        if state.pending_faq && intent != Intent::Faq {
            update.pending_faq = Some(false);
        }

        match intent {
            Intent::Greeting => {
                context.push(
                    "The user is greeting. Welcome them warmly to HealthCare Plus Clinic. \
                     Offer to help with scheduling appointments or answering questions."
                        .to_string(),
                );
                update.phase = Some(ConversationPhase::Greeting);
            }

            Intent::Faq => {
                let answer = self.retrieval.answer(message).await;
                context.push(format!("FAQ Information from knowledge base:\n{}", answer));
                context.push(
                    "Answer the user's question based on this information. Be helpful and concise."
                        .to_string(),
                );

                let mid_flow = matches!(
                    state.phase,
                    ConversationPhase::UnderstandingNeeds
                        | ConversationPhase::CollectingPreferences
                        | ConversationPhase::SlotRecommendation
                        | ConversationPhase::CollectingInfo
                );
                if mid_flow {
                    context.push(
                        "After answering, offer to continue with their appointment scheduling."
                            .to_string(),
                    );
                    update.pending_faq = Some(true);
                }
            }

            Intent::Schedule => {
                let digest = self
                    .upcoming_slots_digest(
                        state
                            .appointment_type
                            .unwrap_or(AppointmentType::GeneralConsultation),
                    )
                    .await;
                context.push(
                    "The user wants to schedule an appointment. \
                     Ask about the reason for their visit AND show them the available slots below."
                        .to_string(),
                );
                context.push(format!("=== AVAILABLE APPOINTMENT SLOTS ===\n{}\n===", digest));
                context.push(
                    "Show these available slots to the user with dates and times formatted nicely. \
                     Ask what brings them in and which slot works for them."
                        .to_string(),
                );
                if let Some(date) = entities.date {
                    context.push(format!("User mentioned date preference: {}", date));
                    update.preferred_date = Some(date);
                }
                if entities.time_preference != TimePreference::Any {
                    context.push(format!(
                        "User mentioned time preference: {}",
                        entities.time_preference
                    ));
                    update.preferred_time_of_day = Some(entities.time_preference);
                }
                update.phase = Some(ConversationPhase::UnderstandingNeeds);
            }

            Intent::ProvideInfo => {
                self.plan_provide_info(entities, message, state, today, &mut context, &mut update)
                    .await;
            }

            Intent::SelectSlot => {
                match self.resolve_slot_selection(message, state, today) {
                    Some(slot) => {
                        context.push(format!(
                            "User selected the {} slot on {}. Confirm their choice and ask for \
                             their contact information (name first, then phone, then email).",
                            slot.start_time.format("%H:%M"),
                            slot.date
                        ));
                        if let Some(cached) = &state.available_slots {
                            let shown = cached
                                .iter()
                                .any(|s| s.available && s.start_time == slot.start_time);
                            if !shown {
                                context.push(format!(
                                    "Note: {} was not among the times last shown. Tell the user \
                                     you will verify that time when booking.",
                                    slot.start_time.format("%H:%M")
                                ));
                            }
                        }
                        update.selected_slot = Some(slot);
                        update.phase = Some(ConversationPhase::CollectingInfo);
                    }
                    None => {
                        // Do not guess: stay put and re-prompt for a concrete time.
                        context.push(
                            "The user's selection could not be matched to a specific slot. \
                             Ask them which exact date and time works for them."
                                .to_string(),
                        );
                    }
                }
            }

            Intent::Confirm => {
                self.plan_confirm(state, &mut context, &mut update).await;
            }

            Intent::Decline => match state.phase {
                ConversationPhase::SlotRecommendation => {
                    context.push(
                        "User declined the offered slots. Offer to check different dates or times."
                            .to_string(),
                    );
                }
                ConversationPhase::Confirmation => {
                    context.push(
                        "User wants to change something. Ask what they'd like to modify."
                            .to_string(),
                    );
                }
                _ => {
                    context.push("User declined. Ask how else you can help.".to_string());
                }
            },

            Intent::Cancel => {
                context.push(
                    "User wants to cancel an appointment. Ask for their booking ID and \
                     confirmation code to proceed with cancellation."
                        .to_string(),
                );
            }

            Intent::Reschedule => {
                context.push(
                    "User wants to reschedule. Ask for their booking ID and confirmation code, \
                     then help find a new time."
                        .to_string(),
                );
            }

            Intent::Other => {
                self.plan_other(message, state, today, &mut context, &mut update).await;
            }
        }

        TurnPlan {
            context: context.join("\n"),
            update,
        }
    }

    async fn plan_provide_info(
        &self,
        entities: &ExtractedEntities,
        message: &str,
        state: &ConversationState,
        today: NaiveDate,
        context: &mut Vec<String>,
        update: &mut StateUpdate,
    ) {
        match state.phase {
            ConversationPhase::UnderstandingNeeds => {
                if entities.has_date_or_time() {
                    // Date/time arrived before the reason; jump to recommending slots.
                    let shown = self
                        .availability_context(
                            entities.date,
                            entities.time_preference,
                            state.appointment_type,
                            today,
                            context,
                        )
                        .await;
                    update.available_slots = shown;
                    if let Some(date) = entities.date {
                        update.preferred_date = Some(date);
                    }
                    if entities.time_preference != TimePreference::Any {
                        update.preferred_time_of_day = Some(entities.time_preference);
                    }
                    update.phase = Some(ConversationPhase::SlotRecommendation);
                } else {
                    context.push(format!(
                        "User provided reason for visit: '{}'. Acknowledge this and recommend an \
                         appropriate appointment type, then ask for date/time preference.",
                        message
                    ));
                    update.reason_for_visit = Some(message.trim().to_string());
                    update.appointment_type = Some(infer_appointment_type(message));
                    update.phase = Some(ConversationPhase::CollectingPreferences);
                }
            }

            ConversationPhase::CollectingPreferences => {
                if entities.has_date_or_time() {
                    let shown = self
                        .availability_context(
                            entities.date,
                            entities.time_preference,
                            state.appointment_type,
                            today,
                            context,
                        )
                        .await;
                    update.available_slots = shown;
                    if let Some(date) = entities.date {
                        update.preferred_date = Some(date);
                    }
                    if entities.time_preference != TimePreference::Any {
                        update.preferred_time_of_day = Some(entities.time_preference);
                    }
                    update.phase = Some(ConversationPhase::SlotRecommendation);
                } else {
                    context.push(
                        "Ask about their preferred date and time (morning/afternoon).".to_string(),
                    );
                }
            }

            ConversationPhase::CollectingInfo => {
                // One contact field per turn: email and phone by pattern,
                // anything else is taken as the name if that is still open.
                let mut patient = state.patient.clone();
                if let Some(email) = &entities.email {
                    patient.email = Some(email.clone());
                    update.patient_email = Some(email.clone());
                } else if let Some(phone) = &entities.phone {
                    patient.phone = Some(phone.clone());
                    update.patient_phone = Some(phone.clone());
                } else if patient.name.is_none() {
                    let name = message.trim().to_string();
                    patient.name = Some(name.clone());
                    update.patient_name = Some(name);
                }

                if patient.is_complete() {
                    let (date, time) = match &state.selected_slot {
                        Some(slot) => (
                            slot.date.to_string(),
                            slot.start_time.format("%H:%M").to_string(),
                        ),
                        None => ("TBD".to_string(), "TBD".to_string()),
                    };
                    context.push(format!(
                        "All information collected! Show confirmation summary:\n\
                         - Date: {}\n- Time: {}\n- Name: {}\n- Phone: {}\n- Email: {}\n- Reason: {}\n\
                         Ask if they want to confirm the booking.",
                        date,
                        time,
                        patient.name.as_deref().unwrap_or(""),
                        patient.phone.as_deref().unwrap_or(""),
                        patient.email.as_deref().unwrap_or(""),
                        state.reason_for_visit.as_deref().unwrap_or("General consultation"),
                    ));
                    update.phase = Some(ConversationPhase::Confirmation);
                } else {
                    context.push(format!(
                        "Still need to collect: {}. Ask for the next missing item.",
                        patient.missing_fields().join(", ")
                    ));
                }
            }

            _ => {
                context.push(
                    "Acknowledge the information and continue the conversation.".to_string(),
                );
            }
        }
    }

    async fn plan_confirm(
        &self,
        state: &ConversationState,
        context: &mut Vec<String>,
        update: &mut StateUpdate,
    ) {
        match state.phase {
            ConversationPhase::Confirmation => {
                let slot = match &state.selected_slot {
                    Some(slot) if state.patient.is_complete() => slot.clone(),
                    _ => {
                        context.push(
                            "Cannot confirm yet: a selected slot and full contact details are \
                             required. Ask for whatever is still missing."
                                .to_string(),
                        );
                        return;
                    }
                };

                let appointment_type = state
                    .appointment_type
                    .unwrap_or(AppointmentType::GeneralConsultation);
                let request = BookingRequest {
                    appointment_type,
                    date: slot.date,
                    start_time: slot.start_time,
                    patient: PatientInfo {
                        name: state.patient.name.clone().unwrap_or_default(),
                        email: state.patient.email.clone().unwrap_or_default(),
                        phone: state.patient.phone.clone().unwrap_or_default(),
                    },
                    reason: state
                        .reason_for_visit
                        .clone()
                        .unwrap_or_else(|| "General consultation".to_string()),
                };

                match self.booking.book(request).await {
                    Ok(confirmation) => {
                        info!(
                            "Session {} completed booking {}",
                            state.session_id, confirmation.booking_id
                        );
                        context.push(format!(
                            "BOOKING SUCCESSFUL! Here are the details:\n\
                             - Booking ID: {}\n- Confirmation code: {}\n- Date: {}\n- Time: {}\n\
                             - Type: {}\n- Patient: {}\n\n\
                             Provide a warm confirmation message with the booking details. \
                             Remind them what to bring and mention the cancellation policy.",
                            confirmation.booking_id,
                            confirmation.confirmation_code,
                            confirmation.details.date,
                            confirmation.details.start_time.format("%H:%M"),
                            confirmation.details.appointment_type,
                            confirmation.details.patient_name,
                        ));
                        update.phase = Some(ConversationPhase::Completed);
                    }
                    Err(e) => {
                        warn!("Session {} booking failed: {}", state.session_id, e);
                        context.push(format!(
                            "Booking failed: {}. Apologize and offer to try a different time \
                             or call the office at {}.",
                            e, self.clinic_phone
                        ));
                        // Re-offer what is still open instead of retrying blindly.
                        let open = self
                            .availability
                            .open_slots_for(slot.date, appointment_type)
                            .await;
                        if open.is_empty() {
                            self.alternative_dates_context(appointment_type, context).await;
                        } else {
                            context.push(format!(
                                "Other open times on {}: {}. Offer these to the user.",
                                slot.date,
                                format_slot_times(&open[..open.len().min(SLOT_DISPLAY_LIMIT)])
                            ));
                        }
                    }
                }
            }
            ConversationPhase::CollectingPreferences => {
                context.push(
                    "User confirmed the appointment type. Now ask for their preferred date \
                     and time."
                        .to_string(),
                );
                update.phase = Some(ConversationPhase::SlotRecommendation);
            }
            _ => {
                context.push("Acknowledge the confirmation and continue.".to_string());
            }
        }
    }

    async fn plan_other(
        &self,
        message: &str,
        state: &ConversationState,
        today: NaiveDate,
        context: &mut Vec<String>,
        update: &mut StateUpdate,
    ) {
        match state.phase {
            ConversationPhase::UnderstandingNeeds => {
                context.push(format!(
                    "User said: '{}'. This might be their reason for visit. Acknowledge and \
                     recommend an appointment type.",
                    message
                ));
                update.reason_for_visit = Some(message.trim().to_string());
                update.appointment_type = Some(AppointmentType::GeneralConsultation);
                update.phase = Some(ConversationPhase::CollectingPreferences);
            }
            ConversationPhase::CollectingPreferences => {
                let date = parsers::parse_date_reference(message, today);
                let pref = parsers::parse_time_preference(message);
                if date.is_some() || pref != TimePreference::Any {
                    let shown = self
                        .availability_context(date, pref, state.appointment_type, today, context)
                        .await;
                    update.available_slots = shown;
                    if let Some(date) = date {
                        update.preferred_date = Some(date);
                    }
                    if pref != TimePreference::Any {
                        update.preferred_time_of_day = Some(pref);
                    }
                    update.phase = Some(ConversationPhase::SlotRecommendation);
                } else {
                    context.push(
                        "Ask about their preferred date and time (morning/afternoon).".to_string(),
                    );
                }
            }
            _ => {
                context.push(
                    "Not sure what the user wants. Politely ask how you can help with \
                     scheduling, questions about the clinic, or managing existing appointments."
                        .to_string(),
                );
            }
        }
    }

    /// Fetch open slots for the requested date, apply the time-of-day filter,
    /// and push the matching context. Falls back to alternative dates when the
    /// filter leaves nothing. Returns the slots shown, for caching.
    async fn availability_context(
        &self,
        date: Option<NaiveDate>,
        preference: TimePreference,
        appointment_type: Option<AppointmentType>,
        today: NaiveDate,
        context: &mut Vec<String>,
    ) -> Option<Vec<TimeSlot>> {
        let appointment_type = appointment_type.unwrap_or(AppointmentType::GeneralConsultation);
        let date = date.unwrap_or(today);

        let open = self.availability.open_slots_for(date, appointment_type).await;
        let mut matching = filter_by_preference(&open, preference);
        matching.truncate(SLOT_DISPLAY_LIMIT);

        if matching.is_empty() {
            self.alternative_dates_context(appointment_type, context).await;
            return None;
        }

        context.push(format!(
            "Available {} slots for {}: {}\n\
             Present these options clearly and ask which time works best for the user.",
            preference,
            date,
            format_slot_times(&matching)
        ));
        Some(matching)
    }

    async fn alternative_dates_context(
        &self,
        appointment_type: AppointmentType,
        context: &mut Vec<String>,
    ) {
        let mut alternatives = self
            .availability
            .dates_with_availability(ALTERNATIVE_SCAN_DAYS, appointment_type)
            .await;
        alternatives.truncate(ALTERNATIVE_DATE_LIMIT);

        if alternatives.is_empty() {
            context.push(format!(
                "No slots available in the coming days. Suggest calling the office at {}.",
                self.clinic_phone
            ));
        } else {
            let listed = alternatives
                .iter()
                .map(|d| format!("{} {}", d.day_name, d.date))
                .collect::<Vec<_>>()
                .join(", ");
            context.push(format!(
                "No slots match the requested time. Alternative dates with availability: {}. \
                 Offer these alternatives to the user.",
                listed
            ));
        }
    }

    /// Morning/afternoon digest of open slots over the next few days, shown
    /// when a scheduling conversation starts.
    async fn upcoming_slots_digest(&self, appointment_type: AppointmentType) -> String {
        let today = Local::now().date_naive();
        let mut days = Vec::new();

        for offset in 0..UPCOMING_DIGEST_DAYS {
            let date = today + Duration::days(offset);
            let open = self.availability.open_slots_for(date, appointment_type).await;
            if open.is_empty() {
                continue;
            }

            let morning: Vec<String> = open
                .iter()
                .filter(|s| s.start_time < NaiveTime::from_hms_opt(12, 0, 0).unwrap())
                .take(4)
                .map(|s| twelve_hour(s.start_time))
                .collect();
            let afternoon: Vec<String> = open
                .iter()
                .filter(|s| s.start_time >= NaiveTime::from_hms_opt(12, 0, 0).unwrap())
                .take(4)
                .map(|s| twelve_hour(s.start_time))
                .collect();

            let mut day_info = date.format("%A, %B %d").to_string();
            if !morning.is_empty() {
                day_info.push_str(&format!("\n   Morning: {}", morning.join(", ")));
            }
            if !afternoon.is_empty() {
                day_info.push_str(&format!("\n   Afternoon: {}", afternoon.join(", ")));
            }
            days.push(day_info);
        }

        if days.is_empty() {
            format!(
                "No available slots in the next few days. Please call the office at {}.",
                self.clinic_phone
            )
        } else {
            days.join("\n")
        }
    }

    /// Resolve a free-text slot selection to a concrete (date, time).
    ///
    /// The date comes from a day token in the message, else the session's
    /// preferred date, else tomorrow. A resolvable clock time is required;
    /// date-only selections fail so the caller re-prompts instead of
    /// guessing.
    fn resolve_slot_selection(
        &self,
        message: &str,
        state: &ConversationState,
        today: NaiveDate,
    ) -> Option<SelectedSlot> {
        let lower = message.to_lowercase();

        let start_time = parsers::extract_clock_time(&lower)?;

        let mut date = state.preferred_date;
        for token in SELECTION_DAY_TOKENS {
            if lower.contains(token) {
                date = parsers::parse_date_reference(token, today);
                break;
            }
        }
        let date = date.unwrap_or(today + Duration::days(1));

        Some(SelectedSlot { date, start_time })
    }
}

fn format_slot_times(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|s| s.start_time.format("%H:%M").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn twelve_hour(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
