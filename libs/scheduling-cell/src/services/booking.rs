// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Duration, Local, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::error::SchedulingError;
use crate::models::{
    Booking, BookingConfirmation, BookingDetails, BookingRequest, BookingStatus, CancelRequest,
    CancelResponse, RescheduleRequest, RescheduleResponse,
};
use crate::services::availability::compute_slots;
use crate::ScheduleStore;

const CONFIRMATION_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CONFIRMATION_CODE_LEN: usize = 6;

pub struct BookingService {
    store: Arc<ScheduleStore>,
    clinic_name: String,
    clinic_phone: String,
}

impl BookingService {
    pub fn new(config: &AppConfig, store: Arc<ScheduleStore>) -> Self {
        Self {
            store,
            clinic_name: config.clinic_name.clone(),
            clinic_phone: config.clinic_phone.clone(),
        }
    }

    /// Book a slot, re-validating availability at write time.
    ///
    /// The re-check and the append run inside one store transaction; this
    /// optimistic check-then-act is the only guard against a slot being taken
    /// between recommendation and confirmation.
    pub async fn book(&self, request: BookingRequest) -> Result<BookingConfirmation, SchedulingError> {
        request
            .patient
            .validate()
            .map_err(SchedulingError::Validation)?;

        let now = Local::now();
        let clinic_name = self.clinic_name.clone();
        let clinic_phone = self.clinic_phone.clone();

        let confirmation = self
            .store
            .mutate(move |schedule| {
                let slots =
                    compute_slots(schedule, request.date, request.appointment_type, now.naive_local());
                let still_open = slots
                    .iter()
                    .any(|s| s.start_time == request.start_time && s.available);

                if !still_open {
                    warn!(
                        "Booking conflict: {} {} is no longer available",
                        request.date, request.start_time
                    );
                    return Err(SchedulingError::SlotUnavailable);
                }

                let duration = request.appointment_type.duration_minutes();
                let end_time = request.start_time + Duration::minutes(duration);

                let booking = Booking {
                    id: generate_booking_id(),
                    date: request.date,
                    start_time: request.start_time,
                    end_time,
                    appointment_type: request.appointment_type,
                    patient: request.patient.clone(),
                    reason: request.reason.clone(),
                    confirmation_code: generate_confirmation_code(),
                    status: BookingStatus::Confirmed,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                };

                let confirmation = BookingConfirmation {
                    booking_id: booking.id.clone(),
                    status: BookingStatus::Confirmed,
                    confirmation_code: booking.confirmation_code.clone(),
                    details: BookingDetails {
                        date: booking.date,
                        start_time: booking.start_time,
                        end_time: booking.end_time,
                        duration_minutes: duration,
                        appointment_type: booking.appointment_type,
                        patient_name: booking.patient.name.clone(),
                        patient_email: booking.patient.email.clone(),
                        clinic_name,
                        clinic_phone,
                    },
                };

                schedule.bookings.push(booking);
                Ok(confirmation)
            })
            .await?;

        info!(
            "Booked appointment {} on {} at {}",
            confirmation.booking_id, confirmation.details.date, confirmation.details.start_time
        );
        Ok(confirmation)
    }

    /// Cancel a booking. A wrong confirmation code is an authorization
    /// failure, distinct from an unknown booking id.
    pub async fn cancel(&self, request: CancelRequest) -> Result<CancelResponse, SchedulingError> {
        let response = self
            .store
            .mutate(move |schedule| {
                let idx = schedule
                    .bookings
                    .iter()
                    .position(|b| b.id == request.booking_id)
                    .ok_or_else(|| SchedulingError::BookingNotFound(request.booking_id.clone()))?;

                if schedule.bookings[idx].confirmation_code != request.confirmation_code {
                    return Err(SchedulingError::ConfirmationCodeMismatch);
                }

                let cancelled = schedule.bookings.remove(idx);

                Ok(CancelResponse {
                    status: BookingStatus::Cancelled,
                    booking_id: cancelled.id.clone(),
                    message: format!(
                        "Your appointment on {} at {} has been cancelled.",
                        cancelled.date,
                        cancelled.start_time.format("%H:%M")
                    ),
                })
            })
            .await?;

        info!("Cancelled appointment {}", response.booking_id);
        Ok(response)
    }

    /// Move a booking to a new date/time.
    ///
    /// The existing record is removed tentatively before availability is
    /// recomputed, so the booking's own slot does not block the move. On any
    /// failure the transaction aborts and the original record stays in place.
    pub async fn reschedule(
        &self,
        request: RescheduleRequest,
    ) -> Result<RescheduleResponse, SchedulingError> {
        let now = Local::now();

        let response = self
            .store
            .mutate(move |schedule| {
                let idx = schedule
                    .bookings
                    .iter()
                    .position(|b| b.id == request.booking_id)
                    .ok_or_else(|| SchedulingError::BookingNotFound(request.booking_id.clone()))?;

                if schedule.bookings[idx].confirmation_code != request.confirmation_code {
                    return Err(SchedulingError::ConfirmationCodeMismatch);
                }

                let original = schedule.bookings.remove(idx);

                let slots = compute_slots(
                    schedule,
                    request.new_date,
                    original.appointment_type,
                    now.naive_local(),
                );
                let open = slots
                    .iter()
                    .any(|s| s.start_time == request.new_start_time && s.available);

                if !open {
                    // Abort restores the original record untouched.
                    return Err(SchedulingError::SlotUnavailable);
                }

                let duration = original.appointment_type.duration_minutes();
                let mut updated = original;
                updated.date = request.new_date;
                updated.start_time = request.new_start_time;
                updated.end_time = request.new_start_time + Duration::minutes(duration);
                updated.updated_at = Utc::now();

                let response = RescheduleResponse {
                    status: "rescheduled".to_string(),
                    booking_id: updated.id.clone(),
                    new_date: updated.date,
                    new_start_time: updated.start_time,
                    new_end_time: updated.end_time,
                    message: format!(
                        "Your appointment has been rescheduled to {} at {}.",
                        updated.date,
                        updated.start_time.format("%H:%M")
                    ),
                };

                schedule.bookings.push(updated);
                Ok(response)
            })
            .await?;

        info!(
            "Rescheduled appointment {} to {} at {}",
            response.booking_id, response.new_date, response.new_start_time
        );
        Ok(response)
    }

    /// Look up a booking by id.
    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking, SchedulingError> {
        let schedule = self.store.snapshot().await;
        schedule
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| SchedulingError::BookingNotFound(booking_id.to_string()))
    }
}

/// Time-ordered, human-traceable booking id.
fn generate_booking_id() -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    let id = format!("APPT-{}-{:03}", timestamp, suffix);
    debug!("Generated booking id {}", id);
    id
}

/// Random confirmation code; immutable once issued and required to authorize
/// cancel/reschedule.
fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CONFIRMATION_CODE_CHARSET.len());
            CONFIRMATION_CODE_CHARSET[idx] as char
        })
        .collect()
}
