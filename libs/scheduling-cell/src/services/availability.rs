// libs/scheduling-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::models::{
    AppointmentType, ClinicSchedule, DayAvailability, TimePreference, TimeSlot,
};
use crate::ScheduleStore;

/// Lowercase weekday name used as the working-hours key ("monday" .. "sunday").
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string().to_lowercase()
}

/// Compute the ordered slot sequence for one date.
///
/// Slots are regenerated from scratch on every call; the result carries both
/// available and unavailable slots in chronological order. `now` is explicit
/// so the today-cutoff is deterministic under test.
pub fn compute_slots(
    schedule: &ClinicSchedule,
    date: NaiveDate,
    appointment_type: AppointmentType,
    now: NaiveDateTime,
) -> Vec<TimeSlot> {
    if date < now.date() {
        return Vec::new();
    }
    if schedule.blocked_dates.contains(&date) {
        return Vec::new();
    }

    let Some(hours) = schedule.working_hours.get(&weekday_name(date)) else {
        // Closed day.
        return Vec::new();
    };

    let duration = Duration::minutes(appointment_type.duration_minutes());
    let interval = Duration::minutes(schedule.settings.slot_interval_minutes);

    let day_bookings: Vec<_> = schedule
        .bookings
        .iter()
        .filter(|b| b.date == date && b.status == crate::models::BookingStatus::Confirmed)
        .collect();

    let mut slots = Vec::new();
    let mut current = hours.start;

    while current < hours.end {
        let Some(slot_end) = add_within_day(current, duration) else {
            break;
        };
        if slot_end > hours.end {
            break;
        }

        // No slot may start inside lunch or run into it; jump to the end of
        // the break in either case.
        if let (Some(lunch_start), Some(lunch_end)) = (hours.lunch_start, hours.lunch_end) {
            if current >= lunch_start && current < lunch_end {
                current = lunch_end;
                continue;
            }
            if current < lunch_start && slot_end > lunch_start {
                current = lunch_end;
                continue;
            }
        }

        // Half-open interval overlap against existing bookings.
        let mut available = !day_bookings
            .iter()
            .any(|b| current < b.end_time && b.start_time < slot_end);

        // For today, only strictly future starts are bookable.
        if available && date == now.date() && current <= now.time() {
            available = false;
        }

        slots.push(TimeSlot {
            start_time: current,
            end_time: slot_end,
            available,
        });

        match add_within_day(current, interval) {
            Some(next) => current = next,
            None => break,
        }
    }

    slots
}

/// Scan forward from today and report each day with at least one open slot.
pub fn compute_dates_with_availability(
    schedule: &ClinicSchedule,
    days_ahead: i64,
    appointment_type: AppointmentType,
    now: NaiveDateTime,
) -> Vec<DayAvailability> {
    let mut dates = Vec::new();

    for offset in 0..days_ahead {
        let date = now.date() + Duration::days(offset);
        let available = compute_slots(schedule, date, appointment_type, now)
            .iter()
            .filter(|s| s.available)
            .count();

        if available > 0 {
            dates.push(DayAvailability {
                date,
                day_name: date.format("%A").to_string(),
                available_slots: available,
            });
        }
    }

    dates
}

/// Post-filter over an already-computed slot list. Callers must fall back to
/// `compute_dates_with_availability` when this leaves nothing.
pub fn filter_by_preference(slots: &[TimeSlot], preference: TimePreference) -> Vec<TimeSlot> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let five_pm = NaiveTime::from_hms_opt(17, 0, 0).unwrap();

    slots
        .iter()
        .filter(|slot| match preference {
            TimePreference::Any => true,
            TimePreference::Morning => slot.start_time < noon,
            TimePreference::Afternoon => slot.start_time >= noon && slot.start_time < five_pm,
            TimePreference::Evening => slot.start_time >= five_pm,
        })
        .cloned()
        .collect()
}

fn add_within_day(time: NaiveTime, delta: Duration) -> Option<NaiveTime> {
    let (next, wrapped) = time.overflowing_add_signed(delta);
    (wrapped == 0).then_some(next)
}

pub struct AvailabilityService {
    store: Arc<ScheduleStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }

    /// Ordered slot sequence for a date, available and taken alike.
    pub async fn slots_for(&self, date: NaiveDate, appointment_type: AppointmentType) -> Vec<TimeSlot> {
        let schedule = self.store.snapshot().await;
        let slots = compute_slots(&schedule, date, appointment_type, Local::now().naive_local());
        debug!("Computed {} slots for {} ({})", slots.len(), date, appointment_type);
        slots
    }

    /// Only the open slots for a date.
    pub async fn open_slots_for(
        &self,
        date: NaiveDate,
        appointment_type: AppointmentType,
    ) -> Vec<TimeSlot> {
        self.slots_for(date, appointment_type)
            .await
            .into_iter()
            .filter(|s| s.available)
            .collect()
    }

    /// Days within `days_ahead` of today that still have open slots.
    pub async fn dates_with_availability(
        &self,
        days_ahead: i64,
        appointment_type: AppointmentType,
    ) -> Vec<DayAvailability> {
        let schedule = self.store.snapshot().await;
        compute_dates_with_availability(
            &schedule,
            days_ahead,
            appointment_type,
            Local::now().naive_local(),
        )
    }
}
