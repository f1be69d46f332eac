// Slot computation is pure over (schedule, date, type, now), so these tests
// pin the clock instead of sleeping.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use scheduling_cell::models::{
    AppointmentType, Booking, BookingStatus, ClinicSchedule, PatientInfo, TimePreference,
};
use scheduling_cell::services::availability::{
    compute_dates_with_availability, compute_slots, filter_by_preference,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// Sunday before the Monday most tests query.
fn now() -> NaiveDateTime {
    date(2026, 3, 1).and_hms_opt(12, 0, 0).unwrap()
}

// 2026-03-02 is a Monday.
fn monday() -> NaiveDate {
    date(2026, 3, 2)
}

fn booking_at(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Booking {
    Booking {
        id: "APPT-20260301120000-001".to_string(),
        date: day,
        start_time: start,
        end_time: end,
        appointment_type: AppointmentType::GeneralConsultation,
        patient: PatientInfo {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-123-4567".to_string(),
        },
        reason: "checkup".to_string(),
        confirmation_code: "ABC123".to_string(),
        status: BookingStatus::Confirmed,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

#[test]
fn past_date_has_no_slots() {
    let schedule = ClinicSchedule::default();
    let slots = compute_slots(
        &schedule,
        date(2026, 2, 27),
        AppointmentType::GeneralConsultation,
        now(),
    );
    assert!(slots.is_empty());
}

#[test]
fn closed_day_has_no_slots() {
    let schedule = ClinicSchedule::default();
    // 2026-03-08 is a Sunday, which has no working hours entry.
    let slots = compute_slots(
        &schedule,
        date(2026, 3, 8),
        AppointmentType::GeneralConsultation,
        now(),
    );
    assert!(slots.is_empty());
}

#[test]
fn blocked_date_has_no_slots() {
    let mut schedule = ClinicSchedule::default();
    schedule.blocked_dates.push(monday());

    let slots = compute_slots(
        &schedule,
        monday(),
        AppointmentType::GeneralConsultation,
        now(),
    );
    assert!(slots.is_empty());
}

#[test]
fn slot_end_is_start_plus_duration() {
    let schedule = ClinicSchedule::default();
    let slots = compute_slots(
        &schedule,
        monday(),
        AppointmentType::SpecialistConsultation,
        now(),
    );

    assert!(!slots.is_empty());
    assert_eq!(slots[0].start_time, time(9, 0));
    assert_eq!(slots[0].end_time, time(10, 0));
    for slot in &slots {
        assert_eq!(
            slot.end_time - slot.start_time,
            chrono::Duration::minutes(60)
        );
    }
}

#[test]
fn no_slot_touches_the_lunch_break() {
    let schedule = ClinicSchedule::default();
    let lunch_start = time(12, 0);
    let lunch_end = time(13, 0);

    for appointment_type in AppointmentType::ALL {
        let slots = compute_slots(&schedule, monday(), appointment_type, now());
        for slot in &slots {
            let overlaps = slot.start_time < lunch_end && lunch_start < slot.end_time;
            assert!(
                !overlaps,
                "{} slot {}-{} crosses lunch",
                appointment_type, slot.start_time, slot.end_time
            );
        }
        // Work resumes exactly at the end of the break.
        assert!(slots.iter().any(|s| s.start_time == lunch_end));
    }
}

#[test]
fn slot_before_lunch_may_end_exactly_at_lunch_start() {
    let schedule = ClinicSchedule::default();
    let slots = compute_slots(&schedule, monday(), AppointmentType::PhysicalExam, now());

    // 11:15 + 45min = 12:00, which abuts but does not enter the break.
    assert!(slots
        .iter()
        .any(|s| s.start_time == time(11, 15) && s.end_time == time(12, 0)));
    assert!(!slots.iter().any(|s| s.start_time == time(11, 30)));
}

#[test]
fn no_slot_runs_past_closing() {
    let schedule = ClinicSchedule::default();
    let slots = compute_slots(&schedule, monday(), AppointmentType::PhysicalExam, now());

    let last = slots.last().unwrap();
    assert!(last.end_time <= time(17, 0));
    assert_eq!(last.start_time, time(16, 15));
}

#[test]
fn confirmed_booking_blocks_overlapping_slots() {
    let mut schedule = ClinicSchedule::default();
    schedule
        .bookings
        .push(booking_at(monday(), time(10, 0), time(10, 30)));

    let slots = compute_slots(
        &schedule,
        monday(),
        AppointmentType::GeneralConsultation,
        now(),
    );

    for slot in &slots {
        let overlaps = slot.start_time < time(10, 30) && time(10, 0) < slot.end_time;
        assert_eq!(slot.available, !overlaps, "slot {}", slot.start_time);
    }
    // Back-to-back is fine: a slot ending 10:00 and one starting 10:30 stay open.
    assert!(slots
        .iter()
        .any(|s| s.end_time == time(10, 0) && s.available));
    assert!(slots
        .iter()
        .any(|s| s.start_time == time(10, 30) && s.available));
}

#[test]
fn cancelled_booking_does_not_block() {
    let mut schedule = ClinicSchedule::default();
    let mut cancelled = booking_at(monday(), time(10, 0), time(10, 30));
    cancelled.status = BookingStatus::Cancelled;
    schedule.bookings.push(cancelled);

    let slots = compute_slots(
        &schedule,
        monday(),
        AppointmentType::GeneralConsultation,
        now(),
    );
    assert!(slots
        .iter()
        .any(|s| s.start_time == time(10, 0) && s.available));
}

#[test]
fn today_only_strictly_future_slots_are_open() {
    let schedule = ClinicSchedule::default();
    let midmorning = monday().and_hms_opt(10, 0, 0).unwrap();

    let slots = compute_slots(
        &schedule,
        monday(),
        AppointmentType::GeneralConsultation,
        midmorning,
    );

    // A slot starting exactly now is already too late.
    let at_ten = slots.iter().find(|s| s.start_time == time(10, 0)).unwrap();
    assert!(!at_ten.available);
    let past = slots.iter().find(|s| s.start_time == time(9, 0)).unwrap();
    assert!(!past.available);
    let next = slots.iter().find(|s| s.start_time == time(10, 15)).unwrap();
    assert!(next.available);
}

#[test]
fn date_scan_skips_closed_and_blocked_days() {
    let mut schedule = ClinicSchedule::default();
    schedule.blocked_dates.push(date(2026, 3, 3));

    let days = compute_dates_with_availability(
        &schedule,
        7,
        AppointmentType::GeneralConsultation,
        now(),
    );

    let found: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    // Scan starts on Sunday the 1st (closed), Tuesday the 3rd is blocked.
    assert_eq!(
        found,
        vec![
            date(2026, 3, 2),
            date(2026, 3, 4),
            date(2026, 3, 5),
            date(2026, 3, 6),
            date(2026, 3, 7),
        ]
    );
    assert_eq!(days[0].day_name, "Monday");
    assert!(days[0].available_slots > 0);
}

#[test]
fn preference_filter_boundaries() {
    let schedule = ClinicSchedule::default();
    let slots = compute_slots(
        &schedule,
        monday(),
        AppointmentType::GeneralConsultation,
        now(),
    );

    let morning = filter_by_preference(&slots, TimePreference::Morning);
    assert!(!morning.is_empty());
    assert!(morning.iter().all(|s| s.start_time < time(12, 0)));

    let afternoon = filter_by_preference(&slots, TimePreference::Afternoon);
    assert!(afternoon.iter().any(|s| s.start_time == time(13, 0)));
    assert!(afternoon
        .iter()
        .all(|s| s.start_time >= time(12, 0) && s.start_time < time(17, 0)));

    // Default hours end at 17:00, so the evening bucket is empty here.
    let evening = filter_by_preference(&slots, TimePreference::Evening);
    assert!(evening.is_empty());

    let any = filter_by_preference(&slots, TimePreference::Any);
    assert_eq!(any.len(), slots.len());
}
