use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use dialogue_cell::services::parsers::{
    extract_clock_time, extract_email, extract_phone, parse_date_reference,
    parse_time_preference,
};
use scheduling_cell::models::TimePreference;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// A Wednesday, used as the anchor for relative references.
fn reference() -> NaiveDate {
    date(2026, 3, 4)
}

#[test]
fn today_and_tomorrow() {
    assert_eq!(parse_date_reference("today", reference()), Some(reference()));
    assert_eq!(
        parse_date_reference("I could come in tomorrow", reference()),
        Some(date(2026, 3, 5))
    );
}

#[test]
fn weekday_resolves_to_next_future_occurrence() {
    let friday = parse_date_reference("Friday works for me", reference()).unwrap();
    assert_eq!(friday, date(2026, 3, 6));
    assert_eq!(friday.weekday(), Weekday::Fri);

    // Naming today's weekday rolls a full week forward.
    let next_wed = parse_date_reference("wednesday", reference()).unwrap();
    assert_eq!(next_wed, date(2026, 3, 11));

    // Unless the text says "this".
    let this_wed = parse_date_reference("this wednesday", reference()).unwrap();
    assert_eq!(this_wed, reference());
}

#[test]
fn next_friday_means_the_coming_friday() {
    // A named weekday wins over the "next" qualifier unless the day is today.
    assert_eq!(
        parse_date_reference("next friday", reference()),
        Some(date(2026, 3, 6))
    );
}

#[test]
fn week_phrases() {
    // Monday of next week.
    assert_eq!(
        parse_date_reference("sometime next week", reference()),
        Some(date(2026, 3, 9))
    );
    // "this week" is shorthand for tomorrow.
    assert_eq!(
        parse_date_reference("later this week", reference()),
        Some(date(2026, 3, 5))
    );
}

#[test]
fn absolute_formats() {
    assert_eq!(
        parse_date_reference("2026-04-15", reference()),
        Some(date(2026, 4, 15))
    );
    assert_eq!(
        parse_date_reference("04/15/2026", reference()),
        Some(date(2026, 4, 15))
    );
    assert_eq!(
        parse_date_reference("04-15-2026", reference()),
        Some(date(2026, 4, 15))
    );
}

#[test]
fn yearless_dates_roll_forward_when_past() {
    assert_eq!(
        parse_date_reference("December 3", reference()),
        Some(date(2026, 12, 3))
    );
    // January 2 already passed relative to March 4, so next year.
    assert_eq!(
        parse_date_reference("January 2", reference()),
        Some(date(2027, 1, 2))
    );
    assert_eq!(
        parse_date_reference("Dec 3", reference()),
        Some(date(2026, 12, 3))
    );
}

#[test]
fn unparseable_text_yields_none() {
    assert_eq!(parse_date_reference("whenever suits you", reference()), None);
    assert_eq!(parse_date_reference("", reference()), None);
}

#[test]
fn time_preference_buckets() {
    assert_eq!(parse_time_preference("morning please"), TimePreference::Morning);
    assert_eq!(parse_time_preference("around 9 am"), TimePreference::Morning);
    assert_eq!(parse_time_preference("early if possible"), TimePreference::Morning);
    assert_eq!(parse_time_preference("after lunch"), TimePreference::Afternoon);
    assert_eq!(parse_time_preference("midday"), TimePreference::Afternoon);
    assert_eq!(parse_time_preference("in the evening"), TimePreference::Evening);
    assert_eq!(parse_time_preference("after work"), TimePreference::Evening);
    assert_eq!(parse_time_preference("no preference"), TimePreference::Any);
}

#[test]
fn clock_time_extraction_and_normalization() {
    let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

    assert_eq!(extract_clock_time("10:30"), Some(t(10, 30)));
    assert_eq!(extract_clock_time("3 pm"), Some(t(15, 0)));
    assert_eq!(extract_clock_time("3:45 pm"), Some(t(15, 45)));
    assert_eq!(extract_clock_time("12 pm"), Some(t(12, 0)));
    assert_eq!(extract_clock_time("12 am"), Some(t(0, 0)));
    assert_eq!(extract_clock_time("see you then"), None);
}

#[test]
fn contact_extraction() {
    assert_eq!(
        extract_email("you can reach me at jane.doe@example.com thanks"),
        Some("jane.doe@example.com".to_string())
    );
    assert_eq!(extract_email("no address here"), None);

    assert_eq!(
        extract_phone("555-123-4567"),
        Some("555-123-4567".to_string())
    );
    assert_eq!(extract_phone("call me"), None);
}
