//! Pure text-to-entity parsers. Nothing here touches state or errors out;
//! unparseable input yields `None` / the `Any` sentinel.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use regex::Regex;

use scheduling_cell::models::TimePreference;

const WEEKDAYS: [(&str, u32); 7] = [
    ("monday", 0),
    ("tuesday", 1),
    ("wednesday", 2),
    ("thursday", 3),
    ("friday", 4),
    ("saturday", 5),
    ("sunday", 6),
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w\.\-]+@[\w\.\-]+\.\w+").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d\-\(\)\s\+]{10,}").unwrap());
static CLOCK_WITH_MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})\s*(am|pm)?").unwrap());
static CLOCK_HOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*(am|pm)").unwrap());

/// Resolve a natural-language date reference against `reference`.
///
/// A named weekday resolves to its next future occurrence; when that weekday
/// is today, it rolls a full week forward unless the text says "this".
/// Year-less absolute dates that fall in the past roll to next year.
pub fn parse_date_reference(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();
    let lower = lower.trim();

    if lower.contains("today") {
        return Some(reference);
    }
    if lower.contains("tomorrow") {
        return Some(reference + Duration::days(1));
    }

    // Weekday names take precedence over the "next week"/"this week" phrases,
    // so "next monday" resolves through this branch.
    for (day_name, day_num) in WEEKDAYS {
        if lower.contains(day_name) {
            let current = reference.weekday().num_days_from_monday();
            let mut days_until = (day_num + 7 - current) % 7;
            if days_until == 0 && !lower.contains("this") {
                days_until = 7;
            }
            return Some(reference + Duration::days(days_until as i64));
        }
    }

    if lower.contains("next week") {
        // Monday of next week.
        let current = reference.weekday().num_days_from_monday();
        let days_until = (7 - current) % 7 + if current == 0 { 7 } else { 0 };
        return Some(reference + Duration::days(days_until as i64));
    }

    if lower.contains("this week") {
        return Some(reference + Duration::days(1));
    }

    let trimmed = text.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }

    // Year-less month-day forms ("December 3", "Dec 3").
    for fmt in ["%B %d %Y", "%b %d %Y"] {
        let this_year = format!("{} {}", trimmed, reference.year());
        if let Ok(date) = NaiveDate::parse_from_str(&this_year, fmt) {
            if date < reference {
                let next_year = format!("{} {}", trimmed, reference.year() + 1);
                if let Ok(rolled) = NaiveDate::parse_from_str(&next_year, fmt) {
                    return Some(rolled);
                }
            }
            return Some(date);
        }
    }

    None
}

/// Keyword classification into a time-of-day bucket; first bucket wins.
pub fn parse_time_preference(text: &str) -> TimePreference {
    let lower = text.to_lowercase();

    if ["morning", "am", "early"].iter().any(|w| lower.contains(w)) {
        TimePreference::Morning
    } else if ["afternoon", "lunch", "midday"].iter().any(|w| lower.contains(w)) {
        TimePreference::Afternoon
    } else if ["evening", "pm", "late", "after work", "after 5"]
        .iter()
        .any(|w| lower.contains(w))
    {
        TimePreference::Evening
    } else {
        TimePreference::Any
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
}

pub fn contains_clock_time(text: &str) -> bool {
    CLOCK_WITH_MINUTES_RE.is_match(text) || CLOCK_HOUR_RE.is_match(text)
}

/// Extract a clock time and normalize to 24-hour form (12am -> 00:00,
/// 12pm -> 12:00). "3 pm" and "3:30" both resolve; a bare "3" does not.
pub fn extract_clock_time(text: &str) -> Option<NaiveTime> {
    let lower = text.to_lowercase();

    if let Some(caps) = CLOCK_WITH_MINUTES_RE.captures(&lower) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return normalize_time(hour, minute, caps.get(3).map(|m| m.as_str()));
    }

    if let Some(caps) = CLOCK_HOUR_RE.captures(&lower) {
        let hour: u32 = caps[1].parse().ok()?;
        return normalize_time(hour, 0, Some(&caps[2]));
    }

    None
}

fn normalize_time(hour: u32, minute: u32, ampm: Option<&str>) -> Option<NaiveTime> {
    let hour = match ampm {
        Some("pm") if hour != 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
