//! Rule-based intent classification.
//!
//! Classification is a flat, ordered rule table; the first rule that matches
//! wins. The order is load-bearing and pinned by tests: the date/time rule
//! must run before the confirm rule so "tomorrow morning works" is a
//! preference, not a confirmation, and scheduling keywords beat confirm
//! words so "book it" stays SCHEDULE.

use chrono::NaiveDate;
use tracing::debug;

use scheduling_cell::models::TimePreference;

use crate::models::{ConversationPhase, ExtractedEntities, Intent};
use crate::services::parsers;

const GREETINGS: [&str; 6] = [
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

const SCHEDULE_KEYWORDS: [&str; 6] = [
    "schedule",
    "book",
    "appointment",
    "see the doctor",
    "need to see",
    "want to see",
];

const CONFIRM_WORDS: [&str; 7] = [
    "yes",
    "confirm",
    "book it",
    "sounds good",
    "perfect",
    "let's do it",
    "that works",
];

const DECLINE_WORDS: [&str; 7] = [
    "no",
    "don't",
    "won't work",
    "different",
    "other",
    "none of these",
    "something else",
];

const DAY_WORDS: [&str; 9] = [
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

const FAQ_KEYWORDS: [&str; 37] = [
    "where",
    "location",
    "address",
    "parking",
    "directions",
    "hours",
    "open",
    "close",
    "when",
    "insurance",
    "accept",
    "payment",
    "pay",
    "cost",
    "price",
    "billing",
    "bring",
    "documents",
    "prepare",
    "first visit",
    "cancel",
    "cancellation",
    "policy",
    "policies",
    "covid",
    "mask",
    "protocol",
    "late",
    "arrive",
    "early",
    "telehealth",
    "virtual",
    "video",
    "contact",
    "phone",
    "email",
    "call",
];

const SCHEDULING_SIGNAL_KEYWORDS: [&str; 11] = [
    "book",
    "schedule",
    "appointment",
    "see the doctor",
    "available",
    "slot",
    "time",
    "tomorrow",
    "today",
    "reschedule",
    "change my appointment",
];

const QUESTION_OPENERS: [&str; 9] = [
    "do you",
    "what is",
    "what are",
    "how do",
    "how can",
    "where is",
    "where are",
    "is there",
    "can i",
];

/// Keyword-scoring heuristic deciding FAQ vs. scheduling talk. The external
/// retrieval collaborator is only consulted for the answer, never for
/// classification.
pub fn is_faq_question(message: &str) -> bool {
    let lower = message.to_lowercase();

    let faq_score: usize = FAQ_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    let scheduling_score: usize = SCHEDULING_SIGNAL_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();

    let opener_bonus = 2 * QUESTION_OPENERS
        .iter()
        .filter(|p| lower.contains(*p))
        .count();

    faq_score + opener_bonus > scheduling_score
}

/// Inputs shared by every rule: the utterance (raw and lowercased), the
/// session phase, and the date/time-preference parses, computed once.
pub struct RuleInput<'a> {
    pub message: &'a str,
    pub lower: &'a str,
    pub phase: ConversationPhase,
    pub date: Option<NaiveDate>,
    pub time_preference: TimePreference,
}

pub struct IntentRule {
    pub name: &'static str,
    pub apply: fn(&RuleInput<'_>) -> Option<(Intent, ExtractedEntities)>,
}

/// The rule table, in evaluation order. Reordering entries changes observable
/// behavior; see the ordering tests before touching this.
pub const RULE_TABLE: &[IntentRule] = &[
    IntentRule {
        name: "greeting",
        apply: |input| {
            let hit = GREETINGS
                .iter()
                .any(|g| input.lower.starts_with(g) || input.lower == *g);
            hit.then(|| (Intent::Greeting, ExtractedEntities::default()))
        },
    },
    IntentRule {
        // A policy question about cancellation is FAQ, but "cancel my/the"
        // is always an actual cancellation request.
        name: "faq",
        apply: |input| {
            if !is_faq_question(input.message) {
                return None;
            }
            if input.lower.contains("cancel my") || input.lower.contains("cancel the") {
                return Some((Intent::Cancel, ExtractedEntities::default()));
            }
            Some((Intent::Faq, ExtractedEntities::default()))
        },
    },
    IntentRule {
        name: "schedule",
        apply: |input| {
            if !SCHEDULE_KEYWORDS.iter().any(|kw| input.lower.contains(kw)) {
                return None;
            }
            let entities = ExtractedEntities {
                date: input.date,
                time_preference: input.time_preference,
                ..Default::default()
            };
            Some((Intent::Schedule, entities))
        },
    },
    IntentRule {
        name: "cancel",
        apply: |input| {
            let hit = input.lower.contains("cancel")
                && (input.lower.contains("my") || input.lower.contains("appointment"));
            hit.then(|| (Intent::Cancel, ExtractedEntities::default()))
        },
    },
    IntentRule {
        name: "reschedule",
        apply: |input| {
            let hit = input.lower.contains("reschedule")
                || (input.lower.contains("change") && input.lower.contains("appointment"));
            hit.then(|| (Intent::Reschedule, ExtractedEntities::default()))
        },
    },
    IntentRule {
        // Must precede the confirm rule: a date phrase with an affirmative
        // word in it is a preference, not a confirmation.
        name: "date-or-time-preference",
        apply: |input| {
            let has_entity = input.date.is_some() || input.time_preference != TimePreference::Any;
            let phase_applies = matches!(
                input.phase,
                ConversationPhase::UnderstandingNeeds
                    | ConversationPhase::CollectingPreferences
                    | ConversationPhase::SlotRecommendation
            );
            if !(has_entity && phase_applies) {
                return None;
            }
            let entities = ExtractedEntities {
                date: input.date,
                time_preference: input.time_preference,
                ..Default::default()
            };
            Some((Intent::ProvideInfo, entities))
        },
    },
    IntentRule {
        name: "confirm",
        apply: |input| {
            let hit = CONFIRM_WORDS.iter().any(|w| input.lower.contains(w))
                && input.date.is_none();
            hit.then(|| (Intent::Confirm, ExtractedEntities::default()))
        },
    },
    IntentRule {
        name: "decline",
        apply: |input| {
            let hit = DECLINE_WORDS.iter().any(|w| input.lower.contains(w));
            hit.then(|| (Intent::Decline, ExtractedEntities::default()))
        },
    },
    IntentRule {
        name: "clock-time-selection",
        apply: |input| {
            if !parsers::contains_clock_time(input.lower) {
                return None;
            }
            let entities = ExtractedEntities {
                time_selection: Some(input.message.to_string()),
                ..Default::default()
            };
            Some((Intent::SelectSlot, entities))
        },
    },
    IntentRule {
        name: "day-selection",
        apply: |input| {
            if input.phase != ConversationPhase::SlotRecommendation {
                return None;
            }
            if !DAY_WORDS.iter().any(|d| input.lower.contains(d)) {
                return None;
            }
            let entities = ExtractedEntities {
                date_selection: Some(input.message.to_string()),
                ..Default::default()
            };
            Some((Intent::SelectSlot, entities))
        },
    },
    IntentRule {
        // During contact collection any message is information; email and
        // phone get extracted, everything else is assumed to be a name.
        name: "contact-info",
        apply: |input| {
            let phase_applies = matches!(
                input.phase,
                ConversationPhase::CollectingInfo | ConversationPhase::Confirmation
            );
            if !phase_applies {
                return None;
            }
            let mut entities = ExtractedEntities::default();
            if let Some(email) = parsers::extract_email(input.message) {
                entities.email = Some(email);
            } else if let Some(phone) = parsers::extract_phone(input.message) {
                entities.phone = Some(phone);
            }
            Some((Intent::ProvideInfo, entities))
        },
    },
];

/// Classify one utterance against the rule table. `today` anchors relative
/// date parsing so classification is deterministic under test.
pub fn classify(
    message: &str,
    phase: ConversationPhase,
    today: NaiveDate,
) -> (Intent, ExtractedEntities) {
    let lower = message.to_lowercase();
    let lower = lower.trim();

    let input = RuleInput {
        message,
        lower,
        phase,
        date: parsers::parse_date_reference(message, today),
        time_preference: parsers::parse_time_preference(message),
    };

    for rule in RULE_TABLE {
        if let Some((intent, entities)) = (rule.apply)(&input) {
            debug!("Intent rule '{}' matched: {}", rule.name, intent);
            return (intent, entities);
        }
    }

    (Intent::Other, ExtractedEntities::default())
}
