// The classifier is an ordered rule table and the order is observable
// behavior. Several tests here pin ambiguous orderings on purpose; see the
// comments before "fixing" one.
use chrono::NaiveDate;

use dialogue_cell::models::{ConversationPhase, Intent};
use dialogue_cell::services::intent::{classify, is_faq_question};
use scheduling_cell::models::TimePreference;

// A Wednesday.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
}

#[test]
fn greetings_match_by_prefix() {
    let (intent, _) = classify("Hello there", ConversationPhase::Greeting, today());
    assert_eq!(intent, Intent::Greeting);

    let (intent, _) = classify("hi, I need some help", ConversationPhase::Greeting, today());
    assert_eq!(intent, Intent::Greeting);
}

#[test]
fn scheduling_keywords_yield_schedule_with_entities() {
    let (intent, entities) = classify(
        "I need to see the doctor for a headache",
        ConversationPhase::Greeting,
        today(),
    );
    assert_eq!(intent, Intent::Schedule);
    assert_eq!(entities.date, None);

    let (intent, entities) = classify(
        "I want to book an appointment tomorrow morning",
        ConversationPhase::Greeting,
        today(),
    );
    assert_eq!(intent, Intent::Schedule);
    assert_eq!(entities.date, Some(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()));
    assert_eq!(entities.time_preference, TimePreference::Morning);
}

#[test]
fn policy_question_is_faq_but_cancel_my_overrides() {
    let (intent, _) = classify(
        "What is your cancellation policy?",
        ConversationPhase::Greeting,
        today(),
    );
    assert_eq!(intent, Intent::Faq);

    // Same vocabulary, but an actual request.
    let (intent, _) = classify(
        "Please cancel my visit",
        ConversationPhase::Greeting,
        today(),
    );
    assert_eq!(intent, Intent::Cancel);
}

#[test]
fn cancel_my_appointment_is_swallowed_by_the_schedule_rule() {
    // Pinned ordering artifact: "appointment" is a scheduling keyword and
    // that rule runs first, and the word also cancels out the FAQ score.
    let (intent, _) = classify(
        "Please cancel my appointment",
        ConversationPhase::Greeting,
        today(),
    );
    assert_eq!(intent, Intent::Schedule);
}

#[test]
fn reschedule_is_swallowed_by_the_schedule_rule() {
    // Pinned ordering artifact: "reschedule" contains the substring
    // "schedule", so the earlier schedule rule always wins.
    let (intent, _) = classify(
        "I'd like to reschedule",
        ConversationPhase::Greeting,
        today(),
    );
    assert_eq!(intent, Intent::Schedule);
}

#[test]
fn date_phrase_with_affirmative_word_is_provide_info_not_confirm() {
    // "works" is a confirm word, but the date/time rule runs first.
    let (intent, entities) = classify(
        "tomorrow morning works",
        ConversationPhase::CollectingPreferences,
        today(),
    );
    assert_eq!(intent, Intent::ProvideInfo);
    assert_eq!(entities.date, Some(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()));
    assert_eq!(entities.time_preference, TimePreference::Morning);
}

#[test]
fn date_phrase_outside_preference_phases_falls_through() {
    // The date/time rule only applies in the three preference-gathering
    // phases; elsewhere the same message ends up OTHER.
    let (intent, _) = classify(
        "tomorrow morning works",
        ConversationPhase::Completed,
        today(),
    );
    assert_eq!(intent, Intent::Other);
}

#[test]
fn plain_affirmative_confirms() {
    let (intent, _) = classify("yes, confirm please", ConversationPhase::Confirmation, today());
    assert_eq!(intent, Intent::Confirm);

    let (intent, _) = classify("sounds good", ConversationPhase::SlotRecommendation, today());
    assert_eq!(intent, Intent::Confirm);
}

#[test]
fn decline_words() {
    let (intent, _) = classify(
        "none of these fit my calendar",
        ConversationPhase::SlotRecommendation,
        today(),
    );
    assert_eq!(intent, Intent::Decline);
}

#[test]
fn bare_clock_time_selects_a_slot() {
    let (intent, entities) = classify("10:30", ConversationPhase::SlotRecommendation, today());
    assert_eq!(intent, Intent::SelectSlot);
    assert_eq!(entities.time_selection.as_deref(), Some("10:30"));
}

#[test]
fn clock_time_with_am_is_provide_info_during_recommendation() {
    // Pinned ordering artifact: "am" reads as a morning preference, and the
    // date/time rule outranks slot selection in the recommendation phase.
    let (intent, entities) = classify(
        "10:30 am",
        ConversationPhase::SlotRecommendation,
        today(),
    );
    assert_eq!(intent, Intent::ProvideInfo);
    assert_eq!(entities.time_preference, TimePreference::Morning);
}

#[test]
fn contact_details_during_collection() {
    let (intent, entities) = classify(
        "jane.doe@example.com",
        ConversationPhase::CollectingInfo,
        today(),
    );
    assert_eq!(intent, Intent::ProvideInfo);
    assert_eq!(entities.email.as_deref(), Some("jane.doe@example.com"));

    let (intent, entities) = classify(
        "555-123-4567",
        ConversationPhase::CollectingInfo,
        today(),
    );
    assert_eq!(intent, Intent::ProvideInfo);
    assert_eq!(entities.phone.as_deref(), Some("555-123-4567"));

    // Free text in this phase is still information (assumed to be a name).
    let (intent, entities) = classify("Jane Doe", ConversationPhase::CollectingInfo, today());
    assert_eq!(intent, Intent::ProvideInfo);
    assert_eq!(entities.email, None);
    assert_eq!(entities.phone, None);
}

#[test]
fn unmatched_text_is_other() {
    let (intent, _) = classify(
        "my head hurts",
        ConversationPhase::UnderstandingNeeds,
        today(),
    );
    assert_eq!(intent, Intent::Other);
}

#[test]
fn faq_heuristic_scores_keywords_and_question_openers() {
    assert!(is_faq_question("Where are you located?"));
    assert!(is_faq_question("Do you accept insurance?"));
    assert!(!is_faq_question("I want to book an appointment for tomorrow"));
}
