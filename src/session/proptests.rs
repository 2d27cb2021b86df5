//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::state::*;
use super::transition::*;
use super::*;
use crate::backend::{BackendError, MessageAnswer};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SessionContext {
    SessionContext::new("test-session", StalePolicy::LastResolvedWins)
}

fn arb_policy_context() -> impl Strategy<Value = SessionContext> {
    prop_oneof![
        Just(StalePolicy::LastResolvedWins),
        Just(StalePolicy::LatestIssuedWins),
    ]
    .prop_map(|policy| SessionContext::new("test-session", policy))
}

/// Replay events from an empty session, skipping refused ones
fn replay(events: Vec<Event>, context: &SessionContext) -> SessionState {
    let mut state = SessionState::new();
    for event in events {
        if let Ok(result) = transition(&state, context, event) {
            state = result.new_state;
        }
    }
    state
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_backend_error() -> impl Strategy<Value = BackendError> {
    "[a-zA-Z ]{1,20}".prop_flat_map(|message| {
        prop_oneof![
            Just(BackendError::rejected(message.clone())),
            Just(BackendError::transport(message.clone())),
            Just(BackendError::timeout(message)),
        ]
    })
}

fn arb_item() -> impl Strategy<Value = CatalogItem> {
    (1u64..1000, "[A-Za-z ]{1,12}").prop_map(|(id, title)| CatalogItem {
        id,
        title,
        thumbnail_url: format!("https://img/{id}.jpg"),
    })
}

fn arb_detail() -> impl Strategy<Value = ItemDetail> {
    ("[A-Za-z ]{1,12}", "\\$[0-9]{1,2}\\.99", "[a-z ]{0,20}", "[a-z ]{0,20}").prop_map(
        |(name, price, description, summary)| ItemDetail::new(name, price, description, summary),
    )
}

fn arb_answer() -> impl Strategy<Value = MessageAnswer> {
    ("[a-zA-Z ]{1,20}", proptest::option::of("[a-z ]{0,20}")).prop_map(|(response, review)| {
        MessageAnswer {
            response,
            review_text: review,
        }
    })
}

fn arb_token() -> impl Strategy<Value = RequestToken> {
    1u64..4
}

fn arb_user_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z ]{0,10}".prop_map(|text| Event::QueryEdited { text }),
        "[a-z ]{0,10}".prop_map(|text| Event::DraftEdited { text }),
        Just(Event::SearchSubmitted),
        (1u64..1000).prop_map(|app_id| Event::ItemClicked { app_id }),
        Just(Event::MessageSubmitted),
        (0usize..6).prop_map(|entry| Event::EvidenceRequested { entry }),
    ]
}

fn arb_completion_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (
            arb_token(),
            prop_oneof![
                proptest::collection::vec(arb_item(), 0..4).prop_map(Ok),
                arb_backend_error().prop_map(Err),
            ]
        )
            .prop_map(|(token, result)| Event::SearchResolved { token, result }),
        (
            arb_token(),
            prop_oneof![arb_detail().prop_map(Ok), arb_backend_error().prop_map(Err)]
        )
            .prop_map(|(token, result)| Event::DetailResolved { token, result }),
        (
            arb_token(),
            prop_oneof![arb_answer().prop_map(Ok), arb_backend_error().prop_map(Err)]
        )
            .prop_map(|(token, result)| Event::AnswerResolved { token, result }),
        (
            arb_token(),
            "[a-z ]{1,10}",
            prop_oneof![Just(Ok(())), arb_backend_error().prop_map(Err)]
        )
            .prop_map(|(token, query, result)| Event::EvidenceBroadened {
                token,
                query,
                result
            }),
        (
            arb_token(),
            prop_oneof![arb_answer().prop_map(Ok), arb_backend_error().prop_map(Err)]
        )
            .prop_map(|(token, result)| Event::EvidenceAnswerResolved { token, result }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_user_event(), arb_completion_event()]
}

fn arb_events() -> impl Strategy<Value = Vec<Event>> {
    proptest::collection::vec(arb_event(), 0..25)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // The transcript only ever grows, and existing entries never change
    #[test]
    fn prop_log_is_append_only(
        events in arb_events(),
        context in arb_policy_context(),
    ) {
        let mut state = SessionState::new();
        for event in events {
            if let Ok(result) = transition(&state, &context, event) {
                let before = state.log.entries();
                let after = result.new_state.log.entries();
                prop_assert!(after.len() >= before.len());
                prop_assert_eq!(&after[..before.len()], before);
                prop_assert!(after.len() - before.len() <= 1, "At most one entry per event");
                state = result.new_state;
            }
        }
    }

    // Evidence excerpts only ever appear on system entries
    #[test]
    fn prop_evidence_only_on_system_entries(events in arb_events()) {
        let state = replay(events, &test_context());
        for entry in state.log.entries() {
            if entry.evidence().is_some() {
                prop_assert_eq!(entry.sender(), Sender::System);
            }
        }
    }

    // A non-blank message always echoes exactly one user entry immediately
    #[test]
    fn prop_message_echoes_once(
        events in arb_events(),
        text in "[a-z]{1,10}[a-z ]{0,10}",
    ) {
        let context = test_context();
        let state = replay(events, &context);
        let typed = transition(&state, &context, Event::DraftEdited { text: text.clone() })
            .unwrap()
            .new_state;
        let result = transition(&typed, &context, Event::MessageSubmitted).unwrap();

        prop_assert_eq!(result.new_state.log.len(), typed.log.len() + 1);
        let echoed = result.new_state.log.entries().last().unwrap();
        prop_assert_eq!(echoed.sender(), Sender::User);
        prop_assert_eq!(echoed.text(), text.as_str());
        prop_assert_eq!(result.new_state.last_user_query(), Some(text.as_str()));
        prop_assert!(result.new_state.error.is_clear());
        prop_assert_eq!(result.effects.len(), 1);
        let is_send = matches!(&result.effects[0], Effect::SendMessage { text: sent, .. } if *sent == text);
        prop_assert!(is_send);
    }

    // Blank messages change nothing at all
    #[test]
    fn prop_blank_message_is_noop(
        events in arb_events(),
        blank in "[ \t]{0,6}",
    ) {
        let context = test_context();
        let state = replay(events, &context);
        let typed = transition(&state, &context, Event::DraftEdited { text: blank })
            .unwrap()
            .new_state;
        let result = transition(&typed, &context, Event::MessageSubmitted).unwrap();
        prop_assert!(result.is_noop(&typed));
    }

    // Successful search results replace the set exactly, and repeat equal
    #[test]
    fn prop_search_replaces_results(
        events in arb_events(),
        items in proptest::collection::vec(arb_item(), 0..6),
    ) {
        let context = test_context();
        let state = replay(events, &context);
        let resolve = |state: &SessionState| {
            transition(state, &context, Event::SearchResolved {
                token: 1,
                result: Ok(items.clone()),
            })
            .unwrap()
            .new_state
        };

        let once = resolve(&state);
        prop_assert_eq!(&once.results, &items);
        let twice = resolve(&once);
        prop_assert_eq!(&twice.results, &once.results);
    }

    // The draft is cleared only by a successful answer
    #[test]
    fn prop_draft_cleared_only_by_answer(
        events in arb_events(),
        draft in "[a-z]{1,10}",
        event in arb_event(),
    ) {
        let context = test_context();
        let mut state = replay(events, &context);
        state.draft = draft.clone();

        let clears = matches!(&event, Event::AnswerResolved { result: Ok(_), .. });
        let edits = matches!(&event, Event::DraftEdited { .. });
        if let Ok(result) = transition(&state, &context, event) {
            if clears {
                prop_assert_eq!(result.new_state.draft.as_str(), "");
            } else if !edits {
                prop_assert_eq!(result.new_state.draft, draft);
            }
        }
    }

    // Every action that reaches the backend starts with a clear banner
    #[test]
    fn prop_actions_clear_error(
        events in arb_events(),
        event in arb_user_event(),
    ) {
        let context = test_context();
        let mut state = replay(events, &context);
        state.error.surface(ActionKind::Search, &"previous failure");

        if let Ok(result) = transition(&state, &context, event) {
            if !result.effects.is_empty() {
                prop_assert!(result.new_state.error.is_clear());
            }
        }
    }

    // Failures surface exactly one prefixed error and leave results untouched
    #[test]
    fn prop_failures_preserve_state(
        events in arb_events(),
        error in arb_backend_error(),
    ) {
        let context = test_context();
        let state = replay(events, &context);
        let result = transition(&state, &context, Event::SearchResolved {
            token: 1,
            result: Err(error.clone()),
        })
        .unwrap();

        prop_assert_eq!(&result.new_state.results, &state.results);
        prop_assert_eq!(&result.new_state.log, &state.log);
        let expected = format!("Search failed: {error}");
        prop_assert_eq!(result.new_state.error(), Some(expected.as_str()));
    }

    // An evidence request is only ever issued for an answer without evidence
    #[test]
    fn prop_evidence_only_for_bare_answers(
        events in arb_events(),
        entry in 0usize..8,
    ) {
        let context = test_context();
        let state = replay(events, &context);
        let result = transition(&state, &context, Event::EvidenceRequested { entry });

        match state.log.get(entry) {
            Some(target) if target.accepts_more_evidence() => {
                let result = result.unwrap();
                prop_assert_eq!(result.effects.len(), 1);
                let query = state.last_user_query.clone().unwrap_or_default();
                let is_broaden = matches!(&result.effects[0], Effect::BroadenEvidence { query: q, .. } if *q == query);
                prop_assert!(is_broaden);
            }
            _ => prop_assert!(result.is_err()),
        }
    }

    // Under fencing, only the latest issued search can change the results
    #[test]
    fn prop_fencing_drops_superseded_searches(
        submits in 2u64..5,
        stale_token in 1u64..5,
        items in proptest::collection::vec(arb_item(), 1..4),
    ) {
        let context = SessionContext::new("test-session", StalePolicy::LatestIssuedWins);
        let mut state = SessionState::new();
        for _ in 0..submits {
            state = transition(&state, &context, Event::SearchSubmitted).unwrap().new_state;
        }

        let result = transition(&state, &context, Event::SearchResolved {
            token: stale_token,
            result: Ok(items.clone()),
        })
        .unwrap();

        if stale_token == submits {
            prop_assert_eq!(&result.new_state.results, &items);
        } else {
            prop_assert!(result.is_noop(&state));
        }
    }
}
