//! Lifecycle properties of reducers built by `create`
//!
//! Covers the transition rules for every event kind, the merge order of
//! several event sets, and the end-to-end scenarios of a tracked request.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use async_reducer_state::{create, AsyncEventSet, AsyncReducer, AsyncState, Dispatch, JsonAsyncState};
use async_reducer_testing::properties::{event_set, json_async_state, json_payload};
use async_reducer_testing::{assertions, ReducerTest};
use proptest::prelude::*;
use serde_json::{json, Value};

fn fetch() -> AsyncEventSet<&'static str> {
    AsyncEventSet::new("fetch/request", "fetch/ok", "fetch/error", "fetch/reset")
}

fn reducer_for(set: &AsyncEventSet<String>, defaults: Option<JsonAsyncState>) -> AsyncReducer<String, Value> {
    create(set.clone(), defaults)
}

// ============================================================================
// Transition properties
// ============================================================================

proptest! {
    #[test]
    fn reset_always_returns_defaults(
        set in event_set(),
        defaults in json_async_state(),
        state in json_async_state(),
        payload in json_payload(),
    ) {
        let reducer = reducer_for(&set, Some(defaults.clone()));
        prop_assert_eq!(reducer.transition(&state, &set.reset, &payload), defaults);
    }

    #[test]
    fn reset_is_idempotent(set in event_set(), state in json_async_state(), payload in json_payload()) {
        let reducer = reducer_for(&set, None);
        let once = reducer.transition(&state, &set.reset, &payload);
        let twice = reducer.transition(&once, &set.reset, &payload);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.is_idle());
    }

    #[test]
    fn request_starts_loading(set in event_set(), state in json_async_state(), payload in json_payload()) {
        let reducer = reducer_for(&set, None);
        let next = reducer.transition(&state, &set.request, &payload);
        prop_assert!(next.loading);
        prop_assert_eq!(next.error, None);
        prop_assert_eq!(next.request, Some(payload));
        prop_assert_eq!(next.data, state.data);
    }

    #[test]
    fn ok_records_response(set in event_set(), state in json_async_state(), payload in json_payload()) {
        let reducer = reducer_for(&set, None);
        let next = reducer.transition(&state, &set.ok, &payload);
        let expected = payload.get("response").filter(|v| !v.is_null()).cloned();
        prop_assert!(!next.loading);
        prop_assert_eq!(next.data, expected);
        prop_assert_eq!(next.request, state.request);
        prop_assert_eq!(next.error, state.error);
    }

    #[test]
    fn error_records_failure(set in event_set(), state in json_async_state(), payload in json_payload()) {
        let reducer = reducer_for(&set, None);
        let next = reducer.transition(&state, &set.error, &payload);
        let expected = payload.get("error").filter(|v| !v.is_null()).cloned();
        prop_assert!(!next.loading);
        prop_assert_eq!(next.error, expected);
        prop_assert_eq!(next.request, state.request);
        prop_assert_eq!(next.data, state.data);
    }

    #[test]
    fn transitions_leave_input_untouched(set in event_set(), state in json_async_state(), payload in json_payload()) {
        let reducer = reducer_for(&set, None);
        let before = state.clone();
        for event in [&set.request, &set.ok, &set.error, &set.reset] {
            let _ = reducer.transition(&state, event, &payload);
        }
        prop_assert_eq!(state, before);
    }
}

// ============================================================================
// Merge order
// ============================================================================

#[test]
fn later_set_wins_shared_identifier() {
    // Both sets claim "shared": as `ok` in the first, as `reset` in the second.
    let first = AsyncEventSet::new("a/request", "shared", "a/error", "a/reset");
    let second = AsyncEventSet::new("b/request", "b/ok", "b/error", "shared");
    let reducer: AsyncReducer<&str, Value> = create(vec![first.clone(), second.clone()], None);

    let busy = reducer.transition(reducer.initial_state(), &"a/request", &json!({}));
    let next = reducer.transition(&busy, &"shared", &json!({"response": 1}));
    assert_eq!(next, AsyncState::idle(), "second set's reset handler must win");

    // Reversed order flips the winner
    let reducer: AsyncReducer<&str, Value> = create(vec![second, first], None);
    let next = reducer.transition(&busy, &"shared", &json!({"response": 1}));
    assert_eq!(next.data, Some(json!(1)));
    assert!(!next.loading);
}

#[test]
fn array_and_vec_inputs_build_the_same_handlers() {
    let other = AsyncEventSet::new("x/request", "x/ok", "x/error", "x/reset");
    let from_array: AsyncReducer<&str, Value> = create([fetch(), other.clone()], None);
    let from_vec: AsyncReducer<&str, Value> = create(vec![fetch(), other], None);

    assert_eq!(from_array.handlers().len(), from_vec.handlers().len());
    for event in from_vec.handlers().identifiers() {
        assert!(from_array.handles(event));
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn request_ok_reset_scenario() {
    let defaults = JsonAsyncState::idle();
    let reducer: AsyncReducer<&str, Value> = create(fetch(), Some(defaults.clone()));

    let requested = reducer.transition(&defaults, &"fetch/request", &json!({}));
    assert_eq!(
        requested,
        AsyncState {
            loading: true,
            request: Some(json!({})),
            data: None,
            error: None,
        }
    );

    let succeeded = reducer.transition(&requested, &"fetch/ok", &json!({"response": 42}));
    assert_eq!(
        succeeded,
        AsyncState {
            loading: false,
            request: Some(json!({})),
            data: Some(json!(42)),
            error: None,
        }
    );

    let reset = reducer.transition(&succeeded, &"fetch/reset", &Value::Null);
    assert_eq!(reset, defaults);
}

#[test]
fn error_from_idle_scenario() {
    let reducer: AsyncReducer<&str, Value> = create(fetch(), None);

    ReducerTest::new(reducer.clone())
        .with_env(())
        .given_state(reducer.initial_state().clone())
        .when_action(Dispatch::new("fetch/error", json!({"error": "timeout"})))
        .then_state_eq(AsyncState {
            loading: false,
            request: None,
            data: None,
            error: Some(json!("timeout")),
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn retry_after_failure_clears_error_only_on_request() {
    let reducer: AsyncReducer<&str, Value> = create(fetch(), None);

    ReducerTest::new(reducer.clone())
        .with_env(())
        .given_state(reducer.initial_state().clone())
        .when_actions([
            Dispatch::new("fetch/request", json!({"attempt": 1})),
            Dispatch::new("fetch/error", json!({"error": "503"})),
            Dispatch::new("fetch/request", json!({"attempt": 2})),
        ])
        .then_state(|state| {
            assert!(state.loading);
            assert!(!state.has_error());
            assert_eq!(state.request, Some(json!({"attempt": 2})));
        })
        .run();
}

#[test]
fn result_after_reset_still_applies() {
    let reducer: AsyncReducer<&str, Value> = create(fetch(), None);

    ReducerTest::new(reducer.clone())
        .with_env(())
        .given_state(reducer.initial_state().clone())
        .when_actions([
            Dispatch::new("fetch/request", json!({})),
            Dispatch::new("fetch/reset", Value::Null),
            Dispatch::new("fetch/ok", json!({"response": "late"})),
        ])
        .then_state(|state| {
            assert!(!state.is_idle());
            assert_eq!(state.data, Some(json!("late")));
            assert_eq!(state.request, None);
        })
        .run();
}
