//! Property-based testing utilities using proptest
//!
//! Strategies for JSON payloads, tracked states and event sets.

use async_reducer_state::{AsyncEventSet, AsyncState, EventKind, JsonAsyncState};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Scalar JSON values
pub fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

/// Payloads as dispatched with lifecycle events
///
/// Objects carrying an optional `response`, an optional `error` and an
/// unrelated key, plus the odd bare scalar.
pub fn json_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (
            proptest::option::of(json_leaf()),
            proptest::option::of(json_leaf()),
            json_leaf(),
        )
            .prop_map(|(response, error, extra)| {
                let mut payload = json!({ "extra": extra });
                if let Some(response) = response {
                    payload["response"] = response;
                }
                if let Some(error) = error {
                    payload["error"] = error;
                }
                payload
            }),
        1 => json_leaf(),
    ]
}

/// Arbitrary tracked states
pub fn json_async_state() -> impl Strategy<Value = JsonAsyncState> {
    (
        any::<bool>(),
        proptest::option::of(json_payload()),
        proptest::option::of(json_leaf()),
        proptest::option::of(json_leaf()),
    )
        .prop_map(|(loading, request, data, error)| AsyncState {
            loading,
            request,
            data,
            error,
        })
}

/// Event sets whose four identifiers are distinct
pub fn event_set() -> impl Strategy<Value = AsyncEventSet<String>> {
    "[a-z]{1,8}".prop_map(|name| {
        AsyncEventSet::new(
            format!("{name}/request"),
            format!("{name}/ok"),
            format!("{name}/error"),
            format!("{name}/reset"),
        )
    })
}

/// Any lifecycle event kind
pub fn event_kind() -> impl Strategy<Value = EventKind> {
    prop::sample::select(EventKind::ALL.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_event_sets_are_valid(set in event_set()) {
            prop_assert!(set.validate().is_ok());
        }

        #[test]
        fn identifiers_are_named_after_their_kind(set in event_set(), kind in event_kind()) {
            let suffix = format!("/{kind}");
            prop_assert!(set.identifier(kind).ends_with(&suffix));
        }
    }
}
