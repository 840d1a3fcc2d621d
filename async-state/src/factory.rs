//! Builds reducers that track async operations
//!
//! Each event set contributes four handlers:
//!
//! | Event     | Next state                                                     |
//! |-----------|----------------------------------------------------------------|
//! | `request` | `loading = true`, `error = None`, `request = payload`           |
//! | `ok`      | `loading = false`, `data = payload.response()`                  |
//! | `error`   | `loading = false`, `error = payload.error()`                    |
//! | `reset`   | the defaults captured at construction                           |
//!
//! Fields not listed pass through unchanged. In particular `ok` keeps a
//! previously recorded `error`; only `request` and `reset` clear it.

use crate::error::EventSetError;
use crate::event_set::{AsyncEventSet, EventKind, EventSets};
use crate::state::{AsyncPayload, AsyncState, StateFor};
use async_reducer_core::handlers::{create_reducer, Handler, HandlerMap, MappedReducer};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Reducer produced by [`create`]
pub type AsyncReducer<Id, P> = MappedReducer<Id, StateFor<P>, P>;

/// The pure transition applied for `kind`.
///
/// `defaults` is only used by [`EventKind::Reset`], which returns a copy of it
/// regardless of the current state and payload.
#[must_use]
pub fn transition_handler<P>(kind: EventKind, defaults: &StateFor<P>) -> Handler<StateFor<P>, P>
where
    P: AsyncPayload + Send + Sync + 'static,
    P::Response: Send + Sync + 'static,
    P::Failure: Send + Sync + 'static,
{
    match kind {
        EventKind::Request => Arc::new(|state: &StateFor<P>, payload: &P| AsyncState {
            loading: true,
            request: Some(payload.clone()),
            data: state.data.clone(),
            error: None,
        }),
        EventKind::Ok => Arc::new(|state: &StateFor<P>, payload: &P| AsyncState {
            loading: false,
            request: state.request.clone(),
            data: payload.response(),
            error: state.error.clone(),
        }),
        EventKind::Error => Arc::new(|state: &StateFor<P>, payload: &P| AsyncState {
            loading: false,
            request: state.request.clone(),
            data: state.data.clone(),
            error: payload.error(),
        }),
        EventKind::Reset => {
            let defaults = defaults.clone();
            Arc::new(move |_: &StateFor<P>, _: &P| defaults.clone())
        },
    }
}

/// Map each identifier of `events` to its transition.
///
/// If two kinds share an identifier the later kind (in `request, ok, error,
/// reset` order) wins.
#[must_use]
pub fn build_transition_map<Id, P>(
    events: &AsyncEventSet<Id>,
    defaults: &StateFor<P>,
) -> HandlerMap<Id, StateFor<P>, P>
where
    Id: Eq + Hash + Clone + fmt::Debug,
    P: AsyncPayload + Send + Sync + 'static,
    P::Response: Send + Sync + 'static,
    P::Failure: Send + Sync + 'static,
{
    let mut handlers = HandlerMap::new();
    for (kind, event) in events.entries() {
        if handlers.insert(event.clone(), transition_handler(kind, defaults)) {
            tracing::warn!(event = ?event, %kind, "Identifier reused within one event set, handler replaced");
        }
    }
    handlers
}

/// Build the reducer tracking `events`.
///
/// `events` is either one [`AsyncEventSet`] or a sequence of them (see
/// [`EventSets`]). For a sequence, the transition maps are merged in order and
/// a later set's handler replaces an earlier one for a shared identifier.
/// Every operation in the sequence then drives the same tracked state.
///
/// `defaults` falls back to [`AsyncState::idle`]. The value is captured once
/// and serves both as [`MappedReducer::initial_state`] and as the result of
/// every `reset`.
///
/// Never fails: an empty sequence yields a reducer that handles nothing, and
/// colliding identifiers are only logged.
///
/// # Example
///
/// ```
/// use async_reducer_state::{create, AsyncEventSet, AsyncReducer};
/// use serde_json::{json, Value};
///
/// let user = AsyncEventSet::new("user/request", "user/ok", "user/error", "user/reset");
/// let reducer: AsyncReducer<&str, Value> = create(user, None);
///
/// let state = reducer.transition(reducer.initial_state(), &"user/request", &json!({"id": 1}));
/// assert!(state.loading);
///
/// let state = reducer.transition(&state, &"user/ok", &json!({"response": "Ada"}));
/// assert_eq!(state.data, Some(json!("Ada")));
/// ```
#[must_use]
pub fn create<Id, P>(events: impl Into<EventSets<Id>>, defaults: Option<StateFor<P>>) -> AsyncReducer<Id, P>
where
    Id: Eq + Hash + Clone + fmt::Debug,
    P: AsyncPayload + Send + Sync + 'static,
    P::Response: Send + Sync + 'static,
    P::Failure: Send + Sync + 'static,
{
    let events: EventSets<Id> = events.into();
    let defaults = defaults.unwrap_or_default();
    let handlers = match events {
        EventSets::Single(set) => build_transition_map(&set, &defaults),
        EventSets::Many(sets) => {
            let mut combined = HandlerMap::new();
            for (index, set) in sets.iter().enumerate() {
                for event in combined.merge(build_transition_map(set, &defaults)) {
                    tracing::warn!(event = ?event, set = index, "Identifier already bound by an earlier set, later handler wins");
                }
            }
            combined
        },
    };
    create_reducer(handlers, defaults)
}

/// Like [`create`], but rejects colliding identifiers first.
///
/// # Errors
///
/// Returns an [`EventSetError`] when an identifier is used twice, within one
/// set or across sets.
pub fn create_checked<Id, P>(
    events: impl Into<EventSets<Id>>,
    defaults: Option<StateFor<P>>,
) -> Result<AsyncReducer<Id, P>, EventSetError>
where
    Id: Eq + Hash + Clone + fmt::Debug,
    P: AsyncPayload + Send + Sync + 'static,
    P::Response: Send + Sync + 'static,
    P::Failure: Send + Sync + 'static,
{
    let events = events.into();
    events.validate()?;
    Ok(create(events, defaults))
}
