//! Handler maps and the reducers built from them
//!
//! A [`HandlerMap`] associates event identifiers with pure transition
//! functions `(state, payload) → state`. [`create_reducer`] turns such a map,
//! together with an initial state, into a [`MappedReducer`]: a transition
//! function keyed by identifier that also implements [`Reducer`] so it can be
//! driven by a store.
//!
//! Merging maps is a left-to-right fold: when two maps register the same
//! identifier, the handler from the later map wins.

use crate::effect::Effect;
use crate::reducer::Reducer;
use crate::{smallvec, SmallVec};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A pure transition from `(state, payload)` to the next state.
pub type Handler<S, P> = Arc<dyn Fn(&S, &P) -> S + Send + Sync>;

/// An action carrying an event identifier and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch<Id, P> {
    /// Identifier selecting the handler
    pub event: Id,
    /// Data handed to the handler
    pub payload: P,
}

impl<Id, P> Dispatch<Id, P> {
    /// Create a new dispatch
    #[must_use]
    pub const fn new(event: Id, payload: P) -> Self {
        Self { event, payload }
    }
}

/// Mapping from event identifier to transition handler
pub struct HandlerMap<Id, S, P> {
    handlers: HashMap<Id, Handler<S, P>>,
}

impl<Id, S, P> HandlerMap<Id, S, P>
where
    Id: Eq + Hash,
{
    /// Create an empty handler map
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any handler already bound to `event`
    #[must_use]
    pub fn on<F>(mut self, event: Id, handler: F) -> Self
    where
        F: Fn(&S, &P) -> S + Send + Sync + 'static,
    {
        self.insert(event, Arc::new(handler));
        self
    }

    /// Insert a handler.
    ///
    /// Returns `true` when an existing handler for `event` was replaced.
    pub fn insert(&mut self, event: Id, handler: Handler<S, P>) -> bool {
        self.handlers.insert(event, handler).is_some()
    }

    /// Fold `other` into this map.
    ///
    /// Handlers from `other` overwrite handlers already present for the same
    /// identifier (last-write-wins). Returns the identifiers that were
    /// overwritten, in no particular order.
    pub fn merge(&mut self, other: Self) -> Vec<Id>
    where
        Id: Clone,
    {
        let mut replaced = Vec::new();
        for (event, handler) in other.handlers {
            if self.handlers.contains_key(&event) {
                replaced.push(event.clone());
            }
            self.handlers.insert(event, handler);
        }
        replaced
    }

    /// Look up the handler bound to `event`
    #[must_use]
    pub fn get(&self, event: &Id) -> Option<&Handler<S, P>> {
        self.handlers.get(event)
    }

    /// Whether a handler is bound to `event`
    #[must_use]
    pub fn contains(&self, event: &Id) -> bool {
        self.handlers.contains_key(event)
    }

    /// Number of bound identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no identifier is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Iterate over the bound identifiers
    pub fn identifiers(&self) -> impl Iterator<Item = &Id> {
        self.handlers.keys()
    }
}

impl<Id, S, P> Default for HandlerMap<Id, S, P>
where
    Id: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id, S, P> Clone for HandlerMap<Id, S, P>
where
    Id: Clone,
{
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<Id: fmt::Debug, S, P> fmt::Debug for HandlerMap<Id, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMap")
            .field("identifiers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build a reducer from a handler map and an initial state.
///
/// The initial state is owned by the returned reducer and exposed through
/// [`MappedReducer::initial_state`], so a store can be seeded with exactly the
/// value the handlers were built against.
#[must_use]
pub fn create_reducer<Id, S, P>(handlers: HandlerMap<Id, S, P>, initial_state: S) -> MappedReducer<Id, S, P>
where
    Id: Eq + Hash,
{
    tracing::debug!(handlers = handlers.len(), "Created reducer from handler map");
    MappedReducer {
        handlers: Arc::new(handlers),
        initial_state: Arc::new(initial_state),
    }
}

/// A reducer dispatching on event identifiers.
///
/// Created by [`create_reducer`]. Clones share the same handlers.
pub struct MappedReducer<Id, S, P> {
    handlers: Arc<HandlerMap<Id, S, P>>,
    initial_state: Arc<S>,
}

impl<Id, S, P> MappedReducer<Id, S, P>
where
    Id: Eq + Hash,
{
    /// The state a store driving this reducer should start from
    #[must_use]
    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// Compute the next state for `event` without touching `state`.
    ///
    /// Identifiers with no bound handler return a copy of `state`.
    #[must_use]
    pub fn transition(&self, state: &S, event: &Id, payload: &P) -> S
    where
        Id: fmt::Debug,
        S: Clone,
    {
        match self.handlers.get(event) {
            Some(handler) => handler(state, payload),
            None => {
                tracing::trace!(event = ?event, "No handler bound, state unchanged");
                state.clone()
            },
        }
    }

    /// Whether `event` is handled by this reducer
    #[must_use]
    pub fn handles(&self, event: &Id) -> bool {
        self.handlers.contains(event)
    }

    /// The underlying handler map
    #[must_use]
    pub fn handlers(&self) -> &HandlerMap<Id, S, P> {
        &self.handlers
    }
}

impl<Id, S, P> Clone for MappedReducer<Id, S, P> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            initial_state: Arc::clone(&self.initial_state),
        }
    }
}

impl<Id: fmt::Debug, S: fmt::Debug, P> fmt::Debug for MappedReducer<Id, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedReducer")
            .field("handlers", &self.handlers)
            .field("initial_state", &self.initial_state)
            .finish()
    }
}

impl<Id, S, P> Reducer for MappedReducer<Id, S, P>
where
    Id: Eq + Hash + fmt::Debug,
    S: Clone,
{
    type State = S;
    type Action = Dispatch<Id, P>;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        *state = self.transition(state, &action.event, &action.payload);
        smallvec![Effect::None]
    }
}
