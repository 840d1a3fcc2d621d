//! Reducer composition utilities
//!
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on a subset of state
//!
//! Together they let a feature keep one tracked sub-state per operation
//! instead of merging every operation's handlers into a single shared state.
//!
//! # Example
//!
//! ```
//! use async_reducer_core::composition::{combine_reducers, scope_reducer};
//! use async_reducer_core::handlers::{create_reducer, Dispatch, HandlerMap};
//! use async_reducer_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct Page {
//!     profile_hits: u32,
//!     feed_hits: u32,
//! }
//!
//! let profile = create_reducer(HandlerMap::new().on("profile", |n: &u32, _: &()| n + 1), 0);
//! let feed = create_reducer(HandlerMap::new().on("feed", |n: &u32, _: &()| n + 1), 0);
//!
//! let page = combine_reducers(vec![
//!     Box::new(scope_reducer(profile, |p: &Page| &p.profile_hits, |p: &mut Page, n| p.profile_hits = n)),
//!     Box::new(scope_reducer(feed, |p: &Page| &p.feed_hits, |p: &mut Page, n| p.feed_hits = n)),
//! ]);
//!
//! let mut state = Page::default();
//! page.reduce(&mut state, Dispatch::new("feed", ()), &());
//! assert_eq!(state.feed_hits, 1);
//! assert_eq!(state.profile_hits, 0);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use crate::SmallVec;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers combined
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducer was combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `SubS`: The child state type (subset of `S`)
/// - `A`: The action type
/// - `E`: The environment type
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<fn(A, &E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut sub_state = (self.get_state)(state).clone();
        let effects = self.reducer.reduce(&mut sub_state, action, env);
        (self.set_state)(state, sub_state);
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{create_reducer, Dispatch, HandlerMap, MappedReducer};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Calls {
        started: u32,
        finished: u32,
    }

    #[derive(Clone, Debug, Default)]
    struct Dashboard {
        users: Calls,
        orders: Calls,
        banner: String,
    }

    fn calls_reducer(start: &'static str, finish: &'static str) -> MappedReducer<&'static str, Calls, ()> {
        let handlers = HandlerMap::new()
            .on(start, |c: &Calls, _: &()| Calls {
                started: c.started + 1,
                ..c.clone()
            })
            .on(finish, |c: &Calls, _: &()| Calls {
                finished: c.finished + 1,
                ..c.clone()
            });
        create_reducer(handlers, Calls::default())
    }

    #[test]
    fn test_scope_reducer_only_touches_sub_state() {
        let scoped = scope_reducer(
            calls_reducer("users/start", "users/finish"),
            |d: &Dashboard| &d.users,
            |d: &mut Dashboard, c: Calls| d.users = c,
        );

        let mut state = Dashboard {
            banner: "hello".to_string(),
            ..Dashboard::default()
        };

        let _ = scoped.reduce(&mut state, Dispatch::new("users/start", ()), &());
        let _ = scoped.reduce(&mut state, Dispatch::new("users/finish", ()), &());

        assert_eq!(state.users, Calls { started: 1, finished: 1 });
        assert_eq!(state.orders, Calls::default());
        assert_eq!(state.banner, "hello");
    }

    #[test]
    fn test_combine_reducers_routes_each_event_to_its_sub_state() {
        let combined = combine_reducers(vec![
            Box::new(scope_reducer(
                calls_reducer("users/start", "users/finish"),
                |d: &Dashboard| &d.users,
                |d: &mut Dashboard, c: Calls| d.users = c,
            )),
            Box::new(scope_reducer(
                calls_reducer("orders/start", "orders/finish"),
                |d: &Dashboard| &d.orders,
                |d: &mut Dashboard, c: Calls| d.orders = c,
            )),
        ]);
        assert_eq!(combined.len(), 2);

        let mut state = Dashboard::default();
        let effects = combined.reduce(&mut state, Dispatch::new("orders/start", ()), &());

        assert_eq!(state.orders.started, 1);
        assert_eq!(state.users.started, 0);
        // One effect per combined reducer
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_combine_reducers_shared_identifier_reaches_every_reducer() {
        let combined = combine_reducers(vec![
            Box::new(scope_reducer(
                calls_reducer("start", "users/finish"),
                |d: &Dashboard| &d.users,
                |d: &mut Dashboard, c: Calls| d.users = c,
            )),
            Box::new(scope_reducer(
                calls_reducer("start", "orders/finish"),
                |d: &Dashboard| &d.orders,
                |d: &mut Dashboard, c: Calls| d.orders = c,
            )),
        ]);

        let mut state = Dashboard::default();
        let _ = combined.reduce(&mut state, Dispatch::new("start", ()), &());

        assert_eq!(state.users.started, 1);
        assert_eq!(state.orders.started, 1);
    }
}
