//! # Async Reducer Core
//!
//! Core traits and types for building reducers that track asynchronous work.
//!
//! This crate provides the small reduction framework the rest of the workspace
//! builds on: a `Reducer` trait, effect descriptions, and a primitive that turns
//! a mapping from event identifiers to handlers into a reducer.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a store
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Handler map**: Event identifier → pure `(State, Payload) → State` transition
//!
//! ## Example
//!
//! ```
//! use async_reducer_core::handlers::{create_reducer, HandlerMap};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let handlers = HandlerMap::new()
//!     .on("add", |state: &Counter, amount: &i64| Counter { count: state.count + amount })
//!     .on("clear", |_: &Counter, _: &i64| Counter::default());
//!
//! let reducer = create_reducer(handlers, Counter::default());
//!
//! let state = reducer.transition(reducer.initial_state(), &"add", &5);
//! assert_eq!(state.count, 5);
//!
//! // Unknown identifiers leave state untouched
//! let state = reducer.transition(&state, &"multiply", &3);
//! assert_eq!(state.count, 5);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Handler maps and the reducers built from them
pub mod handlers;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```
    /// use async_reducer_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
    ///
    /// struct Toggle;
    ///
    /// impl Reducer for Toggle {
    ///     type State = bool;
    ///     type Action = ();
    ///     type Environment = ();
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut bool,
    ///         _action: (),
    ///         _env: &(),
    ///     ) -> SmallVec<[Effect<()>; 4]> {
    ///         *state = !*state;
    ///         smallvec![Effect::None]
    ///     }
    /// }
    ///
    /// let mut on = false;
    /// Toggle.reduce(&mut on, (), &());
    /// assert!(on);
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, retries)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation whose output is fed back as an action
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }
}
