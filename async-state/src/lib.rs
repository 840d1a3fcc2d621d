//! # Async Reducer State
//!
//! Builds reducers that track the lifecycle of asynchronous operations.
//!
//! An operation is described by an [`AsyncEventSet`]: four event identifiers
//! fired when a request is issued, when it succeeds, when it fails, and when
//! tracking should be cleared. [`create`] turns one set, or a sequence of
//! sets, into a reducer over [`AsyncState`]:
//!
//! ```text
//!            request             ok / error
//!   idle ─────────────▶ loading ───────────▶ success / failure
//!    ▲                                             │
//!    └──────────────────── reset ◀─────────────────┘   (reset is accepted from any state)
//! ```
//!
//! The reducer is a plain transition function
//! ([`MappedReducer::transition`](async_reducer_core::handlers::MappedReducer::transition))
//! and also implements [`Reducer`](async_reducer_core::reducer::Reducer), so it
//! can be driven by a store with
//! [`Dispatch`](async_reducer_core::handlers::Dispatch) actions.
//!
//! ## Example
//!
//! ```
//! use async_reducer_state::{create, AsyncEventSet, AsyncReducer, AsyncState};
//! use serde_json::{json, Value};
//!
//! let orders = AsyncEventSet::new("orders/request", "orders/ok", "orders/error", "orders/reset");
//! let reducer: AsyncReducer<&str, Value> = create(orders, None);
//!
//! let state = reducer.transition(reducer.initial_state(), &"orders/error", &json!({"error": "timeout"}));
//! assert_eq!(state.error, Some(json!("timeout")));
//! assert!(!state.loading);
//!
//! let state = reducer.transition(&state, &"orders/reset", &Value::Null);
//! assert_eq!(state, AsyncState::idle());
//! ```

pub mod config;
pub mod error;
pub mod event_set;
pub mod factory;
pub mod state;

pub use config::AsyncReducerConfig;
pub use error::{ConfigError, EventSetError};
pub use event_set::{validate_distinct, AsyncEventSet, EventKind, EventSets};
pub use factory::{build_transition_map, create, create_checked, transition_handler, AsyncReducer};
pub use state::{AsyncPayload, AsyncState, JsonAsyncState, Payload, StateFor};

pub use async_reducer_core::handlers::Dispatch;
