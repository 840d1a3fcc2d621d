//! # Async Reducer Testing
//!
//! Testing utilities and helpers for async state reducers.
//!
//! This crate provides:
//! - [`ReducerTest`]: fluent Given-When-Then harness for any reducer
//! - Effect assertion helpers
//! - proptest strategies for payloads, tracked states and event sets
//! - A tracing subscriber initialiser for test output
//!
//! ## Example
//!
//! ```
//! use async_reducer_state::{create, AsyncEventSet, AsyncReducer, Dispatch};
//! use async_reducer_testing::{assertions, ReducerTest};
//! use serde_json::{json, Value};
//!
//! let reducer: AsyncReducer<&str, Value> =
//!     create(AsyncEventSet::new("save", "saved", "rejected", "discard"), None);
//!
//! ReducerTest::new(reducer.clone())
//!     .with_env(())
//!     .given_state(reducer.initial_state().clone())
//!     .when_action(Dispatch::new("rejected", json!({"error": "conflict"})))
//!     .then_state(|state| assert_eq!(state.error, Some(json!("conflict"))))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


/// Property-based testing utilities
pub mod properties;

pub use reducer_test::{assertions, ReducerTest};

/// Install a `fmt` subscriber writing through the test harness
///
/// Honours `RUST_LOG`; defaults to `debug` for the workspace crates. Safe to
/// call from every test, only the first call installs the subscriber.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "async_reducer_core=debug,async_reducer_state=debug,async_reducer_runtime=debug".into()
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
