//! # Async Reducer Runtime
//!
//! Runtime for driving reducers from the async reducer workspace.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns one state value and serialises actions through its reducer
//! - **Effect execution**: Runs effect descriptions on spawned tasks and feeds
//!   the actions they produce back into the store
//!
//! ## Example
//!
//! ```ignore
//! use async_reducer_runtime::Store;
//! use async_reducer_state::{create, AsyncEventSet, AsyncReducer, Dispatch};
//!
//! let reducer: AsyncReducer<&str, Value> = create(AsyncEventSet::new("r", "o", "e", "x"), None);
//! let store = Store::new(reducer.initial_state().clone(), reducer, ());
//!
//! store.send(Dispatch::new("r", json!({}))).await?;
//! let loading = store.state(|s| s.loading).await;
//! ```

use async_reducer_core::{effect::Effect, reducer::Reducer};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires first.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use async_reducer_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of effect-produced actions buffered for slow observers
    pub broadcast_capacity: usize,
    /// Timeout used by [`Store::shutdown_gracefully`]
    pub shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Guard that decrements the pending effect counter on drop, even if the effect panics
struct PendingGuard(std::sync::Arc<std::sync::atomic::AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Duration, Effect, PendingGuard, Reducer, StoreConfig, StoreError};
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::broadcast::error::RecvError;
    use tokio::sync::{broadcast, RwLock};

    struct Shared<S, A, E, R> {
        state: RwLock<S>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: AtomicBool,
        pending_effects: Arc<AtomicUsize>,
        action_broadcast: broadcast::Sender<A>,
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, written only by the reducer)
    /// 2. Reducer (transition logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Clones share the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        inner: Arc<Shared<S, A, E, R>>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                inner: Arc::new(Shared {
                    state: RwLock::new(initial_state),
                    reducer,
                    environment,
                    config,
                    shutdown: AtomicBool::new(false),
                    pending_effects: Arc::new(AtomicUsize::new(0)),
                    action_broadcast,
                }),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Starts the returned effects on spawned tasks
        ///
        /// Returns once the reducer has run; effects may still be executing.
        /// Concurrent `send()` calls serialise at the reducer.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.inner.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.inner.state.write().await;
                self.inner
                    .reducer
                    .reduce(&mut *state, action, &self.inner.environment)
            };

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Send an action and wait for an effect-produced action matching `predicate`
        ///
        /// Subscribes before sending, so a fast effect cannot be missed. A
        /// returned action has already been applied to the state.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        /// - [`StoreError::Timeout`]: No matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        pub async fn send_and_wait_for<F>(&self, action: A, predicate: F, timeout: Duration) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut observed = self.subscribe_actions();
            self.send(action).await?;

            let wait = async {
                loop {
                    match observed.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, continuing to wait");
                        },
                        Err(RecvError::Closed) => return Err(StoreError::ChannelClosed),
                    }
                }
            };

            tokio::time::timeout(timeout, wait)
                .await
                .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to actions produced by effects
        ///
        /// Each action is broadcast after the reducer has applied it.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.inner.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let loading = store.state(|s| s.loading).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.inner.state.read().await;
            f(&*state)
        }

        /// Number of effects currently executing
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.inner.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for pending effects to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.inner.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects();

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout: {} effects still running", pending);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down using the configured timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_gracefully(&self) -> Result<(), StoreError> {
            self.shutdown(self.inner.config.shutdown_timeout).await
        }

        fn execute_effect(&self, effect: Effect<A>) {
            if effect.is_none() {
                tracing::trace!("Skipping no-op effect");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                return;
            }

            self.inner.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = PendingGuard(Arc::clone(&self.inner.pending_effects));
            let run = self.run_effect(effect);

            tokio::spawn(async move {
                let _guard = guard;
                run.await;
            });
        }

        fn run_effect(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();
            async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                        match fut.await {
                            Some(action) => store.feed_back(action).await,
                            None => tracing::trace!("Effect::Future completed with no action"),
                        }
                    },
                    Effect::Delay { duration, action } => {
                        metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                        futures::future::join_all(effects.into_iter().map(|e| store.run_effect(e))).await;
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                        for effect in effects {
                            store.run_effect(effect).await;
                        }
                    },
                }
            }
            .boxed()
        }

        async fn feed_back(&self, action: A) {
            match self.send(action.clone()).await {
                Ok(()) => {
                    // No receivers is not an error
                    let _ = self.inner.action_broadcast.send(action);
                },
                Err(error) => tracing::warn!(%error, "Dropped action produced by effect"),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.broadcast_capacity, 16);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_store_config_builders() {
        let config = StoreConfig::default()
            .with_broadcast_capacity(4)
            .with_shutdown_timeout(Duration::from_millis(250));
        assert_eq!(config.broadcast_capacity, 4);
        assert_eq!(config.shutdown_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_store_config_partial_json_keeps_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"broadcast_capacity": 64}"#).unwrap();
        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }
}
