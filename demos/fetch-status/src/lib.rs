//! # Fetch Status Example
//!
//! Tracks a profile lookup with a reducer built by `async_reducer_state::create`.
//!
//! This example showcases:
//! - Typed payloads (`Payload<u64, Profile, String>`)
//! - Wrapping the pure tracking reducer with one that starts the lookup as an effect
//! - Dependency injection of the profile directory through the environment
//!
//! ## Example
//!
//! ```no_run
//! use fetch_status::{events, InMemoryDirectory, ProfileAction, ProfileEnvironment, ProfileReducer};
//! use async_reducer_runtime::Store;
//! use async_reducer_state::Payload;
//!
//! # async fn example() {
//! let reducer = ProfileReducer::new();
//! let env = ProfileEnvironment::new(InMemoryDirectory::with_sample_profiles());
//! let store = Store::new(reducer.initial_state().clone(), reducer, env);
//!
//! let _ = store.send(ProfileAction::new(events().request, Payload::Request(1))).await;
//! let loading = store.state(|s| s.loading).await;
//! # }
//! ```

use async_reducer_core::{effect::Effect, reducer::Reducer, SmallVec};
use async_reducer_state::{create, AsyncEventSet, AsyncReducer, Dispatch, Payload, StateFor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// A user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile identifier
    pub id: u64,
    /// Display name
    pub name: String,
}

/// Payload of profile lookup events
pub type ProfilePayload = Payload<u64, Profile, String>;

/// Tracked lookup state
pub type ProfileState = StateFor<ProfilePayload>;

/// Action dispatched to the profile store
pub type ProfileAction = Dispatch<&'static str, ProfilePayload>;

/// Event identifiers of the profile lookup
#[must_use]
pub const fn events() -> AsyncEventSet<&'static str> {
    AsyncEventSet::new("profile/request", "profile/ok", "profile/error", "profile/reset")
}

/// Lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No profile with this id
    #[error("profile {0} not found")]
    NotFound(u64),
}

/// Source of profiles
pub trait Directory: Send + Sync {
    /// Look up a profile by id
    fn lookup(&self, id: u64) -> Pin<Box<dyn Future<Output = Result<Profile, LookupError>> + Send>>;
}

/// Directory backed by a map, answering after a fixed latency
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    profiles: Arc<HashMap<u64, Profile>>,
    latency: Duration,
}

impl InMemoryDirectory {
    /// Create a directory serving `profiles` after `latency`
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = Profile>, latency: Duration) -> Self {
        Self {
            profiles: Arc::new(profiles.into_iter().map(|p| (p.id, p)).collect()),
            latency,
        }
    }

    /// A directory holding two profiles, answering after 20ms
    #[must_use]
    pub fn with_sample_profiles() -> Self {
        Self::new(
            [
                Profile {
                    id: 1,
                    name: "Ada Lovelace".to_string(),
                },
                Profile {
                    id: 2,
                    name: "Grace Hopper".to_string(),
                },
            ],
            Duration::from_millis(20),
        )
    }
}

impl Directory for InMemoryDirectory {
    fn lookup(&self, id: u64) -> Pin<Box<dyn Future<Output = Result<Profile, LookupError>> + Send>> {
        let found = self.profiles.get(&id).cloned();
        let latency = self.latency;
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            found.ok_or(LookupError::NotFound(id))
        })
    }
}

/// Profile environment
#[derive(Clone)]
pub struct ProfileEnvironment {
    /// Where profiles are looked up
    pub directory: Arc<dyn Directory>,
}

impl ProfileEnvironment {
    /// Create a new environment around `directory`
    #[must_use]
    pub fn new(directory: impl Directory + 'static) -> Self {
        Self {
            directory: Arc::new(directory),
        }
    }
}

/// Profile reducer
///
/// Delegates every state change to the tracking reducer, and starts a
/// lookup whenever a `request` carrying an id is dispatched. The lookup
/// reports back with `ok` or `error`.
#[derive(Clone)]
pub struct ProfileReducer {
    events: AsyncEventSet<&'static str>,
    tracker: AsyncReducer<&'static str, ProfilePayload>,
}

impl ProfileReducer {
    /// Create a new profile reducer starting from the idle state
    #[must_use]
    pub fn new() -> Self {
        let events = events();
        let tracker = create(events.clone(), None);
        Self { events, tracker }
    }

    /// State the store should start from
    #[must_use]
    pub fn initial_state(&self) -> &ProfileState {
        self.tracker.initial_state()
    }
}

impl Default for ProfileReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ProfileReducer {
    type State = ProfileState;
    type Action = ProfileAction;
    type Environment = ProfileEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let lookup = match (&action.event, &action.payload) {
            (event, Payload::Request(id)) if *event == self.events.request => Some(*id),
            _ => None,
        };

        let mut effects = self.tracker.reduce(state, action, &());

        if let Some(id) = lookup {
            tracing::info!(id, "Starting profile lookup");
            let pending = env.directory.lookup(id);
            let events = self.events.clone();
            effects.push(Effect::future(async move {
                let outcome = match pending.await {
                    Ok(profile) => Dispatch::new(events.ok, Payload::Response(profile)),
                    Err(error) => {
                        tracing::warn!(%error, "Profile lookup failed");
                        Dispatch::new(events.error, Payload::Failure(error.to_string()))
                    },
                };
                Some(outcome)
            }));
        }

        effects
    }
}
