//! Fetch status example binary
//!
//! Looks up one existing and one missing profile, printing the tracked state
//! after every step.

use async_reducer_runtime::Store;
use async_reducer_state::{Dispatch, Payload};
use fetch_status::{events, InMemoryDirectory, ProfileAction, ProfileEnvironment, ProfileReducer, ProfileState};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn is_outcome(action: &ProfileAction) -> bool {
    let events = events();
    action.event == events.ok || action.event == events.error
}

async fn next_outcome(outcomes: &mut broadcast::Receiver<ProfileAction>) -> anyhow::Result<ProfileAction> {
    loop {
        let action = outcomes.recv().await?;
        if is_outcome(&action) {
            return Ok(action);
        }
    }
}

fn print_state(label: &str, state: &ProfileState) -> anyhow::Result<()> {
    println!("{label}:\n{}\n", serde_json::to_string_pretty(state)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetch_status=debug,async_reducer_state=debug,async_reducer_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Fetch Status Example ===\n");

    let reducer = ProfileReducer::new();
    let env = ProfileEnvironment::new(InMemoryDirectory::with_sample_profiles());
    let store = Store::new(reducer.initial_state().clone(), reducer, env);
    let events = events();

    print_state("Initial", &store.state(Clone::clone).await)?;

    println!(">>> Requesting profile 1");
    let mut outcomes = store.subscribe_actions();
    store.send(Dispatch::new(events.request, Payload::Request(1))).await?;
    print_state("While loading", &store.state(Clone::clone).await)?;

    next_outcome(&mut outcomes).await?;
    print_state("After lookup", &store.state(Clone::clone).await)?;

    println!(">>> Requesting missing profile 42");
    store
        .send_and_wait_for(Dispatch::new(events.request, Payload::Request(42)), is_outcome, Duration::from_secs(2))
        .await?;
    print_state("After failed lookup (previous data kept)", &store.state(Clone::clone).await)?;

    println!(">>> Resetting");
    store.send(Dispatch::new(events.reset, Payload::Empty)).await?;
    print_state("After reset", &store.state(Clone::clone).await)?;

    store.shutdown(Duration::from_secs(5)).await?;
    println!("=== Done ===");
    Ok(())
}
