//! Error types for event set validation and configuration loading

use crate::event_set::EventKind;
use thiserror::Error;

/// Identifier collisions found while validating event sets
///
/// `create` never returns these: colliding identifiers only overwrite
/// handlers. They are reported by the opt-in validation entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventSetError {
    /// Two kinds of one event set share an identifier
    #[error("event set binds {identifier} to both {first} and {second}")]
    DuplicateIdentifier {
        /// Debug rendering of the shared identifier
        identifier: String,
        /// Kind that claimed the identifier first
        first: EventKind,
        /// Kind that collides with it
        second: EventKind,
    },

    /// Two event sets share an identifier
    #[error("identifier {identifier} appears in event sets {first_set} and {second_set}")]
    CollidingSets {
        /// Debug rendering of the shared identifier
        identifier: String,
        /// Position of the earlier set
        first_set: usize,
        /// Position of the later set, whose handler would win
        second_set: usize,
    },
}

/// Errors raised while loading a reducer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration is not valid JSON or does not match the expected shape
    #[error("Failed to parse reducer configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured event sets have colliding identifiers
    #[error("Invalid event sets: {0}")]
    Invalid(#[from] EventSetError),
}
