//! Loading async reducers from JSON configuration
//!
//! ```json
//! {
//!   "events": [
//!     { "request": "user/request", "ok": "user/ok", "error": "user/error", "reset": "user/reset" }
//!   ],
//!   "defaults": { "loading": false, "request": null, "data": [], "error": null },
//!   "strict": true
//! }
//! ```
//!
//! `events` may also be a single object. `defaults` and `strict` are optional.

use crate::error::ConfigError;
use crate::event_set::EventSets;
use crate::factory::{create, AsyncReducer};
use crate::state::JsonAsyncState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of a reducer over JSON payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncReducerConfig {
    /// Event sets to track
    pub events: EventSets<String>,
    /// Initial state and `reset` target; idle when omitted
    #[serde(default)]
    pub defaults: Option<JsonAsyncState>,
    /// Reject colliding identifiers instead of letting later handlers win
    #[serde(default)]
    pub strict: bool,
}

impl AsyncReducerConfig {
    /// Parse a configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from an already parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the value does not match the shape.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Build the configured reducer
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `strict` is set and identifiers
    /// collide.
    pub fn into_reducer(self) -> Result<AsyncReducer<String, Value>, ConfigError> {
        if self.strict {
            self.events.validate()?;
        }
        tracing::debug!(sets = self.events.len(), strict = self.strict, "Building reducer from configuration");
        Ok(create(self.events, self.defaults))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::EventSetError;
    use serde_json::json;

    #[test]
    fn test_single_object_with_defaults() {
        let config = AsyncReducerConfig::from_json_str(
            r#"{
                "events": {"request": "r", "ok": "o", "error": "e", "reset": "x"},
                "defaults": {"loading": false, "request": null, "data": [], "error": null}
            }"#,
        )
        .unwrap();
        assert!(matches!(config.events, EventSets::Single(_)));
        assert!(!config.strict);

        let reducer = config.into_reducer().unwrap();
        assert_eq!(reducer.initial_state().data, Some(json!([])));

        let busy = reducer.transition(reducer.initial_state(), &"r".to_string(), &json!({}));
        assert!(busy.loading);
        let reset = reducer.transition(&busy, &"x".to_string(), &Value::Null);
        assert_eq!(reset.data, Some(json!([])));
        assert!(!reset.loading);
    }

    #[test]
    fn test_strict_rejects_collisions() {
        let config = AsyncReducerConfig::from_value(json!({
            "events": [
                {"request": "a", "ok": "b", "error": "c", "reset": "d"},
                {"request": "e", "ok": "b", "error": "f", "reset": "g"}
            ],
            "strict": true
        }))
        .unwrap();

        let err = config.into_reducer().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(EventSetError::CollidingSets { first_set: 0, second_set: 1, .. })
        ));
    }

    #[test]
    fn test_lenient_accepts_collisions() {
        let config = AsyncReducerConfig::from_value(json!({
            "events": [
                {"request": "a", "ok": "b", "error": "c", "reset": "d"},
                {"request": "e", "ok": "b", "error": "f", "reset": "g"}
            ]
        }))
        .unwrap();

        let reducer = config.into_reducer().unwrap();
        assert_eq!(reducer.handlers().len(), 7);
        assert!(reducer.initial_state().is_idle());
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let err = AsyncReducerConfig::from_json_str(r#"{"events": {"request": "r"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
