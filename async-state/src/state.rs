//! Tracked state of an async operation and the payloads that drive it

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress of an async operation
///
/// `loading` is true strictly between a `request` event and the next `ok`,
/// `error` or `reset`. The remaining fields hold the payload of the latest
/// request, the latest successful result and the latest failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncState<R, D, E> {
    /// Whether a request is in flight
    #[serde(default)]
    pub loading: bool,
    /// Payload of the most recent `request` event
    pub request: Option<R>,
    /// Result carried by the most recent `ok` event
    pub data: Option<D>,
    /// Failure carried by the most recent `error` event
    pub error: Option<E>,
}

impl<R, D, E> AsyncState<R, D, E> {
    /// The canonical zero value: not loading, nothing recorded
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            loading: false,
            request: None,
            data: None,
            error: None,
        }
    }

    /// Whether this is the zero value
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.loading && self.request.is_none() && self.data.is_none() && self.error.is_none()
    }

    /// Whether a failure is recorded
    ///
    /// A recorded failure survives a later `ok` event; only `request` and
    /// `reset` clear it.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<R, D, E> Default for AsyncState<R, D, E> {
    fn default() -> Self {
        Self::idle()
    }
}

/// Payload dispatched with lifecycle events
///
/// The `ok` handler reads [`AsyncPayload::response`] and the `error` handler
/// reads [`AsyncPayload::error`]. The `request` handler stores the whole
/// payload.
pub trait AsyncPayload: Clone {
    /// Result type recorded in [`AsyncState::data`]
    type Response: Clone;

    /// Failure type recorded in [`AsyncState::error`]
    type Failure: Clone;

    /// The successful result carried by this payload, if any
    fn response(&self) -> Option<Self::Response>;

    /// The failure detail carried by this payload, if any
    fn error(&self) -> Option<Self::Failure>;
}

/// State tracked for payload type `P`
pub type StateFor<P> = AsyncState<P, <P as AsyncPayload>::Response, <P as AsyncPayload>::Failure>;

/// State tracked for dynamic JSON payloads
pub type JsonAsyncState = StateFor<Value>;

/// JSON payloads carry their result under `"response"` and their failure
/// under `"error"`. Missing keys and `null` both read as `None`.
impl AsyncPayload for Value {
    type Response = Value;
    type Failure = Value;

    fn response(&self) -> Option<Value> {
        self.get("response").filter(|v| !v.is_null()).cloned()
    }

    fn error(&self) -> Option<Value> {
        self.get("error").filter(|v| !v.is_null()).cloned()
    }
}

/// Strongly typed payload for one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload<R, D, E> {
    /// Arguments of the request
    Request(R),
    /// Successful result
    Response(D),
    /// Failure detail
    Failure(E),
    /// No data, e.g. for `reset`
    Empty,
}

impl<R, D, E> AsyncPayload for Payload<R, D, E>
where
    R: Clone,
    D: Clone,
    E: Clone,
{
    type Response = D;
    type Failure = E;

    fn response(&self) -> Option<D> {
        match self {
            Self::Response(data) => Some(data.clone()),
            _ => None,
        }
    }

    fn error(&self) -> Option<E> {
        match self {
            Self::Failure(error) => Some(error.clone()),
            _ => None,
        }
    }
}
