//! Event identifiers describing an async operation's lifecycle

use crate::error::EventSetError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// The four lifecycle events of one async operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The operation began
    Request,
    /// The operation completed successfully
    Ok,
    /// The operation failed
    Error,
    /// Tracking was cleared back to defaults
    Reset,
}

impl EventKind {
    /// All kinds, in declaration order
    pub const ALL: [Self; 4] = [Self::Request, Self::Ok, Self::Error, Self::Reset];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// Identifiers fired over one async operation's lifecycle
///
/// The four identifiers must be distinct. A collision is not rejected by
/// `create`; the later handler silently replaces the earlier one. Use
/// [`AsyncEventSet::validate`] to check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsyncEventSet<Id> {
    /// Fired when the operation begins
    pub request: Id,
    /// Fired when the operation completes successfully
    pub ok: Id,
    /// Fired when the operation fails
    pub error: Id,
    /// Fired to clear tracked state back to defaults
    pub reset: Id,
}

impl<Id> AsyncEventSet<Id> {
    /// Create an event set from its four identifiers
    #[must_use]
    pub const fn new(request: Id, ok: Id, error: Id, reset: Id) -> Self {
        Self {
            request,
            ok,
            error,
            reset,
        }
    }

    /// The identifier bound to `kind`
    #[must_use]
    pub const fn identifier(&self, kind: EventKind) -> &Id {
        match kind {
            EventKind::Request => &self.request,
            EventKind::Ok => &self.ok,
            EventKind::Error => &self.error,
            EventKind::Reset => &self.reset,
        }
    }

    /// Identifiers paired with their kind, in `request, ok, error, reset` order
    pub fn entries(&self) -> impl Iterator<Item = (EventKind, &Id)> {
        EventKind::ALL.into_iter().map(move |kind| (kind, self.identifier(kind)))
    }

    /// The kind `event` is bound to, if any
    ///
    /// With colliding identifiers the earliest kind is reported.
    pub fn kind_of(&self, event: &Id) -> Option<EventKind>
    where
        Id: PartialEq,
    {
        self.entries().find(|(_, id)| *id == event).map(|(kind, _)| kind)
    }

    /// Check that the four identifiers are distinct
    ///
    /// # Errors
    ///
    /// Returns [`EventSetError::DuplicateIdentifier`] for the first pair of
    /// kinds sharing an identifier.
    pub fn validate(&self) -> Result<(), EventSetError>
    where
        Id: PartialEq + fmt::Debug,
    {
        let entries: Vec<_> = self.entries().collect();
        for (i, (first, id)) in entries.iter().enumerate() {
            if let Some((second, _)) = entries[i + 1..].iter().find(|(_, other)| other == id) {
                return Err(EventSetError::DuplicateIdentifier {
                    identifier: format!("{id:?}"),
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(())
    }
}

/// Check that every identifier across `sets` is used exactly once
///
/// # Errors
///
/// Returns the first collision found, scanning sets in order. Collisions
/// inside one set are reported as [`EventSetError::DuplicateIdentifier`],
/// collisions between sets as [`EventSetError::CollidingSets`].
pub fn validate_distinct<Id>(sets: &[AsyncEventSet<Id>]) -> Result<(), EventSetError>
where
    Id: Eq + Hash + fmt::Debug,
{
    let mut owners: HashMap<&Id, usize> = HashMap::new();
    for (index, set) in sets.iter().enumerate() {
        set.validate()?;
        for (_, id) in set.entries() {
            if let Some(&first_set) = owners.get(id) {
                return Err(EventSetError::CollidingSets {
                    identifier: format!("{id:?}"),
                    first_set,
                    second_set: index,
                });
            }
            owners.insert(id, index);
        }
    }
    Ok(())
}

/// One event set, or an ordered sequence of them
///
/// `Many` is merged left to right: when two sets share an identifier, the
/// later set's handler replaces the earlier one's. Deserializes untagged, so
/// a JSON object reads as `Single` and an array as `Many`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventSets<Id> {
    /// Track a single operation
    Single(AsyncEventSet<Id>),
    /// Track several operations in one shared state
    Many(Vec<AsyncEventSet<Id>>),
}

impl<Id> EventSets<Id> {
    /// The sets, in merge order
    #[must_use]
    pub fn as_slice(&self) -> &[AsyncEventSet<Id>] {
        match self {
            Self::Single(set) => std::slice::from_ref(set),
            Self::Many(sets) => sets,
        }
    }

    /// Number of sets
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no sets (only possible with an empty `Many`)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Check every identifier across all sets is distinct
    ///
    /// # Errors
    ///
    /// See [`validate_distinct`].
    pub fn validate(&self) -> Result<(), EventSetError>
    where
        Id: Eq + Hash + fmt::Debug,
    {
        validate_distinct(self.as_slice())
    }
}

impl<Id> From<AsyncEventSet<Id>> for EventSets<Id> {
    fn from(set: AsyncEventSet<Id>) -> Self {
        Self::Single(set)
    }
}

impl<Id> From<Vec<AsyncEventSet<Id>>> for EventSets<Id> {
    fn from(sets: Vec<AsyncEventSet<Id>>) -> Self {
        Self::Many(sets)
    }
}

impl<Id, const N: usize> From<[AsyncEventSet<Id>; N]> for EventSets<Id> {
    fn from(sets: [AsyncEventSet<Id>; N]) -> Self {
        Self::Many(sets.into())
    }
}
