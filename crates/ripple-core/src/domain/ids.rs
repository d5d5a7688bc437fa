//! Domain identifiers (strongly-typed IDs).
//!
//! All identifiers are ULIDs behind a phantom-typed wrapper, so a
//! `ProjectId` and a `ContributorId` can never be swapped by accident.
//! ULIDs sort by creation time, which the event store relies on for its
//! deterministic batch order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for each ID type.
///
/// Provides the prefix used in `Display` (e.g. "evt-", "proj-").
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ID type.
///
/// `T` is a zero-sized marker; it costs nothing at runtime but keeps the
/// ID types distinct at compile time.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

macro_rules! id_marker {
    ($marker:ident, $alias:ident, $prefix:literal, $doc:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $marker {}

        impl IdMarker for $marker {
            fn prefix() -> &'static str {
                $prefix
            }
        }

        #[doc = $doc]
        pub type $alias = Id<$marker>;
    };
}

id_marker!(Event, EventId, "evt-", "Identifier of a persisted domain event.");
id_marker!(
    Contributor,
    ContributorId,
    "ctr-",
    "Identifier of a contributor."
);
id_marker!(Project, ProjectId, "proj-", "Identifier of a project.");
id_marker!(
    Position,
    PositionId,
    "pos-",
    "Identifier of an open position within a project."
);
id_marker!(
    Application,
    ApplicationId,
    "app-",
    "Identifier of an application to a position."
);
id_marker!(
    Collaboration,
    CollaborationId,
    "collab-",
    "Identifier of a collaboration."
);
id_marker!(
    Account,
    AccountId,
    "acct-",
    "Identifier of an account in the external account system."
);
