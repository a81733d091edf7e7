//! Actor identifiers (the local player or a remote pair).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of whoever issued an operation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Identifier used for the local player.
    pub const LOCAL: &'static str = "Client";

    /// Creates an actor identifier from a pair UID.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// The local player.
    #[must_use]
    pub fn local() -> Self {
        Self(Self::LOCAL.to_string())
    }

    /// Returns true if this is the local player.
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0 == Self::LOCAL
    }

    /// Returns the raw UID.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
