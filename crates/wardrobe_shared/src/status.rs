//! # Status Effects
//!
//! Identifiers understood by the status-effect overlay collaborator, and the
//! ways a source can reference them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one status effect on the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusEffectId(pub Uuid);

impl StatusEffectId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StatusEffectId {
    fn default() -> Self {
        Self::new()
    }
}

/// A status effect reference carried by a restraint set, gag or cursed item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusAssociation {
    /// One status.
    Status(StatusEffectId),
    /// A named preset that expands into several statuses.
    Preset {
        /// Preset identifier.
        id: Uuid,
        /// Statuses the preset applies.
        statuses: Vec<StatusEffectId>,
    },
}

impl StatusAssociation {
    /// Iterates over the statuses this association stands for.
    pub fn expand(&self) -> impl Iterator<Item = StatusEffectId> + '_ {
        let (single, many) = match self {
            Self::Status(id) => (Some(*id), &[][..]),
            Self::Preset { statuses, .. } => (None, statuses.as_slice()),
        };
        single.into_iter().chain(many.iter().copied())
    }
}

/// Expands a list of associations into a flat list of statuses.
#[must_use]
pub fn expand_all(associations: &[StatusAssociation]) -> Vec<StatusEffectId> {
    associations.iter().flat_map(|a| a.expand()).collect()
}
