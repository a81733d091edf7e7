//! # Appearance State
//!
//! The resolved, immutable snapshot handed to the visual-layering
//! collaborator. A new one is built per resolution and published whole.

use std::collections::{BTreeMap, BTreeSet};

use wardrobe_core::SnapshotCell;
use wardrobe_shared::{DrawData, EquipSlot, MetaFlags, StatusEffectId};

/// Resolved appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppearanceState {
    /// One entry per slot that some source drives.
    pub items: BTreeMap<EquipSlot, DrawData>,
    /// Forced headgear / visor state.
    pub meta: MetaFlags,
    /// Statuses the overlay should show.
    pub expected_statuses: BTreeSet<StatusEffectId>,
}

impl AppearanceState {
    /// Item resolved for `slot`, if any.
    #[inline]
    #[must_use]
    pub fn item(&self, slot: EquipSlot) -> Option<&DrawData> {
        self.items.get(&slot)
    }

    /// Returns true if no source contributes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.meta == MetaFlags::None && self.expected_statuses.is_empty()
    }
}

/// Where the last resolved state is published.
pub type AppearanceStore = SnapshotCell<AppearanceState>;
