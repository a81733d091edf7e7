//! # Restraint Sets
//!
//! A named, user-authored bundle of per-slot items, mods and status effects,
//! toggled as a unit.
//!
//! The `enabled`, `enabled_by` and `lock` fields are only ever changed by the
//! engine's mutation operations. Everything else is authored by the user
//! through external editors.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::ActorId;
use crate::hardcore::HardcoreTraits;
use crate::lock::LockState;
use crate::slot::{DrawData, EquipSlot};
use crate::status::{expand_all, StatusAssociation, StatusEffectId};

/// Stable identifier of a restraint set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub Uuid);

impl SetId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a client mod (its directory name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModId(pub String);

/// A mod toggled together with a set or cursed item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModAssociation {
    /// Mod to toggle.
    pub mod_id: ModId,
    /// Priority while the owner is active.
    pub priority: i32,
    /// Whether to disable the mod (not just lower it) when the owner goes inactive.
    #[serde(default)]
    pub disable_when_inactive: bool,
    /// Whether toggling this mod needs a forced redraw.
    #[serde(default)]
    pub redraw_after_toggle: bool,
}

impl ModAssociation {
    /// Creates an association with the given priority.
    #[must_use]
    pub fn new(mod_id: impl Into<String>, priority: i32) -> Self {
        Self {
            mod_id: ModId(mod_id.into()),
            priority,
            disable_when_inactive: false,
            redraw_after_toggle: false,
        }
    }
}

/// A restraint set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestraintSet {
    /// Stable identifier.
    pub id: SetId,
    /// Display name.
    pub name: String,
    /// Whether the set is currently worn.
    #[serde(default)]
    pub enabled: bool,
    /// Who enabled it.
    #[serde(default)]
    pub enabled_by: Option<ActorId>,
    /// Padlock state.
    #[serde(default)]
    pub lock: LockState,
    /// Per-slot items in slot order.
    #[serde(default)]
    pub draw_data: BTreeMap<EquipSlot, DrawData>,
    /// Mods toggled with the set.
    #[serde(default)]
    pub mods: Vec<ModAssociation>,
    /// Status effects applied with the set.
    #[serde(default)]
    pub statuses: Vec<StatusAssociation>,
    /// Hardcore traits, keyed by the actor that enables the set.
    #[serde(default)]
    pub hardcore: HashMap<ActorId, HardcoreTraits>,
}

impl RestraintSet {
    /// Creates an empty, disabled set with every slot untouched.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SetId::new(),
            name: name.into(),
            enabled: false,
            enabled_by: None,
            lock: LockState::default(),
            draw_data: EquipSlot::ALL
                .iter()
                .map(|&slot| (slot, DrawData::untouched(slot)))
                .collect(),
            mods: Vec::new(),
            statuses: Vec::new(),
            hardcore: HashMap::new(),
        }
    }

    /// Sets the item for one slot.
    #[must_use]
    pub fn with_item(mut self, draw: DrawData) -> Self {
        self.draw_data.insert(draw.slot, draw);
        self
    }

    /// Adds a mod association.
    #[must_use]
    pub fn with_mod(mut self, association: ModAssociation) -> Self {
        self.mods.push(association);
        self
    }

    /// Adds a status association.
    #[must_use]
    pub fn with_status(mut self, association: StatusAssociation) -> Self {
        self.statuses.push(association);
        self
    }

    /// Configures hardcore traits for sets enabled by `actor`.
    #[must_use]
    pub fn with_hardcore(mut self, actor: ActorId, traits: HardcoreTraits) -> Self {
        self.hardcore.insert(actor, traits);
        self
    }

    /// Returns true if the set is padlocked.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Draw entries that reach the resolved appearance.
    pub fn applied_items(&self) -> impl Iterator<Item = &DrawData> {
        self.draw_data.values().filter(|draw| !draw.is_disabled_nothing())
    }

    /// All statuses of the set, presets expanded.
    #[must_use]
    pub fn status_ids(&self) -> Vec<StatusEffectId> {
        expand_all(&self.statuses)
    }

    /// Hardcore traits configured for `actor`, if any.
    #[must_use]
    pub fn traits_for(&self, actor: &ActorId) -> Option<HardcoreTraits> {
        self.hardcore.get(actor).copied().filter(|traits| !traits.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::EquipItem;

    #[test]
    fn test_new_set_applies_nothing() {
        let set = RestraintSet::new("Empty");
        assert_eq!(set.draw_data.len(), EquipSlot::ALL.len());
        assert_eq!(set.applied_items().count(), 0);
    }

    #[test]
    fn test_applied_items_skip_untouched_slots() {
        let set = RestraintSet::new("Hood")
            .with_item(DrawData::new(EquipSlot::Head, EquipItem::new(1_001)))
            .with_item(DrawData::new(EquipSlot::Hands, EquipItem::new(2_002)));

        let slots: Vec<_> = set.applied_items().map(|draw| draw.slot).collect();
        assert_eq!(slots, vec![EquipSlot::Head, EquipSlot::Hands]);
    }

    #[test]
    fn test_empty_traits_count_as_unconfigured() {
        let owner = ActorId::new("owner");
        let set = RestraintSet::new("Cuffs").with_hardcore(owner.clone(), HardcoreTraits::NONE);
        assert_eq!(set.traits_for(&owner), None);
    }

    #[test]
    fn test_set_parses_from_toml() {
        let raw = r#"
            id = "7d0a3c44-6f4e-4f0a-9a53-1f1b5f0c2a10"
            name = "Leather"

            [[mods]]
            mod_id = "leather-retex"
            priority = 5
        "#;
        let set: RestraintSet = toml::from_str(raw).unwrap();
        assert_eq!(set.name, "Leather");
        assert!(!set.enabled);
        assert_eq!(set.mods[0].priority, 5);
        assert!(!set.is_locked());
    }
}
