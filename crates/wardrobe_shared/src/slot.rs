//! # Equipment Slots & Draw Data
//!
//! Fixed attachment points on the avatar and the item descriptor written into
//! them during resolution.

use serde::{Deserialize, Serialize};

/// A fixed equipment attachment point on the avatar.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    /// Headgear.
    Head = 0,
    /// Body armor.
    Body = 1,
    /// Gloves.
    Hands = 2,
    /// Legwear.
    Legs = 3,
    /// Footwear.
    Feet = 4,
    /// Earrings.
    Ears = 5,
    /// Necklace.
    Neck = 6,
    /// Bracelets.
    Wrists = 7,
    /// Right ring.
    RightRing = 8,
    /// Left ring.
    LeftRing = 9,
}

impl EquipSlot {
    /// Every slot in draw order.
    pub const ALL: [Self; 10] = [
        Self::Head,
        Self::Body,
        Self::Hands,
        Self::Legs,
        Self::Feet,
        Self::Ears,
        Self::Neck,
        Self::Wrists,
        Self::RightRing,
        Self::LeftRing,
    ];

    /// Returns the slot index (0-9).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Returns true for the armor slots (head through feet).
    #[inline]
    #[must_use]
    pub const fn is_armor(self) -> bool {
        (self as u8) <= (Self::Feet as u8)
    }
}

/// Item identifier as understood by the game client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Base for the per-slot "nothing" sentinels.
    const NOTHING_BASE: u32 = u32::MAX - 128;

    /// The "nothing" item for a slot (an explicitly empty slot).
    #[inline]
    #[must_use]
    pub const fn nothing(slot: EquipSlot) -> Self {
        Self(Self::NOTHING_BASE - slot.index())
    }

    /// Returns true if this is the nothing item of `slot`.
    #[inline]
    #[must_use]
    pub const fn is_nothing_for(self, slot: EquipSlot) -> bool {
        self.0 == Self::nothing(slot).0
    }
}

/// Dye applied to an item (0 = undyed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StainId(pub u8);

/// An item plus its dye.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipItem {
    /// Item identifier.
    pub id: ItemId,
    /// Dye / variant.
    #[serde(default)]
    pub stain: StainId,
}

impl EquipItem {
    /// Creates an undyed item.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self {
            id: ItemId(id),
            stain: StainId(0),
        }
    }

    /// Returns the same item with a dye applied.
    #[inline]
    #[must_use]
    pub const fn with_stain(mut self, stain: u8) -> Self {
        self.stain = StainId(stain);
        self
    }

    /// The nothing item of `slot`.
    #[inline]
    #[must_use]
    pub const fn nothing(slot: EquipSlot) -> Self {
        Self {
            id: ItemId::nothing(slot),
            stain: StainId(0),
        }
    }
}

/// Item descriptor targeting one slot.
///
/// `enabled = false` on a real item still applies it; only the combination
/// "disabled + nothing" means "leave this slot alone".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawData {
    /// Target slot.
    pub slot: EquipSlot,
    /// Item to draw.
    pub item: EquipItem,
    /// Whether this entry is active.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl DrawData {
    /// Creates an enabled draw entry.
    #[must_use]
    pub const fn new(slot: EquipSlot, item: EquipItem) -> Self {
        Self {
            slot,
            item,
            enabled: true,
        }
    }

    /// Creates the placeholder entry for a slot the owner left untouched.
    #[must_use]
    pub const fn untouched(slot: EquipSlot) -> Self {
        Self {
            slot,
            item: EquipItem::nothing(slot),
            enabled: false,
        }
    }

    /// Returns true if this entry is disabled and holds the slot's nothing item.
    ///
    /// Such entries never reach the resolved appearance.
    #[inline]
    #[must_use]
    pub const fn is_disabled_nothing(&self) -> bool {
        !self.enabled && self.item.id.is_nothing_for(self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_sentinels_are_per_slot() {
        let head = ItemId::nothing(EquipSlot::Head);
        let body = ItemId::nothing(EquipSlot::Body);

        assert_ne!(head, body);
        assert!(head.is_nothing_for(EquipSlot::Head));
        assert!(!head.is_nothing_for(EquipSlot::Body));
    }

    #[test]
    fn test_disabled_nothing_detection() {
        let untouched = DrawData::untouched(EquipSlot::Legs);
        assert!(untouched.is_disabled_nothing());

        // Enabled nothing means "force the slot empty" and must be kept.
        let forced_empty = DrawData::new(EquipSlot::Legs, EquipItem::nothing(EquipSlot::Legs));
        assert!(!forced_empty.is_disabled_nothing());

        let mut disabled_real = DrawData::new(EquipSlot::Legs, EquipItem::new(3_100));
        disabled_real.enabled = false;
        assert!(!disabled_real.is_disabled_nothing());
    }

    #[test]
    fn test_armor_slots() {
        assert!(EquipSlot::Feet.is_armor());
        assert!(!EquipSlot::Ears.is_armor());
        assert_eq!(EquipSlot::ALL.len(), 10);
    }
}
