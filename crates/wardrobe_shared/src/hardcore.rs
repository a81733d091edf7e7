//! Hardcore traits a restraint set can impose, per enabling actor.

use serde::{Deserialize, Serialize};

/// Bit-flag set of hardcore traits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardcoreTraits(u32);

impl HardcoreTraits {
    /// No traits.
    pub const NONE: Self = Self(0);
    /// Player is forced to follow the enabler.
    pub const FORCED_FOLLOW: Self = Self(1 << 0);
    /// Player is forced to sit.
    pub const FORCED_SIT: Self = Self(1 << 1);
    /// Player is forced to stay in place.
    pub const FORCED_STAY: Self = Self(1 << 2);
    /// Screen is blindfolded.
    pub const BLINDFOLDED: Self = Self(1 << 3);
    /// Movement is blocked.
    pub const IMMOBILE: Self = Self(1 << 4);
    /// Movement is slowed to walking.
    pub const WEIGHTY: Self = Self(1 << 5);
    /// Leg-based actions are blocked.
    pub const LEGS_RESTRAINED: Self = Self(1 << 6);
    /// Arm-based actions are blocked.
    pub const ARMS_RESTRAINED: Self = Self(1 << 7);
    /// Speech-based actions are blocked.
    pub const GAGGED: Self = Self(1 << 8);

    /// Creates flags from raw value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Checks if a specific trait is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// Combines two trait sets.
    #[inline]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    /// Returns true if no trait is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
