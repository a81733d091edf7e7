//! Forced headgear / visor overrides.

use serde::{Deserialize, Serialize};

/// Forced headgear/visor state for the avatar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaFlags {
    /// Nothing forced.
    #[default]
    None,
    /// Headgear forced visible.
    Hat,
    /// Visor forced toggled.
    Visor,
    /// Both forced.
    Both,
}

impl MetaFlags {
    /// Builds the flag set from the two force booleans of a gag.
    #[must_use]
    pub const fn from_forces(headgear: bool, visor: bool) -> Self {
        match (headgear, visor) {
            (false, false) => Self::None,
            (true, false) => Self::Hat,
            (false, true) => Self::Visor,
            (true, true) => Self::Both,
        }
    }

    /// Returns true if headgear is forced.
    #[inline]
    #[must_use]
    pub const fn forces_headgear(self) -> bool {
        matches!(self, Self::Hat | Self::Both)
    }

    /// Returns true if the visor is forced.
    #[inline]
    #[must_use]
    pub const fn forces_visor(self) -> bool {
        matches!(self, Self::Visor | Self::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_forces_round_trips_both_bits() {
        for headgear in [false, true] {
            for visor in [false, true] {
                let meta = MetaFlags::from_forces(headgear, visor);
                assert_eq!(meta.forces_headgear(), headgear);
                assert_eq!(meta.forces_visor(), visor);
            }
        }
    }
}
