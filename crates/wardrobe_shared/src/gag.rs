//! # Gag Layers
//!
//! Three independent layers, each holding one gag type. What a gag type
//! looks like on the avatar is configured once per type in [`GagDrawData`].

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::constants::GAG_LAYER_COUNT;
use crate::meta::MetaFlags;
use crate::slot::DrawData;
use crate::status::{expand_all, StatusAssociation, StatusEffectId};

/// One of the fixed gag layers. Resolution walks them in declaration order.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GagLayer {
    /// Innermost layer.
    Under = 0,
    /// Middle layer.
    Middle = 1,
    /// Outermost layer.
    Over = 2,
}

impl GagLayer {
    /// Every layer, lowest priority first.
    pub const ALL: [Self; GAG_LAYER_COUNT] = [Self::Under, Self::Middle, Self::Over];

    /// Returns the layer index (0-2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Kind of gag. `None` marks an empty layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GagType {
    /// Empty layer.
    #[default]
    None,
    /// Ball gag.
    BallGag,
    /// Bit gag.
    BitGag,
    /// Cloth wrap.
    ClothWrap,
    /// Duct tape.
    DuctTape,
    /// Muzzle.
    Muzzle,
    /// Panel gag.
    PanelGag,
    /// Ring gag.
    RingGag,
    /// Sponge.
    Sponge,
}

impl GagType {
    /// Returns true for the empty-layer sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Identifier of a body-shape profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

/// What the avatar gets when a gag type is worn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GagDrawData {
    /// Item drawn for the gag.
    pub draw: DrawData,
    /// Force headgear visible while worn.
    #[serde(default)]
    pub force_headgear: bool,
    /// Force visor toggled while worn.
    #[serde(default)]
    pub force_visor: bool,
    /// Status effects applied while worn.
    #[serde(default)]
    pub statuses: Vec<StatusAssociation>,
    /// Body-shape profile enabled while worn.
    #[serde(default)]
    pub body_profile: Option<ProfileId>,
    /// Whether the gag is drawn on the avatar at all while worn.
    #[serde(default = "default_auto_equip")]
    pub auto_equip: bool,
}

const fn default_auto_equip() -> bool {
    true
}

impl GagDrawData {
    /// Creates draw data with no forced meta, statuses or profile.
    #[must_use]
    pub fn new(draw: DrawData) -> Self {
        Self {
            draw,
            force_headgear: false,
            force_visor: false,
            statuses: Vec::new(),
            body_profile: None,
            auto_equip: true,
        }
    }

    /// Forced meta of this gag alone.
    #[inline]
    #[must_use]
    pub const fn meta(&self) -> MetaFlags {
        MetaFlags::from_forces(self.force_headgear, self.force_visor)
    }

    /// True if wearing this gag changes the appearance: the draw entry is
    /// enabled and the gag auto-equips.
    #[inline]
    #[must_use]
    pub const fn is_auto_equipped(&self) -> bool {
        self.draw.enabled && self.auto_equip
    }

    /// All statuses of the gag, presets expanded.
    #[must_use]
    pub fn status_ids(&self) -> Vec<StatusEffectId> {
        expand_all(&self.statuses)
    }
}

/// Contents of one gag layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GagSlot {
    /// Gag currently worn on this layer.
    pub gag: GagType,
    /// Who applied it.
    pub assigner: Option<ActorId>,
}

impl GagSlot {
    /// Returns true if nothing is worn on this layer.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.gag.is_none()
    }
}
