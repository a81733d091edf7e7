//! # Cursed Items
//!
//! Items that activate opportunistically or on a timer and compete for
//! appearance slots by precedence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gag::GagType;
use crate::restraint::ModAssociation;
use crate::slot::DrawData;
use crate::status::StatusAssociation;

/// Stable identifier of a cursed item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursedId(pub Uuid);

impl CursedId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CursedId {
    fn default() -> Self {
        Self::new()
    }
}

/// What a cursed item puts on the avatar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursedKind {
    /// A gag; its look comes from the gag's configured draw data.
    Gag(GagType),
    /// A literal item.
    Equip(DrawData),
}

/// A cursed item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursedItem {
    /// Stable identifier.
    pub id: CursedId,
    /// Display name.
    pub name: String,
    /// Gag or equipment.
    pub kind: CursedKind,
    /// Precedence when competing for a slot.
    #[serde(default)]
    pub override_precedence: i32,
    /// Whether a later item may take this item's slot.
    #[serde(default)]
    pub can_override: bool,
    /// Mod toggled with the item.
    #[serde(default)]
    pub mod_association: Option<ModAssociation>,
    /// Status effect applied with the item.
    #[serde(default)]
    pub status: Option<StatusAssociation>,
    /// Activation time; `None` while inactive.
    #[serde(default)]
    pub applied_time: Option<DateTime<Utc>>,
}

impl CursedItem {
    /// Creates an inactive cursed item.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: CursedKind) -> Self {
        Self {
            id: CursedId::new(),
            name: name.into(),
            kind,
            override_precedence: 0,
            can_override: false,
            mod_association: None,
            status: None,
            applied_time: None,
        }
    }

    /// Sets precedence and the override flag.
    #[must_use]
    pub fn with_precedence(mut self, precedence: i32, can_override: bool) -> Self {
        self.override_precedence = precedence;
        self.can_override = can_override;
        self
    }

    /// Sets the status association.
    #[must_use]
    pub fn with_status(mut self, status: StatusAssociation) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the mod association.
    #[must_use]
    pub fn with_mod(mut self, association: ModAssociation) -> Self {
        self.mod_association = Some(association);
        self
    }

    /// Returns true while the item is active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.applied_time.is_some()
    }

    /// Returns true for gag-type items.
    #[inline]
    #[must_use]
    pub const fn is_gag(&self) -> bool {
        matches!(self.kind, CursedKind::Gag(_))
    }

    /// Returns true if `challenger` may take this item's slot.
    ///
    /// Both conditions must hold: this item allows overrides, and the
    /// challenger's precedence is at least as high.
    #[inline]
    #[must_use]
    pub const fn yields_to(&self, challenger: &Self) -> bool {
        self.can_override && challenger.override_precedence >= self.override_precedence
    }
}
