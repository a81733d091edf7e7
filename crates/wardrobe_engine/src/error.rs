//! # Wardrobe Error Types
//!
//! Nothing in the engine is fatal to the host. Every error here degrades to
//! "state not updated this cycle" and is logged where it is decided.

use thiserror::Error;
use wardrobe_core::SectionPanic;
use wardrobe_shared::{CursedId, GagLayer, GagType, SetId};

/// Failure reported by an external collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{collaborator} failed: {reason}")]
pub struct CollaboratorError {
    /// Which collaborator failed.
    pub collaborator: &'static str,
    /// Reason given.
    pub reason: String,
}

impl CollaboratorError {
    /// Creates a collaborator error.
    #[must_use]
    pub fn new(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self {
            collaborator,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur in the wardrobe engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WardrobeError {
    // =========================================================================
    // Preconditions - restraint sets
    // =========================================================================
    /// No restraint set with this id.
    #[error("restraint set not found: {0}")]
    SetNotFound(SetId),

    /// Another (or the same) set is already enabled.
    #[error("restraint set {active} is already enabled")]
    AnotherSetActive {
        /// The enabled set.
        active: SetId,
    },

    /// The set is not enabled.
    #[error("restraint set {0} is not enabled")]
    SetNotEnabled(SetId),

    /// The set is padlocked.
    #[error("restraint set {0} is locked")]
    SetLocked(SetId),

    /// The set is not padlocked.
    #[error("restraint set {0} is not locked")]
    SetNotLocked(SetId),

    /// The set is not the currently active one.
    #[error("restraint set {0} is not the active set")]
    NotActiveSet(SetId),

    /// No set is enabled.
    #[error("no restraint set is active")]
    NoActiveSet,

    /// The lock request is incomplete for its kind.
    #[error("invalid lock request: {0}")]
    InvalidLock(&'static str),

    /// The password does not open the lock.
    #[error("password does not match the lock on {0}")]
    PasswordMismatch(SetId),

    // =========================================================================
    // Preconditions - gags
    // =========================================================================
    /// Nothing to remove on this layer.
    #[error("gag layer {0:?} is empty")]
    GagLayerEmpty(GagLayer),

    /// Something is already worn on this layer.
    #[error("gag layer {0:?} is occupied")]
    GagLayerOccupied(GagLayer),

    /// The gag type cannot be applied.
    #[error("gag type {0:?} cannot be applied")]
    InvalidGag(GagType),

    /// Every gag layer is occupied.
    #[error("no free gag layer")]
    NoFreeGagLayer,

    // =========================================================================
    // Preconditions - cursed loot
    // =========================================================================
    /// No cursed item with this id.
    #[error("cursed item not found: {0:?}")]
    CursedItemNotFound(CursedId),

    /// The cursed item is already active.
    #[error("cursed item {0:?} is already active")]
    CursedItemActive(CursedId),

    /// The cursed item is not active.
    #[error("cursed item {0:?} is not active")]
    CursedItemInactive(CursedId),

    // =========================================================================
    // Missing data / collaborators / config
    // =========================================================================
    /// Core player data is not available; resolution skipped.
    #[error("player data unavailable, resolution skipped")]
    PlayerDataUnavailable,

    /// An external collaborator failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation panicked part-way. Source changes made before the
    /// panic stand; its effects were not dispatched.
    #[error(transparent)]
    Panicked(#[from] SectionPanic),
}

impl WardrobeError {
    /// Returns true for precondition failures (the operation was a no-op).
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        !matches!(
            self,
            Self::PlayerDataUnavailable
                | Self::Collaborator(_)
                | Self::InvalidConfig(_)
                | Self::Panicked(_)
        )
    }
}

/// Result type for wardrobe operations.
pub type WardrobeResult<T> = Result<T, WardrobeError>;
