//! # Effects
//!
//! Notifications an operation produces for the outside world.
//!
//! ```text
//! ┌────────────────┐  Vec<Effect>   ┌────────────┐      ┌──────────────┐
//! │   operation    │──────────────> │ EffectSink │ ───> │  networking  │
//! │ (single-flight)│  after exit    │ (EffectBus)│      │ achievements │
//! └────────────────┘                └────────────┘      └──────────────┘
//! ```
//!
//! Operations only collect effects. They are dispatched once the critical
//! section has been released, so a slow consumer never holds the lane.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use wardrobe_shared::{ActorId, CursedId, GagLayer, GagType, HardcoreTraits, LockKind, SetId};

/// Update pushed to paired remote users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushUpdate {
    /// A restraint set was enabled.
    RestraintApplied {
        /// The set.
        set: SetId,
        /// Who enabled it.
        actor: ActorId,
    },
    /// A restraint set was disabled.
    RestraintRemoved {
        /// The set.
        set: SetId,
        /// Who disabled it.
        actor: ActorId,
    },
    /// A padlock was placed.
    RestraintLocked {
        /// The set.
        set: SetId,
        /// Padlock kind.
        kind: LockKind,
        /// Who locked it.
        actor: ActorId,
    },
    /// A padlock was removed.
    RestraintUnlocked {
        /// The set.
        set: SetId,
        /// Padlock kind that was removed.
        kind: LockKind,
        /// Who unlocked it.
        actor: ActorId,
    },
}

/// Input for the achievement subsystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AchievementEvent {
    /// A restraint set changed enabled state.
    RestraintStateChange {
        /// The set.
        set: SetId,
        /// New state.
        enabled: bool,
        /// Who changed it.
        actor: ActorId,
    },
    /// A restraint set was locked or unlocked.
    RestraintLockChange {
        /// The set.
        set: SetId,
        /// Padlock kind involved.
        kind: LockKind,
        /// True for lock, false for unlock.
        locked: bool,
        /// Who changed it.
        actor: ActorId,
    },
    /// Someone other than the enabler removed the set, neither being local.
    ThirdPartyDisable {
        /// The set.
        set: SetId,
        /// Who enabled it.
        enabler: ActorId,
        /// Who disabled it.
        disabler: ActorId,
    },
    /// Someone other than the assigner removed the padlock, neither being local.
    ThirdPartyUnlock {
        /// The set.
        set: SetId,
        /// Who locked it.
        assigner: ActorId,
        /// Who unlocked it.
        unlocker: ActorId,
    },
    /// A gag layer changed.
    GagStateChange {
        /// Layer.
        layer: GagLayer,
        /// Gag involved.
        gag: GagType,
        /// True for apply, false for removal.
        applied: bool,
        /// Who changed it.
        actor: ActorId,
    },
    /// The safeword was used.
    SafewordUsed {
        /// Who used it.
        actor: ActorId,
    },
}

/// Everything an operation can produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    // =========================================================================
    // Local events
    // =========================================================================
    /// A restraint set was enabled or disabled.
    RestraintToggled {
        /// The set.
        set: SetId,
        /// New state.
        enabled: bool,
        /// Who changed it.
        actor: ActorId,
    },
    /// A padlock was placed or removed.
    RestraintLockChanged {
        /// The set.
        set: SetId,
        /// Padlock kind involved.
        kind: LockKind,
        /// True for lock, false for unlock.
        locked: bool,
        /// Who changed it.
        actor: ActorId,
    },
    /// Hardcore traits were switched on or off.
    HardcoreTraitsChanged {
        /// Set carrying the traits.
        set: SetId,
        /// The actor the traits belong to.
        enabler: ActorId,
        /// Traits involved.
        traits: HardcoreTraits,
        /// New state.
        enabled: bool,
    },
    /// A gag layer changed.
    GagChanged {
        /// Layer.
        layer: GagLayer,
        /// Gag involved.
        gag: GagType,
        /// True for apply, false for removal.
        applied: bool,
        /// Who changed it.
        actor: ActorId,
    },
    /// A cursed item was activated or deactivated.
    CursedItemChanged {
        /// The item.
        item: CursedId,
        /// New state.
        active: bool,
    },
    /// The safeword cleared every source.
    SafewordUsed {
        /// Who used it.
        actor: ActorId,
    },

    // =========================================================================
    // Outbound
    // =========================================================================
    /// Update for paired users.
    NetworkPush(PushUpdate),
    /// Achievement progress.
    Achievement(AchievementEvent),
}

/// Fire-and-forget consumer of effects.
pub trait EffectSink: Send + Sync {
    /// Delivers one effect. Must not block.
    fn publish(&self, effect: &Effect);
}

/// Bounded channel carrying effects out of the engine.
pub struct EffectBus {
    sender: Sender<Effect>,
    receiver: Receiver<Effect>,
}

impl EffectBus {
    /// Creates a bus holding at most `capacity` undelivered effects.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Gets a producer handle.
    #[must_use]
    pub fn sender(&self) -> EffectSender {
        EffectSender {
            sender: self.sender.clone(),
        }
    }

    /// Gets a consumer handle.
    #[must_use]
    pub fn receiver(&self) -> EffectReceiver {
        EffectReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

impl EffectSink for EffectBus {
    fn publish(&self, effect: &Effect) {
        // Bus keeps its own receiver alive, so only `Full` can happen here.
        if let Err(TrySendError::Full(dropped)) = self.sender.try_send(effect.clone()) {
            tracing::warn!(effect = ?dropped, "effect bus full, dropping effect");
        }
    }
}

impl std::fmt::Debug for EffectBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectBus")
            .field("pending", &self.receiver.len())
            .finish()
    }
}

/// Producer handle.
#[derive(Clone, Debug)]
pub struct EffectSender {
    sender: Sender<Effect>,
}

impl EffectSender {
    /// Sends an effect without blocking.
    ///
    /// Returns `false` if the channel is full or every receiver is gone.
    #[inline]
    pub fn send(&self, effect: Effect) -> bool {
        self.sender.try_send(effect).is_ok()
    }
}

impl EffectSink for EffectSender {
    fn publish(&self, effect: &Effect) {
        if !self.send(effect.clone()) {
            tracing::warn!(?effect, "effect dropped");
        }
    }
}

/// Consumer handle.
#[derive(Clone, Debug)]
pub struct EffectReceiver {
    receiver: Receiver<Effect>,
}

impl EffectReceiver {
    /// Receives all pending effects without blocking.
    #[must_use]
    pub fn drain(&self) -> Vec<Effect> {
        self.receiver.try_iter().collect()
    }

    /// Receives one pending effect.
    #[must_use]
    pub fn try_recv(&self) -> Option<Effect> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending effects.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if effects are pending.
    #[must_use]
    pub fn has_effects(&self) -> bool {
        !self.receiver.is_empty()
    }
}
