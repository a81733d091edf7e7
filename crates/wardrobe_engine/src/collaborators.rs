//! # Collaborator Traits
//!
//! The engine never touches the game client, the disk or the network
//! directly. Everything outside the resolve → wait → apply pipeline is a
//! trait the host implements.
//!
//! ```text
//! Engine calls:            Host implements:
//! ┌───────────────────┐    ┌───────────────────┐
//! │ trait Persistence │ ←─ │ impl Persistence  │
//! └───────────────────┘    └───────────────────┘
//! ```
//!
//! All calls are synchronous and must not block for long; they run inside
//! the single-flight lane.
//!
//! ## Locking
//!
//! Calls made while a transition mutates the sources run with the session's
//! sources lock held:
//!
//! | Call                                    | Sources locked |
//! |-----------------------------------------|----------------|
//! | `Persistence::*`                        | yes            |
//! | `VisualLayering::set_mod_state`         | yes            |
//! | `VisualLayering::request_redraw`        | yes            |
//! | `StatusOverlay::remove_statuses`        | yes            |
//! | `BodyProfiles::*`                       | yes            |
//! | `StatusOverlay::refresh_statuses`       | no             |
//! | `PlayerPresence::is_player_available`   | no             |
//! | `VisualLayering::apply_appearance`      | no             |
//! | `VisualLayering::is_redraw_in_progress` | no             |
//!
//! Implementations of the locked calls must not query the `Wardrobe` they
//! serve (`active_set`, `gag_on`, ...); the lock is not re-entrant and the
//! call deadlocks. The unlocked calls may query freely but must not start a
//! mutation operation, which would wait on the lane the caller holds.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use wardrobe_shared::{ModId, ProfileId, StatusEffectId};

use crate::error::CollaboratorError;
use crate::sources::{CursedLootStorage, GagStorage, RestraintStorage};
use crate::state::AppearanceState;

/// A mod enable/priority change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModToggle {
    /// Target mod.
    pub mod_id: ModId,
    /// New enabled state.
    pub enabled: bool,
    /// New priority.
    pub priority: i32,
}

// ============================================================================
// TRAITS
// ============================================================================

/// Saves source data. Called synchronously after every source mutation,
/// with the sources locked.
pub trait Persistence: Send + Sync {
    /// Saves restraint sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the data could not be written.
    fn save_restraints(&self, storage: &RestraintStorage) -> Result<(), CollaboratorError>;

    /// Saves gag layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the data could not be written.
    fn save_gags(&self, storage: &GagStorage) -> Result<(), CollaboratorError>;

    /// Saves the cursed item pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the data could not be written.
    fn save_cursed_loot(&self, storage: &CursedLootStorage) -> Result<(), CollaboratorError>;
}

/// The game's visual layering engine.
pub trait VisualLayering: Send + Sync {
    /// Returns true while a forced redraw is running.
    fn is_redraw_in_progress(&self) -> bool;

    /// Applies a resolved appearance.
    ///
    /// # Errors
    ///
    /// Returns an error if the appearance could not be applied.
    fn apply_appearance(&self, state: &AppearanceState) -> Result<(), CollaboratorError>;

    /// Enables, disables or re-prioritizes a mod. Runs with the sources
    /// locked.
    ///
    /// # Errors
    ///
    /// Returns an error if the mod manager rejected the change.
    fn set_mod_state(&self, toggle: &ModToggle) -> Result<(), CollaboratorError>;

    /// Asks for a redraw of the player.
    fn request_redraw(&self);
}

/// Status-effect overlay.
pub trait StatusOverlay: Send + Sync {
    /// Recomputes and returns the statuses currently shown. Runs with the
    /// sources unlocked, so session queries are allowed.
    fn refresh_statuses(&self) -> Vec<StatusEffectId>;

    /// Removes statuses from the overlay. Runs with the sources locked.
    fn remove_statuses(&self, statuses: &[StatusEffectId]);
}

/// Body-shape profiles attached to gags. Called with the sources locked.
pub trait BodyProfiles: Send + Sync {
    /// Enables a profile.
    fn enable_profile(&self, profile: &ProfileId);

    /// Disables a profile.
    fn disable_profile(&self, profile: &ProfileId);
}

/// Availability of the local player's core data.
pub trait PlayerPresence: Send + Sync {
    /// Returns true if the player object can be read.
    fn is_player_available(&self) -> bool;
}

/// The full set of collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Persistence.
    pub persistence: Arc<dyn Persistence>,
    /// Visual layering.
    pub visual: Arc<dyn VisualLayering>,
    /// Status overlay.
    pub overlay: Arc<dyn StatusOverlay>,
    /// Body profiles.
    pub profiles: Arc<dyn BodyProfiles>,
    /// Player presence.
    pub player: Arc<dyn PlayerPresence>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// ============================================================================
// MOCK IMPLEMENTATIONS (For Testing)
// ============================================================================

/// Mock persistence counting saves.
#[derive(Debug, Default)]
pub struct MockPersistence {
    restraint_saves: AtomicUsize,
    gag_saves: AtomicUsize,
    cursed_saves: AtomicUsize,
    fail: AtomicBool,
}

impl MockPersistence {
    /// Creates a mock that accepts every save.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every save fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of restraint saves.
    #[must_use]
    pub fn restraint_saves(&self) -> usize {
        self.restraint_saves.load(Ordering::SeqCst)
    }

    /// Number of gag saves.
    #[must_use]
    pub fn gag_saves(&self) -> usize {
        self.gag_saves.load(Ordering::SeqCst)
    }

    /// Number of cursed loot saves.
    #[must_use]
    pub fn cursed_saves(&self) -> usize {
        self.cursed_saves.load(Ordering::SeqCst)
    }

    fn record(&self, counter: &AtomicUsize) -> Result<(), CollaboratorError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::new("persistence", "disk unavailable"));
        }
        Ok(())
    }
}

impl Persistence for MockPersistence {
    fn save_restraints(&self, _storage: &RestraintStorage) -> Result<(), CollaboratorError> {
        self.record(&self.restraint_saves)
    }

    fn save_gags(&self, _storage: &GagStorage) -> Result<(), CollaboratorError> {
        self.record(&self.gag_saves)
    }

    fn save_cursed_loot(&self, _storage: &CursedLootStorage) -> Result<(), CollaboratorError> {
        self.record(&self.cursed_saves)
    }
}

/// Mock visual layering recording everything it is asked to do.
#[derive(Debug, Default)]
pub struct MockVisual {
    redraw_busy: AtomicBool,
    fail_mods: AtomicBool,
    panic_next_apply: AtomicBool,
    redraw_requests: AtomicUsize,
    applied: Mutex<Vec<AppearanceState>>,
    mod_toggles: Mutex<Vec<ModToggle>>,
}

impl MockVisual {
    /// Creates an idle mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the redraw-in-progress flag.
    pub fn set_redraw_busy(&self, busy: bool) {
        self.redraw_busy.store(busy, Ordering::SeqCst);
    }

    /// Makes mod changes fail (or succeed again).
    pub fn set_failing_mods(&self, fail: bool) {
        self.fail_mods.store(fail, Ordering::SeqCst);
    }

    /// Makes the next `apply_appearance` call panic.
    pub fn panic_on_next_apply(&self) {
        self.panic_next_apply.store(true, Ordering::SeqCst);
    }

    /// Every appearance applied so far.
    #[must_use]
    pub fn applied(&self) -> Vec<AppearanceState> {
        self.applied.lock().clone()
    }

    /// The most recently applied appearance.
    #[must_use]
    pub fn last_applied(&self) -> Option<AppearanceState> {
        self.applied.lock().last().cloned()
    }

    /// Every accepted mod change so far.
    #[must_use]
    pub fn mod_toggles(&self) -> Vec<ModToggle> {
        self.mod_toggles.lock().clone()
    }

    /// Number of redraw requests.
    #[must_use]
    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests.load(Ordering::SeqCst)
    }
}

impl VisualLayering for MockVisual {
    fn is_redraw_in_progress(&self) -> bool {
        self.redraw_busy.load(Ordering::SeqCst)
    }

    fn apply_appearance(&self, state: &AppearanceState) -> Result<(), CollaboratorError> {
        assert!(
            !self.panic_next_apply.swap(false, Ordering::SeqCst),
            "visual layer crashed while applying"
        );
        self.applied.lock().push(state.clone());
        Ok(())
    }

    fn set_mod_state(&self, toggle: &ModToggle) -> Result<(), CollaboratorError> {
        if self.fail_mods.load(Ordering::SeqCst) {
            return Err(CollaboratorError::new("mod manager", "not loaded"));
        }
        self.mod_toggles.lock().push(toggle.clone());
        Ok(())
    }

    fn request_redraw(&self) {
        self.redraw_requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock status overlay.
#[derive(Debug, Default)]
pub struct MockOverlay {
    shown: Mutex<Vec<StatusEffectId>>,
    removed: Mutex<Vec<StatusEffectId>>,
    refreshes: AtomicUsize,
}

impl MockOverlay {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets what `refresh_statuses` reports.
    pub fn set_shown(&self, statuses: Vec<StatusEffectId>) {
        *self.shown.lock() = statuses;
    }

    /// Every status removed so far.
    #[must_use]
    pub fn removed(&self) -> Vec<StatusEffectId> {
        self.removed.lock().clone()
    }

    /// Number of refreshes.
    #[must_use]
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl StatusOverlay for MockOverlay {
    fn refresh_statuses(&self) -> Vec<StatusEffectId> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        self.shown.lock().clone()
    }

    fn remove_statuses(&self, statuses: &[StatusEffectId]) {
        self.shown.lock().retain(|s| !statuses.contains(s));
        self.removed.lock().extend_from_slice(statuses);
    }
}

/// Mock body profiles.
#[derive(Debug, Default)]
pub struct MockProfiles {
    enabled: Mutex<HashSet<ProfileId>>,
}

impl MockProfiles {
    /// Creates a mock with nothing enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `profile` is enabled.
    #[must_use]
    pub fn is_enabled(&self, profile: &ProfileId) -> bool {
        self.enabled.lock().contains(profile)
    }
}

impl BodyProfiles for MockProfiles {
    fn enable_profile(&self, profile: &ProfileId) {
        self.enabled.lock().insert(profile.clone());
    }

    fn disable_profile(&self, profile: &ProfileId) {
        self.enabled.lock().remove(profile);
    }
}

/// Mock player presence.
#[derive(Debug)]
pub struct MockPlayer {
    available: AtomicBool,
}

impl MockPlayer {
    /// Creates a mock with the player available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }

    /// Sets availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerPresence for MockPlayer {
    fn is_player_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Every mock, with typed handles kept for assertions.
#[derive(Debug, Default, Clone)]
pub struct MockCollaborators {
    /// Persistence mock.
    pub persistence: Arc<MockPersistence>,
    /// Visual layering mock.
    pub visual: Arc<MockVisual>,
    /// Status overlay mock.
    pub overlay: Arc<MockOverlay>,
    /// Body profiles mock.
    pub profiles: Arc<MockProfiles>,
    /// Player presence mock.
    pub player: Arc<MockPlayer>,
}

impl MockCollaborators {
    /// Creates fresh mocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type-erased bundle for a session.
    #[must_use]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            persistence: self.persistence.clone(),
            visual: self.visual.clone(),
            overlay: self.overlay.clone(),
            profiles: self.profiles.clone(),
            player: self.player.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_persistence_failure_still_counts() {
        let persistence = MockPersistence::new();
        persistence.set_failing(true);

        assert!(persistence.save_gags(&GagStorage::new()).is_err());
        assert_eq!(persistence.gag_saves(), 1);
    }

    #[test]
    fn test_mock_overlay_removal() {
        let overlay = MockOverlay::new();
        let keep = StatusEffectId::new();
        let gone = StatusEffectId::new();
        overlay.set_shown(vec![keep, gone]);

        overlay.remove_statuses(&[gone]);

        assert_eq!(overlay.refresh_statuses(), vec![keep]);
        assert_eq!(overlay.removed(), vec![gone]);
    }

    #[test]
    fn test_bundle_shares_mock_state() {
        let mocks = MockCollaborators::new();
        let bundle = mocks.collaborators();

        mocks.visual.set_redraw_busy(true);
        assert!(bundle.visual.is_redraw_in_progress());

        mocks.player.set_available(false);
        assert!(!bundle.player.is_player_available());
    }
}
