//! # Wardrobe Session
//!
//! One session per local player. Owns the sources, the published appearance
//! and the single-flight lane every mutation runs in.
//!
//! ```text
//! operation ──> lane.run_exclusive ──┬─> preconditions (reject = no side effects)
//!                                    ├─> mutate sources + persist   [sources lock]
//!                                    ├─> resolve                    [sources lock]
//!                                    ├─> overlay refresh + publish  (no lock held)
//!                                    ├─> await redraw idle          (no lock held)
//!                                    └─> apply appearance
//!           <── effects dispatched after the lane is released
//! ```
//!
//! The sources lock is a `parking_lot::Mutex` and is never held across an
//! `.await`. Transition-time collaborator calls (mod toggles, status removal,
//! profile switches, persistence) run while it is held; see
//! [`crate::collaborators`] for what that forbids. Composite operations (swaps, safeword) call the inner
//! transitions directly; re-entering the lane from inside a body deadlocks.

mod cursed;
mod gags;
mod restraints;
mod safeword;

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use wardrobe_core::{RedrawWaiter, SingleFlight, SingleFlightStats};
use wardrobe_shared::{CursedItem, GagLayer, GagSlot, ModAssociation, RestraintSet};

use crate::collaborators::{Collaborators, ModToggle};
use crate::config::EngineConfig;
use crate::effects::{Effect, EffectBus, EffectReceiver, EffectSink};
use crate::error::{WardrobeError, WardrobeResult};
use crate::resolver::AppearanceResolver;
use crate::sources::{ActiveTraits, GlobalPermissions, WardrobeSources};
use crate::state::{AppearanceState, AppearanceStore};

/// Result of a mutation operation.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The operation ran; these effects were dispatched.
    Applied(Vec<Effect>),
    /// The operation did not complete. For precondition failures nothing
    /// changed; see [`WardrobeError::is_precondition`].
    Rejected(WardrobeError),
}

impl MutationOutcome {
    /// Returns true if the operation ran.
    #[inline]
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Effects dispatched by the operation (empty when rejected).
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        match self {
            Self::Applied(effects) => effects,
            Self::Rejected(_) => &[],
        }
    }

    /// Why the operation was rejected.
    #[must_use]
    pub const fn rejection(&self) -> Option<&WardrobeError> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(error) => Some(error),
        }
    }
}

/// A player's wardrobe: sources, published appearance and applier lane.
pub struct Wardrobe {
    sources: Mutex<WardrobeSources>,
    store: AppearanceStore,
    lane: SingleFlight,
    resolver: AppearanceResolver,
    collaborators: Collaborators,
    sink: Arc<dyn EffectSink>,
}

impl Wardrobe {
    /// Creates a session.
    ///
    /// The blindfold item in `sources` is replaced by the configured one, and
    /// the redraw probe is wired to the visual-layering collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`WardrobeError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        config: &EngineConfig,
        mut sources: WardrobeSources,
        collaborators: Collaborators,
        sink: Arc<dyn EffectSink>,
    ) -> WardrobeResult<Self> {
        config.validate()?;
        sources.blindfold = config.blindfold;

        let visual = Arc::clone(&collaborators.visual);
        let waiter = RedrawWaiter::new(
            Arc::new(move || visual.is_redraw_in_progress()),
            config.backoff_config(),
        );

        tracing::info!(
            sets = sources.restraints.sets().len(),
            cursed_items = sources.cursed.items().len(),
            cursed_item_cap = config.cursed_item_cap,
            "wardrobe session created"
        );

        Ok(Self {
            sources: Mutex::new(sources),
            store: AppearanceStore::default(),
            lane: SingleFlight::new(Arc::new(waiter)),
            resolver: AppearanceResolver::new(config.cursed_item_cap),
            collaborators,
            sink,
        })
    }

    /// Creates a session publishing into a fresh [`EffectBus`] and returns
    /// the bus consumer.
    ///
    /// # Errors
    ///
    /// Returns [`WardrobeError::InvalidConfig`] if `config` fails validation.
    pub fn with_effect_bus(
        config: &EngineConfig,
        sources: WardrobeSources,
        collaborators: Collaborators,
    ) -> WardrobeResult<(Self, EffectReceiver)> {
        config.validate()?;
        let bus = EffectBus::new(config.effect_bus_capacity);
        let receiver = bus.receiver();
        let wardrobe = Self::new(config, sources, collaborators, Arc::new(bus))?;
        Ok((wardrobe, receiver))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Last published appearance.
    #[must_use]
    pub fn appearance(&self) -> Arc<AppearanceState> {
        self.store.load()
    }

    /// Number of appearances published so far.
    #[must_use]
    pub fn appearance_version(&self) -> u64 {
        self.store.version()
    }

    /// The enabled restraint set.
    #[must_use]
    pub fn active_set(&self) -> Option<RestraintSet> {
        self.sources.lock().restraints.active().cloned()
    }

    /// A restraint set by id.
    #[must_use]
    pub fn restraint_set(&self, id: wardrobe_shared::SetId) -> Option<RestraintSet> {
        self.sources.lock().restraints.get(id).cloned()
    }

    /// Hardcore traits in force.
    #[must_use]
    pub fn active_traits(&self) -> Option<ActiveTraits> {
        self.sources.lock().restraints.active_traits().cloned()
    }

    /// Contents of a gag layer.
    #[must_use]
    pub fn gag_on(&self, layer: GagLayer) -> GagSlot {
        self.sources.lock().gags.slot(layer).clone()
    }

    /// Active cursed items, earliest first.
    #[must_use]
    pub fn active_cursed_items(&self) -> Vec<CursedItem> {
        self.sources
            .lock()
            .cursed
            .active_by_time()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Current permission flags.
    #[must_use]
    pub fn permissions(&self) -> GlobalPermissions {
        self.sources.lock().permissions
    }

    /// Lane counters.
    #[must_use]
    pub fn coordinator_stats(&self) -> SingleFlightStats {
        self.lane.stats()
    }

    // =========================================================================
    // Pipeline-only operations
    // =========================================================================

    /// Re-runs resolve → wait → apply without changing any source.
    pub async fn refresh_appearance(&self) -> MutationOutcome {
        self.execute("refresh_appearance", async {
            self.run_pipeline().await;
            Ok(Vec::new())
        })
        .await
    }

    /// Replaces the permission flags and re-applies.
    pub async fn update_permissions(&self, permissions: GlobalPermissions) -> MutationOutcome {
        self.execute("update_permissions", async {
            let previous = self.with_sources(|sources| {
                std::mem::replace(&mut sources.permissions, permissions)
            });
            if previous != permissions {
                tracing::info!(?previous, current = ?permissions, "global permissions changed");
                self.run_pipeline().await;
            }
            Ok(Vec::new())
        })
        .await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Runs `body` in the lane and dispatches its effects once released.
    async fn execute<Fut>(&self, label: &'static str, body: Fut) -> MutationOutcome
    where
        Fut: Future<Output = WardrobeResult<Vec<Effect>>>,
    {
        match self.lane.run_exclusive(label, body).await {
            Ok(effects) => {
                for effect in &effects {
                    self.sink.publish(effect);
                }
                MutationOutcome::Applied(effects)
            }
            Err(error) => MutationOutcome::Rejected(error),
        }
    }

    /// Runs `f` with the sources locked. The guard never escapes `f`.
    fn with_sources<R>(&self, f: impl FnOnce(&mut WardrobeSources) -> R) -> R {
        f(&mut self.sources.lock())
    }

    /// Resolve + publish, wait for redraw, apply.
    ///
    /// Missing player data and collaborator failures are logged and end the
    /// pipeline early; the source change that triggered it stands.
    async fn run_pipeline(&self) {
        let computed = self.with_sources(|sources| self.resolver.compute(sources));
        let resolved = self.resolver.publish(computed, &self.collaborators, &self.store);
        let Ok(state) = resolved else {
            return;
        };

        let outcome = self.lane.waiter().await_redraw_idle().await;
        tracing::trace!(?outcome, "redraw wait finished");

        if let Err(error) = self.collaborators.visual.apply_appearance(&state) {
            tracing::warn!(%error, "failed to apply appearance");
        }
    }

    /// Switches mods on at their priority, or lowers them on removal.
    fn toggle_mods(&self, mods: &[ModAssociation], enable: bool) {
        let mut redraw = false;
        for association in mods {
            let toggle = if enable {
                ModToggle {
                    mod_id: association.mod_id.clone(),
                    enabled: true,
                    priority: association.priority,
                }
            } else {
                ModToggle {
                    mod_id: association.mod_id.clone(),
                    enabled: !association.disable_when_inactive,
                    priority: 0,
                }
            };
            match self.collaborators.visual.set_mod_state(&toggle) {
                Ok(()) => redraw |= association.redraw_after_toggle,
                Err(error) => {
                    tracing::warn!(mod_id = %toggle.mod_id.0, %error, "mod state change failed");
                }
            }
        }
        if redraw {
            tracing::debug!("requesting redraw after mod change");
            self.collaborators.visual.request_redraw();
        }
    }

    fn persist_restraints(&self, sources: &WardrobeSources) {
        if let Err(error) = self.collaborators.persistence.save_restraints(&sources.restraints) {
            tracing::warn!(%error, "failed to save restraint sets");
        }
    }

    fn persist_gags(&self, sources: &WardrobeSources) {
        if let Err(error) = self.collaborators.persistence.save_gags(&sources.gags) {
            tracing::warn!(%error, "failed to save gags");
        }
    }

    fn persist_cursed(&self, sources: &WardrobeSources) {
        if let Err(error) = self.collaborators.persistence.save_cursed_loot(&sources.cursed) {
            tracing::warn!(%error, "failed to save cursed loot");
        }
    }
}

impl std::fmt::Debug for Wardrobe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wardrobe")
            .field("store", &self.store)
            .field("lane", &self.lane)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
