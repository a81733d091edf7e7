//! Restraint set operations: enable, disable, lock, unlock, swap, timer expiry.

use chrono::{DateTime, Utc};
use wardrobe_shared::{ActorId, LockRequest, LockState, SetId};

use super::{MutationOutcome, Wardrobe};
use crate::effects::{AchievementEvent, Effect, PushUpdate};
use crate::error::{WardrobeError, WardrobeResult};
use crate::sources::{ActiveTraits, WardrobeSources};

/// Neither actor is the local player, and they differ.
fn is_third_party(first: &ActorId, second: &ActorId) -> bool {
    first != second && !first.is_local() && !second.is_local()
}

impl Wardrobe {
    /// Enables a restraint set.
    ///
    /// Rejected if the set does not exist or any set is already enabled.
    pub async fn enable_restraint_set(
        &self,
        set: SetId,
        enabler: ActorId,
        push: bool,
    ) -> MutationOutcome {
        self.execute("enable_restraint_set", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| self.enable_set(sources, set, &enabler, push, &mut effects))?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Disables a restraint set.
    ///
    /// Rejected if the set does not exist, is not enabled, or is locked.
    pub async fn disable_restraint_set(
        &self,
        set: SetId,
        disabler: ActorId,
        push: bool,
    ) -> MutationOutcome {
        self.execute("disable_restraint_set", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| {
                self.disable_set(sources, set, &disabler, push, &mut effects)
            })?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Padlocks the active set.
    pub async fn lock_restraint_set(
        &self,
        set: SetId,
        request: LockRequest,
        push: bool,
    ) -> MutationOutcome {
        self.execute("lock_restraint_set", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| self.lock_set(sources, set, request, push, &mut effects))?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Removes the padlock from the active set.
    ///
    /// `password` must match when the lock carries one.
    pub async fn unlock_restraint_set(
        &self,
        set: SetId,
        unlocker: ActorId,
        password: Option<&str>,
        push: bool,
    ) -> MutationOutcome {
        self.execute("unlock_restraint_set", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| {
                self.unlock_set(sources, set, &unlocker, password, push, &mut effects)
            })?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Disables the active set and enables `new` in one critical section.
    ///
    /// The disable is not pushed to paired users; the enable is.
    pub async fn swap_restraint_set(&self, new: SetId, actor: ActorId) -> MutationOutcome {
        self.execute("swap_restraint_set", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| {
                let active = sources
                    .restraints
                    .active()
                    .map(|s| s.id)
                    .ok_or(WardrobeError::NoActiveSet)?;
                if sources.restraints.get(new).is_none() {
                    return Err(WardrobeError::SetNotFound(new));
                }
                self.disable_set(sources, active, &actor, false, &mut effects)?;
                self.enable_set(sources, new, &actor, true, &mut effects)
            })?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Unlocks the active set if its timer padlock expired at or before `now`.
    ///
    /// The lock's assigner is recorded as the unlocking actor. A no-op when
    /// nothing has expired.
    pub async fn expire_timed_locks(&self, now: DateTime<Utc>) -> MutationOutcome {
        self.execute("expire_timed_locks", async {
            let mut effects = Vec::new();
            let expired = self.with_sources(|sources| {
                let Some(set) = sources.restraints.active() else {
                    return Ok(false);
                };
                if !set.lock.is_expired(now) {
                    return Ok(false);
                }
                let id = set.id;
                let assigner = set.lock.assigner.clone().unwrap_or_else(ActorId::local);
                let password = set.lock.password.clone();
                self.unlock_set(sources, id, &assigner, password.as_deref(), true, &mut effects)?;
                Ok::<_, WardrobeError>(true)
            })?;
            if expired {
                self.run_pipeline().await;
            }
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    // =========================================================================
    // Inner transitions (no lane, no pipeline)
    // =========================================================================

    pub(super) fn enable_set(
        &self,
        sources: &mut WardrobeSources,
        id: SetId,
        enabler: &ActorId,
        push: bool,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<()> {
        if sources.restraints.get(id).is_none() {
            return Err(WardrobeError::SetNotFound(id));
        }
        if let Some(active) = sources.restraints.active() {
            return Err(WardrobeError::AnotherSetActive { active: active.id });
        }
        let set = sources
            .restraints
            .get_mut(id)
            .ok_or(WardrobeError::SetNotFound(id))?;

        set.enabled = true;
        set.enabled_by = Some(enabler.clone());
        let traits = set.traits_for(enabler);
        self.toggle_mods(&set.mods, true);
        tracing::info!(set = %id, name = %set.name, enabler = %enabler, "restraint set enabled");

        if let Some(traits) = traits {
            sources.restraints.set_active_traits(Some(ActiveTraits {
                set: id,
                enabler: enabler.clone(),
                traits,
            }));
            tracing::info!(set = %id, traits = traits.raw(), "hardcore traits enabled");
            effects.push(Effect::HardcoreTraitsChanged {
                set: id,
                enabler: enabler.clone(),
                traits,
                enabled: true,
            });
        }

        self.persist_restraints(sources);

        effects.push(Effect::RestraintToggled {
            set: id,
            enabled: true,
            actor: enabler.clone(),
        });
        if push {
            effects.push(Effect::NetworkPush(PushUpdate::RestraintApplied {
                set: id,
                actor: enabler.clone(),
            }));
        }
        effects.push(Effect::Achievement(AchievementEvent::RestraintStateChange {
            set: id,
            enabled: true,
            actor: enabler.clone(),
        }));
        Ok(())
    }

    pub(super) fn disable_set(
        &self,
        sources: &mut WardrobeSources,
        id: SetId,
        disabler: &ActorId,
        push: bool,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<()> {
        let set = sources
            .restraints
            .get_mut(id)
            .ok_or(WardrobeError::SetNotFound(id))?;
        if !set.enabled {
            return Err(WardrobeError::SetNotEnabled(id));
        }
        if set.is_locked() {
            return Err(WardrobeError::SetLocked(id));
        }

        self.toggle_mods(&set.mods, false);
        self.collaborators.overlay.remove_statuses(&set.status_ids());
        set.enabled = false;
        let enabler = set.enabled_by.take();
        tracing::info!(set = %id, name = %set.name, disabler = %disabler, "restraint set disabled");

        let traits = sources
            .restraints
            .set_active_traits(None)
            .filter(|active| active.set == id);
        if let Some(active) = traits {
            tracing::info!(set = %id, traits = active.traits.raw(), "hardcore traits disabled");
            effects.push(Effect::HardcoreTraitsChanged {
                set: id,
                enabler: active.enabler,
                traits: active.traits,
                enabled: false,
            });
        }

        self.persist_restraints(sources);

        effects.push(Effect::RestraintToggled {
            set: id,
            enabled: false,
            actor: disabler.clone(),
        });
        if push {
            effects.push(Effect::NetworkPush(PushUpdate::RestraintRemoved {
                set: id,
                actor: disabler.clone(),
            }));
        }
        effects.push(Effect::Achievement(AchievementEvent::RestraintStateChange {
            set: id,
            enabled: false,
            actor: disabler.clone(),
        }));
        if let Some(enabler) = enabler.filter(|enabler| is_third_party(enabler, disabler)) {
            effects.push(Effect::Achievement(AchievementEvent::ThirdPartyDisable {
                set: id,
                enabler,
                disabler: disabler.clone(),
            }));
        }
        Ok(())
    }

    fn lock_set(
        &self,
        sources: &mut WardrobeSources,
        id: SetId,
        request: LockRequest,
        push: bool,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<()> {
        let set = sources
            .restraints
            .get_mut(id)
            .ok_or(WardrobeError::SetNotFound(id))?;
        if !set.enabled {
            return Err(WardrobeError::NotActiveSet(id));
        }
        if set.is_locked() {
            return Err(WardrobeError::SetLocked(id));
        }
        request.validate().map_err(WardrobeError::InvalidLock)?;

        let kind = request.kind;
        let actor = request.assigner.clone();
        set.lock = request.into_state();
        tracing::info!(set = %id, ?kind, assigner = %actor, expires_at = ?set.lock.expires_at, "restraint set locked");

        self.persist_restraints(sources);

        effects.push(Effect::RestraintLockChanged {
            set: id,
            kind,
            locked: true,
            actor: actor.clone(),
        });
        if push {
            effects.push(Effect::NetworkPush(PushUpdate::RestraintLocked {
                set: id,
                kind,
                actor: actor.clone(),
            }));
        }
        effects.push(Effect::Achievement(AchievementEvent::RestraintLockChange {
            set: id,
            kind,
            locked: true,
            actor,
        }));
        Ok(())
    }

    pub(super) fn unlock_set(
        &self,
        sources: &mut WardrobeSources,
        id: SetId,
        unlocker: &ActorId,
        password: Option<&str>,
        push: bool,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<()> {
        let set = sources
            .restraints
            .get_mut(id)
            .ok_or(WardrobeError::SetNotFound(id))?;
        if !set.enabled {
            return Err(WardrobeError::NotActiveSet(id));
        }
        if !set.is_locked() {
            return Err(WardrobeError::SetNotLocked(id));
        }
        if !set.lock.accepts(password) {
            return Err(WardrobeError::PasswordMismatch(id));
        }

        let prior: LockState = std::mem::take(&mut set.lock);
        tracing::info!(set = %id, kind = ?prior.kind, unlocker = %unlocker, "restraint set unlocked");

        self.persist_restraints(sources);

        effects.push(Effect::RestraintLockChanged {
            set: id,
            kind: prior.kind,
            locked: false,
            actor: unlocker.clone(),
        });
        if push {
            effects.push(Effect::NetworkPush(PushUpdate::RestraintUnlocked {
                set: id,
                kind: prior.kind,
                actor: unlocker.clone(),
            }));
        }
        effects.push(Effect::Achievement(AchievementEvent::RestraintLockChange {
            set: id,
            kind: prior.kind,
            locked: false,
            actor: unlocker.clone(),
        }));
        if let Some(assigner) = prior.assigner.filter(|assigner| is_third_party(assigner, unlocker)) {
            effects.push(Effect::Achievement(AchievementEvent::ThirdPartyUnlock {
                set: id,
                assigner,
                unlocker: unlocker.clone(),
            }));
        }
        Ok(())
    }
}
