//! Safeword: clear the active restraint set and every cursed item at once.

use wardrobe_shared::ActorId;

use super::{MutationOutcome, Wardrobe};
use crate::effects::{AchievementEvent, Effect};
use crate::error::WardrobeError;

impl Wardrobe {
    /// Force-unlocks and disables the active set and deactivates every
    /// active cursed item. Never rejected.
    pub async fn disable_all_due_to_safeword(&self, actor: ActorId) -> MutationOutcome {
        self.execute("disable_all_due_to_safeword", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| {
                tracing::warn!(actor = %actor, "safeword used, clearing restraints and cursed items");

                if let Some(id) = sources.restraints.active().map(|set| set.id) {
                    if let Some(set) = sources.restraints.get_mut(id) {
                        if set.is_locked() {
                            let prior = std::mem::take(&mut set.lock);
                            tracing::info!(set = %id, kind = ?prior.kind, "padlock force-removed");
                            effects.push(Effect::RestraintLockChanged {
                                set: id,
                                kind: prior.kind,
                                locked: false,
                                actor: actor.clone(),
                            });
                        }
                    }
                    self.disable_set(sources, id, &actor, true, &mut effects)?;
                }

                let active: Vec<_> = sources.cursed.active_by_time().iter().map(|i| i.id).collect();
                for id in active {
                    self.deactivate_cursed(sources, id, &mut effects)?;
                }

                Ok::<_, WardrobeError>(())
            })?;

            effects.push(Effect::SafewordUsed {
                actor: actor.clone(),
            });
            effects.push(Effect::Achievement(AchievementEvent::SafewordUsed {
                actor: actor.clone(),
            }));

            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }
}
