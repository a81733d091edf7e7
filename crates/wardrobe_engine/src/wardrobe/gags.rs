//! Gag layer operations.

use wardrobe_shared::{ActorId, GagDrawData, GagLayer, GagSlot, GagType};

use super::{MutationOutcome, Wardrobe};
use crate::effects::{AchievementEvent, Effect};
use crate::error::{WardrobeError, WardrobeResult};
use crate::sources::WardrobeSources;

impl Wardrobe {
    /// Puts `gag` on an empty layer.
    ///
    /// The appearance is only re-applied when the gag auto-equips and the
    /// global item auto-equip permission is on.
    pub async fn apply_gag(&self, layer: GagLayer, gag: GagType, assigner: ActorId) -> MutationOutcome {
        self.execute("apply_gag", async {
            let mut effects = Vec::new();
            let equip = self.with_sources(|sources| {
                self.put_on_gag(sources, layer, gag, &assigner, &mut effects)
            })?;
            if equip {
                self.run_pipeline().await;
            }
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Empties a layer.
    pub async fn remove_gag(&self, layer: GagLayer, remover: ActorId) -> MutationOutcome {
        self.execute("remove_gag", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| self.take_off_gag(sources, layer, &remover, &mut effects))?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Replaces the gag on an occupied layer in one critical section.
    ///
    /// Only the final state is notified.
    pub async fn swap_gag(&self, layer: GagLayer, gag: GagType, actor: ActorId) -> MutationOutcome {
        self.execute("swap_gag", async {
            let mut effects = Vec::new();
            self.with_sources(|sources| {
                if gag.is_none() {
                    return Err(WardrobeError::InvalidGag(gag));
                }
                let mut removal = Vec::new();
                self.take_off_gag(sources, layer, &actor, &mut removal)?;
                tracing::trace!(suppressed = removal.len(), "swap removal notifications dropped");
                self.put_on_gag(sources, layer, gag, &actor, &mut effects)
            })?;
            self.run_pipeline().await;
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    // =========================================================================
    // Inner transitions
    // =========================================================================

    /// Returns whether the appearance should be re-applied.
    pub(super) fn put_on_gag(
        &self,
        sources: &mut WardrobeSources,
        layer: GagLayer,
        gag: GagType,
        assigner: &ActorId,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<bool> {
        if gag.is_none() {
            return Err(WardrobeError::InvalidGag(gag));
        }
        if !sources.gags.slot(layer).is_empty() {
            return Err(WardrobeError::GagLayerOccupied(layer));
        }

        *sources.gags.slot_mut(layer) = GagSlot {
            gag,
            assigner: Some(assigner.clone()),
        };
        tracing::info!(?layer, ?gag, assigner = %assigner, "gag applied");
        self.persist_gags(sources);

        let data = sources.gags.draw_data(gag);
        let equip =
            sources.permissions.item_auto_equip && data.is_some_and(GagDrawData::is_auto_equipped);
        if equip {
            if let Some(profile) = data.and_then(|d| d.body_profile.as_ref()) {
                self.collaborators.profiles.enable_profile(profile);
            }
        } else {
            tracing::debug!(?layer, ?gag, "gag not auto-equipped");
        }

        effects.push(Effect::GagChanged {
            layer,
            gag,
            applied: true,
            actor: assigner.clone(),
        });
        effects.push(Effect::Achievement(AchievementEvent::GagStateChange {
            layer,
            gag,
            applied: true,
            actor: assigner.clone(),
        }));
        Ok(equip)
    }

    fn take_off_gag(
        &self,
        sources: &mut WardrobeSources,
        layer: GagLayer,
        remover: &ActorId,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<()> {
        let slot = sources.gags.slot_mut(layer);
        if slot.is_empty() {
            return Err(WardrobeError::GagLayerEmpty(layer));
        }
        let gag = std::mem::take(slot).gag;
        tracing::info!(?layer, ?gag, remover = %remover, "gag removed");
        self.persist_gags(sources);

        if let Some(data) = sources.gags.draw_data(gag) {
            self.collaborators.overlay.remove_statuses(&data.status_ids());
            if let Some(profile) = &data.body_profile {
                self.collaborators.profiles.disable_profile(profile);
            }
        }

        effects.push(Effect::GagChanged {
            layer,
            gag,
            applied: false,
            actor: remover.clone(),
        });
        effects.push(Effect::Achievement(AchievementEvent::GagStateChange {
            layer,
            gag,
            applied: false,
            actor: remover.clone(),
        }));
        Ok(())
    }
}
