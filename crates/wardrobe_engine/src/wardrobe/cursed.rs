//! Cursed item operations.
//!
//! A cursed gag is worn through the normal gag path on the lowest free
//! layer. Removing it only deactivates the item; the gag itself stays on
//! until removed with [`Wardrobe::remove_gag`].

use chrono::{DateTime, Utc};
use wardrobe_shared::{ActorId, CursedId, CursedKind};

use super::{MutationOutcome, Wardrobe};
use crate::effects::Effect;
use crate::error::{WardrobeError, WardrobeResult};
use crate::sources::WardrobeSources;

impl Wardrobe {
    /// Activates a cursed item at `at`.
    pub async fn apply_cursed_item(&self, id: CursedId, at: DateTime<Utc>) -> MutationOutcome {
        self.execute("apply_cursed_item", async {
            let mut effects = Vec::new();
            let equip =
                self.with_sources(|sources| self.activate_cursed(sources, id, at, &mut effects))?;
            if equip {
                self.run_pipeline().await;
            }
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    /// Deactivates a cursed item.
    pub async fn remove_cursed_item(&self, id: CursedId) -> MutationOutcome {
        self.execute("remove_cursed_item", async {
            let mut effects = Vec::new();
            let equip =
                self.with_sources(|sources| self.deactivate_cursed(sources, id, &mut effects))?;
            if equip {
                self.run_pipeline().await;
            }
            Ok::<_, WardrobeError>(effects)
        })
        .await
    }

    // =========================================================================
    // Inner transitions
    // =========================================================================

    /// Returns whether the appearance should be re-applied.
    fn activate_cursed(
        &self,
        sources: &mut WardrobeSources,
        id: CursedId,
        at: DateTime<Utc>,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<bool> {
        let item = sources.cursed.get(id).ok_or(WardrobeError::CursedItemNotFound(id))?;
        if item.is_active() {
            return Err(WardrobeError::CursedItemActive(id));
        }

        // Pick the layer up front so a full set of layers rejects cleanly.
        let gag_target = match item.kind {
            CursedKind::Gag(gag) if gag.is_none() => return Err(WardrobeError::InvalidGag(gag)),
            CursedKind::Gag(gag) => {
                let layer = sources
                    .gags
                    .first_free_layer()
                    .ok_or(WardrobeError::NoFreeGagLayer)?;
                Some((layer, gag))
            }
            CursedKind::Equip(_) => None,
        };

        let Some(item) = sources.cursed.get_mut(id) else {
            return Err(WardrobeError::CursedItemNotFound(id));
        };
        item.applied_time = Some(at);
        let association = item.mod_association.clone();
        tracing::info!(item = %item.name, applied_at = %at, "cursed item applied");
        self.persist_cursed(sources);

        effects.push(Effect::CursedItemChanged {
            item: id,
            active: true,
        });

        match gag_target {
            Some((layer, gag)) => self.put_on_gag(sources, layer, gag, &ActorId::local(), effects),
            None => {
                if let Some(association) = association {
                    self.toggle_mods(std::slice::from_ref(&association), true);
                }
                Ok(true)
            }
        }
    }

    /// Returns whether the appearance should be re-applied.
    pub(super) fn deactivate_cursed(
        &self,
        sources: &mut WardrobeSources,
        id: CursedId,
        effects: &mut Vec<Effect>,
    ) -> WardrobeResult<bool> {
        let item = sources
            .cursed
            .get_mut(id)
            .ok_or(WardrobeError::CursedItemNotFound(id))?;
        if !item.is_active() {
            return Err(WardrobeError::CursedItemInactive(id));
        }

        item.applied_time = None;
        tracing::info!(item = %item.name, "cursed item removed");

        let equip = !item.is_gag();
        if equip {
            if let Some(association) = &item.mod_association {
                self.toggle_mods(std::slice::from_ref(association), false);
            }
            if let Some(status) = &item.status {
                let statuses: Vec<_> = status.expand().collect();
                self.collaborators.overlay.remove_statuses(&statuses);
            }
        }
        self.persist_cursed(sources);

        effects.push(Effect::CursedItemChanged {
            item: id,
            active: false,
        });
        Ok(equip)
    }
}
