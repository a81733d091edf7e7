//! # Appearance Resolver
//!
//! Merges every source into one [`AppearanceState`]. Later steps overwrite
//! earlier ones slot by slot:
//!
//! ```text
//!   1. restraint set      (lowest)
//!   2. gags  Under → Middle → Over
//!   3. blindfold
//!   4. cursed items       (highest, capped, precedence tie-break)
//!   5. refresh overlay, publish
//! ```
//!
//! Steps 1-4 are a pure function of the sources ([`AppearanceResolver::compute`]);
//! only step 5 talks to collaborators ([`AppearanceResolver::publish`]), so the
//! session runs it with the sources unlocked.

use std::collections::BTreeMap;
use std::sync::Arc;

use wardrobe_shared::{CursedItem, CursedKind, DrawData, EquipSlot, DEFAULT_CURSED_ITEM_CAP};

use crate::collaborators::Collaborators;
use crate::error::{WardrobeError, WardrobeResult};
use crate::sources::WardrobeSources;
use crate::state::{AppearanceState, AppearanceStore};

/// Computes and publishes the resolved appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppearanceResolver {
    cursed_item_cap: usize,
}

impl Default for AppearanceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CURSED_ITEM_CAP)
    }
}

impl AppearanceResolver {
    /// Creates a resolver letting at most `cursed_item_cap` cursed items
    /// contribute.
    #[inline]
    #[must_use]
    pub const fn new(cursed_item_cap: usize) -> Self {
        Self { cursed_item_cap }
    }

    /// Maximum number of contributing cursed items.
    #[inline]
    #[must_use]
    pub const fn cursed_item_cap(&self) -> usize {
        self.cursed_item_cap
    }

    /// Resolves the sources and publishes the result to `store`.
    ///
    /// # Errors
    ///
    /// Returns `PlayerDataUnavailable` when the player cannot be read; the
    /// previously published state is left in place.
    pub fn resolve(
        &self,
        sources: &WardrobeSources,
        collaborators: &Collaborators,
        store: &AppearanceStore,
    ) -> WardrobeResult<Arc<AppearanceState>> {
        self.publish(self.compute(sources), collaborators, store)
    }

    /// Refreshes the status overlay and publishes an already computed state.
    ///
    /// # Errors
    ///
    /// Returns `PlayerDataUnavailable` when the player cannot be read; `state`
    /// is dropped and the previously published state is left in place.
    pub fn publish(
        &self,
        state: AppearanceState,
        collaborators: &Collaborators,
        store: &AppearanceStore,
    ) -> WardrobeResult<Arc<AppearanceState>> {
        if !collaborators.player.is_player_available() {
            tracing::warn!("player data unavailable, keeping previous appearance");
            return Err(WardrobeError::PlayerDataUnavailable);
        }

        let shown = collaborators.overlay.refresh_statuses();
        tracing::trace!(shown = shown.len(), expected = state.expected_statuses.len(), "refreshed status overlay");

        let published = store.publish(state);
        tracing::debug!(
            version = store.version(),
            items = published.items.len(),
            meta = ?published.meta,
            statuses = published.expected_statuses.len(),
            "published appearance"
        );
        Ok(published)
    }

    /// Merges every source into a fresh state. Deterministic.
    #[must_use]
    pub fn compute(&self, sources: &WardrobeSources) -> AppearanceState {
        let mut state = AppearanceState::default();

        // 1. Restraint set
        if sources.permissions.restraint_set_auto_equip {
            if let Some(set) = sources.restraints.active() {
                for draw in set.applied_items() {
                    write(&mut state, *draw);
                }
                state.expected_statuses.extend(set.status_ids());
            }
        }

        // 2. Gag layers. Meta is replaced by each contributing gag, so an
        //    outer gag without forced meta clears an inner gag's meta.
        if sources.permissions.item_auto_equip {
            for (layer, slot) in sources.gags.worn() {
                let Some(data) = sources.gags.draw_data(slot.gag) else {
                    tracing::debug!(?layer, gag = ?slot.gag, "no draw data for worn gag");
                    continue;
                };
                if !data.is_auto_equipped() {
                    continue;
                }
                write(&mut state, data.draw);
                state.expected_statuses.extend(data.status_ids());
                state.meta = data.meta();
            }
        }

        // 3. Blindfold
        if sources.permissions.is_blindfolded {
            let draw = sources.blindfold.draw_data();
            state.items.insert(draw.slot, draw);
        }

        // 4. Cursed items
        for (item, draw) in self.cursed_winners(sources).into_values() {
            write(&mut state, draw);
            if let Some(status) = &item.status {
                state.expected_statuses.extend(status.expand());
            }
        }

        state
    }

    /// Per-slot winners among the earliest `cursed_item_cap` active items.
    fn cursed_winners<'a>(
        &self,
        sources: &'a WardrobeSources,
    ) -> BTreeMap<EquipSlot, (&'a CursedItem, DrawData)> {
        let mut winners: BTreeMap<EquipSlot, (&CursedItem, DrawData)> = BTreeMap::new();

        for challenger in sources
            .cursed
            .active_by_time()
            .into_iter()
            .take(self.cursed_item_cap)
        {
            let draw = match &challenger.kind {
                CursedKind::Equip(draw) => *draw,
                CursedKind::Gag(gag) => match sources.gags.draw_data(*gag) {
                    Some(data) => data.draw,
                    None => {
                        tracing::debug!(item = %challenger.name, ?gag, "cursed gag has no draw data");
                        continue;
                    }
                },
            };

            let displaces = winners
                .get(&draw.slot)
                .map_or(true, |(incumbent, _)| incumbent.yields_to(challenger));
            if displaces {
                winners.insert(draw.slot, (challenger, draw));
            }
        }

        winners
    }
}

/// Writes one entry, dropping disabled-nothing placeholders.
fn write(state: &mut AppearanceState, draw: DrawData) {
    if !draw.is_disabled_nothing() {
        state.items.insert(draw.slot, draw);
    }
}
