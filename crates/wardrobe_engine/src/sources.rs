//! # Source Providers
//!
//! Everything the resolver reads. Sources are owned by the session and only
//! mutated from inside the single-flight lane.

use std::collections::HashMap;

use wardrobe_shared::{
    ActorId, CursedId, CursedItem, GagDrawData, GagLayer, GagSlot, GagType, HardcoreTraits,
    RestraintSet, SetId, GAG_LAYER_COUNT,
};

use crate::config::BlindfoldConfig;

// ============================================================================
// RESTRAINTS
// ============================================================================

/// Hardcore traits currently in force.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTraits {
    /// Set that enabled them.
    pub set: SetId,
    /// Actor the traits were configured for.
    pub enabler: ActorId,
    /// The traits.
    pub traits: HardcoreTraits,
}

/// Owned restraint sets.
#[derive(Clone, Debug, Default)]
pub struct RestraintStorage {
    sets: Vec<RestraintSet>,
    active_traits: Option<ActiveTraits>,
}

impl RestraintStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces by id) a set.
    pub fn insert(&mut self, set: RestraintSet) {
        match self.sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => *existing = set,
            None => self.sets.push(set),
        }
    }

    /// Looks up a set.
    #[must_use]
    pub fn get(&self, id: SetId) -> Option<&RestraintSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// Looks up a set mutably.
    pub fn get_mut(&mut self, id: SetId) -> Option<&mut RestraintSet> {
        self.sets.iter_mut().find(|s| s.id == id)
    }

    /// The enabled set, if any.
    #[must_use]
    pub fn active(&self) -> Option<&RestraintSet> {
        self.sets.iter().find(|s| s.enabled)
    }

    /// All sets in insertion order.
    #[must_use]
    pub fn sets(&self) -> &[RestraintSet] {
        &self.sets
    }

    /// Number of enabled sets. Never more than one.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.sets.iter().filter(|s| s.enabled).count()
    }

    /// Hardcore traits in force.
    #[must_use]
    pub fn active_traits(&self) -> Option<&ActiveTraits> {
        self.active_traits.as_ref()
    }

    pub(crate) fn set_active_traits(&mut self, traits: Option<ActiveTraits>) -> Option<ActiveTraits> {
        std::mem::replace(&mut self.active_traits, traits)
    }
}

// ============================================================================
// GAGS
// ============================================================================

/// Three gag layers plus the appearance data of every gag type.
#[derive(Clone, Debug, Default)]
pub struct GagStorage {
    layers: [GagSlot; GAG_LAYER_COUNT],
    draw_data: HashMap<GagType, GagDrawData>,
}

impl GagStorage {
    /// Creates storage with every layer empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the appearance of a gag type.
    pub fn set_draw_data(&mut self, gag: GagType, data: GagDrawData) {
        self.draw_data.insert(gag, data);
    }

    /// Appearance of a gag type.
    #[must_use]
    pub fn draw_data(&self, gag: GagType) -> Option<&GagDrawData> {
        self.draw_data.get(&gag)
    }

    /// Contents of one layer.
    #[inline]
    #[must_use]
    pub fn slot(&self, layer: GagLayer) -> &GagSlot {
        &self.layers[layer.index()]
    }

    /// Contents of one layer, mutably. Used when restoring saved layers.
    pub fn slot_mut(&mut self, layer: GagLayer) -> &mut GagSlot {
        &mut self.layers[layer.index()]
    }

    /// Occupied layers, lowest first.
    pub fn worn(&self) -> impl Iterator<Item = (GagLayer, &GagSlot)> {
        GagLayer::ALL
            .into_iter()
            .map(|layer| (layer, self.slot(layer)))
            .filter(|(_, slot)| !slot.is_empty())
    }

    /// Lowest empty layer.
    #[must_use]
    pub fn first_free_layer(&self) -> Option<GagLayer> {
        GagLayer::ALL.into_iter().find(|&layer| self.slot(layer).is_empty())
    }
}

// ============================================================================
// CURSED LOOT
// ============================================================================

/// Cursed item pool.
#[derive(Clone, Debug, Default)]
pub struct CursedLootStorage {
    items: Vec<CursedItem>,
}

impl CursedLootStorage {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces by id) an item.
    pub fn insert(&mut self, item: CursedItem) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Looks up an item.
    #[must_use]
    pub fn get(&self, id: CursedId) -> Option<&CursedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: CursedId) -> Option<&mut CursedItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Every item, active or not.
    #[must_use]
    pub fn items(&self) -> &[CursedItem] {
        &self.items
    }

    /// Active items ordered by application time, earliest first.
    ///
    /// The sort is stable, so items applied at the same instant keep pool
    /// order.
    #[must_use]
    pub fn active_by_time(&self) -> Vec<&CursedItem> {
        let mut active: Vec<&CursedItem> = self.items.iter().filter(|i| i.is_active()).collect();
        active.sort_by_key(|i| i.applied_time);
        active
    }
}

// ============================================================================
// GLOBAL
// ============================================================================

/// Runtime permission flags owned by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalPermissions {
    /// Blindfold forced on.
    pub is_blindfolded: bool,
    /// Gags (and cursed gags) may change the appearance.
    pub item_auto_equip: bool,
    /// Restraint sets may change the appearance.
    pub restraint_set_auto_equip: bool,
}

impl Default for GlobalPermissions {
    fn default() -> Self {
        Self {
            is_blindfolded: false,
            item_auto_equip: true,
            restraint_set_auto_equip: true,
        }
    }
}

/// Every source the resolver reads, owned by one session.
#[derive(Clone, Debug, Default)]
pub struct WardrobeSources {
    /// Restraint sets.
    pub restraints: RestraintStorage,
    /// Gag layers.
    pub gags: GagStorage,
    /// Cursed items.
    pub cursed: CursedLootStorage,
    /// Permission flags.
    pub permissions: GlobalPermissions,
    /// Blindfold item.
    pub blindfold: BlindfoldConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wardrobe_shared::{CursedKind, DrawData, EquipItem, EquipSlot};

    #[test]
    fn test_insert_replaces_by_id() {
        let mut storage = RestraintStorage::new();
        let set = RestraintSet::new("Rope");
        let id = set.id;

        storage.insert(set.clone());
        let mut renamed = set;
        renamed.name = "Leather".into();
        storage.insert(renamed);

        assert_eq!(storage.sets().len(), 1);
        assert_eq!(storage.get(id).unwrap().name, "Leather");
        assert!(storage.active().is_none());
    }

    #[test]
    fn test_first_free_layer() {
        let mut gags = GagStorage::new();
        assert_eq!(gags.first_free_layer(), Some(GagLayer::Under));

        gags.slot_mut(GagLayer::Under).gag = GagType::BallGag;
        gags.slot_mut(GagLayer::Over).gag = GagType::Muzzle;
        assert_eq!(gags.first_free_layer(), Some(GagLayer::Middle));
        assert_eq!(gags.worn().count(), 2);

        gags.slot_mut(GagLayer::Middle).gag = GagType::ClothWrap;
        assert_eq!(gags.first_free_layer(), None);
    }

    #[test]
    fn test_active_by_time_is_stable() {
        let at = |s| Utc.timestamp_opt(s, 0).unwrap();
        let equip = CursedKind::Equip(DrawData::new(EquipSlot::Head, EquipItem::new(1)));

        let mut pool = CursedLootStorage::new();
        let mut late = CursedItem::new("late", equip.clone());
        late.applied_time = Some(at(20));
        let mut first_tie = CursedItem::new("tie-a", equip.clone());
        first_tie.applied_time = Some(at(10));
        let mut second_tie = CursedItem::new("tie-b", equip.clone());
        second_tie.applied_time = Some(at(10));
        let idle = CursedItem::new("idle", equip);

        for item in [late, first_tie, second_tie, idle] {
            pool.insert(item);
        }

        let names: Vec<_> = pool.active_by_time().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["tie-a", "tie-b", "late"]);
    }
}
