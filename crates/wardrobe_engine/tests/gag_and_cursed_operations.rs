//! Gag layers, cursed loot and the safeword.

mod common;

use common::{at, fixture, head};
use wardrobe_engine::{AchievementEvent, Effect, GlobalPermissions, WardrobeError, WardrobeSources};
use wardrobe_shared::{
    ActorId, CursedItem, CursedKind, DrawData, EquipItem, EquipSlot, GagDrawData, GagLayer,
    GagType, LockKind, LockRequest, MetaFlags, ModAssociation, ProfileId, RestraintSet,
    StatusAssociation, StatusEffectId,
};

fn gag_sources() -> WardrobeSources {
    let mut sources = WardrobeSources::default();

    let mut ball = GagDrawData::new(head(2));
    ball.body_profile = Some(ProfileId("jaw-open".into()));
    ball.statuses.push(StatusAssociation::Status(StatusEffectId::new()));
    sources.gags.set_draw_data(GagType::BallGag, ball);

    let mut muzzle = GagDrawData::new(head(30));
    muzzle.force_headgear = true;
    sources.gags.set_draw_data(GagType::Muzzle, muzzle);

    let neck = DrawData::new(EquipSlot::Neck, EquipItem::new(40));
    sources.gags.set_draw_data(GagType::ClothWrap, GagDrawData::new(neck));

    let mut tape = GagDrawData::new(head(50));
    tape.auto_equip = false;
    sources.gags.set_draw_data(GagType::DuctTape, tape);

    sources
}

#[tokio::test(start_paused = true)]
async fn test_apply_and_remove_gag() {
    let f = fixture(gag_sources());
    let profile = ProfileId("jaw-open".into());

    let none = f.wardrobe.apply_gag(GagLayer::Under, GagType::None, ActorId::local()).await;
    assert_eq!(none.rejection(), Some(&WardrobeError::InvalidGag(GagType::None)));

    let applied = f.wardrobe.apply_gag(GagLayer::Under, GagType::BallGag, ActorId::local()).await;
    assert!(applied.effects().contains(&Effect::Achievement(AchievementEvent::GagStateChange {
        layer: GagLayer::Under,
        gag: GagType::BallGag,
        applied: true,
        actor: ActorId::local(),
    })));
    assert_eq!(f.wardrobe.gag_on(GagLayer::Under).gag, GagType::BallGag);
    assert_eq!(f.wardrobe.appearance().item(EquipSlot::Head), Some(&head(2)));
    assert!(f.mocks.profiles.is_enabled(&profile));
    assert_eq!(f.mocks.persistence.gag_saves(), 1);

    let occupied = f.wardrobe.apply_gag(GagLayer::Under, GagType::Muzzle, ActorId::local()).await;
    assert_eq!(occupied.rejection(), Some(&WardrobeError::GagLayerOccupied(GagLayer::Under)));

    let empty = f.wardrobe.remove_gag(GagLayer::Middle, ActorId::local()).await;
    assert_eq!(empty.rejection(), Some(&WardrobeError::GagLayerEmpty(GagLayer::Middle)));

    let removed = f.wardrobe.remove_gag(GagLayer::Under, ActorId::local()).await;
    assert!(removed.is_applied());
    assert!(f.wardrobe.gag_on(GagLayer::Under).is_empty());
    assert!(f.wardrobe.appearance().items.is_empty());
    assert!(!f.mocks.profiles.is_enabled(&profile));
    assert_eq!(f.mocks.overlay.removed().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_gag_without_auto_equip_skips_pipeline() {
    let f = fixture(gag_sources());

    let outcome = f.wardrobe.apply_gag(GagLayer::Over, GagType::DuctTape, ActorId::local()).await;

    assert!(outcome.is_applied());
    assert_eq!(f.wardrobe.gag_on(GagLayer::Over).gag, GagType::DuctTape);
    assert!(f.mocks.visual.applied().is_empty());
    assert_eq!(f.wardrobe.appearance_version(), 0);

    // A later, unrelated pipeline run does not draw it either.
    let _ = f.wardrobe.refresh_appearance().await;
    assert_eq!(f.wardrobe.appearance_version(), 1);
    assert_eq!(f.wardrobe.appearance().item(EquipSlot::Head), None);

    // Global permission off: same for an auto-equipping gag.
    let permissions = GlobalPermissions {
        item_auto_equip: false,
        ..GlobalPermissions::default()
    };
    let _ = f.wardrobe.update_permissions(permissions).await;
    let applied_before = f.mocks.visual.applied().len();
    let _ = f.wardrobe.apply_gag(GagLayer::Under, GagType::BallGag, ActorId::local()).await;
    assert_eq!(f.mocks.visual.applied().len(), applied_before);
}

#[tokio::test(start_paused = true)]
async fn test_outer_gag_meta_replaces_inner() {
    let f = fixture(gag_sources());

    let _ = f.wardrobe.apply_gag(GagLayer::Under, GagType::Muzzle, ActorId::local()).await;
    assert_eq!(f.wardrobe.appearance().meta, MetaFlags::Hat);

    let _ = f.wardrobe.apply_gag(GagLayer::Over, GagType::ClothWrap, ActorId::local()).await;
    let state = f.wardrobe.appearance();
    assert_eq!(state.meta, MetaFlags::None);
    assert_eq!(state.item(EquipSlot::Head), Some(&head(30)));
    assert_eq!(state.item(EquipSlot::Neck).unwrap().item, EquipItem::new(40));
}

#[tokio::test(start_paused = true)]
async fn test_swap_gag_only_notifies_final_state() {
    let f = fixture(gag_sources());
    let bob = ActorId::new("bob");

    let empty = f.wardrobe.swap_gag(GagLayer::Middle, GagType::Muzzle, bob.clone()).await;
    assert_eq!(empty.rejection(), Some(&WardrobeError::GagLayerEmpty(GagLayer::Middle)));

    let _ = f.wardrobe.apply_gag(GagLayer::Middle, GagType::BallGag, ActorId::local()).await;
    let invalid = f.wardrobe.swap_gag(GagLayer::Middle, GagType::None, bob.clone()).await;
    assert_eq!(invalid.rejection(), Some(&WardrobeError::InvalidGag(GagType::None)));
    assert_eq!(f.wardrobe.gag_on(GagLayer::Middle).gag, GagType::BallGag);

    let swap = f.wardrobe.swap_gag(GagLayer::Middle, GagType::Muzzle, bob.clone()).await;

    assert!(swap.is_applied());
    assert!(swap
        .effects()
        .iter()
        .all(|e| !matches!(e, Effect::GagChanged { applied: false, .. })));
    assert!(swap.effects().contains(&Effect::GagChanged {
        layer: GagLayer::Middle,
        gag: GagType::Muzzle,
        applied: true,
        actor: bob.clone(),
    }));
    assert_eq!(f.wardrobe.gag_on(GagLayer::Middle).assigner, Some(bob));
    assert_eq!(f.wardrobe.appearance().item(EquipSlot::Head), Some(&head(30)));
}

#[tokio::test(start_paused = true)]
async fn test_cursed_gag_takes_lowest_free_layer() {
    let mut sources = gag_sources();
    let item = CursedItem::new("Mimic gag", CursedKind::Gag(GagType::Muzzle));
    let id = item.id;
    sources.cursed.insert(item);
    let f = fixture(sources);

    let _ = f.wardrobe.apply_gag(GagLayer::Under, GagType::BallGag, ActorId::local()).await;
    let outcome = f.wardrobe.apply_cursed_item(id, at(0)).await;

    assert!(outcome.effects().contains(&Effect::CursedItemChanged { item: id, active: true }));
    assert_eq!(f.wardrobe.gag_on(GagLayer::Middle).gag, GagType::Muzzle);
    assert_eq!(f.wardrobe.appearance().item(EquipSlot::Head), Some(&head(30)));
    assert_eq!(f.wardrobe.active_cursed_items().len(), 1);

    let again = f.wardrobe.apply_cursed_item(id, at(5)).await;
    assert_eq!(again.rejection(), Some(&WardrobeError::CursedItemActive(id)));

    // Deactivating a cursed gag leaves the gag itself on.
    let removed = f.wardrobe.remove_cursed_item(id).await;
    assert!(removed.is_applied());
    assert!(f.wardrobe.active_cursed_items().is_empty());
    assert_eq!(f.wardrobe.gag_on(GagLayer::Middle).gag, GagType::Muzzle);

    let inactive = f.wardrobe.remove_cursed_item(id).await;
    assert_eq!(inactive.rejection(), Some(&WardrobeError::CursedItemInactive(id)));
}

#[tokio::test(start_paused = true)]
async fn test_cursed_gag_rejected_when_layers_full() {
    let mut sources = gag_sources();
    let item = CursedItem::new("Mimic gag", CursedKind::Gag(GagType::Muzzle));
    let id = item.id;
    sources.cursed.insert(item);
    let f = fixture(sources);

    for (layer, gag) in [
        (GagLayer::Under, GagType::BallGag),
        (GagLayer::Middle, GagType::ClothWrap),
        (GagLayer::Over, GagType::DuctTape),
    ] {
        assert!(f.wardrobe.apply_gag(layer, gag, ActorId::local()).await.is_applied());
    }
    let cursed_saves = f.mocks.persistence.cursed_saves();

    let outcome = f.wardrobe.apply_cursed_item(id, at(0)).await;

    assert_eq!(outcome.rejection(), Some(&WardrobeError::NoFreeGagLayer));
    assert!(f.wardrobe.active_cursed_items().is_empty());
    assert_eq!(f.mocks.persistence.cursed_saves(), cursed_saves);
}

#[tokio::test(start_paused = true)]
async fn test_cursed_equip_lifecycle() {
    let status = StatusEffectId::new();
    let mut sources = WardrobeSources::default();
    let item = CursedItem::new("Cursed hood", CursedKind::Equip(head(3)))
        .with_precedence(5, true)
        .with_status(StatusAssociation::Status(status))
        .with_mod(ModAssociation::new("hood-physics", 9));
    let id = item.id;
    sources.cursed.insert(item);
    let f = fixture(sources);

    let missing = wardrobe_shared::CursedId::new();
    let unknown = f.wardrobe.apply_cursed_item(missing, at(0)).await;
    assert_eq!(unknown.rejection(), Some(&WardrobeError::CursedItemNotFound(missing)));

    let _ = f.wardrobe.apply_cursed_item(id, at(0)).await;
    let state = f.wardrobe.appearance();
    assert_eq!(state.item(EquipSlot::Head), Some(&head(3)));
    assert!(state.expected_statuses.contains(&status));
    assert_eq!(f.wardrobe.active_cursed_items()[0].applied_time, Some(at(0)));

    let _ = f.wardrobe.remove_cursed_item(id).await;
    assert!(f.wardrobe.appearance().items.is_empty());
    assert_eq!(f.mocks.overlay.removed(), vec![status]);
    let toggles: Vec<_> = f.mocks.visual.mod_toggles().iter().map(|t| (t.enabled, t.priority)).collect();
    assert_eq!(toggles, vec![(true, 9), (true, 0)]);
}

#[tokio::test(start_paused = true)]
async fn test_safeword_clears_locked_set_and_cursed_items() {
    let mut sources = gag_sources();
    let set = RestraintSet::new("Locked").with_item(DrawData::new(EquipSlot::Body, EquipItem::new(7)));
    let set_id = set.id;
    sources.restraints.insert(set);
    let hood = CursedItem::new("hood", CursedKind::Equip(head(3)));
    let gloves = CursedItem::new(
        "gloves",
        CursedKind::Equip(DrawData::new(EquipSlot::Hands, EquipItem::new(8))),
    );
    let (hood_id, gloves_id) = (hood.id, gloves.id);
    sources.cursed.insert(hood);
    sources.cursed.insert(gloves);
    let f = fixture(sources);
    let owner = ActorId::new("owner-uid");

    let _ = f.wardrobe.enable_restraint_set(set_id, owner.clone(), true).await;
    let lock = LockRequest::new(LockKind::Owner, owner.clone());
    let _ = f.wardrobe.lock_restraint_set(set_id, lock, true).await;
    let _ = f.wardrobe.apply_cursed_item(hood_id, at(0)).await;
    let _ = f.wardrobe.apply_cursed_item(gloves_id, at(1)).await;
    assert_eq!(f.wardrobe.appearance().items.len(), 3);

    let outcome = f.wardrobe.disable_all_due_to_safeword(ActorId::local()).await;

    assert!(outcome.effects().contains(&Effect::SafewordUsed { actor: ActorId::local() }));
    assert!(outcome.effects().contains(&Effect::RestraintLockChanged {
        set: set_id,
        kind: LockKind::Owner,
        locked: false,
        actor: ActorId::local(),
    }));
    assert!(f.wardrobe.active_set().is_none());
    assert!(!f.wardrobe.restraint_set(set_id).unwrap().is_locked());
    assert!(f.wardrobe.active_cursed_items().is_empty());
    assert!(f.wardrobe.appearance().items.is_empty());

    // Nothing left to clear: still applied.
    assert!(f.wardrobe.disable_all_due_to_safeword(ActorId::local()).await.is_applied());
}
