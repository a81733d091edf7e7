//! # Resolver Benchmark
//!
//! Resolution runs inside the single-flight lane on every mutation, so it
//! has to stay well under a frame even with every source populated.
//!
//! Run with: `cargo bench --package wardrobe_engine`

// Benchmarks don't need strict docs
#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use wardrobe_engine::{AppearanceResolver, WardrobeSources};
use wardrobe_shared::{
    CursedItem, CursedKind, DrawData, EquipItem, EquipSlot, GagDrawData, GagLayer, GagSlot,
    GagType, RestraintSet, StatusAssociation, StatusEffectId,
};

/// Every source populated: an active set on all slots, three gags, and
/// `cursed` active cursed items competing for the slots.
fn loaded_sources(cursed: usize) -> WardrobeSources {
    let mut sources = WardrobeSources::default();

    let mut set = RestraintSet::new("Full");
    for slot in EquipSlot::ALL {
        set = set.with_item(DrawData::new(slot, EquipItem::new(1000 + slot.index())));
    }
    set = set.with_status(StatusAssociation::Preset {
        id: uuid::Uuid::new_v4(),
        statuses: (0..8).map(|_| StatusEffectId::new()).collect(),
    });
    set.enabled = true;
    sources.restraints.insert(set);

    for (layer, gag) in GagLayer::ALL
        .into_iter()
        .zip([GagType::BallGag, GagType::ClothWrap, GagType::Muzzle])
    {
        let mut data = GagDrawData::new(DrawData::new(EquipSlot::Head, EquipItem::new(2000)));
        data.force_headgear = layer == GagLayer::Over;
        sources.gags.set_draw_data(gag, data);
        *sources.gags.slot_mut(layer) = GagSlot { gag, assigner: None };
    }

    for i in 0..cursed {
        let slot = EquipSlot::ALL[i % EquipSlot::ALL.len()];
        let draw = DrawData::new(slot, EquipItem::new(3000));
        let precedence = i32::try_from(i % 7).unwrap_or_default();
        let mut item = CursedItem::new(format!("C{i}"), CursedKind::Equip(draw))
            .with_precedence(precedence, i % 2 == 0);
        let secs = i64::try_from(i).unwrap_or_default();
        item.applied_time = Utc.timestamp_opt(secs, 0).single();
        sources.cursed.insert(item);
    }

    sources
}

/// Benchmark: full resolution by cursed pool size.
fn bench_compute(c: &mut Criterion) {
    let resolver = AppearanceResolver::default();
    let mut group = c.benchmark_group("resolve_compute");

    for cursed in [0, 6, 64, 512] {
        let sources = loaded_sources(cursed);
        group.bench_with_input(BenchmarkId::from_parameter(cursed), &sources, |b, sources| {
            b.iter(|| black_box(resolver.compute(black_box(sources))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
