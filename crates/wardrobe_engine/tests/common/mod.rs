//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use wardrobe_engine::{
    EffectReceiver, EngineConfig, MockCollaborators, Wardrobe, WardrobeSources,
};
use wardrobe_shared::{DrawData, EquipItem, EquipSlot};

pub struct Fixture {
    pub wardrobe: Arc<Wardrobe>,
    pub mocks: MockCollaborators,
    pub effects: EffectReceiver,
}

pub fn fixture(sources: WardrobeSources) -> Fixture {
    fixture_with(&EngineConfig::default(), sources)
}

pub fn fixture_with(config: &EngineConfig, sources: WardrobeSources) -> Fixture {
    let mocks = MockCollaborators::new();
    let (wardrobe, effects) =
        Wardrobe::with_effect_bus(config, sources, mocks.collaborators()).unwrap();
    Fixture {
        wardrobe: Arc::new(wardrobe),
        mocks,
        effects,
    }
}

pub fn head(item: u32) -> DrawData {
    DrawData::new(EquipSlot::Head, EquipItem::new(item))
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}
