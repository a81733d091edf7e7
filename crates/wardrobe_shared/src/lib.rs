//! # Wardrobe Shared
//!
//! Appearance data model shared by the engine, its collaborators and its tests.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - an async runtime
//! - collaborator traits (visual layering, status overlay, persistence)
//!
//! It describes WHAT the avatar can wear. Deciding what it DOES wear lives in
//! `wardrobe_engine`.
//!
//! ## Sources at a Glance
//!
//! ```text
//! RestraintSet ──┐
//! GagSlot x3   ──┼──> (resolver) ──> AppearanceState
//! Blindfold    ──┤
//! CursedItem   ──┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actor;
pub mod constants;
pub mod cursed;
pub mod gag;
pub mod hardcore;
pub mod lock;
pub mod meta;
pub mod restraint;
pub mod slot;
pub mod status;

pub use actor::ActorId;
pub use constants::{
    DEFAULT_CURSED_ITEM_CAP, GAG_LAYER_COUNT, REDRAW_INITIAL_DELAY_MS, REDRAW_MAX_DELAY_MS,
};
pub use cursed::{CursedId, CursedItem, CursedKind};
pub use gag::{GagDrawData, GagLayer, GagSlot, GagType, ProfileId};
pub use hardcore::HardcoreTraits;
pub use lock::{LockKind, LockRequest, LockState};
pub use meta::MetaFlags;
pub use restraint::{ModAssociation, ModId, RestraintSet, SetId};
pub use slot::{DrawData, EquipItem, EquipSlot, ItemId, StainId};
pub use status::{StatusAssociation, StatusEffectId};
