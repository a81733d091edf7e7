//! # Wardrobe Engine
//!
//! Decides what the avatar wears and gets it onto the screen.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//! │  operation   │──>│ resolver │──>│ redraw wait  │──>│ apply (host) │
//! │ (preconds,   │   │ (merge + │   │ (20ms→1280ms │   │              │
//! │  mutate,     │   │  publish)│   │  backoff)    │   │              │
//! │  persist)    │   └──────────┘   └──────────────┘   └──────────────┘
//! └──────────────┘
//!        all of it inside one single-flight lane per session
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use wardrobe_engine::{EngineConfig, MockCollaborators, Wardrobe, WardrobeSources};
//!
//! let mocks = MockCollaborators::new();
//! let (wardrobe, effects) = Wardrobe::with_effect_bus(
//!     &EngineConfig::default(),
//!     WardrobeSources::default(),
//!     mocks.collaborators(),
//! )?;
//! wardrobe.refresh_appearance().await;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collaborators;
pub mod config;
pub mod effects;
pub mod error;
pub mod resolver;
pub mod sources;
pub mod state;
pub mod wardrobe;

pub use collaborators::{
    BodyProfiles, Collaborators, MockCollaborators, ModToggle, Persistence, PlayerPresence,
    StatusOverlay, VisualLayering,
};
pub use config::{BackoffSettings, BlindfoldConfig, EngineConfig};
pub use effects::{
    AchievementEvent, Effect, EffectBus, EffectReceiver, EffectSender, EffectSink, PushUpdate,
};
pub use error::{CollaboratorError, WardrobeError, WardrobeResult};
pub use resolver::AppearanceResolver;
pub use sources::{
    ActiveTraits, CursedLootStorage, GagStorage, GlobalPermissions, RestraintStorage,
    WardrobeSources,
};
pub use state::{AppearanceState, AppearanceStore};
pub use wardrobe::{MutationOutcome, Wardrobe};
