//! # Wardrobe
//!
//! Host-facing crate. Re-exports the three units and owns logging setup.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                              WARDROBE                              │
//! ├────────────────────────────────────────────────────────────────────┤
//! │                                                                    │
//! │  ┌────────────────┐    ┌────────────────────┐    ┌──────────────┐  │
//! │  │ wardrobe_shared│───>│  wardrobe_engine   │<───│ wardrobe_core│  │
//! │  │                │    │                    │    │              │  │
//! │  │ • Sets, locks  │    │ • Sources          │    │ • Snapshot   │  │
//! │  │ • Gags, cursed │    │ • Resolver         │    │ • Redraw wait│  │
//! │  │ • Slots, meta  │    │ • Operations       │    │ • Lane       │  │
//! │  └────────────────┘    │ • Effects          │    └──────────────┘  │
//! │                        └─────────┬──────────┘                      │
//! │                                  │                                 │
//! │                                  v                                 │
//! │                     host collaborators (traits)                    │
//! │                                                                    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `logging`: subscriber setup for binaries and hosts
//! - `scenario`: the reference scenario against mock collaborators

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod logging;
pub mod scenario;

// Re-export the units
pub use wardrobe_core as core;
pub use wardrobe_engine as engine;
pub use wardrobe_shared as shared;

// Re-export commonly used types
pub use logging::{init_logging, LogConfig, LogFormat};
pub use scenario::{ReferenceScenario, StepResult};
pub use wardrobe_engine::{
    Collaborators, Effect, EffectReceiver, EngineConfig, MutationOutcome, Wardrobe,
    WardrobeError, WardrobeSources,
};
