//! # Engine Constants
//!
//! Defaults baked into the engine. Every value here can be overridden
//! through `EngineConfig` except the gag layer count, which is part of the
//! data model.

// =============================================================================
// GAG LAYERS
// =============================================================================

/// Number of concurrent gag layers (under, middle, over).
pub const GAG_LAYER_COUNT: usize = 3;

// =============================================================================
// CURSED LOOT
// =============================================================================

/// Maximum number of active cursed items that contribute to appearance.
///
/// The earliest-activated items win the cap.
pub const DEFAULT_CURSED_ITEM_CAP: usize = 6;

// =============================================================================
// REDRAW BACKOFF
// =============================================================================

/// First delay while waiting for an external redraw to finish.
pub const REDRAW_INITIAL_DELAY_MS: u64 = 20;

/// Largest single backoff step. The waiter gives up once the next step
/// would exceed this (20 + 40 + ... + 1280 = 2540ms in total).
pub const REDRAW_MAX_DELAY_MS: u64 = 1280;
