//! # Wardrobe Core
//!
//! Concurrency primitives for the appearance engine:
//! - Snapshots published whole, never field by field
//! - At most one resolve/apply cycle in flight per session
//! - Bounded waiting on an external redraw the engine cannot await
//!
//! ## Architecture Rules
//!
//! 1. **No process-wide statics** - every primitive is a field of a session
//! 2. **Readers never block writers for long** - a publish is one `Arc` swap
//! 3. **Waiting is advisory** - every wait outcome means "proceed"
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wardrobe_core::{BackoffConfig, RedrawWaiter, SingleFlight};
//!
//! let waiter = Arc::new(RedrawWaiter::new(Arc::new(|| false), BackoffConfig::default()));
//! let lane = SingleFlight::new(waiter);
//! lane.run_exclusive("refresh", async { Ok::<_, String>(()) }).await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod lane;
pub mod sync;

pub use lane::{
    BackoffConfig, RedrawProbe, RedrawWaiter, SectionPanic, SingleFlight, SingleFlightStats,
    WaitOutcome,
};
pub use sync::SnapshotCell;
