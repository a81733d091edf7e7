//! # Snapshot Publication
//!
//! ## The Problem
//!
//! ```text
//! Applier:  rebuilds slot map, meta flags, status set
//! Readers:  visual layering, UI, network push
//!
//! Field-by-field update: a reader can see new slots with old meta → TORN STATE
//! ```
//!
//! ## The Solution: Whole-Snapshot Swap
//!
//! ```text
//! Resolve N:
//!   Applier builds Snapshot N off to the side
//!   PUBLISH (single Arc replacement)
//!   Readers holding Snapshot N-1 keep it until they drop it
//! ```
//!
//! A reader either gets all of N-1 or all of N.

mod snapshot;

pub use snapshot::SnapshotCell;
