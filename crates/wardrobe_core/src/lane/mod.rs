//! # The Applier Lane
//!
//! One lane per session. Every state-mutating operation funnels through it.
//!
//! ```text
//!   op A ──┐                         ┌──────────────────────────────┐
//!   op B ──┼──> cancel_pending() ──> │ gate (async mutex, 1 holder) │ ──> body
//!   op C ──┘     (latest wins)       └──────────────────────────────┘
//!                     │
//!                     ▼
//!          RedrawWaiter generation++  ──> a stalled wait in the body
//!                                         returns Cancelled and proceeds
//! ```
//!
//! Entering the lane never aborts a running body. It only shortens a wait the
//! current holder may be stuck in, so the lane frees up sooner.

mod redraw;
mod single_flight;

pub use redraw::{BackoffConfig, RedrawProbe, RedrawWaiter, WaitOutcome};
pub use single_flight::{SectionPanic, SingleFlight, SingleFlightStats};
