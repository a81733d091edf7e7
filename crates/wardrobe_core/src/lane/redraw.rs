//! # Redraw Completion Waiter
//!
//! The visual engine redraws asynchronously and only exposes a "redraw in
//! progress" flag. Applying appearance mid-redraw races with it, so the lane
//! polls the flag with exponential backoff:
//!
//! ```text
//! sleep 20 → 40 → 80 → 160 → 320 → 640 → 1280 → give up (2540ms total)
//! ```
//!
//! Waits are latest-wins: each new wait (and each lane entry) bumps a
//! generation on a `watch` slot, and any older wait still sleeping returns
//! [`WaitOutcome::Cancelled`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Default first sleep.
const INITIAL_DELAY_MS: u64 = 20;

/// Default backoff ceiling.
const MAX_DELAY_MS: u64 = 1280;

/// Reports whether an external redraw is currently running.
///
/// Any `Fn() -> bool` closure is a probe, which lets tests simulate arbitrary
/// busy durations.
pub trait RedrawProbe: Send + Sync {
    /// Returns true while a forced redraw is in progress.
    fn redraw_in_progress(&self) -> bool;
}

impl<F> RedrawProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn redraw_in_progress(&self) -> bool {
        self()
    }
}

/// Backoff schedule for the waiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffConfig {
    /// First sleep.
    pub initial_delay: Duration,
    /// Largest single sleep; the wait ends once the next step would exceed it.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }
}

impl BackoffConfig {
    /// Creates a schedule from millisecond values.
    #[must_use]
    pub const fn from_millis(initial_ms: u64, max_ms: u64) -> Self {
        Self {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
        }
    }

    /// Iterates over the sleeps of one full wait.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let max = self.max_delay;
        let first = (!self.initial_delay.is_zero() && self.initial_delay <= max)
            .then_some(self.initial_delay);
        std::iter::successors(first, move |delay| {
            let next = delay.saturating_mul(2);
            (next <= max).then_some(next)
        })
    }

    /// Longest time a wait can take before timing out.
    #[must_use]
    pub fn total_budget(&self) -> Duration {
        self.delays().sum()
    }
}

/// How a wait ended. Every outcome means "proceed with applying".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// No redraw was (or is any longer) in progress.
    Idle,
    /// A newer wait or a new lane entry superseded this one.
    Cancelled,
    /// The redraw flag outlived the whole backoff schedule.
    TimedOut,
}

/// Bounded, cancellable waiter on the external redraw flag.
pub struct RedrawWaiter {
    /// Externally owned busy flag.
    probe: Arc<dyn RedrawProbe>,
    /// Backoff schedule.
    config: BackoffConfig,
    /// Capacity-1, latest-wins slot; bumping it supersedes every older wait.
    generation: watch::Sender<u64>,
}

impl RedrawWaiter {
    /// Creates a waiter polling `probe` on the given schedule.
    #[must_use]
    pub fn new(probe: Arc<dyn RedrawProbe>, config: BackoffConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            probe,
            config,
            generation,
        }
    }

    /// Returns the backoff schedule.
    #[inline]
    #[must_use]
    pub fn config(&self) -> BackoffConfig {
        self.config
    }

    /// Returns true if the probe currently reports a redraw.
    #[inline]
    #[must_use]
    pub fn is_redraw_in_progress(&self) -> bool {
        self.probe.redraw_in_progress()
    }

    /// Supersedes any wait currently in flight.
    pub fn cancel_pending(&self) {
        self.generation.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    /// Waits until no external redraw is in progress.
    ///
    /// Cancels any older wait first. Returns immediately when the probe is
    /// idle; otherwise polls on the backoff schedule and gives up with
    /// [`WaitOutcome::TimedOut`] when the schedule runs out.
    pub async fn await_redraw_idle(&self) -> WaitOutcome {
        self.cancel_pending();

        if !self.probe.redraw_in_progress() {
            return WaitOutcome::Idle;
        }

        // Subscribing marks the current generation as seen: only a later
        // bump wakes `changed()`.
        let mut superseded = self.generation.subscribe();
        let mut waited = Duration::ZERO;

        for delay in self.config.delays() {
            tokio::select! {
                biased;
                _ = superseded.changed() => {
                    tracing::debug!(waited_ms = waited.as_millis(), "redraw wait superseded");
                    return WaitOutcome::Cancelled;
                }
                () = tokio::time::sleep(delay) => {}
            }
            waited += delay;

            if !self.probe.redraw_in_progress() {
                tracing::trace!(waited_ms = waited.as_millis(), "redraw finished");
                return WaitOutcome::Idle;
            }
        }

        tracing::warn!(
            waited_ms = waited.as_millis(),
            "redraw still in progress after backoff ceiling, applying anyway"
        );
        WaitOutcome::TimedOut
    }
}

impl std::fmt::Debug for RedrawWaiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawWaiter")
            .field("config", &self.config)
            .field("generation", &*self.generation.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_default_schedule() {
        let config = BackoffConfig::default();
        let delays: Vec<u64> = config
            .delays()
            .map(|d| u64::try_from(d.as_millis()).unwrap())
            .collect();

        assert_eq!(delays, vec![20, 40, 80, 160, 320, 640, 1280]);
        assert_eq!(config.total_budget(), Duration::from_millis(2540));
    }

    #[test]
    fn test_degenerate_schedule_is_empty() {
        assert_eq!(BackoffConfig::from_millis(0, 1280).delays().count(), 0);
        assert_eq!(BackoffConfig::from_millis(50, 10).delays().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_returns_immediately() {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polls);
        let waiter = RedrawWaiter::new(
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            }),
            BackoffConfig::default(),
        );

        let start = Instant::now();
        assert_eq!(waiter.await_redraw_idle().await, WaitOutcome::Idle);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(polls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_until_redraw_clears() {
        let busy_until = Instant::now() + Duration::from_millis(100);
        let waiter = RedrawWaiter::new(
            Arc::new(move || Instant::now() < busy_until),
            BackoffConfig::default(),
        );

        let start = Instant::now();
        assert_eq!(waiter.await_redraw_idle().await, WaitOutcome::Idle);

        // 20 + 40 + 80 = 140ms is the first poll past the 100ms redraw.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(140), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_clearing_flag_times_out_within_budget() {
        let waiter = RedrawWaiter::new(Arc::new(|| true), BackoffConfig::default());

        let start = Instant::now();
        assert_eq!(waiter.await_redraw_idle().await, WaitOutcome::TimedOut);

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2540), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2600), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_supersedes_stalled_wait() {
        let waiter = Arc::new(RedrawWaiter::new(Arc::new(|| true), BackoffConfig::default()));

        let stalled = {
            let waiter = Arc::clone(&waiter);
            tokio::spawn(async move { waiter.await_redraw_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        let start = Instant::now();
        waiter.cancel_pending();

        assert_eq!(stalled.await.unwrap(), WaitOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_wait_cancels_older_one() {
        let waiter = Arc::new(RedrawWaiter::new(Arc::new(|| true), BackoffConfig::from_millis(10, 40)));

        let older = {
            let waiter = Arc::clone(&waiter);
            tokio::spawn(async move { waiter.await_redraw_idle().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        // The newer wait runs its full (short) schedule; the older one is gone.
        assert_eq!(waiter.await_redraw_idle().await, WaitOutcome::TimedOut);
        assert_eq!(older.await.unwrap(), WaitOutcome::Cancelled);
    }
}
