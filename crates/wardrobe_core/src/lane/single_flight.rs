//! # Single-Flight Critical Section
//!
//! Exactly one body runs at a time per session. Entering first pre-empts any
//! redraw wait the current holder may be stalled in, then queues on the gate.
//!
//! Nesting `run_exclusive` inside a body deadlocks. Callers compose inner,
//! non-locking steps instead.
//!
//! A panicking body is contained: the panic is logged, counted as a failure
//! and handed back as a [`SectionPanic`] converted into the caller's error.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::Mutex;

use super::redraw::RedrawWaiter;

/// A critical-section body panicked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("critical section `{label}` panicked: {message}")]
pub struct SectionPanic {
    /// Label the body ran under.
    pub label: &'static str,
    /// Panic payload, if it was a string.
    pub message: String,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Counters for the lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SingleFlightStats {
    /// Bodies that started.
    pub entered: u64,
    /// Bodies that returned `Ok`.
    pub completed: u64,
    /// Bodies that returned `Err`.
    pub failed: u64,
}

/// Session-wide single-flight lane.
pub struct SingleFlight {
    /// Held for the whole body.
    gate: Mutex<()>,
    /// Waiter whose in-flight wait is pre-empted on every entry.
    waiter: Arc<RedrawWaiter>,
    entered: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl SingleFlight {
    /// Creates a lane pre-empting waits on `waiter`.
    #[must_use]
    pub fn new(waiter: Arc<RedrawWaiter>) -> Self {
        Self {
            gate: Mutex::new(()),
            waiter,
            entered: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Returns the waiter bodies should use for redraw waits.
    #[inline]
    #[must_use]
    pub fn waiter(&self) -> &Arc<RedrawWaiter> {
        &self.waiter
    }

    /// Returns true while a body is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate.try_lock().is_err()
    }

    /// Returns the lane counters.
    #[must_use]
    pub fn stats(&self) -> SingleFlightStats {
        SingleFlightStats {
            entered: self.entered.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Runs `action` inside the critical section.
    ///
    /// 1. Cancels any in-flight redraw wait (pre-emption).
    /// 2. Waits for the previous body to exit.
    /// 3. Runs the body. An `Err` or a panic is logged here and handed back
    ///    as a value; the gate is released on every path.
    ///
    /// # Errors
    ///
    /// Returns whatever error the body returned, after logging it, or a
    /// [`SectionPanic`] converted into `E` if the body panicked.
    pub async fn run_exclusive<T, E, Fut>(&self, label: &'static str, action: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display + From<SectionPanic>,
    {
        self.waiter.cancel_pending();

        let _gate = self.gate.lock().await;
        self.entered.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(operation = label, "entered critical section");

        let result = match AssertUnwindSafe(action).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let panic = SectionPanic {
                    label,
                    message: panic_message(payload.as_ref()),
                };
                tracing::error!(operation = label, message = %panic.message, "critical section panicked");
                self.failed.fetch_add(1, Ordering::Relaxed);
                return Err(panic.into());
            }
        };
        match &result {
            Ok(_) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(operation = label, %error, "critical section ended with an error");
            }
        }
        result
    }
}

impl fmt::Debug for SingleFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlight")
            .field("busy", &self.is_busy())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::redraw::{BackoffConfig, WaitOutcome};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Body(String),
        Panicked(SectionPanic),
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Body(reason) => f.write_str(reason),
                Self::Panicked(panic) => write!(f, "{panic}"),
            }
        }
    }

    impl From<SectionPanic> for TestError {
        fn from(panic: SectionPanic) -> Self {
            Self::Panicked(panic)
        }
    }

    fn lane(busy: bool) -> Arc<SingleFlight> {
        let waiter = RedrawWaiter::new(Arc::new(move || busy), BackoffConfig::default());
        Arc::new(SingleFlight::new(Arc::new(waiter)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_bodies_never_overlap() {
        let lane = lane(false);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let lane = Arc::clone(&lane);
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                let runs = Arc::clone(&runs);
                tokio::spawn(async move {
                    lane.run_exclusive("count", async {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5 + i)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        runs.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, TestError>(())
                    })
                    .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 8);
        assert_eq!(lane.stats().entered, 8);
        assert_eq!(lane.stats().completed, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_releases_gate() {
        let lane = lane(false);

        let failed: Result<(), TestError> = lane
            .run_exclusive("fail", async { Err(TestError::Body("collaborator exploded".into())) })
            .await;
        assert!(failed.is_err());
        assert!(!lane.is_busy());

        let ok: Result<u32, TestError> = lane.run_exclusive("ok", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let stats = lane.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_body_is_contained() {
        let lane = lane(false);

        let panicked: Result<(), TestError> = lane
            .run_exclusive("explode", async {
                if lane.stats().entered > 0 {
                    panic!("apply_appearance blew up");
                }
                Ok(())
            })
            .await;

        assert_eq!(
            panicked,
            Err(TestError::Panicked(SectionPanic {
                label: "explode",
                message: "apply_appearance blew up".into(),
            }))
        );
        assert!(!lane.is_busy());

        let next: Result<u32, TestError> = lane.run_exclusive("next", async { Ok(1) }).await;
        assert_eq!(next, Ok(1));

        let stats = lane.stats();
        assert_eq!(stats.entered, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_panic_message_formats() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&7_u32), "non-string panic payload");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_preempts_stalled_wait() {
        // Redraw never finishes: without pre-emption the first body would
        // hold the gate for the full 2540ms schedule.
        let lane = lane(true);

        let first = {
            let lane = Arc::clone(&lane);
            tokio::spawn(async move {
                let waiter = Arc::clone(lane.waiter());
                lane.run_exclusive("stalled", async move {
                    Ok::<_, TestError>(waiter.await_redraw_idle().await)
                })
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        let start = Instant::now();
        let second: Result<(), TestError> = lane.run_exclusive("next", async { Ok(()) }).await;

        assert!(second.is_ok());
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(first.await.unwrap(), Ok(WaitOutcome::Cancelled));
    }
}
