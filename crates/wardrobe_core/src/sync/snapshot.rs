//! # Snapshot Cell
//!
//! Holds the last published immutable snapshot.
//!
//! ```text
//!            ┌──────────────────────────┐
//!            │       SnapshotCell       │
//!            │  RwLock<Arc<T>> + version│
//!            └────────────┬─────────────┘
//!                         │
//!          ┌──────────────┼──────────────┐
//!          ▼                             ▼
//!   ┌──────────────┐             ┌──────────────┐
//!   │   publish()  │             │    load()    │
//!   │  (resolver)  │             │  (readers)   │
//!   └──────────────┘             └──────────────┘
//! ```
//!
//! The lock is only held for the pointer clone or the pointer swap, never
//! while a snapshot is being built or read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Cell publishing immutable snapshots by pointer replacement.
pub struct SnapshotCell<T> {
    /// The current snapshot.
    current: RwLock<Arc<T>>,
    /// Number of publishes since creation.
    version: AtomicU64,
}

impl<T> SnapshotCell<T> {
    /// Creates a cell holding `initial` at version 0.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            version: AtomicU64::new(0),
        }
    }

    /// Returns the current snapshot.
    ///
    /// The returned `Arc` stays valid (and unchanged) after later publishes.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the current snapshot wholesale and returns the new one.
    pub fn publish(&self, next: T) -> Arc<T> {
        let next = Arc::new(next);
        {
            let mut current = self.current.write();
            *current = Arc::clone(&next);
        }
        self.version.fetch_add(1, Ordering::AcqRel);
        next
    }

    /// Returns how many snapshots have been published.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for SnapshotCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCell")
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        left: u32,
        right: u32,
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let cell = SnapshotCell::new(Pair { left: 1, right: 1 });
        let before = cell.load();

        cell.publish(Pair { left: 2, right: 2 });

        // Old readers keep their complete snapshot.
        assert_eq!(*before, Pair { left: 1, right: 1 });
        assert_eq!(*cell.load(), Pair { left: 2, right: 2 });
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_pairs() {
        let cell = Arc::new(SnapshotCell::<Pair>::default());

        let writer = {
            let cell = Arc::clone(&cell);
            std::thread::spawn(move || {
                for i in 0..2_000 {
                    cell.publish(Pair { left: i, right: i });
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = cell.load();
                        assert_eq!(snapshot.left, snapshot.right);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(cell.version(), 2_000);
    }
}
