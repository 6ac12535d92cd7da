//! Process-wide id allocation for tabs and workspaces.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id source. Ids start at 1; 0 is reserved for "none".
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Hand out the next unused id.
    pub fn allocate(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an externally supplied id (session restore) so later
    /// allocations never hand it out again.
    pub fn observe(&self, id: u64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::Relaxed);
    }

    /// The id `allocate` would return next.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) static TAB_IDS: IdAllocator = IdAllocator::new();
pub(crate) static WORKSPACE_IDS: IdAllocator = IdAllocator::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_monotonic() {
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocate(), 2);
    }

    #[test]
    fn test_observe_skips_past_restored_ids() {
        let ids = IdAllocator::new();
        ids.observe(41);
        assert_eq!(ids.allocate(), 42);
        // Observing a smaller id never moves the counter backwards
        ids.observe(3);
        assert_eq!(ids.peek(), 43);
    }
}
