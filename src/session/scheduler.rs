//! Debounced save timer.
//!
//! A single-shot deadline that every mutation pushes back; the save runs
//! once the state has been quiet for the whole interval. Time is passed in
//! by the caller so the event loop (and tests) own the clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveScheduler {
    interval: Duration,
    deadline: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer to fire `interval` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_interval() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(Duration::from_millis(250));
        scheduler.schedule(start);
        assert!(!scheduler.poll(start + Duration::from_millis(249)));
        assert!(scheduler.poll(start + Duration::from_millis(250)));
        assert!(!scheduler.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_reschedule_pushes_deadline_back() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(Duration::from_millis(250));
        scheduler.schedule(start);
        scheduler.schedule(start + Duration::from_millis(200));
        assert!(!scheduler.poll(start + Duration::from_millis(300)));
        assert!(scheduler.poll(start + Duration::from_millis(450)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(Duration::from_millis(10));
        scheduler.schedule(start);
        scheduler.cancel();
        assert!(!scheduler.is_pending());
        assert!(!scheduler.poll(start + Duration::from_secs(1)));
    }
}
