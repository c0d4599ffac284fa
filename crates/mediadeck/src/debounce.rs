//! Trailing-edge debounce timer
//!
//! An explicit cancellable timer: `schedule` (re)starts the quiet window,
//! `cancel` clears it, and `poll` fires at most once when the window has
//! elapsed with no further scheduling. Designed to be driven from a tick
//! loop rather than a timer thread.

use std::time::{Duration, Instant};

/// A trailing-edge debounce window
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet window
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Start (or restart) the quiet window
    ///
    /// A pending fire is discarded; the window begins again from now.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Cancel any pending fire
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a fire is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Check whether the window has elapsed; fires at most once per schedule
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time until the pending fire, if any (for tick-loop timeout sizing)
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_does_not_fire_before_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule();
        assert!(!debouncer.poll());
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_fires_once_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule();
        sleep(Duration::from_millis(20));

        assert!(debouncer.poll());
        // Already fired; does not fire again
        assert!(!debouncer.poll());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reschedule_restarts_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(40));
        debouncer.schedule();
        sleep(Duration::from_millis(25));

        // A "keystroke" inside the window pushes the deadline out
        debouncer.schedule();
        sleep(Duration::from_millis(25));
        assert!(!debouncer.poll());

        sleep(Duration::from_millis(25));
        assert!(debouncer.poll());
    }

    #[test]
    fn test_cancel_discards_pending_fire() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule();
        debouncer.cancel();
        sleep(Duration::from_millis(20));

        assert!(!debouncer.poll());
    }

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(1));
        sleep(Duration::from_millis(5));
        assert!(!debouncer.poll());
        assert_eq!(debouncer.time_remaining(), None);
    }
}
