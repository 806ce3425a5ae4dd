//! Cancellable, generation-stamped timers polled by the host loop.
//!
//! Nothing here runs on its own: the owner calls [`Debounce::poll`] with the
//! current time on each frame. Replacing or cancelling a pending value drops
//! it outright, so no stale callback can fire later.

use std::time::{Duration, Instant};

use tracing::trace;

/// Version stamp bumped whenever the data a delayed update was computed
/// against is replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
    generation: Generation,
}

/// Trailing-edge debounce: only the last scheduled value survives, and only
/// once `window` has passed since it was scheduled.
#[derive(Debug)]
pub struct Debounce<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debounce<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any pending value and restarts the window from `now`.
    pub fn schedule(&mut self, value: T, now: Instant, generation: Generation) {
        self.pending = Some(Pending {
            value,
            due: now + self.window,
            generation,
        });
    }

    /// Moves a pending value onto `generation` without touching its due
    /// time. For values that stay meaningful across a data swap.
    pub fn restamp(&mut self, generation: Generation) {
        if let Some(pending) = &mut self.pending {
            pending.generation = generation;
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Releases the pending value once it is due. A value stamped with a
    /// generation other than `current` is discarded instead.
    pub fn poll(&mut self, now: Instant, current: Generation) -> Option<T> {
        if self.pending.as_ref()?.due > now {
            return None;
        }

        let pending = self.pending.take()?;
        if pending.generation != current {
            trace!(
                stale = pending.generation.value(),
                current = current.value(),
                "dropping stale debounced update"
            );
            return None;
        }

        Some(pending.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn fires_only_after_the_window() {
        let start = Instant::now();
        let generation = Generation::default();
        let mut debounce = Debounce::new(WINDOW);

        debounce.schedule("a", start, generation);
        assert_eq!(debounce.poll(start + Duration::from_millis(299), generation), None);
        assert_eq!(debounce.poll(start + WINDOW, generation), Some("a"));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn rescheduling_restarts_the_window_and_keeps_only_the_last_value() {
        let start = Instant::now();
        let generation = Generation::default();
        let mut debounce = Debounce::new(WINDOW);

        debounce.schedule("a", start, generation);
        debounce.schedule("ab", start + Duration::from_millis(200), generation);

        assert_eq!(debounce.poll(start + Duration::from_millis(350), generation), None);
        assert_eq!(
            debounce.deadline(),
            Some(start + Duration::from_millis(500))
        );
        assert_eq!(
            debounce.poll(start + Duration::from_millis(500), generation),
            Some("ab")
        );
    }

    #[test]
    fn stale_generation_is_dropped_silently() {
        let start = Instant::now();
        let old = Generation::default();
        let mut debounce = Debounce::new(WINDOW);

        debounce.schedule("a", start, old);
        assert_eq!(debounce.poll(start + WINDOW, old.next()), None);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn restamped_value_survives_a_generation_bump_with_its_deadline() {
        let start = Instant::now();
        let old = Generation::default();
        let current = old.next();
        let mut debounce = Debounce::new(WINDOW);
        assert_eq!(debounce.window(), WINDOW);

        debounce.schedule("alp", start, old);
        debounce.restamp(current);

        assert_eq!(debounce.deadline(), Some(start + WINDOW));
        assert_eq!(debounce.poll(start + Duration::from_millis(299), current), None);
        assert_eq!(debounce.poll(start + WINDOW, current), Some("alp"));
    }

    #[test]
    fn cancel_releases_the_pending_value() {
        let start = Instant::now();
        let mut debounce = Debounce::new(WINDOW);

        debounce.schedule(1, start, Generation::default());
        assert!(debounce.cancel());
        assert_eq!(debounce.poll(start + WINDOW * 2, Generation::default()), None);
        assert!(!debounce.cancel());
    }
}
