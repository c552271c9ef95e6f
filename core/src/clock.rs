//! Monotonic time sources injected into the world.
//!
//! Timers never read the wall clock directly. The host hands the world a
//! [`Clock`]; tests and headless replays use [`ManualClock`] so that runs are
//! reproducible, while interactive hosts use [`SystemClock`].

use std::{cell::Cell, fmt, rc::Rc, time::Duration, time::Instant};

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock: fmt::Debug {
    /// Time elapsed since the clock's origin. Never decreases.
    fn now(&self) -> Duration;
}

/// Clock that only moves when told to.
///
/// Clones share the same reading, so a host can keep one handle to advance
/// time while the world holds another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.elapsed.set(self.elapsed.get().saturating_add(dt));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}

/// Clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_handles_share_their_reading() {
        let host = ManualClock::new();
        let world = host.clone();

        host.advance(Duration::from_millis(250));
        host.advance(Duration::from_millis(250));

        assert_eq!(world.now(), Duration::from_millis(500));
    }
}
