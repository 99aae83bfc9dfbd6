//! Monotonic time sources.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond clock, the equivalent of a host's uptime clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Never decreases.
    fn uptime_millis(&self) -> u64;
}

/// Clock backed by [`Instant`], counting from its own creation.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
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
    fn uptime_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a host can keep one handle while the view
/// owns another.
///
/// ```rust
/// use gif_movie_view::{Clock, ManualClock};
///
/// let clock = ManualClock::new(100);
/// let view_clock = clock.clone();
/// clock.advance(250);
/// assert_eq!(view_clock.uptime_millis(), 350);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, millis: u64) {
        self.now.set(self.now.get().max(millis));
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn uptime_millis(&self) -> u64 {
        self.now.get()
    }
}
