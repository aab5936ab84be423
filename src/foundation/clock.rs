use std::cell::Cell;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of time for the sequencer.
///
/// `now` is monotonic seconds from an arbitrary origin; `None` means the source is
/// currently unavailable and the caller must freeze instead of guessing.
pub trait Clock {
    /// Monotonic seconds.
    fn now(&self) -> Option<f64>;

    /// Wall-clock milliseconds since the Unix epoch, when known.
    fn unix_millis(&self) -> Option<i64> {
        None
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Option<f64> {
        (**self).now()
    }

    fn unix_millis(&self) -> Option<i64> {
        (**self).unix_millis()
    }
}

/// Process clock backed by [`Instant`] and [`SystemTime`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock whose origin is "now".
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
    fn now(&self) -> Option<f64> {
        Some(self.origin.elapsed().as_secs_f64())
    }

    fn unix_millis(&self) -> Option<i64> {
        let d = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        i64::try_from(d.as_millis()).ok()
    }
}

/// Controllable clock for tests and headless simulation.
///
/// Clones share the same underlying time, so a harness can keep one handle while the
/// sequencer owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    secs: Rc<Cell<Option<f64>>>,
    unix_origin_ms: i64,
}

impl ManualClock {
    /// Clock reading `secs`, with wall time pinned to the Unix epoch at `secs == 0`.
    pub fn new(secs: f64) -> Self {
        Self::with_unix_origin(secs, 0)
    }

    /// Clock reading `secs`, reporting `unix_origin_ms + secs * 1000` as wall time.
    pub fn with_unix_origin(secs: f64, unix_origin_ms: i64) -> Self {
        Self {
            secs: Rc::new(Cell::new(Some(secs))),
            unix_origin_ms,
        }
    }

    /// Jump to an absolute reading (also makes the clock available again).
    pub fn set(&self, secs: f64) {
        self.secs.set(Some(secs));
    }

    /// Move forward by `delta` seconds. No-op while unavailable.
    pub fn advance(&self, delta: f64) {
        if let Some(s) = self.secs.get() {
            self.secs.set(Some(s + delta));
        }
    }

    /// Simulate a timing source outage.
    pub fn make_unavailable(&self) {
        self.secs.set(None);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Option<f64> {
        self.secs.get()
    }

    fn unix_millis(&self) -> Option<i64> {
        let s = self.secs.get()?;
        if !s.is_finite() {
            return None;
        }
        Some(self.unix_origin_ms + (s * 1000.0).round() as i64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
