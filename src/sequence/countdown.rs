use crate::config::model::CountDirection;

// Absorbs float drift so that `start + n` reads as exactly `n` elapsed seconds.
const SECOND_EPS: f64 = 1e-9;

/// Countdown of `total` whole seconds, recomputed from the clock on every observation.
///
/// The elapsed count is a high-water mark: it never decreases, never exceeds `total`,
/// and ignores non-finite readings.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedCountdown {
    total: u32,
    start: Option<f64>,
    elapsed: u32,
}

impl TimedCountdown {
    /// Countdown that starts counting once [`TimedCountdown::begin`] is called.
    pub fn new(total: u32) -> Self {
        Self {
            total,
            start: None,
            elapsed: 0,
        }
    }

    /// Anchor the countdown at `now`. Later calls are ignored.
    pub fn begin(&mut self, now: f64) {
        if self.start.is_none() && now.is_finite() {
            self.start = Some(now);
        }
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Fold a clock reading in and return the whole seconds elapsed.
    pub fn observe(&mut self, now: f64) -> u32 {
        let Some(start) = self.start else {
            return self.elapsed;
        };
        let raw = now - start;
        if !raw.is_finite() {
            return self.elapsed;
        }
        let whole = (raw + SECOND_EPS).floor().clamp(0.0, f64::from(self.total)) as u32;
        self.elapsed = self.elapsed.max(whole);
        self.elapsed
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn remaining(&self) -> u32 {
        self.total - self.elapsed
    }

    /// Value to display for the given direction; always within `[0, total]`.
    pub fn display(&self, direction: CountDirection) -> u32 {
        match direction {
            CountDirection::Down => self.remaining(),
            CountDirection::Up => self.elapsed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/countdown.rs"]
mod tests;
