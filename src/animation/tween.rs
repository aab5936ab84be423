use crate::animation::ease::Ease;
use crate::foundation::core::{Point, lerp_point};

/// One-shot interpolation between two points on absolute time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: Point,
    pub to: Point,
    /// Time the tween was requested.
    pub start: f64,
    /// Hold at `from` for this long before moving.
    pub delay: f64,
    pub duration: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: Point, to: Point, start: f64, duration: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            delay: 0.0,
            duration: duration.max(0.0),
            ease,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Absolute time at which the tween rests at `to`.
    pub fn end_time(&self) -> f64 {
        self.start + self.delay + self.duration
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f64 {
        let local = now - self.start - self.delay;
        if local < 0.0 && self.delay > 0.0 {
            return 0.0;
        }
        self.ease.progress(local, self.duration)
    }

    pub fn sample(&self, now: f64) -> Point {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        lerp_point(self.from, self.to, t)
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
