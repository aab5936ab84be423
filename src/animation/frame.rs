/// Delta-time bookkeeping for the cooperative frame loop.
///
/// The host reschedules its frame callback only while [`FrameLoop::should_reschedule`]
/// holds; after [`FrameLoop::stop`] no further frames are accounted.
#[derive(Clone, Debug)]
pub struct FrameLoop {
    last: Option<f64>,
    max_dt: f64,
    running: bool,
    frames: u64,
}

impl FrameLoop {
    /// Loop clamping each delta to `max_dt` seconds.
    pub fn new(max_dt: f64) -> Self {
        Self {
            last: None,
            max_dt: if max_dt.is_finite() { max_dt.max(0.0) } else { 0.0 },
            running: true,
            frames: 0,
        }
    }

    /// Account one frame at `now`, returning the clamped delta since the previous one.
    ///
    /// The first frame, a stopped loop, and a clock stepping backwards all yield `0.0`.
    pub fn tick(&mut self, now: f64) -> f64 {
        if !self.running || !now.is_finite() {
            return 0.0;
        }
        let dt = match self.last {
            Some(prev) => (now - prev).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        if self.last.is_none_or(|prev| now >= prev) {
            self.last = Some(now);
        }
        self.frames += 1;
        dt
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Forget the previous frame time (e.g. after an outage) without stopping.
    pub fn resync(&mut self) {
        self.last = None;
    }

    pub fn should_reschedule(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/frame.rs"]
mod tests;
