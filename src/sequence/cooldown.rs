/// Suppresses re-entrant navigation inside a fixed window.
#[derive(Clone, Debug)]
pub struct Cooldown {
    window: f64,
    last: Option<f64>,
}

impl Cooldown {
    pub fn new(window: f64) -> Self {
        Self {
            window: window.max(0.0),
            last: None,
        }
    }

    /// Claim the slot at `now`; `false` while the previous claim is still cooling down.
    ///
    /// A clock that stepped backwards past the last claim releases the slot.
    pub fn try_acquire(&mut self, now: f64) -> bool {
        if !now.is_finite() {
            return false;
        }
        if let Some(t) = self.last
            && now >= t
            && now - t < self.window
        {
            return false;
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn window(&self) -> f64 {
        self.window
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/cooldown.rs"]
mod tests;
