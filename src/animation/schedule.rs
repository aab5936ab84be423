use crate::foundation::error::{SurpriseError, SurpriseResult};

// Absorbs float drift when step durations are summed.
const TIME_EPS: f64 = 1e-9;

/// One named, timed step of a [`Schedule`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step<C> {
    pub name: String,
    /// Seconds the step lasts before the next one enters.
    pub duration: f64,
    /// Cues emitted when the step starts.
    pub on_enter: Vec<C>,
    /// Cues emitted when the step ends.
    pub on_exit: Vec<C>,
}

/// Ordered list of timed steps, run back to back by a [`ScheduleRunner`].
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule<C> {
    steps: Vec<Step<C>>,
}

impl<C> Default for Schedule<C> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<C> Schedule<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn step(mut self, name: impl Into<String>, duration: f64) -> Self {
        self.steps.push(Step {
            name: name.into(),
            duration,
            on_enter: Vec::new(),
            on_exit: Vec::new(),
        });
        self
    }

    /// Attach an enter cue to the most recently added step.
    pub fn on_enter(mut self, cue: C) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.on_enter.push(cue);
        }
        self
    }

    /// Attach an exit cue to the most recently added step.
    pub fn on_exit(mut self, cue: C) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.on_exit.push(cue);
        }
        self
    }

    pub fn steps(&self) -> &[Step<C>] {
        &self.steps
    }

    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn validate(&self) -> SurpriseResult<()> {
        for s in &self.steps {
            if !s.duration.is_finite() || s.duration < 0.0 {
                return Err(SurpriseError::animation(format!(
                    "step '{}' duration must be finite and >= 0",
                    s.name
                )));
            }
        }
        Ok(())
    }
}

/// Drives a [`Schedule`] from a single poll loop.
///
/// Every cue fires exactly once, in order, no matter how coarse the polling is.
#[derive(Clone, Debug)]
pub struct ScheduleRunner<C> {
    schedule: Schedule<C>,
    starts: Vec<f64>,
    origin: Option<f64>,
    time_scale: f64,
    cursor: usize,
    entered: bool,
}

impl<C: Clone> ScheduleRunner<C> {
    /// Runner over `schedule`; a `time_scale` of `0.0` collapses every step to zero length.
    pub fn new(schedule: Schedule<C>, time_scale: f64) -> SurpriseResult<Self> {
        schedule.validate()?;
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(SurpriseError::animation(
                "schedule time scale must be finite and >= 0",
            ));
        }
        let mut starts = Vec::with_capacity(schedule.steps.len());
        let mut acc = 0.0;
        for s in &schedule.steps {
            starts.push(acc);
            acc += s.duration * time_scale;
        }
        Ok(Self {
            schedule,
            starts,
            origin: None,
            time_scale,
            cursor: 0,
            entered: false,
        })
    }

    /// Anchor the schedule at `now`. Later calls are ignored.
    pub fn start(&mut self, now: f64) {
        if self.origin.is_none() && now.is_finite() {
            self.origin = Some(now);
        }
    }

    pub fn is_started(&self) -> bool {
        self.origin.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.schedule.steps.len()
    }

    /// Name of the step currently in progress.
    pub fn current_step(&self) -> Option<&str> {
        if !self.entered {
            return None;
        }
        self.schedule.steps.get(self.cursor).map(|s| s.name.as_str())
    }

    /// Emit every cue that has come due by `now`.
    pub fn poll(&mut self, now: f64) -> Vec<C> {
        let mut out = Vec::new();
        let Some(origin) = self.origin else {
            return out;
        };
        if !now.is_finite() {
            return out;
        }
        let local = (now - origin).max(0.0) + TIME_EPS;

        while let Some(step) = self.schedule.steps.get(self.cursor) {
            let step_start = self.starts[self.cursor];
            if !self.entered {
                if local < step_start {
                    break;
                }
                tracing::debug!(step = %step.name, "schedule step entered");
                out.extend(step.on_enter.iter().cloned());
                self.entered = true;
            }
            let step_end = step_start + step.duration * self.time_scale;
            if local < step_end {
                break;
            }
            out.extend(step.on_exit.iter().cloned());
            self.cursor += 1;
            self.entered = false;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/schedule.rs"]
mod tests;
