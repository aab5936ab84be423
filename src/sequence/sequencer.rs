use std::collections::BTreeSet;
use std::f64::consts::TAU;

use crate::animation::ease::Ease;
use crate::animation::frame::FrameLoop;
use crate::animation::schedule::{Schedule, ScheduleRunner};
use crate::config::model::{FinalReveal, MotionProfile, PresentationConfig};
use crate::foundation::clock::{Clock, SystemClock};
use crate::foundation::error::SurpriseResult;
use crate::foundation::rng::{RandomSource, Rng64};
use crate::morph::engine::{MorphEngine, MorphSettings};
use crate::morph::glyph::{GlyphRaster, SvgTextRaster};
use crate::present::snapshot::{PointView, Snapshot};
use crate::sequence::cooldown::Cooldown;
use crate::sequence::countdown::TimedCountdown;
use crate::sequence::scene::{Affordance, Cue, Scene};
use crate::sequence::since::SinceReadout;

/// Something observable that happened while driving the sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SequencerEvent {
    Started,
    SceneExited { scene: Scene },
    SceneEntered { scene: Scene },
    CountChanged { display: u32, elapsed: u32 },
    PointAdded { id: u32, count: usize },
    /// Fired exactly once per countdown, when the remaining count reaches zero.
    CountdownComplete,
    MorphStarted { final_at: f64 },
    /// The slowest point has settled on its target.
    MorphComplete,
    AffordanceShown { affordance: Affordance },
    AffordanceHidden { affordance: Affordance },
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Nav {
    Forward,
    Back,
    To(Scene),
}

/// Owns the active [`Scene`] and everything time-driven inside it.
///
/// The sequencer is single-threaded and cooperative: the host calls
/// [`Sequencer::tick`] once per animation frame (while
/// [`Sequencer::should_reschedule`] holds) and forwards input as
/// [`Sequencer::advance`] / [`Sequencer::retreat`]. Nothing in here fails: an
/// unavailable clock freezes the sequence on its last valid state.
pub struct Sequencer<C: Clock = SystemClock, R: RandomSource = Rng64> {
    config: PresentationConfig,
    motion: MotionProfile,
    clock: C,
    rng: R,
    raster: Box<dyn GlyphRaster>,

    started: bool,
    running: bool,
    scene: Scene,
    scene_entered_at: Option<f64>,
    frame: FrameLoop,
    cooldown: Cooldown,
    schedule: Option<ScheduleRunner<Cue>>,
    countdown: Option<TimedCountdown>,
    complete_at: Option<f64>,
    final_at: Option<f64>,
    engine: MorphEngine,
    affordances: BTreeSet<Affordance>,
    since: Option<SinceReadout>,
    count_eased: Option<f64>,
    glow_phase: f64,
    last_now: Option<f64>,
    clock_lost: bool,
    events: Vec<SequencerEvent>,
}

impl Sequencer<SystemClock, Rng64> {
    /// Sequencer on the process clock, a time-seeded generator and the SVG text raster.
    pub fn with_system(config: PresentationConfig) -> SurpriseResult<Self> {
        let clock = SystemClock::new();
        let seed = clock.unix_millis().unwrap_or_default() as u64;
        let raster = SvgTextRaster::new(config.glyph.font_dir.as_deref());
        Self::new(config, clock, Rng64::new(seed), Box::new(raster))
    }
}

impl<C: Clock, R: RandomSource> Sequencer<C, R> {
    pub fn new(
        config: PresentationConfig,
        clock: C,
        rng: R,
        raster: Box<dyn GlyphRaster>,
    ) -> SurpriseResult<Self> {
        config.validate()?;
        let motion = config.effective_motion();
        let engine = MorphEngine::new(config.total as usize, MorphSettings::from_config(&config));
        Ok(Self {
            frame: FrameLoop::new(motion.max_frame_dt),
            cooldown: Cooldown::new(motion.nav_cooldown_secs),
            motion,
            clock,
            rng,
            raster,
            started: false,
            running: false,
            scene: Scene::Opening,
            scene_entered_at: None,
            schedule: None,
            countdown: None,
            complete_at: None,
            final_at: None,
            engine,
            affordances: BTreeSet::new(),
            since: None,
            count_eased: None,
            glow_phase: 0.0,
            last_now: None,
            clock_lost: false,
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the host should schedule another frame.
    pub fn should_reschedule(&self) -> bool {
        self.running && self.frame.should_reschedule()
    }

    pub fn engine(&self) -> &MorphEngine {
        &self.engine
    }

    pub fn countdown(&self) -> Option<&TimedCountdown> {
        self.countdown.as_ref()
    }

    /// Current countdown display value, if a countdown exists.
    pub fn display_count(&self) -> Option<u32> {
        self.countdown
            .as_ref()
            .map(|cd| cd.display(self.config.direction))
    }

    pub fn affordances(&self) -> &BTreeSet<Affordance> {
        &self.affordances
    }

    pub fn is_countdown_complete(&self) -> bool {
        self.complete_at.is_some()
    }

    /// Enter the Opening scene and begin timing. Idempotent.
    pub fn start(&mut self) -> bool {
        if self.started {
            tracing::debug!("start absorbed; already started");
            return false;
        }
        self.started = true;
        self.running = true;
        self.events.push(SequencerEvent::Started);
        let now = self.read_clock();
        self.enter(Scene::Opening, now);
        tracing::info!(total = self.config.total, "presentation started");
        true
    }

    /// Halt all rescheduling. Later ticks and navigation are no-ops.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.frame.stop();
        self.schedule = None;
        self.events.push(SequencerEvent::Stopped);
        tracing::info!(scene = %self.scene, "presentation stopped");
    }

    /// Stop and release everything; the sequencer can be started again afterwards.
    pub fn reset(&mut self) {
        self.stop();
        self.started = false;
        self.scene = Scene::Opening;
        self.scene_entered_at = None;
        self.frame = FrameLoop::new(self.motion.max_frame_dt);
        self.cooldown.reset();
        self.countdown = None;
        self.complete_at = None;
        self.final_at = None;
        self.engine = self.fresh_engine();
        self.affordances.clear();
        self.since = None;
        self.count_eased = None;
        self.glow_phase = 0.0;
        self.last_now = None;
        self.clock_lost = false;
    }

    /// Move to the next scene (debounced, clamped).
    pub fn advance(&mut self) -> bool {
        self.navigate(Nav::Forward)
    }

    /// Move to the previous scene (debounced, clamped).
    pub fn retreat(&mut self) -> bool {
        self.navigate(Nav::Back)
    }

    /// Jump to `scene` under the same rules as [`Sequencer::advance`].
    pub fn goto(&mut self, scene: Scene) -> bool {
        self.navigate(Nav::To(scene))
    }

    /// Drain events queued by navigation calls outside a tick.
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process one animation frame and return everything that happened since the last
    /// drain.
    pub fn tick(&mut self) -> Vec<SequencerEvent> {
        if !self.running {
            return self.take_events();
        }
        let Some(now) = self.read_clock() else {
            return self.take_events();
        };
        let dt = self.frame.tick(now);
        self.last_now = Some(now);
        if self.scene_entered_at.is_none() {
            self.scene_entered_at = Some(now);
        }

        for _ in 0..Scene::ALL.len() {
            let before = self.scene;
            self.update_scene(now);
            if self.scene == before {
                break;
            }
        }

        self.update_since();
        self.update_frame_state(dt);
        self.take_events()
    }

    /// Renderer-facing view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let scene_progress = match (self.last_now, self.scene_entered_at) {
            (Some(now), Some(at)) => {
                Ease::OutCubic.progress(now - at, self.motion.scene_fade_secs)
            }
            _ => 0.0,
        };
        let glow = if self.motion.glow_hz > 0.0 {
            0.5 - 0.5 * (TAU * self.glow_phase).cos()
        } else {
            1.0
        };
        Snapshot {
            time: self.last_now,
            scene: self.scene,
            scene_progress,
            count: self.display_count(),
            count_eased: self.count_eased,
            since: self.since,
            morph: self.engine.phase(),
            points: self.engine.points().iter().map(PointView::from).collect(),
            affordances: self.affordances.clone(),
            glow,
            finale: self.config.finale.clone(),
        }
    }

    fn read_clock(&mut self) -> Option<f64> {
        match self.clock.now().filter(|t| t.is_finite()) {
            Some(t) => {
                if self.clock_lost {
                    tracing::info!("clock available again");
                    self.clock_lost = false;
                    self.frame.resync();
                }
                Some(t)
            }
            None => {
                if !self.clock_lost {
                    tracing::warn!(scene = %self.scene, "clock unavailable; freezing");
                    self.clock_lost = true;
                }
                None
            }
        }
    }

    fn navigate(&mut self, nav: Nav) -> bool {
        if !self.running {
            return false;
        }
        let Some(now) = self.read_clock() else {
            return false;
        };
        if !self.cooldown.try_acquire(now) {
            tracing::debug!(?nav, "navigation absorbed by cooldown");
            return false;
        }
        let target = match nav {
            Nav::Forward => self.scene.next(),
            Nav::Back => self.scene.prev(),
            Nav::To(s) => Some(s),
        };
        let Some(target) = target.filter(|&s| s != self.scene) else {
            return false;
        };
        if target.requires_completed_countdown() && !self.is_countdown_complete() {
            tracing::debug!(%target, "navigation absorbed; countdown not complete");
            return false;
        }
        self.transition(target, now);
        true
    }

    fn transition(&mut self, to: Scene, now: f64) {
        tracing::debug!(from = %self.scene, %to, "scene transition");
        self.exit(self.scene);
        self.enter(to, Some(now));
    }

    fn enter(&mut self, scene: Scene, now: Option<f64>) {
        self.scene = scene;
        self.scene_entered_at = now;
        self.events.push(SequencerEvent::SceneEntered { scene });

        match scene {
            Scene::Opening => {
                self.countdown = None;
                self.complete_at = None;
                self.final_at = None;
                self.count_eased = None;
                self.engine = self.fresh_engine();
                self.hide(Affordance::ActionButton);
                self.hide(Affordance::Stats);
                self.hide(Affordance::Hint);
                let m = &self.motion;
                let schedule = Schedule::new()
                    .step("stats-delay", m.stats_delay_secs)
                    .on_exit(Cue::Show(Affordance::Stats))
                    .step("hint-delay", m.hint_delay_secs - m.stats_delay_secs)
                    .on_exit(Cue::Show(Affordance::Hint));
                self.begin_schedule(schedule, now);
            }
            Scene::Countdown => {
                let mut cd = TimedCountdown::new(self.config.total);
                if let Some(t) = now {
                    cd.begin(t);
                }
                let display = cd.display(self.config.direction);
                self.countdown = Some(cd);
                self.complete_at = None;
                self.final_at = None;
                self.count_eased = Some(f64::from(display));
                self.engine = self.fresh_engine();
                self.hide(Affordance::ActionButton);
                self.events.push(SequencerEvent::CountChanged {
                    display,
                    elapsed: 0,
                });
            }
            Scene::Reveal => {}
            Scene::Final => {
                self.final_at = None;
                let schedule = match &self.config.finale {
                    FinalReveal::Message { lines } => {
                        let mut s = Schedule::new();
                        for i in 0..lines.len() {
                            s = s
                                .step(format!("line-{i}"), self.motion.line_interval_secs)
                                .on_enter(Cue::Show(Affordance::Line(i)));
                        }
                        s
                    }
                    FinalReveal::Video { .. } => Schedule::new()
                        .step("video", 0.0)
                        .on_enter(Cue::Show(Affordance::Video)),
                };
                self.begin_schedule(schedule, now);
            }
        }
    }

    fn exit(&mut self, scene: Scene) {
        self.schedule = None;
        match scene {
            Scene::Opening => {
                self.hide(Affordance::Stats);
                self.hide(Affordance::Hint);
            }
            Scene::Countdown | Scene::Reveal => {}
            Scene::Final => {
                let lines: Vec<Affordance> = self
                    .affordances
                    .iter()
                    .copied()
                    .filter(|a| matches!(a, Affordance::Line(_) | Affordance::Video))
                    .collect();
                for a in lines {
                    self.hide(a);
                }
            }
        }
        self.events.push(SequencerEvent::SceneExited { scene });
    }

    fn begin_schedule(&mut self, schedule: Schedule<Cue>, now: Option<f64>) {
        let time_scale = if self.config.reduced_motion { 0.0 } else { 1.0 };
        match ScheduleRunner::new(schedule, time_scale) {
            Ok(mut runner) => {
                if let Some(t) = now {
                    runner.start(t);
                }
                self.schedule = Some(runner);
            }
            Err(e) => {
                tracing::warn!(error = %e, scene = %self.scene, "scene schedule rejected");
                self.schedule = None;
            }
        }
    }

    fn poll_schedule(&mut self, now: f64) {
        let Some(runner) = self.schedule.as_mut() else {
            return;
        };
        runner.start(now);
        for cue in runner.poll(now) {
            match cue {
                Cue::Show(a) => self.show(a),
                Cue::Hide(a) => self.hide(a),
            }
        }
    }

    fn update_scene(&mut self, now: f64) {
        match self.scene {
            Scene::Opening => {
                self.poll_schedule(now);
                if let (Some(after), Some(at)) =
                    (self.config.auto_advance_after, self.scene_entered_at)
                    && now - at >= after
                {
                    tracing::debug!(after, "opening auto-advance");
                    self.transition(Scene::Countdown, now);
                }
            }
            Scene::Countdown => self.update_countdown(now),
            Scene::Reveal | Scene::Final => {
                self.engine.tick(now);
                if self.engine.take_completion() {
                    self.events.push(SequencerEvent::MorphComplete);
                    self.show(Affordance::ActionButton);
                }
                if self.scene == Scene::Reveal {
                    if self.final_at.is_some_and(|at| now >= at) {
                        self.transition(Scene::Final, now);
                    }
                } else {
                    self.poll_schedule(now);
                }
            }
        }
    }

    fn update_countdown(&mut self, now: f64) {
        let Some(cd) = self.countdown.as_mut() else {
            return;
        };
        cd.begin(now);
        let before = cd.elapsed();
        let elapsed = cd.observe(now);
        let display = cd.display(self.config.direction);
        let complete = cd.is_complete();
        if elapsed != before {
            self.events
                .push(SequencerEvent::CountChanged { display, elapsed });
        }

        for id in self.engine.sync_to_elapsed(elapsed, now, &mut self.rng) {
            let count = self.engine.len();
            self.events.push(SequencerEvent::PointAdded { id, count });
        }
        self.engine.tick(now);

        if complete && self.complete_at.is_none() {
            self.complete_at = Some(now);
            self.final_at = Some(now + self.motion.settle_delay_secs);
            self.events.push(SequencerEvent::CountdownComplete);
            tracing::info!(points = self.engine.len(), "countdown complete");
            if self
                .engine
                .finalize(&self.config.message, now, self.raster.as_ref(), &mut self.rng)
            {
                self.events.push(SequencerEvent::MorphStarted {
                    final_at: now + self.motion.settle_delay_secs,
                });
            }
            self.transition(Scene::Reveal, now);
        }
    }

    fn update_since(&mut self) {
        if let Some(now_ms) = self.clock.unix_millis() {
            self.since = Some(SinceReadout::between(self.config.since_unix_ms, now_ms));
        }
    }

    fn update_frame_state(&mut self, dt: f64) {
        if let Some(target) = self.display_count().map(f64::from) {
            let rate = self.motion.counter_ease_rate;
            let eased = match self.count_eased {
                Some(v) if rate > 0.0 => v + (target - v) * (1.0 - (-rate * dt).exp()),
                _ => target,
            };
            self.count_eased = Some(eased);
        }
        if self.motion.glow_hz > 0.0 {
            self.glow_phase = (self.glow_phase + dt * self.motion.glow_hz).fract();
        }
    }

    fn show(&mut self, a: Affordance) {
        if self.affordances.insert(a) {
            self.events.push(SequencerEvent::AffordanceShown { affordance: a });
        }
    }

    fn hide(&mut self, a: Affordance) {
        if self.affordances.remove(&a) {
            self.events.push(SequencerEvent::AffordanceHidden { affordance: a });
        }
    }

    fn fresh_engine(&self) -> MorphEngine {
        MorphEngine::new(
            self.config.total as usize,
            MorphSettings::from_config(&self.config),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sequencer.rs"]
mod tests;
