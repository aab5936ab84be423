use std::f64::consts::TAU;

use crate::animation::tween::Tween;
use crate::config::model::{GlyphSampling, MotionProfile, PresentationConfig, ScatterShape};
use crate::foundation::core::{Bounds, Point};
use crate::foundation::rng::RandomSource;
use crate::morph::glyph::GlyphRaster;
use crate::morph::point::MorphPoint;
use crate::morph::targets::compute_targets;

/// Lifecycle of the point field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum MorphPhase {
    /// Points are being born at scatter positions.
    Scatter,
    /// Points are easing toward their text targets.
    Converging { done_at: f64 },
    /// Every point rests on its target.
    Settled,
}

/// Geometry and timing the engine runs with.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphSettings {
    pub bounds: Bounds,
    pub scatter: ScatterShape,
    pub glyph: GlyphSampling,
    /// Already adjusted for reduced motion.
    pub motion: MotionProfile,
}

impl MorphSettings {
    pub fn from_config(cfg: &PresentationConfig) -> Self {
        Self {
            bounds: cfg.bounds,
            scatter: cfg.scatter,
            glyph: cfg.glyph.clone(),
            motion: cfg.effective_motion(),
        }
    }
}

/// Bounded point field: scatter births during the countdown, then a one-shot
/// staggered convergence onto text-shaped targets.
#[derive(Clone, Debug)]
pub struct MorphEngine {
    capacity: usize,
    settings: MorphSettings,
    points: Vec<MorphPoint>,
    next_id: u32,
    phase: MorphPhase,
    completion_pending: bool,
}

impl MorphEngine {
    pub fn new(capacity: usize, settings: MorphSettings) -> Self {
        Self {
            capacity,
            settings,
            points: Vec::with_capacity(capacity),
            next_id: 0,
            phase: MorphPhase::Scatter,
            completion_pending: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[MorphPoint] {
        &self.points
    }

    pub fn phase(&self) -> MorphPhase {
        self.phase
    }

    pub fn is_finalized(&self) -> bool {
        !matches!(self.phase, MorphPhase::Scatter)
    }

    /// Change the point budget, dropping the oldest points beyond it.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if self.points.len() > capacity {
            let excess = self.points.len() - capacity;
            self.points.drain(..excess);
            tracing::debug!(excess, capacity, "dropped oldest points over capacity");
        }
    }

    /// Birth one point toward a random scatter position.
    ///
    /// No-op once the budget is reached or after [`MorphEngine::finalize`].
    pub fn add_point(&mut self, now: f64, rng: &mut dyn RandomSource) -> Option<u32> {
        if self.is_finalized() || self.points.len() >= self.capacity {
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let center = self.settings.bounds.center();
        let origin = self.scatter_position(rng);
        let m = &self.settings.motion;
        let birth = Tween::new(center, origin, now, m.birth_secs, m.birth_ease);
        self.points.push(MorphPoint::new(id, birth));
        Some(id)
    }

    /// Birth points until the count matches `min(elapsed, capacity)`.
    pub fn sync_to_elapsed(
        &mut self,
        elapsed: u32,
        now: f64,
        rng: &mut dyn RandomSource,
    ) -> Vec<u32> {
        let want = (elapsed as usize).min(self.capacity);
        let mut added = Vec::new();
        while self.points.len() < want {
            match self.add_point(now, rng) {
                Some(id) => added.push(id),
                None => break,
            }
        }
        added
    }

    fn scatter_position(&self, rng: &mut dyn RandomSource) -> Point {
        let s = &self.settings.scatter;
        let b = self.settings.bounds;
        let center = b.center();
        let angle = rng.next_f64() * TAU;
        // sqrt: uniform density over the ring area.
        let radial = s.inner_frac + (1.0 - s.inner_frac) * rng.next_f64().sqrt();
        Point::new(
            center.x + angle.cos() * b.width * s.rx_frac * radial,
            center.y + angle.sin() * b.height * s.ry_frac * radial,
        )
    }

    /// Compute text targets and start the staggered convergence.
    ///
    /// Returns `false` (and changes nothing) when already finalized.
    #[tracing::instrument(skip(self, raster, rng), fields(points = self.points.len()))]
    pub fn finalize(
        &mut self,
        text: &str,
        now: f64,
        raster: &dyn GlyphRaster,
        rng: &mut dyn RandomSource,
    ) -> bool {
        if self.is_finalized() {
            tracing::debug!("finalize absorbed; morph already running");
            return false;
        }

        let targets = compute_targets(
            raster,
            text,
            self.points.len(),
            self.settings.bounds,
            &self.settings.glyph,
            rng,
        );

        // Rank points left to right; targets are already sorted by x.
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| {
            self.points[a]
                .position
                .x
                .total_cmp(&self.points[b].position.x)
                .then(a.cmp(&b))
        });

        let m = &self.settings.motion;
        let mut done_at = now;
        for (rank, (&idx, &target)) in order.iter().zip(targets.iter()).enumerate() {
            let p = &mut self.points[idx];
            let tween = Tween::new(p.position, target, now, m.converge_secs, m.converge_ease)
                .with_delay(rank as f64 * m.stagger_secs);
            p.converge_to(tween);
            done_at = done_at.max(p.settle_time());
        }

        self.phase = MorphPhase::Converging { done_at };
        tracing::debug!(done_at, "morph convergence started");
        self.tick(now);
        true
    }

    /// Advance every point to `now`.
    pub fn tick(&mut self, now: f64) {
        if !now.is_finite() {
            return;
        }
        for p in &mut self.points {
            p.update(now);
        }
        if let MorphPhase::Converging { done_at } = self.phase
            && now >= done_at
        {
            self.phase = MorphPhase::Settled;
            self.completion_pending = true;
            tracing::info!(points = self.points.len(), "morph settled");
        }
    }

    /// `true` exactly once, after the slowest point has settled.
    pub fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.completion_pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/morph/engine.rs"]
mod tests;
