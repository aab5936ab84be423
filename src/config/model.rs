use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::animation::ease::Ease;
use crate::foundation::core::Bounds;
use crate::foundation::error::{SurpriseError, SurpriseResult};

/// 1997-02-06T00:00:00Z.
///
/// UTC midnight; a viewer's local midnight differs from this by their UTC offset.
pub const DEFAULT_SINCE_UNIX_MS: i64 = 855_187_200_000;

/// Upper bound on the countdown total (and therefore on the point budget).
pub const MAX_TOTAL: u32 = 10_000;

/// Whether the countdown shows the seconds left or the seconds gone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountDirection {
    #[default]
    Down,
    Up,
}

/// What the Final scene shows.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FinalReveal {
    /// Lines of a letter, revealed one at a time.
    Message { lines: Vec<String> },
    /// A video the renderer plays while the scene is active.
    Video { source: String },
}

impl Default for FinalReveal {
    fn default() -> Self {
        Self::Message {
            lines: vec![
                "Happy birthday!".to_string(),
                "Another lap around the sun, and every second of it counted.".to_string(),
                "With love, always.".to_string(),
            ],
        }
    }
}

/// Durations and rates for every animated transition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionProfile {
    pub birth_secs: f64,
    pub birth_ease: Ease,
    pub converge_secs: f64,
    pub converge_ease: Ease,
    /// Extra delay per point, in left-to-right order, before it starts converging.
    pub stagger_secs: f64,
    pub scene_fade_secs: f64,
    /// Wait between countdown completion and the Final scene.
    pub settle_delay_secs: f64,
    pub stats_delay_secs: f64,
    pub hint_delay_secs: f64,
    pub line_interval_secs: f64,
    /// Exponential approach rate of the eased counter; `0` snaps.
    pub counter_ease_rate: f64,
    /// Breathing glow frequency; `0` holds the glow steady.
    pub glow_hz: f64,
    /// Upper bound on a single frame delta.
    pub max_frame_dt: f64,
    pub nav_cooldown_secs: f64,
    pub reduced_nav_cooldown_secs: f64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            birth_secs: 0.7,
            birth_ease: Ease::OutCubic,
            converge_secs: 1.6,
            converge_ease: Ease::InOutCubic,
            stagger_secs: 0.045,
            scene_fade_secs: 0.6,
            settle_delay_secs: 3.5,
            stats_delay_secs: 0.9,
            hint_delay_secs: 1.7,
            line_interval_secs: 0.9,
            counter_ease_rate: 12.0,
            glow_hz: 0.25,
            max_frame_dt: 0.05,
            nav_cooldown_secs: 0.52,
            reduced_nav_cooldown_secs: 0.08,
        }
    }
}

impl MotionProfile {
    /// Same profile with every transition collapsed to zero length.
    pub fn reduced(&self) -> Self {
        Self {
            birth_secs: 0.0,
            converge_secs: 0.0,
            stagger_secs: 0.0,
            scene_fade_secs: 0.0,
            settle_delay_secs: 0.0,
            stats_delay_secs: 0.0,
            hint_delay_secs: 0.0,
            line_interval_secs: 0.0,
            counter_ease_rate: 0.0,
            glow_hz: 0.0,
            nav_cooldown_secs: self.reduced_nav_cooldown_secs,
            ..self.clone()
        }
    }

    /// Profile to run with, given the reduced-motion preference.
    pub fn effective(&self, reduced_motion: bool) -> Self {
        if reduced_motion {
            self.reduced()
        } else {
            self.clone()
        }
    }

    pub fn validate(&self) -> SurpriseResult<()> {
        for (name, value) in [
            ("birth_secs", self.birth_secs),
            ("converge_secs", self.converge_secs),
            ("stagger_secs", self.stagger_secs),
            ("scene_fade_secs", self.scene_fade_secs),
            ("settle_delay_secs", self.settle_delay_secs),
            ("stats_delay_secs", self.stats_delay_secs),
            ("hint_delay_secs", self.hint_delay_secs),
            ("line_interval_secs", self.line_interval_secs),
            ("counter_ease_rate", self.counter_ease_rate),
            ("glow_hz", self.glow_hz),
            ("max_frame_dt", self.max_frame_dt),
            ("nav_cooldown_secs", self.nav_cooldown_secs),
            ("reduced_nav_cooldown_secs", self.reduced_nav_cooldown_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SurpriseError::validation(format!(
                    "motion.{name} must be finite and >= 0"
                )));
            }
        }
        if self.hint_delay_secs < self.stats_delay_secs {
            return Err(SurpriseError::validation(
                "motion.hint_delay_secs must be >= motion.stats_delay_secs",
            ));
        }
        Ok(())
    }
}

/// How text is rendered and sampled when computing morph targets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphSampling {
    /// Pixels with alpha strictly above this count as inside a glyph.
    pub threshold: u8,
    /// Sample every `stride`-th pixel on both axes.
    pub stride: u32,
    /// Font size as a fraction of the display width...
    pub font_width_frac: f64,
    /// ...capped by this fraction of the display height.
    pub font_height_frac: f64,
    pub font_family: String,
    pub font_weight: u16,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dir: Option<PathBuf>,
    /// Horizontal margin of the fallback line, as a fraction of the width per side.
    pub fallback_margin_frac: f64,
}

impl Default for GlyphSampling {
    fn default() -> Self {
        Self {
            threshold: 128,
            stride: 3,
            font_width_frac: 0.11,
            font_height_frac: 0.22,
            font_family: "sans-serif".to_string(),
            font_weight: 800,
            font_dir: None,
            fallback_margin_frac: 0.1,
        }
    }
}

impl GlyphSampling {
    /// Font size in pixels for the given display bounds.
    pub fn font_px(&self, bounds: Bounds) -> f64 {
        (bounds.width * self.font_width_frac)
            .min(bounds.height * self.font_height_frac)
            .max(1.0)
    }

    pub fn validate(&self) -> SurpriseResult<()> {
        if self.stride == 0 {
            return Err(SurpriseError::validation("glyph.stride must be > 0"));
        }
        for (name, value) in [
            ("font_width_frac", self.font_width_frac),
            ("font_height_frac", self.font_height_frac),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SurpriseError::validation(format!(
                    "glyph.{name} must be finite and > 0"
                )));
            }
        }
        if !self.fallback_margin_frac.is_finite()
            || !(0.0..0.5).contains(&self.fallback_margin_frac)
        {
            return Err(SurpriseError::validation(
                "glyph.fallback_margin_frac must be in [0, 0.5)",
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err(SurpriseError::validation("glyph.font_family must be non-empty"));
        }
        Ok(())
    }
}

/// Elliptical region new points are scattered into, relative to the bounds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScatterShape {
    pub rx_frac: f64,
    pub ry_frac: f64,
    /// Keeps points off the exact center, as a fraction of the radius.
    pub inner_frac: f64,
}

impl Default for ScatterShape {
    fn default() -> Self {
        Self {
            rx_frac: 0.34,
            ry_frac: 0.26,
            inner_frac: 0.15,
        }
    }
}

impl ScatterShape {
    pub fn validate(&self) -> SurpriseResult<()> {
        for (name, value) in [("rx_frac", self.rx_frac), ("ry_frac", self.ry_frac)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SurpriseError::validation(format!(
                    "scatter.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.inner_frac.is_finite() || !(0.0..=1.0).contains(&self.inner_frac) {
            return Err(SurpriseError::validation(
                "scatter.inner_frac must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Full description of one presentation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    /// Countdown length in seconds and point budget.
    pub total: u32,
    /// Text the point field morphs into.
    pub message: String,
    pub direction: CountDirection,
    pub bounds: Bounds,
    pub reduced_motion: bool,
    pub motion: MotionProfile,
    pub glyph: GlyphSampling,
    pub scatter: ScatterShape,
    /// Epoch of the opening "time since" readout.
    pub since_unix_ms: i64,
    pub finale: FinalReveal,
    /// Leave the Opening scene on its own after this many seconds.
    pub auto_advance_after: Option<f64>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            total: 28,
            message: "Happy Birthday".to_string(),
            direction: CountDirection::Down,
            bounds: Bounds::default(),
            reduced_motion: false,
            motion: MotionProfile::default(),
            glyph: GlyphSampling::default(),
            scatter: ScatterShape::default(),
            since_unix_ms: DEFAULT_SINCE_UNIX_MS,
            finale: FinalReveal::default(),
            auto_advance_after: None,
        }
    }
}

impl PresentationConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SurpriseResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| SurpriseError::serde(format!("parse presentation JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SurpriseResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SurpriseError::validation(format!(
                "open presentation JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> SurpriseResult<()> {
        if self.total == 0 || self.total > MAX_TOTAL {
            return Err(SurpriseError::validation(format!(
                "total must be in 1..={MAX_TOTAL}"
            )));
        }
        self.bounds.validate()?;
        self.motion.validate()?;
        self.glyph.validate()?;
        self.scatter.validate()?;
        if let Some(after) = self.auto_advance_after
            && (!after.is_finite() || after < 0.0)
        {
            return Err(SurpriseError::validation(
                "auto_advance_after must be finite and >= 0 when set",
            ));
        }
        if let FinalReveal::Video { source } = &self.finale
            && source.trim().is_empty()
        {
            return Err(SurpriseError::validation("finale.source must be non-empty"));
        }
        Ok(())
    }

    /// Motion profile after applying the reduced-motion preference.
    pub fn effective_motion(&self) -> MotionProfile {
        self.motion.effective(self.reduced_motion)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
