//! Surprise drives a timed birthday reveal: an opening scene, a countdown that grows a
//! field of points one per second, a morph of that field into a message, and a final
//! scene with a letter or video.
//!
//! The public API is host-driven:
//!
//! - Load and validate a [`PresentationConfig`]
//! - Create a [`Sequencer`] with a [`Clock`], a [`RandomSource`] and a [`GlyphRaster`]
//! - Call [`Sequencer::tick`] once per frame and hand [`Sequencer::snapshot`] to a
//!   [`Renderer`]
#![forbid(unsafe_code)]

mod animation;
mod config;
mod foundation;
mod morph;
mod present;
mod sequence;

pub use crate::animation::ease::Ease;
pub use crate::animation::frame::FrameLoop;
pub use crate::animation::schedule::{Schedule, ScheduleRunner, Step};
pub use crate::animation::tween::Tween;
pub use crate::config::model::{
    CountDirection, DEFAULT_SINCE_UNIX_MS, FinalReveal, GlyphSampling, MAX_TOTAL, MotionProfile,
    PresentationConfig, ScatterShape,
};
pub use crate::foundation::clock::{Clock, ManualClock, SystemClock};
pub use crate::foundation::core::{Bounds, Point, Rect};
pub use crate::foundation::error::{SurpriseError, SurpriseResult};
pub use crate::foundation::rng::{RandomSource, Rng64, SequenceRng};
pub use crate::morph::engine::{MorphEngine, MorphPhase, MorphSettings};
pub use crate::morph::glyph::{GlyphMask, GlyphRaster, SvgTextRaster};
pub use crate::morph::point::MorphPoint;
pub use crate::morph::targets::{compute_targets, fallback_line, pick_per_column};
pub use crate::present::renderer::{JsonLinesRenderer, Renderer, present_to};
pub use crate::present::snapshot::{PointView, Snapshot};
pub use crate::sequence::cooldown::Cooldown;
pub use crate::sequence::countdown::TimedCountdown;
pub use crate::sequence::scene::{Affordance, Cue, Scene};
pub use crate::sequence::sequencer::{Sequencer, SequencerEvent};
pub use crate::sequence::since::SinceReadout;
