use std::collections::BTreeSet;

use crate::config::model::FinalReveal;
use crate::morph::engine::MorphPhase;
use crate::morph::point::MorphPoint;
use crate::sequence::scene::{Affordance, Scene};
use crate::sequence::since::SinceReadout;

/// Renderer-facing position of one point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PointView {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl From<&MorphPoint> for PointView {
    fn from(p: &MorphPoint) -> Self {
        Self {
            id: p.id,
            x: p.position.x,
            y: p.position.y,
            scale: p.scale,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Snapshot {
    /// Clock reading of the last processed tick.
    pub time: Option<f64>,
    pub scene: Scene,
    /// Fade-in progress of the active scene in `[0, 1]`.
    pub scene_progress: f64,
    /// Integer countdown value, while a countdown exists.
    pub count: Option<u32>,
    /// Smoothed counter for animated digits.
    pub count_eased: Option<f64>,
    pub since: Option<SinceReadout>,
    pub morph: MorphPhase,
    pub points: Vec<PointView>,
    pub affordances: BTreeSet<Affordance>,
    /// Breathing glow intensity in `[0, 1]`.
    pub glow: f64,
    pub finale: FinalReveal,
}
