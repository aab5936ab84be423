use crate::animation::tween::Tween;
use crate::foundation::core::Point;

/// One particle of the morphing field.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphPoint {
    pub id: u32,
    /// Scatter position the point was born toward.
    pub origin: Point,
    /// Text-shaped position assigned at finalize.
    pub target: Option<Point>,
    /// Current position, refreshed by [`MorphPoint::update`].
    pub position: Point,
    /// Birth growth in `[0, 1]`.
    pub scale: f64,
    birth: Tween,
    converge: Option<Tween>,
}

impl MorphPoint {
    pub(crate) fn new(id: u32, birth: Tween) -> Self {
        let mut p = Self {
            id,
            origin: birth.to,
            target: None,
            position: birth.from,
            scale: 0.0,
            birth,
            converge: None,
        };
        p.update(birth.start);
        p
    }

    pub(crate) fn converge_to(&mut self, converge: Tween) {
        self.target = Some(converge.to);
        self.converge = Some(converge);
    }

    pub fn update(&mut self, now: f64) {
        self.scale = self.birth.progress(now);
        self.position = match &self.converge {
            Some(c) => c.sample(now),
            None => self.birth.sample(now),
        };
    }

    /// Time at which this point stops moving.
    pub fn settle_time(&self) -> f64 {
        match &self.converge {
            Some(c) => c.end_time().max(self.birth.end_time()),
            None => self.birth.end_time(),
        }
    }

    pub fn is_converging(&self) -> bool {
        self.converge.is_some()
    }
}
