use crate::foundation::error::{SurpriseError, SurpriseResult};

pub use kurbo::{Point, Rect};

/// Size of the display area in logical pixels.
///
/// This is the only layout-dependent geometry the core reads: it scales the scatter
/// radius and sizes the off-screen glyph raster.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Bounds {
    /// Build bounds, rejecting non-finite or non-positive sizes.
    pub fn new(width: f64, height: f64) -> SurpriseResult<Self> {
        let b = Self { width, height };
        b.validate()?;
        Ok(b)
    }

    /// Check that both sides are finite and strictly positive.
    pub fn validate(self) -> SurpriseResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(SurpriseError::validation("bounds must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(SurpriseError::validation("bounds width/height must be > 0"));
        }
        Ok(())
    }

    /// Center of the display area.
    pub fn center(self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Bounds as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Pixel dimensions for an off-screen raster covering the bounds.
    pub fn raster_size(self) -> (u32, u32) {
        let w = self.width.ceil().clamp(1.0, f64::from(u16::MAX)) as u32;
        let h = self.height.ceil().clamp(1.0, f64::from(u16::MAX)) as u32;
        (w, h)
    }
}

pub(crate) fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    a.lerp(b, t)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
