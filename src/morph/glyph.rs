use std::path::Path;
use std::sync::Arc;

use crate::config::model::GlyphSampling;
use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::{SurpriseError, SurpriseResult};

/// Disposable alpha raster of rendered text.
///
/// Built once per morph, sampled for candidate coordinates, then dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    /// Display-space position of pixel `(0, 0)`.
    origin: Point,
}

impl GlyphMask {
    /// Wrap a row-major alpha buffer of `width * height` bytes.
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> SurpriseResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| SurpriseError::raster("glyph mask size overflows"))?;
        if alpha.len() != expected {
            return Err(SurpriseError::raster(format!(
                "glyph mask expects {expected} alpha bytes, got {}",
                alpha.len()
            )));
        }
        Ok(Self {
            width,
            height,
            alpha,
            origin: Point::ZERO,
        })
    }

    /// Place the mask so that pixel `(0, 0)` lands at `origin` in display space.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.alpha
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Display-space coordinates of every `stride`-th pixel whose alpha exceeds `threshold`,
    /// in row-major order.
    pub fn candidates(&self, threshold: u8, stride: u32) -> Vec<Point> {
        let stride = stride.max(1) as usize;
        let w = self.width as usize;
        let mut out = Vec::new();
        for y in (0..self.height as usize).step_by(stride) {
            let row = &self.alpha[y * w..(y + 1) * w];
            for x in (0..w).step_by(stride) {
                if row[x] > threshold {
                    out.push(Point::new(
                        self.origin.x + x as f64,
                        self.origin.y + y as f64,
                    ));
                }
            }
        }
        out
    }
}

/// Renders text into an off-screen [`GlyphMask`] covering the display bounds.
pub trait GlyphRaster {
    fn rasterize(
        &self,
        text: &str,
        bounds: Bounds,
        sampling: &GlyphSampling,
    ) -> SurpriseResult<GlyphMask>;
}

/// [`GlyphRaster`] backed by `usvg` text layout and the `resvg` CPU rasterizer.
///
/// Text is centered in the bounds. Glyphs come from the system font database plus an
/// optional extra directory; with no usable font the mask simply comes back empty.
#[derive(Clone)]
pub struct SvgTextRaster {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgTextRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgTextRaster")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl SvgTextRaster {
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "glyph font database loaded");
        Self {
            fontdb: Arc::new(db),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn svg_source(
        text: &str,
        width: u32,
        height: u32,
        sampling: &GlyphSampling,
        font_px: f64,
    ) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<text x="{cx}" y="{cy}" font-family="{family}" font-weight="{weight}" font-size="{size}" "#,
                r##"text-anchor="middle" dominant-baseline="central" fill="#ffffff">{text}</text></svg>"##
            ),
            w = width,
            h = height,
            cx = f64::from(width) * 0.5,
            cy = f64::from(height) * 0.5,
            family = escape_xml(&sampling.font_family),
            weight = sampling.font_weight,
            size = font_px,
            text = escape_xml(text),
        )
    }
}

impl Default for SvgTextRaster {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Largest raster side [`SvgTextRaster`] will allocate.
pub const MAX_RASTER_DIM: u32 = 16_384;

impl GlyphRaster for SvgTextRaster {
    #[tracing::instrument(skip(self, sampling), fields(chars = text.chars().count()))]
    fn rasterize(
        &self,
        text: &str,
        bounds: Bounds,
        sampling: &GlyphSampling,
    ) -> SurpriseResult<GlyphMask> {
        bounds.validate()?;
        let (width, height) = bounds.raster_size();
        if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
            return Err(SurpriseError::raster(format!(
                "glyph raster size too large: {width}x{height} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
            )));
        }
        let font_px = sampling.font_px(bounds);
        let svg = Self::svg_source(text, width, height, sampling, font_px);

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
            .map_err(|e| SurpriseError::raster(format!("parse text svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| SurpriseError::raster("failed to allocate glyph pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let alpha = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();
        GlyphMask::from_alpha(width, height, alpha)
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/morph/glyph.rs"]
mod tests;
