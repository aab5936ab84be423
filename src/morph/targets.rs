use crate::config::model::GlyphSampling;
use crate::foundation::core::{Bounds, Point};
use crate::foundation::rng::RandomSource;
use crate::morph::glyph::GlyphRaster;

/// Exactly `count` text-shaped target points, sorted left to right.
///
/// The text is rasterized off-screen and sampled for inked pixels. Candidates inside the
/// bounds are split into `count` equal-width columns by x and one candidate is drawn per column (any
/// candidate when a column is empty). Raster failures and masks with fewer than `count`
/// candidates fall back to [`fallback_line`]; this never fails.
#[tracing::instrument(skip(raster, sampling, rng))]
pub fn compute_targets(
    raster: &dyn GlyphRaster,
    text: &str,
    count: usize,
    bounds: Bounds,
    sampling: &GlyphSampling,
    rng: &mut dyn RandomSource,
) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }

    let mask = match raster.rasterize(text, bounds, sampling) {
        Ok(mask) => mask,
        Err(e) => {
            tracing::warn!(error = %e, "glyph raster failed; using fallback line");
            return fallback_line(count, bounds, sampling.fallback_margin_frac);
        }
    };

    let area = bounds.rect();
    let candidates: Vec<Point> = mask
        .candidates(sampling.threshold, sampling.stride)
        .into_iter()
        .filter(|p| area.contains(*p))
        .collect();
    if candidates.len() < count {
        tracing::debug!(
            candidates = candidates.len(),
            count,
            "too few glyph candidates; using fallback line"
        );
        return fallback_line(count, bounds, sampling.fallback_margin_frac);
    }

    pick_per_column(&candidates, count, rng)
}

/// `count` evenly spaced points on the horizontal center line, ascending in x.
pub fn fallback_line(count: usize, bounds: Bounds, margin_frac: f64) -> Vec<Point> {
    let margin = bounds.width * margin_frac.clamp(0.0, 0.49);
    let span = bounds.width - 2.0 * margin;
    let y = bounds.center().y;
    (0..count)
        .map(|i| Point::new(margin + span * (i as f64 + 0.5) / count as f64, y))
        .collect()
}

/// One pseudo-random candidate per equal-width x column, sorted by x (then y).
///
/// `candidates` must be non-empty when `count > 0`.
pub fn pick_per_column(
    candidates: &[Point],
    count: usize,
    rng: &mut dyn RandomSource,
) -> Vec<Point> {
    if count == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let (min_x, max_x) = candidates
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });
    let column_w = (max_x - min_x) / count as f64;

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (i, p) in candidates.iter().enumerate() {
        let col = if column_w > 0.0 {
            (((p.x - min_x) / column_w).floor() as usize).min(count - 1)
        } else {
            0
        };
        columns[col].push(i);
    }

    let mut out: Vec<Point> = columns
        .iter()
        .map(|col| {
            if col.is_empty() {
                candidates[rng.index(candidates.len())]
            } else {
                candidates[col[rng.index(col.len())]]
            }
        })
        .collect();
    out.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/morph/targets.rs"]
mod tests;
