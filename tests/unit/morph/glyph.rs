use super::*;

fn mask_with_ink(width: u32, height: u32, ink: &[(u32, u32)]) -> GlyphMask {
    let mut alpha = vec![0u8; (width * height) as usize];
    for &(x, y) in ink {
        alpha[(y * width + x) as usize] = 255;
    }
    GlyphMask::from_alpha(width, height, alpha).unwrap()
}

#[test]
fn from_alpha_checks_length() {
    assert!(GlyphMask::from_alpha(4, 4, vec![0; 15]).is_err());
    let m = GlyphMask::from_alpha(4, 4, vec![0; 16]).unwrap();
    assert_eq!((m.width(), m.height()), (4, 4));
    assert_eq!(m.alpha_at(3, 3), Some(0));
    assert_eq!(m.alpha_at(4, 0), None);
}

#[test]
fn candidates_respect_threshold_and_stride() {
    let mut m = mask_with_ink(6, 2, &[(0, 0), (1, 0), (2, 0), (4, 0)]);
    assert_eq!(m.candidates(128, 1).len(), 4);
    // Stride 2 only visits even columns of even rows.
    assert_eq!(
        m.candidates(128, 2),
        vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(4.0, 0.0)]
    );
    assert!(m.candidates(255, 1).is_empty());

    m = m.with_origin(Point::new(10.0, 20.0));
    assert_eq!(m.candidates(128, 4), vec![Point::new(10.0, 20.0), Point::new(14.0, 20.0)]);
}

#[test]
fn zero_stride_is_treated_as_one() {
    let m = mask_with_ink(3, 1, &[(1, 0)]);
    assert_eq!(m.candidates(0, 0), vec![Point::new(1.0, 0.0)]);
}

#[test]
fn svg_source_escapes_markup() {
    let svg = SvgTextRaster::svg_source(
        "<3 & \"you\"",
        100,
        50,
        &GlyphSampling::default(),
        12.0,
    );
    assert!(svg.contains("&lt;3 &amp; &quot;you&quot;"));
    assert!(svg.contains(r#"width="100""#));
    assert!(svg.contains(r#"x="50""#));
    assert!(!svg.contains("<3"));
}

#[test]
fn empty_text_rasterizes_to_an_empty_mask() {
    let raster = SvgTextRaster::new(None);
    let bounds = Bounds::new(64.0, 32.0).unwrap();
    let mask = raster
        .rasterize("", bounds, &GlyphSampling::default())
        .unwrap();
    assert_eq!((mask.width(), mask.height()), (64, 32));
    assert!(mask.candidates(128, 1).is_empty());
}

#[test]
fn oversized_bounds_are_refused_before_allocating() {
    let raster = SvgTextRaster::new(None);
    let huge = Bounds::new(60_000.0, 60_000.0).unwrap();
    let err = raster
        .rasterize("Hi", huge, &GlyphSampling::default())
        .unwrap_err();
    assert!(err.to_string().starts_with("raster error:"));

    let edge = Bounds::new(f64::from(MAX_RASTER_DIM) + 1.0, 10.0).unwrap();
    assert!(raster.rasterize("", edge, &GlyphSampling::default()).is_err());
}
