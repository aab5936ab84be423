use super::*;

#[test]
fn defaults_validate() {
    let cfg = PresentationConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.total, 28);
    assert_eq!(cfg.since_unix_ms, DEFAULT_SINCE_UNIX_MS);
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "total": 5, "message": "Hi", "reduced_motion": true, "motion": { "converge_secs": 2.0 } }"#;
    let cfg = PresentationConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.total, 5);
    assert_eq!(cfg.message, "Hi");
    assert_eq!(cfg.motion.converge_secs, 2.0);
    assert_eq!(cfg.motion.birth_secs, MotionProfile::default().birth_secs);
    assert_eq!(cfg.glyph, GlyphSampling::default());
}

#[test]
fn finale_variants_parse() {
    let json = r#"{ "finale": { "kind": "video", "source": "clip.mp4" } }"#;
    let cfg = PresentationConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(
        cfg.finale,
        FinalReveal::Video {
            source: "clip.mp4".to_string()
        }
    );

    let json = r#"{ "finale": { "kind": "video", "source": "  " } }"#;
    assert!(PresentationConfig::from_reader(json.as_bytes()).is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PresentationConfig::from_reader(r#"{ "totl": 3 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn out_of_range_values_are_rejected() {
    let mut cfg = PresentationConfig {
        total: 0,
        ..PresentationConfig::default()
    };
    assert!(cfg.validate().is_err());

    cfg.total = 28;
    cfg.motion.converge_secs = -1.0;
    assert!(cfg.validate().is_err());

    cfg.motion = MotionProfile::default();
    cfg.glyph.stride = 0;
    assert!(cfg.validate().is_err());

    cfg.glyph = GlyphSampling::default();
    cfg.auto_advance_after = Some(f64::INFINITY);
    assert!(cfg.validate().is_err());
}

#[test]
fn reduced_profile_zeroes_transitions() {
    let base = MotionProfile::default();
    let r = base.effective(true);
    assert_eq!(r.birth_secs, 0.0);
    assert_eq!(r.converge_secs, 0.0);
    assert_eq!(r.stagger_secs, 0.0);
    assert_eq!(r.scene_fade_secs, 0.0);
    assert_eq!(r.settle_delay_secs, 0.0);
    assert_eq!(r.nav_cooldown_secs, base.reduced_nav_cooldown_secs);
    assert_eq!(r.max_frame_dt, base.max_frame_dt);
    assert_eq!(base.effective(false), base);
}

#[test]
fn font_size_tracks_the_tighter_axis() {
    let g = GlyphSampling::default();
    let wide = Bounds::new(2000.0, 100.0).unwrap();
    assert!((g.font_px(wide) - 22.0).abs() < 1e-9);
    let tall = Bounds::new(100.0, 2000.0).unwrap();
    assert!((g.font_px(tall) - 11.0).abs() < 1e-9);
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = PresentationConfig::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
