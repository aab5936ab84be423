use super::*;
use crate::config::model::GlyphSampling;
use crate::foundation::clock::ManualClock;
use crate::foundation::core::Bounds;
use crate::morph::engine::MorphPhase;
use crate::morph::glyph::GlyphMask;

struct Blank;

impl GlyphRaster for Blank {
    fn rasterize(&self, _: &str, b: Bounds, _: &GlyphSampling) -> SurpriseResult<GlyphMask> {
        let (w, h) = b.raster_size();
        GlyphMask::from_alpha(w, h, vec![0; (w * h) as usize])
    }
}

fn config(reduced: bool) -> PresentationConfig {
    PresentationConfig {
        bounds: Bounds::new(200.0, 100.0).unwrap(),
        reduced_motion: reduced,
        ..PresentationConfig::default()
    }
}

fn sequencer(cfg: PresentationConfig) -> (Sequencer<ManualClock, Rng64>, ManualClock) {
    let clock = ManualClock::new(0.0);
    let s = Sequencer::new(cfg, clock.clone(), Rng64::new(11), Box::new(Blank)).unwrap();
    (s, clock)
}

/// Started sequencer sitting in the Countdown scene, entered at `t = 1.0`.
fn in_countdown(cfg: PresentationConfig) -> (Sequencer<ManualClock, Rng64>, ManualClock) {
    let (mut s, clock) = sequencer(cfg);
    s.start();
    s.tick();
    clock.set(1.0);
    assert!(s.advance());
    s.tick();
    (s, clock)
}

fn count_of(events: &[SequencerEvent], pred: impl Fn(&SequencerEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn start_is_idempotent() {
    let (mut s, _clock) = sequencer(config(false));
    assert!(s.start());
    assert!(!s.start());
    let ev = s.tick();
    assert_eq!(count_of(&ev, |e| *e == SequencerEvent::Started), 1);
    assert_eq!(s.scene(), Scene::Opening);
    assert!(s.should_reschedule());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = PresentationConfig {
        total: 0,
        ..config(false)
    };
    let clock = ManualClock::new(0.0);
    assert!(Sequencer::new(cfg, clock, Rng64::new(0), Box::new(Blank)).is_err());
}

#[test]
fn opening_reveals_stats_then_hint() {
    let (mut s, clock) = sequencer(config(false));
    s.start();
    s.tick();
    assert!(s.affordances().is_empty());
    clock.set(1.0);
    s.tick();
    assert!(s.affordances().contains(&Affordance::Stats));
    assert!(!s.affordances().contains(&Affordance::Hint));
    clock.set(2.0);
    s.tick();
    assert!(s.affordances().contains(&Affordance::Hint));
}

#[test]
fn opening_reveal_is_immediate_under_reduced_motion() {
    let (mut s, _clock) = sequencer(config(true));
    s.start();
    s.tick();
    assert!(s.affordances().contains(&Affordance::Stats));
    assert!(s.affordances().contains(&Affordance::Hint));
}

#[test]
fn opening_reads_time_since() {
    let (mut s, clock) = sequencer(PresentationConfig {
        since_unix_ms: -7_200_000,
        ..config(false)
    });
    s.start();
    clock.set(5.0);
    s.tick();
    let since = s.snapshot().since.unwrap();
    assert_eq!(since.hours, 2);
    assert_eq!(since.seconds, 7_205);
}

#[test]
fn navigation_is_debounced() {
    let (mut s, clock) = sequencer(config(false));
    s.start();
    s.tick();
    clock.set(1.0);
    assert!(s.advance());
    clock.set(1.2);
    assert!(!s.retreat());
    assert_eq!(s.scene(), Scene::Countdown);
    clock.set(2.0);
    assert!(s.retreat());
    assert_eq!(s.scene(), Scene::Opening);
    clock.set(3.0);
    assert!(!s.retreat());
}

#[test]
fn countdown_cannot_be_skipped() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(5.0);
    s.tick();
    assert!(!s.advance());
    clock.set(6.0);
    assert!(!s.goto(Scene::Final));
    assert_eq!(s.scene(), Scene::Countdown);
}

#[test]
fn leaving_the_countdown_discards_it() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(6.5);
    s.tick();
    assert_eq!(s.engine().len(), 5);
    assert!(s.retreat());
    assert_eq!(s.scene(), Scene::Opening);
    assert!(s.countdown().is_none());
    assert!(s.engine().is_empty());

    clock.set(8.0);
    assert!(s.advance());
    s.tick();
    assert_eq!(s.display_count(), Some(28));
    clock.set(10.5);
    s.tick();
    assert_eq!(s.engine().len(), 2);
}

#[test]
fn point_count_tracks_elapsed_seconds() {
    let (mut s, clock) = in_countdown(config(false));
    let mut last_display = s.display_count().unwrap();
    for i in 0..=320u32 {
        let t = f64::from(i) / 10.0;
        clock.set(1.0 + t);
        s.tick();
        let expected = (t.floor() as usize).min(28);
        assert_eq!(s.engine().len(), expected, "at t = {t}");
        let shown = s.display_count().unwrap();
        assert!(shown <= last_display);
        assert!(shown <= 28);
        last_display = shown;
    }
    assert_eq!(last_display, 0);
}

#[test]
fn completion_fires_once_and_moves_to_reveal() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(1.0 + 27.4);
    s.tick();
    assert_eq!(s.engine().len(), 27);
    assert_eq!(s.display_count(), Some(1));
    assert!(!s.is_countdown_complete());

    let mut events = Vec::new();
    clock.set(1.0 + 28.0);
    events.extend(s.tick());
    assert_eq!(s.engine().len(), 28);
    assert_eq!(s.display_count(), Some(0));
    assert_eq!(s.scene(), Scene::Reveal);
    assert!(s.engine().is_finalized());

    for i in 1..40 {
        clock.set(29.0 + f64::from(i) * 0.1);
        events.extend(s.tick());
    }
    assert_eq!(
        count_of(&events, |e| *e == SequencerEvent::CountdownComplete),
        1
    );
    assert_eq!(
        count_of(&events, |e| matches!(e, SequencerEvent::MorphStarted { .. })),
        1
    );
}

#[test]
fn reveal_settles_into_final_with_letter_lines() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(29.0);
    s.tick();
    assert_eq!(s.scene(), Scene::Reveal);
    assert!(!s.affordances().contains(&Affordance::ActionButton));

    let m = s.config().motion.clone();
    let done_at = 29.0 + 27.0 * m.stagger_secs + m.converge_secs;
    clock.set(done_at + 0.01);
    let ev = s.tick();
    assert!(ev.contains(&SequencerEvent::MorphComplete));
    assert!(s.affordances().contains(&Affordance::ActionButton));
    assert_eq!(s.engine().phase(), MorphPhase::Settled);

    clock.set(29.0 + m.settle_delay_secs + 0.01);
    s.tick();
    assert_eq!(s.scene(), Scene::Final);
    assert!(s.affordances().contains(&Affordance::Line(0)));
    assert!(!s.affordances().contains(&Affordance::Line(1)));

    clock.set(29.0 + m.settle_delay_secs + 2.0 * m.line_interval_secs + 0.05);
    s.tick();
    assert!(s.affordances().contains(&Affordance::Line(1)));
    assert!(s.affordances().contains(&Affordance::Line(2)));
}

#[test]
fn retreating_from_final_does_not_bounce_back() {
    let (mut s, clock) = in_countdown(config(true));
    clock.set(29.0);
    s.tick();
    assert_eq!(s.scene(), Scene::Final);
    clock.set(30.0);
    assert!(s.retreat());
    assert_eq!(s.scene(), Scene::Reveal);
    assert!(!s.affordances().contains(&Affordance::Line(0)));
    clock.set(31.0);
    s.tick();
    assert_eq!(s.scene(), Scene::Reveal);
    clock.set(32.0);
    assert!(s.advance());
    s.tick();
    assert_eq!(s.scene(), Scene::Final);
    assert!(s.affordances().contains(&Affordance::Line(0)));
}

#[test]
fn reduced_motion_reaches_the_final_state_on_the_completion_tick() {
    let (mut s, clock) = in_countdown(config(true));
    clock.set(29.0);
    let ev = s.tick();
    assert!(ev.contains(&SequencerEvent::CountdownComplete));
    assert!(ev.contains(&SequencerEvent::MorphComplete));
    assert_eq!(s.scene(), Scene::Final);
    assert!(s.affordances().contains(&Affordance::ActionButton));
    for p in s.engine().points() {
        assert_eq!(Some(p.position), p.target);
    }
    let snap = s.snapshot();
    assert_eq!(snap.scene_progress, 1.0);
    assert_eq!(snap.count_eased, Some(0.0));
    assert_eq!(snap.glow, 1.0);
}

#[test]
fn clock_outage_freezes_the_sequence() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(6.5);
    s.tick();
    let before = (s.scene(), s.display_count(), s.engine().len());

    clock.make_unavailable();
    assert!(s.tick().is_empty());
    assert!(!s.advance());
    assert!(!s.retreat());
    assert_eq!((s.scene(), s.display_count(), s.engine().len()), before);

    clock.set(8.2);
    s.tick();
    assert_eq!(s.display_count(), Some(21));
    assert_eq!(s.engine().len(), 7);
}

#[test]
fn backwards_clock_never_raises_the_display() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(11.0);
    s.tick();
    assert_eq!(s.display_count(), Some(18));
    clock.set(3.0);
    s.tick();
    assert_eq!(s.display_count(), Some(18));
    assert_eq!(s.engine().len(), 10);
}

#[test]
fn stop_halts_everything() {
    let (mut s, clock) = in_countdown(config(false));
    s.stop();
    assert!(!s.should_reschedule());
    assert!(!s.is_running());
    let ev = s.tick();
    assert_eq!(ev, vec![SequencerEvent::Stopped]);
    clock.set(20.0);
    assert!(s.tick().is_empty());
    assert_eq!(s.engine().len(), 0);
    assert!(!s.advance());
}

#[test]
fn reset_allows_a_fresh_start() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(5.5);
    s.tick();
    s.reset();
    s.take_events();
    assert_eq!(s.scene(), Scene::Opening);
    assert!(s.engine().is_empty());
    assert!(s.start());
    assert!(s.tick().contains(&SequencerEvent::Started));
}

#[test]
fn auto_advance_leaves_the_opening() {
    let (mut s, clock) = sequencer(PresentationConfig {
        auto_advance_after: Some(2.0),
        ..config(false)
    });
    s.start();
    s.tick();
    clock.set(1.9);
    s.tick();
    assert_eq!(s.scene(), Scene::Opening);
    clock.set(2.0);
    s.tick();
    assert_eq!(s.scene(), Scene::Countdown);
    assert_eq!(s.display_count(), Some(28));
}

#[test]
fn video_finale_is_shown_and_hidden() {
    let (mut s, clock) = in_countdown(PresentationConfig {
        finale: FinalReveal::Video {
            source: "surprise.mp4".to_string(),
        },
        ..config(true)
    });
    clock.set(29.0);
    s.tick();
    assert_eq!(s.scene(), Scene::Final);
    assert!(s.affordances().contains(&Affordance::Video));
    clock.set(30.0);
    s.retreat();
    assert!(!s.affordances().contains(&Affordance::Video));
}

#[test]
fn count_up_direction_displays_elapsed() {
    let (mut s, clock) = in_countdown(PresentationConfig {
        direction: crate::config::model::CountDirection::Up,
        ..config(false)
    });
    assert_eq!(s.display_count(), Some(0));
    clock.set(4.0);
    s.tick();
    assert_eq!(s.display_count(), Some(3));
}

#[test]
fn snapshot_serializes() {
    let (mut s, clock) = in_countdown(config(false));
    clock.set(3.5);
    s.tick();
    let snap = s.snapshot();
    assert_eq!(snap.points.len(), 2);
    assert_eq!(snap.count, Some(26));
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["scene"], "countdown");
    assert_eq!(json["morph"]["phase"], "scatter");
}

#[test]
fn system_sequencer_starts_in_the_opening() {
    let mut s = Sequencer::with_system(config(false)).unwrap();
    assert!(s.start());
    s.tick();
    assert_eq!(s.scene(), Scene::Opening);
    assert!(s.snapshot().since.is_some());
}
