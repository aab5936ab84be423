use super::*;

#[test]
fn order_is_clamped_at_both_ends() {
    assert_eq!(Scene::Opening.prev(), None);
    assert_eq!(Scene::Opening.next(), Some(Scene::Countdown));
    assert_eq!(Scene::Reveal.prev(), Some(Scene::Countdown));
    assert_eq!(Scene::Final.next(), None);
    for s in Scene::ALL {
        assert_eq!(Scene::from_index(s.index()), Some(s));
    }
}

#[test]
fn late_scenes_need_the_countdown() {
    assert!(!Scene::Opening.requires_completed_countdown());
    assert!(!Scene::Countdown.requires_completed_countdown());
    assert!(Scene::Reveal.requires_completed_countdown());
    assert!(Scene::Final.requires_completed_countdown());
}

#[test]
fn names_serialize_in_snake_case() {
    assert_eq!(serde_json::to_string(&Scene::Countdown).unwrap(), "\"countdown\"");
    assert_eq!(
        serde_json::to_string(&Affordance::ActionButton).unwrap(),
        "\"action_button\""
    );
    assert_eq!(serde_json::to_string(&Affordance::Line(2)).unwrap(), "{\"line\":2}");
    assert_eq!(Scene::Final.to_string(), "final");
}
