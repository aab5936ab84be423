use super::*;

#[test]
fn rapid_calls_are_absorbed() {
    let mut c = Cooldown::new(0.52);
    assert!(c.try_acquire(1.0));
    assert!(!c.try_acquire(1.1));
    assert!(!c.try_acquire(1.5));
    assert!(c.try_acquire(1.6));
}

#[test]
fn zero_window_never_blocks() {
    let mut c = Cooldown::new(0.0);
    assert!(c.try_acquire(1.0));
    assert!(c.try_acquire(1.0));
}

#[test]
fn reset_and_bad_readings() {
    let mut c = Cooldown::new(10.0);
    assert!(!c.try_acquire(f64::NAN));
    assert!(c.try_acquire(5.0));
    c.reset();
    assert!(c.try_acquire(5.1));
    assert!(c.try_acquire(2.0));
    assert_eq!(c.window(), 10.0);
}
