pub(crate) mod ease;
pub(crate) mod frame;
pub(crate) mod schedule;
pub(crate) mod tween;
