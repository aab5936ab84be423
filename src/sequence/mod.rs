//! Scene ordering, navigation and the timed countdown.

pub(crate) mod cooldown;
pub(crate) mod countdown;
pub(crate) mod scene;
pub(crate) mod sequencer;
pub(crate) mod since;
