//! Point field that grows during the countdown and converges onto text.

pub(crate) mod engine;
pub(crate) mod glyph;
pub(crate) mod point;
pub(crate) mod targets;
