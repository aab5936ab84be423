/// Convenience result type used across the crate.
pub type SurpriseResult<T> = Result<T, SurpriseError>;

/// Top-level error taxonomy for construction, configuration and tooling boundaries.
///
/// The per-frame core never returns these: a running presentation degrades instead of failing.
#[derive(thiserror::Error, Debug)]
pub enum SurpriseError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building timed steps or tweens.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rendering text into an off-screen glyph mask.
    #[error("raster error: {0}")]
    Raster(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SurpriseError {
    /// Build a [`SurpriseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SurpriseError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`SurpriseError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`SurpriseError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
