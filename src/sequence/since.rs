/// Time elapsed since a fixed moment, as shown on the opening scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SinceReadout {
    pub hours: u64,
    pub seconds: u64,
}

impl SinceReadout {
    /// Whole hours and seconds from `epoch_ms` to `now_ms`, clamped at zero.
    pub fn between(epoch_ms: i64, now_ms: i64) -> Self {
        let diff = now_ms.saturating_sub(epoch_ms).max(0) as u64;
        Self {
            hours: diff / 3_600_000,
            seconds: diff / 1_000,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/since.rs"]
mod tests;
