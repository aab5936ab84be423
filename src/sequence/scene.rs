/// Mutually exclusive presentation stage, in playback order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Opening,
    Countdown,
    Reveal,
    Final,
}

impl Scene {
    pub const ALL: [Scene; 4] = [Scene::Opening, Scene::Countdown, Scene::Reveal, Scene::Final];

    pub fn index(self) -> usize {
        match self {
            Self::Opening => 0,
            Self::Countdown => 1,
            Self::Reveal => 2,
            Self::Final => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Following scene, `None` at the end.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Preceding scene, `None` at the start.
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Scenes that only make sense once the countdown has completed.
    pub fn requires_completed_countdown(self) -> bool {
        matches!(self, Self::Reveal | Self::Final)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Countdown => "countdown",
            Self::Reveal => "reveal",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// UI element the renderer shows or hides on cue.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    /// "Time since" figures on the opening scene.
    Stats,
    /// Scroll/swipe hint on the opening scene.
    Hint,
    /// Call to action shown once the morph has settled.
    ActionButton,
    /// One line of the final letter.
    Line(usize),
    /// Final video.
    Video,
}

/// Schedule cue used by scene timelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Show(Affordance),
    Hide(Affordance),
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/scene.rs"]
mod tests;
