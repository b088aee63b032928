use serde::{Deserialize, Serialize};

/// Which screen the game is on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum GamePhase {
    /// Title / warning screen.
    #[default]
    Intro,
    /// Fresh start, legacy start, or load.
    Selection,
    PerkSelection,
    JobSelection,
    /// Cinematic reveal. Play starts once every line is shown and the
    /// opening scene has arrived.
    Prologue {
        revealed: usize,
        total: usize,
        opening_ready: bool,
    },
    Playing,
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Intro => "intro",
            GamePhase::Selection => "selection",
            GamePhase::PerkSelection => "perk-selection",
            GamePhase::JobSelection => "job-selection",
            GamePhase::Prologue { .. } => "prologue",
            GamePhase::Playing => "playing",
        }
    }

    pub fn prologue(total: usize) -> Self {
        GamePhase::Prologue {
            revealed: 0,
            total,
            opening_ready: false,
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
