use chrono::{DateTime, Utc};

use crate::model::game_state::GameState;
use crate::model::job::JobClass;
use crate::model::message::Message;
use crate::model::phase::GamePhase;

pub enum EngineCommand {
    Proceed,
    ChooseFreshStart,
    ChooseLegacy,
    ChoosePerk(String),
    GoBack,
    ChooseJob(String),
    AdvancePrologue,
    SubmitAction(String),
    SaveSlot(usize),
    LoadSlot(usize),
    DeleteSlot(usize),
    SubmitCredential(String),
    ClearCredential,
}

pub enum EngineResponse {
    View(Box<SessionView>),
    Notices(Vec<Notice>),
    Credential(CredentialStatus),
}

/// Transient, auto-dismissed messages for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    PerkUnlocked(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::Info(t) | Notice::Warning(t) | Notice::Error(t) => t.clone(),
            Notice::PerkUnlocked(name) => format!("새 특성 해금: {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    Missing,
    Verifying,
    Accepted,
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub summary: String,
    pub timestamp: DateTime<Utc>,
    pub phase: GamePhase,
}

/// Everything the front-end needs to draw one frame.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub phase: GamePhase,
    pub messages: Vec<Message>,
    pub game_state: GameState,
    pub choices: Vec<String>,
    pub selected_perk: Option<String>,
    pub unlocked_perks: Vec<String>,
    pub jobs: Vec<JobClass>,
    pub prologue_lines: Vec<String>,
    pub slots: Vec<Option<SlotInfo>>,
    pub busy: bool,
}
