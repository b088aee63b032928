use log::{debug, error, info, warn};
use thiserror::Error;

use crate::engine::backend::{BackendError, BackendRef, ChatSession};
use crate::engine::hud_decoder::decode_hud;
use crate::engine::interceptor::{intercept, strip_directives, ControlContext, Interception};
use crate::engine::phase_machine::{
    transition, PhaseEffect, PhaseError, PhaseEvent, PhaseGuards, Transition,
};
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{Notice, SessionView, SlotInfo};
use crate::engine::response_parser::parse_response;
use crate::engine::save_manager::{SaveError, SaveManager};
use crate::model::game_save::SaveFile;
use crate::model::game_state::{merge_game_state, GameState};
use crate::model::job::{default_jobs, find_job, PROLOGUE_LINES};
use crate::model::message::{Message, Role};
use crate::model::parsed_response::ParsedResponse;
use crate::model::perks::UnlockedPerks;
use crate::model::phase::GamePhase;
use crate::storage::repository::{load_perks, save_perks};
use crate::storage::store::StoreRef;

pub const RESET_NOTICE: &str = "이야기가 끝났습니다. 새로운 회차를 시작하세요.";
pub const RESUMED_NOTICE: &str = "저장된 세션을 이어서 진행합니다.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a request is already in progress")]
    Busy,

    #[error("actions can only be sent while playing")]
    NotPlaying,

    #[error("cannot save during the prologue")]
    SaveDuringPrologue,

    #[error("empty action")]
    EmptyInput,

    #[error("unknown class '{0}'")]
    UnknownJob(String),

    #[error("no conversation session is active")]
    NoChatSession,

    #[error("class selection did not request an opening scene")]
    NoOpeningRequest,

    #[error("save slot {0} is empty")]
    EmptySlot(usize),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Opening,
    Action,
    Resume,
}

/// A backend request that has been accepted but not sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub kind: TurnKind,
    pub text: String,
}

/// Side effects of one phase step that the caller has to act on.
#[derive(Debug, Default)]
struct Applied {
    notices: Vec<Notice>,
    /// Set when the step asked for the opening scene; the caller sends it.
    opening_prompt: Option<String>,
}

/// One playthrough plus the installation-wide perk ledger.
///
/// Every operation runs to completion; the only blocking call is
/// [`GameSession::run_turn`]. Callers start a request with one of the
/// `choose_job` / `begin_turn` / `load_slot` operations, which set the busy
/// flag, and finish it with `run_turn`.
#[derive(Debug)]
pub struct GameSession {
    backend: BackendRef,
    store: StoreRef,
    saves: SaveManager,
    perks: UnlockedPerks,
    prologue_enabled: bool,

    phase: GamePhase,
    messages: Vec<Message>,
    game_state: GameState,
    selected_perk: Option<String>,
    latest: Option<ParsedResponse>,
    chat: Option<ChatSession>,
    busy: bool,
}

impl GameSession {
    pub fn new(backend: BackendRef, store: StoreRef, prologue_enabled: bool) -> Self {
        let perks = load_perks(store.as_ref());
        let saves = SaveManager::open(store.clone());

        Self {
            backend,
            store,
            saves,
            perks,
            prologue_enabled,
            phase: GamePhase::Intro,
            messages: Vec::new(),
            game_state: GameState::default(),
            selected_perk: None,
            latest: None,
            chat: None,
            busy: false,
        }
    }

    /// Swap the backend, e.g. after a new credential was accepted. The
    /// current conversation keeps its history.
    pub fn replace_backend(&mut self, backend: BackendRef) {
        self.backend = backend;
    }

    pub fn choices(&self) -> &[String] {
        self.latest.as_ref().map(|p| p.choices.as_slice()).unwrap_or(&[])
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase.clone(),
            messages: self.messages.clone(),
            game_state: self.game_state.clone(),
            choices: self.choices().to_vec(),
            selected_perk: self.selected_perk.clone(),
            unlocked_perks: self.perks.names().to_vec(),
            jobs: default_jobs(),
            prologue_lines: PROLOGUE_LINES.iter().map(|l| l.to_string()).collect(),
            slots: self.slot_summaries(),
            busy: self.busy,
        }
    }

    pub fn slot_summaries(&self) -> Vec<Option<SlotInfo>> {
        self.saves
            .slots()
            .iter()
            .map(|slot| {
                slot.as_ref().map(|save| SlotInfo {
                    summary: save.summary.clone(),
                    timestamp: save.timestamp,
                    phase: save.phase.clone(),
                })
            })
            .collect()
    }

    /* -------- phase flow -------- */

    pub fn proceed(&mut self) -> Result<Vec<Notice>, SessionError> {
        self.apply(PhaseEvent::Proceed)
    }

    pub fn choose_fresh_start(&mut self) -> Result<Vec<Notice>, SessionError> {
        self.apply(PhaseEvent::ChooseFreshStart)
    }

    pub fn choose_legacy(&mut self) -> Result<Vec<Notice>, SessionError> {
        self.apply(PhaseEvent::ChooseLegacy)
    }

    pub fn choose_perk(&mut self, name: &str) -> Result<Vec<Notice>, SessionError> {
        self.apply(PhaseEvent::ChoosePerk(name.to_string()))
    }

    pub fn go_back(&mut self) -> Result<Vec<Notice>, SessionError> {
        self.apply(PhaseEvent::Back)
    }

    /// Reveal the next prologue line. Ticks still queued after the prologue
    /// ended (opening failed, reset, or play already started) are dropped.
    pub fn advance_prologue(&mut self) -> Result<Vec<Notice>, SessionError> {
        if !matches!(self.phase, GamePhase::Prologue { .. }) {
            debug!("dropping prologue tick during {}", self.phase);
            return Ok(Vec::new());
        }
        self.apply(PhaseEvent::RevealPrologueLine)
    }

    /// Pick a class. Starts a fresh conversation and returns the opening
    /// request to run.
    pub fn choose_job(&mut self, job_id: &str) -> Result<PendingTurn, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        let job = find_job(job_id).ok_or_else(|| SessionError::UnknownJob(job_id.to_string()))?;

        let prompt = self
            .step(PhaseEvent::ChooseJob(job))?
            .opening_prompt
            .ok_or(SessionError::NoOpeningRequest)?;

        info!("starting new run");
        self.messages.push(Message::user(prompt.clone()));
        self.busy = true;

        Ok(PendingTurn {
            kind: TurnKind::Opening,
            text: prompt,
        })
    }

    /* -------- turns -------- */

    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        if self.phase != GamePhase::Playing {
            return Err(SessionError::NotPlaying);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.chat.is_none() {
            return Err(SessionError::NoChatSession);
        }

        self.messages.push(Message::user(text));
        self.busy = true;

        Ok(PendingTurn {
            kind: TurnKind::Action,
            text: text.to_string(),
        })
    }

    /// Send the request to the backend and fold the reply into the session.
    pub fn run_turn(&mut self, pending: PendingTurn) -> Vec<Notice> {
        info!("sending {:?} turn", pending.kind);

        let result = match self.chat.as_mut() {
            Some(chat) => self.backend.send_turn(chat, &pending.text),
            None => Err(BackendError::InvalidResponse("no active session".into())),
        };

        self.complete_turn(pending.kind, result)
    }

    pub fn complete_turn(
        &mut self,
        kind: TurnKind,
        result: Result<String, BackendError>,
    ) -> Vec<Notice> {
        self.busy = false;

        match (kind, result) {
            (TurnKind::Resume, Ok(_)) => {
                info!("restored session acknowledged by backend");
                vec![Notice::Info(RESUMED_NOTICE.into())]
            }
            (TurnKind::Resume, Err(e)) => {
                error!("session restore failed: {e}");
                vec![Notice::Error(format!(
                    "세션 복원에 실패했습니다: {}",
                    e.user_message()
                ))]
            }
            (kind, Ok(reply)) => self.accept_reply(kind, reply),
            (kind, Err(e)) => {
                error!("turn failed: {e}");
                self.messages
                    .push(Message::system(format!("⚠ {}", e.user_message())));

                let mut notices = vec![Notice::Error(e.user_message())];
                if kind == TurnKind::Opening {
                    notices.extend(self.apply_or_log(PhaseEvent::OpeningSceneFailed));
                }
                notices
            }
        }
    }

    fn accept_reply(&mut self, kind: TurnKind, reply: String) -> Vec<Notice> {
        let unlocked = match intercept(&reply, self) {
            Interception::Reset => return vec![Notice::Warning(RESET_NOTICE.into())],
            Interception::Continue { unlocked_perk } => unlocked_perk,
        };

        let parsed = parse_response(&strip_directives(&reply));
        if let Some(hud) = &parsed.hud_raw {
            self.game_state = merge_game_state(&self.game_state, &decode_hud(hud));
        }
        self.messages.push(Message::model(reply));
        self.latest = Some(parsed);

        let mut notices = Vec::new();
        if let Some(name) = unlocked {
            notices.push(Notice::PerkUnlocked(name));
        }
        if kind == TurnKind::Opening {
            notices.extend(self.apply_or_log(PhaseEvent::OpeningSceneReady));
        }
        notices
    }

    /* -------- save slots -------- */

    pub fn save_slot(&mut self, slot: usize) -> Result<Vec<Notice>, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        if matches!(self.phase, GamePhase::Prologue { .. }) {
            return Err(SessionError::SaveDuringPrologue);
        }

        let save = SaveFile::new(
            self.messages.clone(),
            self.game_state.clone(),
            self.phase.clone(),
            self.selected_perk.clone(),
        );
        self.saves.save(slot, save)?;

        Ok(vec![Notice::Info(format!("슬롯 {}에 저장했습니다.", slot + 1))])
    }

    /// Restore a slot. Local state is replaced immediately; the returned
    /// request replays the log to the backend and may still fail.
    pub fn load_slot(&mut self, slot: usize) -> Result<Option<PendingTurn>, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        let save = self.saves.load(slot)?.ok_or(SessionError::EmptySlot(slot))?;

        let next = self.next(PhaseEvent::LoadSave(save.phase))?;
        self.phase = next.phase;
        self.messages = save.messages;
        self.game_state = save.game_state;
        self.selected_perk = save.selected_perk;
        self.latest = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Model)
            .map(|m| parse_response(&strip_directives(&m.content)));

        self.chat = Some(ChatSession::with_history(
            PromptBuilder::system_instruction(),
            &self.messages,
        ));
        info!("loaded slot {slot} into {}", self.phase);

        if !self.messages.iter().any(Message::is_conversational) {
            return Ok(None);
        }

        self.busy = true;
        Ok(Some(PendingTurn {
            kind: TurnKind::Resume,
            text: PromptBuilder::resume_notice(&self.game_state, self.selected_perk.as_deref()),
        }))
    }

    pub fn delete_slot(&mut self, slot: usize) -> Result<Vec<Notice>, SessionError> {
        self.saves.delete(slot)?;
        Ok(vec![Notice::Info(format!("슬롯 {}을 비웠습니다.", slot + 1))])
    }

    /* -------- phase plumbing -------- */

    fn guards(&self) -> PhaseGuards<'_> {
        PhaseGuards {
            unlocked_perks: &self.perks,
            prologue_lines: self.prologue_enabled.then_some(PROLOGUE_LINES.len()),
        }
    }

    fn next(&self, event: PhaseEvent) -> Result<Transition, PhaseError> {
        transition(&self.phase, event, &self.guards())
    }

    fn apply(&mut self, event: PhaseEvent) -> Result<Vec<Notice>, SessionError> {
        Ok(self.step(event)?.notices)
    }

    fn step(&mut self, event: PhaseEvent) -> Result<Applied, SessionError> {
        let next = self.next(event)?;
        if next.phase != self.phase {
            info!("phase {} -> {}", self.phase, next.phase);
        }
        self.phase = next.phase;

        let mut applied = Applied::default();
        for effect in next.effects {
            match effect {
                PhaseEffect::Warn(text) => applied.notices.push(Notice::Warning(text)),
                PhaseEffect::SelectPerk(perk) => self.selected_perk = perk,
                PhaseEffect::ClearProgress => {
                    self.messages.clear();
                    self.game_state = GameState::default();
                    self.latest = None;
                }
                PhaseEffect::ClearAll => {
                    self.messages.clear();
                    self.game_state = GameState::default();
                    self.latest = None;
                    self.selected_perk = None;
                }
                PhaseEffect::CreateFreshSession => {
                    let chat = self
                        .backend
                        .create_session(&PromptBuilder::system_instruction());
                    info!("new conversation session {}", chat.id);
                    self.chat = Some(chat);
                }
                PhaseEffect::RequestOpeningScene(job) => {
                    applied.opening_prompt = Some(PromptBuilder::opening_scene(
                        &job,
                        self.selected_perk.as_deref(),
                    ));
                }
            }
        }

        Ok(applied)
    }

    /// For events raised by replies, where an illegal transition means the
    /// player moved on in the meantime.
    fn apply_or_log(&mut self, event: PhaseEvent) -> Vec<Notice> {
        self.apply(event).unwrap_or_else(|e| {
            warn!("ignoring phase event: {e}");
            Vec::new()
        })
    }
}

#[cfg(test)]
impl GameSession {
    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn selected_perk(&self) -> Option<&str> {
        self.selected_perk.as_deref()
    }

    pub fn unlocked_perks(&self) -> &UnlockedPerks {
        &self.perks
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

impl ControlContext for GameSession {
    fn reset_session(&mut self) {
        self.apply_or_log(PhaseEvent::Reset);
    }

    fn unlock_perk(&mut self, name: &str) -> bool {
        if !self.perks.unlock(name) {
            return false;
        }
        if let Err(e) = save_perks(self.store.as_ref(), &self.perks) {
            error!("failed to persist unlocked perks: {e}");
        }
        true
    }
}
