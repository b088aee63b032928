use log::warn;
use thiserror::Error;

use crate::model::job::JobClass;
use crate::model::perks::UnlockedPerks;
use crate::model::phase::GamePhase;

pub const NO_PERKS_WARNING: &str =
    "아직 해금된 특성이 없습니다. 먼저 새 게임에서 특성을 획득하세요.";
pub const OPENING_FAILED_WARNING: &str =
    "첫 장면을 불러오지 못했습니다. 직업을 다시 선택해 주세요.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    Proceed,
    ChooseFreshStart,
    ChooseLegacy,
    ChoosePerk(String),
    Back,
    ChooseJob(JobClass),
    RevealPrologueLine,
    OpeningSceneReady,
    OpeningSceneFailed,
    Reset,
    LoadSave(GamePhase),
}

impl PhaseEvent {
    fn name(&self) -> &'static str {
        match self {
            PhaseEvent::Proceed => "proceed",
            PhaseEvent::ChooseFreshStart => "choose-fresh-start",
            PhaseEvent::ChooseLegacy => "choose-legacy",
            PhaseEvent::ChoosePerk(_) => "choose-perk",
            PhaseEvent::Back => "back",
            PhaseEvent::ChooseJob(_) => "choose-job",
            PhaseEvent::RevealPrologueLine => "reveal-prologue-line",
            PhaseEvent::OpeningSceneReady => "opening-scene-ready",
            PhaseEvent::OpeningSceneFailed => "opening-scene-failed",
            PhaseEvent::Reset => "reset",
            PhaseEvent::LoadSave(_) => "load-save",
        }
    }
}

/// What the caller has to do after moving to the new phase, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEffect {
    Warn(String),
    SelectPerk(Option<String>),
    /// Clear log and decoded state, keep the selected perk.
    ClearProgress,
    /// Clear log, decoded state and selected perk.
    ClearAll,
    CreateFreshSession,
    RequestOpeningScene(JobClass),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub phase: GamePhase,
    pub effects: Vec<PhaseEffect>,
}

impl Transition {
    fn to(phase: GamePhase) -> Self {
        Self {
            phase,
            effects: Vec::new(),
        }
    }

    fn with(phase: GamePhase, effects: Vec<PhaseEffect>) -> Self {
        Self { phase, effects }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("'{event}' is not allowed during {from}")]
    IllegalTransition { from: &'static str, event: &'static str },

    #[error("perk '{0}' has not been unlocked")]
    UnknownPerk(String),
}

/// Facts the guards depend on.
pub struct PhaseGuards<'a> {
    pub unlocked_perks: &'a UnlockedPerks,
    /// `None` skips the prologue entirely.
    pub prologue_lines: Option<usize>,
}

/// Compute the next phase. An illegal event leaves the caller's phase
/// untouched and returns an error.
pub fn transition(
    current: &GamePhase,
    event: PhaseEvent,
    guards: &PhaseGuards<'_>,
) -> Result<Transition, PhaseError> {
    use GamePhase as P;
    use PhaseEffect as E;

    let next = match (current, event) {
        (_, PhaseEvent::Reset) => Transition::with(
            P::Selection,
            vec![E::ClearAll, E::CreateFreshSession],
        ),

        (_, PhaseEvent::LoadSave(phase)) => match phase {
            P::Prologue { .. } => {
                warn!("save recorded mid-prologue, resuming into play");
                Transition::to(P::Playing)
            }
            phase => Transition::to(phase),
        },

        (P::Intro, PhaseEvent::Proceed) => Transition::to(P::Selection),

        (P::Selection, PhaseEvent::ChooseFreshStart) => {
            Transition::with(P::JobSelection, vec![E::SelectPerk(None)])
        }

        (P::Selection, PhaseEvent::ChooseLegacy) => {
            if guards.unlocked_perks.is_empty() {
                Transition::with(P::Selection, vec![E::Warn(NO_PERKS_WARNING.into())])
            } else {
                Transition::to(P::PerkSelection)
            }
        }

        (P::PerkSelection, PhaseEvent::ChoosePerk(name)) => {
            if !guards.unlocked_perks.contains(&name) {
                return Err(PhaseError::UnknownPerk(name));
            }
            Transition::with(P::JobSelection, vec![E::SelectPerk(Some(name))])
        }

        (P::PerkSelection | P::JobSelection, PhaseEvent::Back) => {
            Transition::with(P::Selection, vec![E::SelectPerk(None)])
        }

        (P::JobSelection, PhaseEvent::ChooseJob(job)) => {
            let phase = match guards.prologue_lines {
                Some(total) => P::prologue(total),
                None => P::JobSelection,
            };
            Transition::with(
                phase,
                vec![
                    E::ClearProgress,
                    E::CreateFreshSession,
                    E::RequestOpeningScene(job),
                ],
            )
        }

        (
            P::Prologue {
                revealed,
                total,
                opening_ready,
            },
            PhaseEvent::RevealPrologueLine,
        ) => Transition::to(prologue_step(
            (*revealed + 1).min(*total),
            *total,
            *opening_ready,
        )),

        (P::Prologue { revealed, total, .. }, PhaseEvent::OpeningSceneReady) => {
            Transition::to(prologue_step(*revealed, *total, true))
        }

        (P::JobSelection, PhaseEvent::OpeningSceneReady) => Transition::to(P::Playing),

        (P::Prologue { .. } | P::JobSelection, PhaseEvent::OpeningSceneFailed) => {
            Transition::with(
                P::JobSelection,
                vec![E::Warn(OPENING_FAILED_WARNING.into())],
            )
        }

        (from, event) => {
            return Err(PhaseError::IllegalTransition {
                from: from.name(),
                event: event.name(),
            })
        }
    };

    Ok(next)
}

fn prologue_step(revealed: usize, total: usize, opening_ready: bool) -> GamePhase {
    if revealed >= total && opening_ready {
        GamePhase::Playing
    } else {
        GamePhase::Prologue {
            revealed,
            total,
            opening_ready,
        }
    }
}
