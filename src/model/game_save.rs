use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::game_state::GameState;
use crate::model::message::{Message, Role};
use crate::model::phase::GamePhase;

pub const SAVE_SLOT_COUNT: usize = 5;

const SUMMARY_MAX_CHARS: usize = 40;

/// A persisted snapshot of one playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    pub messages: Vec<Message>,
    pub game_state: GameState,
    pub phase: GamePhase,
    pub selected_perk: Option<String>,
}

impl SaveFile {
    pub fn new(
        messages: Vec<Message>,
        game_state: GameState,
        phase: GamePhase,
        selected_perk: Option<String>,
    ) -> Self {
        let summary = summarize(&game_state, &messages);
        Self {
            timestamp: Utc::now(),
            summary,
            messages,
            game_state,
            phase,
            selected_perk,
        }
    }
}

/// Short label for a slot: the HUD notes if any, otherwise the turn count.
pub fn summarize(state: &GameState, messages: &[Message]) -> String {
    match state.notes.as_deref().map(str::trim) {
        Some(notes) if !notes.is_empty() => {
            let mut summary: String = notes.chars().take(SUMMARY_MAX_CHARS).collect();
            if notes.chars().count() > SUMMARY_MAX_CHARS {
                summary.push('…');
            }
            summary
        }
        _ => {
            let turns = messages.iter().filter(|m| m.role == Role::User).count();
            format!("Turn {turns}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prefers_notes() {
        let state = GameState {
            notes: Some("  Hiding in the chapel  ".into()),
            ..Default::default()
        };
        assert_eq!(summarize(&state, &[]), "Hiding in the chapel");
    }

    #[test]
    fn summary_falls_back_to_turn_count() {
        let messages = vec![
            Message::user("look"),
            Message::model("You see a door."),
            Message::system("network hiccup"),
            Message::user("open door"),
        ];
        assert_eq!(summarize(&GameState::default(), &messages), "Turn 2");
    }

    #[test]
    fn long_notes_are_truncated() {
        let state = GameState {
            notes: Some("가".repeat(60)),
            ..Default::default()
        };
        let summary = summarize(&state, &[]);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 1);
        assert!(summary.ends_with('…'));
    }
}
