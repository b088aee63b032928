use serde::{Deserialize, Serialize};

/// Player status as reported by the HUD block.
///
/// Every field is optional: the running state starts empty and a decoded HUD
/// block only carries the fields it actually mentioned. The same type is used
/// for both, see [`merge_game_state`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mental: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<String>,

    /// Ordered, case-sensitive, duplicates allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GameState {
    pub fn is_empty(&self) -> bool {
        *self == GameState::default()
    }

    /// In-place form of [`merge_game_state`].
    pub fn apply(&mut self, update: &GameState) {
        overwrite(&mut self.hp, &update.hp);
        overwrite(&mut self.mental, &update.mental);
        overwrite(&mut self.stats, &update.stats);
        overwrite(&mut self.tags, &update.tags);
        overwrite(&mut self.equipment, &update.equipment);
        overwrite(&mut self.notes, &update.notes);
    }
}

fn overwrite<T: Clone>(slot: &mut Option<T>, update: &Option<T>) {
    if let Some(value) = update {
        *slot = Some(value.clone());
    }
}

/// Shallow field-wise merge: every field present in `update` replaces the
/// old value, every absent field keeps it.
pub fn merge_game_state(old: &GameState, update: &GameState) -> GameState {
    let mut merged = old.clone();
    merged.apply(update);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> GameState {
        GameState {
            hp: Some("100".into()),
            mental: Some("Stable".into()),
            stats: Some("STR 10".into()),
            tags: Some(vec!["Brave".into()]),
            equipment: Some("Rusty sword".into()),
            notes: Some("Entered the ruins".into()),
        }
    }

    #[test]
    fn merge_keeps_fields_missing_from_update() {
        let update = GameState {
            hp: Some("70".into()),
            ..Default::default()
        };

        let merged = merge_game_state(&full_state(), &update);

        assert_eq!(merged.hp.as_deref(), Some("70"));
        assert_eq!(merged.mental.as_deref(), Some("Stable"));
        assert_eq!(merged.equipment.as_deref(), Some("Rusty sword"));
        assert_eq!(merged.tags, Some(vec!["Brave".to_string()]));
    }

    #[test]
    fn merge_replaces_tags_wholesale() {
        let update = GameState {
            tags: Some(vec!["Wounded".into(), "Wounded".into()]),
            ..Default::default()
        };

        let merged = merge_game_state(&full_state(), &update);

        assert_eq!(
            merged.tags,
            Some(vec!["Wounded".to_string(), "Wounded".to_string()])
        );
    }

    #[test]
    fn merge_onto_empty_state_is_the_update() {
        let update = full_state();
        assert_eq!(merge_game_state(&GameState::default(), &update), update);
    }

    #[test]
    fn empty_update_changes_nothing() {
        let old = full_state();
        assert_eq!(merge_game_state(&old, &GameState::default()), old);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let state = GameState {
            hp: Some("80".into()),
            ..Default::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"hp":"80"}"#);

        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
