use log::{info, warn};
use thiserror::Error;

use crate::model::game_save::{SaveFile, SAVE_SLOT_COUNT};
use crate::storage::repository::{load_or_default, save_json};
use crate::storage::store::KEY_SAVE_SLOTS;
use crate::storage::{StoreError, StoreRef};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save slot {0} does not exist")]
    SlotOutOfRange(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sole owner of the persisted save-slot array.
#[derive(Debug)]
pub struct SaveManager {
    store: StoreRef,
    slots: Vec<Option<SaveFile>>,
}

impl SaveManager {
    pub fn open(store: StoreRef) -> Self {
        let mut slots: Vec<Option<SaveFile>> = load_or_default(store.as_ref(), KEY_SAVE_SLOTS);

        if slots.len() != SAVE_SLOT_COUNT {
            if !slots.is_empty() {
                warn!(
                    "stored save array has {} slots, expected {SAVE_SLOT_COUNT}",
                    slots.len()
                );
            }
            slots.resize(SAVE_SLOT_COUNT, None);
        }

        Self { store, slots }
    }

    pub fn slots(&self) -> &[Option<SaveFile>] {
        &self.slots
    }

    /// Overwrites whatever the slot held.
    pub fn save(&mut self, slot: usize, save: SaveFile) -> Result<(), SaveError> {
        self.check(slot)?;
        self.commit(slot, Some(save))?;
        info!("saved to slot {slot}");
        Ok(())
    }

    pub fn load(&self, slot: usize) -> Result<Option<SaveFile>, SaveError> {
        self.check(slot)?;
        Ok(self.slots[slot].clone())
    }

    pub fn delete(&mut self, slot: usize) -> Result<(), SaveError> {
        self.check(slot)?;
        self.commit(slot, None)?;
        info!("cleared slot {slot}");
        Ok(())
    }

    fn check(&self, slot: usize) -> Result<(), SaveError> {
        if slot >= self.slots.len() {
            return Err(SaveError::SlotOutOfRange(slot));
        }
        Ok(())
    }

    /// Persist first so a failed write leaves memory and disk in agreement.
    fn commit(&mut self, slot: usize, value: Option<SaveFile>) -> Result<(), SaveError> {
        let mut next = self.slots.clone();
        next[slot] = value;
        save_json(self.store.as_ref(), KEY_SAVE_SLOTS, &next)?;
        self.slots = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::game_state::GameState;
    use crate::model::message::Message;
    use crate::model::phase::GamePhase;
    use crate::storage::{InMemoryStore, KeyValueStore};

    fn sample(notes: &str) -> SaveFile {
        SaveFile::new(
            vec![Message::user("look"), Message::model("A door.")],
            GameState {
                notes: Some(notes.into()),
                ..Default::default()
            },
            GamePhase::Playing,
            Some("Iron Will".into()),
        )
    }

    #[test]
    fn starts_with_five_empty_slots() {
        let manager = SaveManager::open(Arc::new(InMemoryStore::new()));
        assert_eq!(manager.slots().len(), SAVE_SLOT_COUNT);
        assert!(manager.slots().iter().all(Option::is_none));
    }

    #[test]
    fn save_then_load_same_slot() {
        let store: StoreRef = Arc::new(InMemoryStore::new());
        let mut manager = SaveManager::open(store.clone());

        let save = sample("at the gate");
        manager.save(2, save.clone()).unwrap();

        assert_eq!(manager.load(2).unwrap(), Some(save.clone()));
        assert_eq!(manager.load(1).unwrap(), None);

        // survives a reopen
        let reopened = SaveManager::open(store);
        assert_eq!(reopened.load(2).unwrap(), Some(save));
    }

    #[test]
    fn saving_overwrites_and_delete_only_touches_one_slot() {
        let mut manager = SaveManager::open(Arc::new(InMemoryStore::new()));

        manager.save(0, sample("first")).unwrap();
        manager.save(0, sample("second")).unwrap();
        manager.save(4, sample("other")).unwrap();
        assert_eq!(manager.load(0).unwrap().unwrap().summary, "second");

        manager.delete(0).unwrap();
        assert_eq!(manager.load(0).unwrap(), None);
        assert_eq!(manager.load(4).unwrap().unwrap().summary, "other");
    }

    #[test]
    fn out_of_range_slot() {
        let mut manager = SaveManager::open(Arc::new(InMemoryStore::new()));

        assert!(matches!(manager.load(5), Err(SaveError::SlotOutOfRange(5))));
        assert!(matches!(
            manager.save(9, sample("x")),
            Err(SaveError::SlotOutOfRange(9))
        ));
        assert!(matches!(manager.delete(5), Err(SaveError::SlotOutOfRange(5))));
    }

    #[test]
    fn corrupt_or_short_slot_array_is_repaired() {
        let store = Arc::new(InMemoryStore::new());
        store.set(KEY_SAVE_SLOTS, "garbage").unwrap();
        assert_eq!(SaveManager::open(store.clone()).slots().len(), SAVE_SLOT_COUNT);

        store.set(KEY_SAVE_SLOTS, "[null, null]").unwrap();
        assert_eq!(SaveManager::open(store).slots().len(), SAVE_SLOT_COUNT);
    }
}
