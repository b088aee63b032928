use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

pub const KEY_CREDENTIAL: &str = "credential";
pub const KEY_DISPLAY_SETTINGS: &str = "display_settings";
pub const KEY_UNLOCKED_PERKS: &str = "unlocked_perks";
pub const KEY_SAVE_SLOTS: &str = "save_slots";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid key '{0}'")]
    InvalidKey(String),
}

/// Key -> serialized value storage. Writes replace the whole value.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub type StoreRef = Arc<dyn KeyValueStore>;
