use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::perks::UnlockedPerks;
use crate::storage::obfuscation::{deobfuscate, obfuscate};
use crate::storage::store::{KeyValueStore, StoreError, KEY_CREDENTIAL, KEY_UNLOCKED_PERKS};

/// Read a JSON value, falling back to `T::default()` when it is missing or
/// unreadable. Corrupt data is logged, never fatal.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!("failed to read '{key}', using defaults: {e}");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("stored '{key}' is corrupt, using defaults: {e}");
        T::default()
    })
}

pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    store.set(key, &json)
}

pub fn load_perks(store: &dyn KeyValueStore) -> UnlockedPerks {
    load_or_default(store, KEY_UNLOCKED_PERKS)
}

pub fn save_perks(store: &dyn KeyValueStore, perks: &UnlockedPerks) -> Result<(), StoreError> {
    save_json(store, KEY_UNLOCKED_PERKS, perks)
}

pub fn load_credential(store: &dyn KeyValueStore) -> Option<String> {
    let encoded: Option<String> = load_or_default(store, KEY_CREDENTIAL);
    match deobfuscate(&encoded?) {
        Ok(key) if !key.is_empty() => Some(key),
        Ok(_) => None,
        Err(e) => {
            warn!("stored credential is unreadable, ignoring it: {e}");
            None
        }
    }
}

pub fn save_credential(store: &dyn KeyValueStore, api_key: &str) -> Result<(), StoreError> {
    save_json(store, KEY_CREDENTIAL, &obfuscate(api_key))
}

pub fn clear_credential(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(KEY_CREDENTIAL)
}
