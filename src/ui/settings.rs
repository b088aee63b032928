use std::collections::HashMap;
use std::path::PathBuf;

use egui::Color32;
use log::error;
use serde::{Deserialize, Serialize};

use crate::model::message::Role;
use crate::storage::repository::{load_or_default, save_json};
use crate::storage::store::{KeyValueStore, KEY_DISPLAY_SETTINGS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub ui_scale: f32,
    pub text_size: f32,

    // role -> bubble colour
    pub role_colors: HashMap<String, [u8; 4]>,

    /// TTF/OTF file tried first for every glyph, e.g. a Hangul font.
    pub font_path: Option<PathBuf>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let mut role_colors = HashMap::new();

        role_colors.insert(Role::User.as_str().into(), [40, 70, 120, 255]);
        role_colors.insert(Role::Model.as_str().into(), [40, 90, 60, 255]);
        role_colors.insert(Role::System.as_str().into(), [110, 60, 50, 255]);

        Self {
            ui_scale: 1.0,
            text_size: 15.0,
            role_colors,
            font_path: None,
        }
    }
}

impl DisplaySettings {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, KEY_DISPLAY_SETTINGS)
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        if let Err(e) = save_json(store, KEY_DISPLAY_SETTINGS, self) {
            error!("failed to save display settings: {e}");
        }
    }

    pub fn color(&self, role: Role) -> Color32 {
        self.role_colors
            .get(role.as_str())
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::DARK_GRAY)
    }

    pub fn set_color(&mut self, role: Role, color: Color32) {
        self.role_colors.insert(
            role.as_str().to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    #[test]
    fn missing_or_corrupt_settings_fall_back_to_defaults() {
        let store = InMemoryStore::new();
        assert_eq!(DisplaySettings::load(&store), DisplaySettings::default());

        store.set(KEY_DISPLAY_SETTINGS, "{not json").unwrap();
        assert_eq!(DisplaySettings::load(&store), DisplaySettings::default());
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let store = InMemoryStore::new();
        store.set(KEY_DISPLAY_SETTINGS, r#"{"ui_scale": 1.5}"#).unwrap();

        let settings = DisplaySettings::load(&store);
        assert_eq!(settings.ui_scale, 1.5);
        assert_eq!(settings.text_size, DisplaySettings::default().text_size);
        assert_eq!(settings.role_colors.len(), 3);
    }

    #[test]
    fn colours_persist() {
        let store = InMemoryStore::new();
        let mut settings = DisplaySettings::default();
        settings.set_color(Role::Model, Color32::from_rgb(1, 2, 3));
        settings.save(&store);

        let loaded = DisplaySettings::load(&store);
        assert_eq!(loaded.color(Role::Model), Color32::from_rgb(1, 2, 3));
        assert_eq!(loaded, settings);
    }
}
