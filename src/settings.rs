use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::kinds::PickerOptions;

/// Editor settings that persist to disk
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DistributionEditorSettings {
    /// Let the color picker edit channels above 1.0
    pub allow_hdr_colors: bool,
    /// Height of curve and gradient previews drawn in fields
    pub preview_height: f32,
    /// Samples taken when drawing a curve preview
    pub preview_samples: usize,
    /// Step of drag values in the pickers
    pub drag_speed: f32,
}

impl Default for DistributionEditorSettings {
    fn default() -> Self {
        Self {
            allow_hdr_colors: false,
            preview_height: 16.0,
            preview_samples: 48,
            drag_speed: 0.01,
        }
    }
}

impl DistributionEditorSettings {
    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_distribution_editor");
            p.push("settings.ron");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_ron(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_ron(content: &str) -> Self {
        ron::from_str(content).unwrap_or_else(|e| {
            warn!("Ignoring malformed distribution editor settings: {}", e);
            Self::default()
        })
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {}", e);
                return;
            }
        }

        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to save settings: {}", e);
                } else {
                    info!("Settings saved to: {:?}", path);
                }
            }
            Err(e) => {
                error!("Failed to serialize settings: {}", e);
            }
        }
    }

    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            allow_hdr: self.allow_hdr_colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = DistributionEditorSettings::from_ron("(allow_hdr_colors: true)");
        assert!(settings.allow_hdr_colors);
        assert_eq!(settings.preview_samples, DistributionEditorSettings::default().preview_samples);
        assert!(settings.picker_options().allow_hdr);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        assert_eq!(
            DistributionEditorSettings::from_ron("not ron at all"),
            DistributionEditorSettings::default()
        );
    }

    #[test]
    fn survives_a_save_format_round_trip() {
        let settings = DistributionEditorSettings {
            allow_hdr_colors: true,
            preview_height: 24.0,
            ..default()
        };
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default())
            .expect("settings serialize");
        assert_eq!(DistributionEditorSettings::from_ron(&text), settings);
    }
}
