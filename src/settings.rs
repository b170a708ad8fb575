//! Save system settings
//!
//! Persisted separately from game saves as a small JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::SAVE_VERSION;
use crate::error::Result;

/// Layout of written save text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextFormat {
    #[default]
    Compact,
    Pretty,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Compact => "Compact",
            TextFormat::Pretty => "Pretty",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compact" | "min" => Some(TextFormat::Compact),
            "pretty" | "indented" => Some(TextFormat::Pretty),
            _ => None,
        }
    }

    /// Serialize a value in this layout
    pub fn to_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = match self {
            TextFormat::Compact => serde_json::to_string(value)?,
            TextFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(text)
    }
}

/// Save system settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Root directory for save files
    pub save_directory: PathBuf,
    /// Sub-location for named presets
    pub presets_folder: String,
    /// Layout of written save text
    pub text_format: TextFormat,
    /// Version stamped into saves by this build
    pub save_version: i32,
    /// Capture and write the world when the application quits
    pub auto_save_on_quit: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            save_directory: PathBuf::from("saves"),
            presets_folder: "presets".to_string(),
            text_format: TextFormat::Compact,
            save_version: SAVE_VERSION,
            auto_save_on_quit: true,
        }
    }
}

impl SaveSettings {
    /// Default location name: `savegame_v<version>`
    pub fn save_name(&self) -> String {
        format!("savegame_v{}", self.save_version)
    }

    /// Location for a preset, or the default location when none is given
    pub fn save_location(&self, preset: Option<&str>) -> String {
        match preset.filter(|p| !p.is_empty()) {
            Some(preset) => format!("{}/{}", self.presets_folder, preset),
            None => self.save_name(),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring bad settings file {}: {}", path.display(), e),
            },
            Err(e) => log::debug!("No settings at {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
