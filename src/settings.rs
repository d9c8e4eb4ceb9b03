//! Game settings and preferences
//!
//! Persisted separately from the score records as a small JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::TiltFilter;
use crate::sim::Controls;

/// Tilt sensitivity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "Low",
            Sensitivity::Medium => "Medium",
            Sensitivity::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Sensitivity::Low),
            "medium" | "med" => Some(Sensitivity::Medium),
            "high" => Some(Sensitivity::High),
            _ => None,
        }
    }

    /// Horizontal acceleration (px/s²) per unit of filtered tilt
    pub fn accel_per_tilt(&self) -> f32 {
        match self {
            Sensitivity::Low => 120.0,
            Sensitivity::Medium => 200.0,
            Sensitivity::High => 300.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How hard tilting pushes the player
    pub sensitivity: Sensitivity,
    /// Weight of the previous reading in the tilt filter (0-1)
    pub tilt_smoothing: f32,
    /// Filtered tilt below this is treated as level
    pub tilt_dead_zone: f32,
    /// Flip left/right
    pub invert_tilt: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::Medium,
            tilt_smoothing: 0.5,
            tilt_dead_zone: 0.01,
            invert_tilt: false,
        }
    }
}

impl Settings {
    /// Simulation controls derived from these settings
    pub fn controls(&self) -> Controls {
        Controls {
            sensitivity: self.sensitivity.accel_per_tilt(),
            dead_zone: self.tilt_dead_zone,
            invert: self.invert_tilt,
        }
    }

    /// Sensor-side filter derived from these settings
    pub fn tilt_filter(&self) -> TiltFilter {
        TiltFilter::new(self.tilt_smoothing, self.tilt_dead_zone)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Settings file unreadable ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not serializable: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_parse() {
        assert_eq!(Sensitivity::parse("HIGH"), Some(Sensitivity::High));
        assert_eq!(Sensitivity::parse("med"), Some(Sensitivity::Medium));
        assert_eq!(Sensitivity::parse("extreme"), None);
        assert_eq!(Sensitivity::Low.as_str(), "Low");
    }

    #[test]
    fn test_controls_follow_settings() {
        let settings = Settings {
            sensitivity: Sensitivity::High,
            invert_tilt: true,
            ..Settings::default()
        };
        let controls = settings.controls();
        assert_eq!(controls.sensitivity, 300.0);
        assert!(controls.invert);
        assert_eq!(controls.dead_zone, 0.01);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"sensitivity":"Low"}"#)
            .unwrap();
        assert_eq!(settings.sensitivity, Sensitivity::Low);
        assert_eq!(settings.tilt_smoothing, 0.5);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("astro-jump-settings-{}.json", std::process::id()));
        let settings = Settings {
            sensitivity: Sensitivity::Low,
            tilt_dead_zone: 0.2,
            ..Settings::default()
        };
        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
