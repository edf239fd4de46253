//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web. Scores are never stored here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::ControlMode;
use crate::consts::*;

/// Errors from parsing stored or user-supplied settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Swipe detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Minimum fingertip travel (normalized units) inside the window
    pub movement_threshold: f32,
    /// Trailing sample window
    pub history_ms: f64,
    /// Minimum gap between emitted swipes
    pub cooldown_ms: f64,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            movement_threshold: MOVEMENT_THRESHOLD,
            history_ms: GESTURE_HISTORY_MS,
            cooldown_ms: GESTURE_COOLDOWN_MS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tick period while playing
    pub game_speed_ms: f64,
    /// Input source that steers the snake
    pub control_mode: ControlMode,
    /// Swipe detection
    pub gesture: GestureTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_speed_ms: GAME_SPEED_MS,
            control_mode: ControlMode::Camera,
            gesture: GestureTuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values that would stall or break the loop
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.game_speed_ms.is_finite() && self.game_speed_ms >= 16.0) {
            return Err(SettingsError::OutOfRange {
                field: "game_speed_ms",
                value: self.game_speed_ms,
            });
        }
        let threshold = self.gesture.movement_threshold;
        if !(threshold.is_finite() && threshold > 0.0 && threshold < 1.0) {
            return Err(SettingsError::OutOfRange {
                field: "gesture.movement_threshold",
                value: threshold as f64,
            });
        }
        if !(self.gesture.history_ms.is_finite() && self.gesture.history_ms > 0.0) {
            return Err(SettingsError::OutOfRange {
                field: "gesture.history_ms",
                value: self.gesture.history_ms,
            });
        }
        if !(self.gesture.cooldown_ms.is_finite() && self.gesture.cooldown_ms >= 0.0) {
            return Err(SettingsError::OutOfRange {
                field: "gesture.cooldown_ms",
                value: self.gesture.cooldown_ms,
            });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "vision_snake_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.game_speed_ms, 150.0);
        assert_eq!(s.control_mode, ControlMode::Camera);
        assert_eq!(s.gesture.movement_threshold, 0.05);
        assert_eq!(s.gesture.history_ms, 300.0);
        assert_eq!(s.gesture.cooldown_ms, 350.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"control_mode":"Keyboard","gesture":{"cooldown_ms":500}}"#)
            .unwrap();
        assert_eq!(s.control_mode, ControlMode::Keyboard);
        assert_eq!(s.gesture.cooldown_ms, 500.0);
        assert_eq!(s.gesture.history_ms, 300.0);
        assert_eq!(s.game_speed_ms, 150.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.game_speed_ms = 120.0;
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{"game_speed_ms":0}"#),
            Err(SettingsError::OutOfRange { field: "game_speed_ms", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"gesture":{"movement_threshold":-1}}"#),
            Err(SettingsError::OutOfRange { .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }
}
