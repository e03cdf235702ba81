//! Toy settings
//!
//! Every field has a default. The host page may override any subset by
//! embedding a JSON object in `<script id="chompo-settings">`. Nothing is
//! ever written back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_OFFSET;
use crate::sim::FoodKind;

/// Problems with a settings document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("setting `{field}` must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
    #[error("setting `palette` must list at least one food")]
    EmptyPalette,
}

/// Toy settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Eyes ===
    /// Maximum pupil displacement from the socket centre (pixels)
    pub max_offset: f32,
    /// Recompute pupils when the viewport is resized
    pub track_layout: bool,

    // === Physics ===
    /// Downward acceleration (m/s²)
    pub gravity: f32,
    /// Screen pixels per physics metre
    pub pixels_per_meter: f32,
    /// Cap on simultaneous food items; the oldest is dropped beyond it
    pub max_food: usize,
    /// Fastest throw when letting go of a dragged item (pixels/s)
    pub max_fling_speed: f32,

    // === Chomp animation ===
    /// Length of the chomp pulse (seconds)
    pub chomp_duration: f32,
    /// Peak scale of the chomp pulse
    pub chomp_scale: f32,

    // === Accessibility ===
    /// Skip the chomp pulse entirely
    pub reduced_motion: bool,

    /// Foods offered in the palette, in display order
    pub palette: Vec<FoodKind>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_offset: MAX_OFFSET,
            track_layout: true,

            gravity: 9.81,
            pixels_per_meter: 100.0,
            max_food: 40,
            max_fling_speed: 1500.0,

            chomp_duration: 0.25,
            chomp_scale: 1.12,

            reduced_motion: false,

            palette: FoodKind::ALL.to_vec(),
        }
    }
}

impl Settings {
    /// Element id of the optional JSON overrides in the host page
    pub const ELEMENT_ID: &'static str = "chompo-settings";

    /// Parse and validate a JSON settings document (missing fields default)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the scene cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("max_offset", self.max_offset)?;
        non_negative("gravity", self.gravity)?;
        positive("pixels_per_meter", self.pixels_per_meter)?;
        non_negative("max_fling_speed", self.max_fling_speed)?;
        non_negative("chomp_duration", self.chomp_duration)?;
        positive("chomp_scale", self.chomp_scale)?;
        if self.max_food == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_food",
                expected: "at least 1",
                value: 0.0,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }

    /// Effective chomp peak scale (respects reduced_motion)
    pub fn effective_chomp_scale(&self) -> f32 {
        if self.reduced_motion {
            1.0
        } else {
            self.chomp_scale
        }
    }

    /// Load overrides from the host page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring page settings: {}", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "a finite number >= 0",
            value,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "a finite number > 0",
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_offset, MAX_OFFSET);
        assert_eq!(settings.palette.len(), FoodKind::ALL.len());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "max_offset": 6.5, "reduced_motion": true }"#).unwrap();
        assert_eq!(settings.max_offset, 6.5);
        assert!(settings.reduced_motion);
        assert_eq!(settings.max_food, Settings::default().max_food);
        assert_eq!(settings.effective_chomp_scale(), 1.0);
    }

    #[test]
    fn test_palette_from_json() {
        let settings = Settings::from_json(r#"{ "palette": ["toast", "apple"] }"#).unwrap();
        assert_eq!(settings.palette, vec![FoodKind::Toast, FoodKind::Apple]);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ max_offset: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = Settings::from_json(r#"{ "max_offset": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "max_offset", .. }));

        let err = Settings::from_json(r#"{ "pixels_per_meter": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "pixels_per_meter", .. }));

        let err = Settings::from_json(r#"{ "max_food": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "max_food", .. }));
    }

    #[test]
    fn test_rejects_empty_palette() {
        let err = Settings::from_json(r#"{ "palette": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette));
        assert_eq!(err.to_string(), "setting `palette` must list at least one food");
    }
}
