//! Scene and frame-loop configuration.
//!
//! Both structs have usable defaults and deserialize from camelCase JSON
//! where every field is optional:
//!
//! ```
//! use stratum_engine::config::SceneConfig;
//!
//! let config = SceneConfig::from_json(r#"{ "gameResolutionWidth": 1280 }"#).unwrap();
//! assert_eq!(config.game_resolution_width, 1280.0);
//! assert_eq!(config.game_resolution_height, 600.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::SceneError;

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Configuration of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    /// Width of the game resolution (the canvas), in pixels.
    pub game_resolution_width: f64,
    /// Height of the game resolution (the canvas), in pixels.
    pub game_resolution_height: f64,
}

impl Default for SceneConfig {
    /// 800x600.
    fn default() -> Self {
        Self {
            game_resolution_width: 800.0,
            game_resolution_height: 600.0,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a configuration.
    ///
    /// # Errors
    ///
    /// [`SceneError::Parse`] for malformed JSON, [`SceneError::InvalidConfig`]
    /// for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the resolution is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (field, value) in [
            ("gameResolutionWidth", self.game_resolution_width),
            ("gameResolutionHeight", self.game_resolution_height),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SceneError::InvalidConfig {
                    reason: format!("{field} must be positive and finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FrameConfig
// ---------------------------------------------------------------------------

/// Configuration of the fixed-frame loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameConfig {
    /// Elapsed time reported for each frame, in milliseconds. Must be
    /// positive and finite.
    pub frame_time_ms: f64,
}

impl Default for FrameConfig {
    /// 60 frames per second.
    fn default() -> Self {
        Self {
            frame_time_ms: 1000.0 / 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.game_resolution_width, 800.0);
        assert_eq!(config.game_resolution_height, 600.0);
        assert!(config.validate().is_ok());
        assert!((FrameConfig::default().frame_time_ms - 16.666_666).abs() < 1e-3);
    }

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
        let frame: FrameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(frame, FrameConfig::default());
    }

    #[test]
    fn rejects_non_positive_resolution() {
        let err = SceneConfig::from_json(r#"{ "gameResolutionHeight": 0 }"#).unwrap_err();
        match err {
            SceneError::InvalidConfig { reason } => {
                assert!(reason.contains("gameResolutionHeight"), "{reason}");
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SceneConfig::from_json("{ nope"),
            Err(SceneError::Parse(_))
        ));
    }
}
