//! Built-in filters.

use stratum_layer::color::parse_rgb_string;
use stratum_layer::prelude::*;

/// Effect type of [`BlurFilter`].
pub const BLUR_EFFECT: &str = "Blur";
/// Effect type of [`TintFilter`].
pub const COLOR_TINT_EFFECT: &str = "ColorTint";
/// Effect type of [`WaveFilter`].
pub const WAVE_EFFECT: &str = "Wave";

// ---------------------------------------------------------------------------
// Blur
// ---------------------------------------------------------------------------

/// Gaussian blur.
///
/// Parameters: `blur` (strength, clamped to `>= 0`) and `quality` (number
/// of passes, rounded and clamped to `>= 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct BlurFilter {
    pub blur: f64,
    pub quality: f64,
}

impl Default for BlurFilter {
    fn default() -> Self {
        Self {
            blur: 8.0,
            quality: 1.0,
        }
    }
}

impl EffectFilter for BlurFilter {
    fn set_parameter(&mut self, name: &str, value: &ParamValue) -> bool {
        match (name, value) {
            ("blur", &ParamValue::Double(blur)) => {
                self.blur = blur.max(0.0);
                true
            }
            ("quality", &ParamValue::Double(quality)) => {
                self.quality = quality.round().max(1.0);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ColorTint
// ---------------------------------------------------------------------------

/// Multiplies layer colors by a tint.
///
/// Parameter: `color`, an `"r;g;b"` string with 0-255 components.
#[derive(Debug, Clone, PartialEq)]
pub struct TintFilter {
    /// Tint as normalized RGB.
    pub color: [f32; 3],
}

impl Default for TintFilter {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
        }
    }
}

impl EffectFilter for TintFilter {
    fn set_parameter(&mut self, name: &str, value: &ParamValue) -> bool {
        let ("color", ParamValue::String(color)) = (name, value) else {
            return false;
        };
        match parse_rgb_string(color) {
            Some(rgb) => {
                self.color = rgb.map(|c| f32::from(c) / 255.0);
                true
            }
            None => {
                tracing::warn!(color = %color, "ignored malformed tint color");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wave
// ---------------------------------------------------------------------------

/// Animated sine displacement.
///
/// The phase `time` (seconds) advances each frame by the layer elapsed time
/// times `speed`, unless `paused`. It is reported as an animated parameter,
/// so a captured effect resumes from the same phase.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFilter {
    pub amplitude: f64,
    pub wavelength: f64,
    pub speed: f64,
    pub paused: bool,
    pub time: f64,
}

impl Default for WaveFilter {
    fn default() -> Self {
        Self {
            amplitude: 30.0,
            wavelength: 160.0,
            speed: 1.0,
            paused: false,
            time: 0.0,
        }
    }
}

impl EffectFilter for WaveFilter {
    fn set_parameter(&mut self, name: &str, value: &ParamValue) -> bool {
        match (name, value) {
            ("amplitude", &ParamValue::Double(v)) => self.amplitude = v,
            ("wavelength", &ParamValue::Double(v)) if v > 0.0 => self.wavelength = v,
            ("speed", &ParamValue::Double(v)) => self.speed = v,
            ("time", &ParamValue::Double(v)) => self.time = v,
            ("paused", &ParamValue::Boolean(v)) => self.paused = v,
            _ => return false,
        }
        true
    }

    fn update_pre_render(&mut self, target: &EffectsTarget<'_>) {
        if !self.paused {
            self.time += target.elapsed_time / 1000.0 * self.speed;
        }
    }

    fn animated_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        vec![("time", ParamValue::Double(self.time))]
    }
}
