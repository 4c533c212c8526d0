//! Layer clear color.

use serde::{Deserialize, Serialize};

/// Normalized RGBA color used to clear a layer before drawing.
///
/// Channels are set from 0-255 inputs and stored divided by 255, so every
/// component stays in `[0, 1]`. Alpha is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearColor([f32; 4]);

impl ClearColor {
    /// Build a color from 0-255 red, green and blue channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ])
    }

    /// Replace the red, green and blue channels (0-255 inputs).
    pub fn set_rgb8(&mut self, r: u8, g: u8, b: u8) {
        *self = Self::from_rgb8(r, g, b);
    }

    /// The normalized `[r, g, b, a]` components.
    pub fn rgba(&self) -> [f32; 4] {
        self.0
    }

    pub fn r(&self) -> f32 {
        self.0[0]
    }

    pub fn g(&self) -> f32 {
        self.0[1]
    }

    pub fn b(&self) -> f32 {
        self.0[2]
    }

    pub fn a(&self) -> f32 {
        self.0[3]
    }
}

impl Default for ClearColor {
    /// Opaque black.
    fn default() -> Self {
        Self::from_rgb8(0, 0, 0)
    }
}

/// Parse a `"r;g;b"` color string (each channel 0-255).
///
/// Whitespace around channels is allowed. Returns `None` for anything else,
/// including out-of-range channels.
pub fn parse_rgb_string(value: &str) -> Option<[u8; 3]> {
    let mut channels = value.split(';').map(|part| part.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some([r, g, b])
}
