//! Stratum Engine -- scenes that own layers, and the frame loop driving them.
//!
//! This crate builds on [`stratum_layer`] to provide the container side of
//! the layer contract: a [`Scene`](scene::Scene) owns its layers, tracks the
//! frame's elapsed time and game resolution, hands each layer a renderer
//! delegate and the shared effects manager, and calls
//! [`update_pre_render`](stratum_layer::layer::RuntimeLayer::update_pre_render)
//! on every layer once per frame.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use stratum_engine::prelude::*;
//!
//! let scene = Scene::from_json(
//!     r#"{
//!         "name": "Level 1",
//!         "layers": [
//!             { "name": "" },
//!             { "name": "Background", "followBaseLayerCamera": true }
//!         ]
//!     }"#,
//!     &SceneConfig::default(),
//!     Rc::new(StandardEffectsManager::with_builtin_filters()),
//! )
//! .unwrap();
//!
//! let mut frames = FrameLoop::new(scene, FrameConfig::default());
//! frames.add_system("pan_camera", |scene| {
//!     if let Some(base) = scene.layer_mut("") {
//!         let x = base.camera_x(DEFAULT_CAMERA);
//!         base.set_camera_x(x + 2.0, DEFAULT_CAMERA);
//!     }
//! });
//! frames.run_frames(10);
//!
//! let background = frames.scene().layer("Background").unwrap();
//! assert_eq!(background.camera_x(DEFAULT_CAMERA), 420.0);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod effects;
pub mod frame;
pub mod render;
pub mod scene;
pub mod snapshot;

use stratum_layer::LayerError;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the layer crate for convenience.
pub use stratum_layer;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building or restructuring a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A layer could not be added, found or removed.
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// A configuration value is out of range.
    #[error("invalid scene configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Scene data or configuration JSON could not be parsed.
    #[error("failed to parse scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Everything from the layer prelude.
    pub use stratum_layer::prelude::*;

    pub use crate::config::{FrameConfig, SceneConfig};
    pub use crate::effects::{
        BlurFilter, StandardEffectsManager, TintFilter, WaveFilter, BLUR_EFFECT,
        COLOR_TINT_EFFECT, WAVE_EFFECT,
    };
    pub use crate::frame::{FrameDiagnostics, FrameLoop, FrameSystem};
    pub use crate::render::{HeadlessLayerRenderer, HeadlessSceneRenderer, LayerRenderState};
    pub use crate::scene::{Scene, SceneData, SceneView};
    pub use crate::snapshot::SceneSnapshot;
    pub use crate::SceneError;
}
