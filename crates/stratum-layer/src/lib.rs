//! Stratum Layer -- named 2D viewing surfaces for scenes.
//!
//! A layer owns camera state (center, rotation, zoom), a time scale applied to
//! the elapsed time of everything drawn on it, a visibility flag, a clear
//! color and an ordered stack of post-processing effects. The heavy lifting
//! is delegated to collaborators reached through traits:
//!
//! - the owning container ([`LayerContainer`](container::LayerContainer))
//!   supplies elapsed time, viewport geometry and sibling lookups,
//! - the renderer delegate ([`LayerRenderer`](container::LayerRenderer))
//!   observes camera, visibility and clear color changes,
//! - the effects manager ([`EffectsManager`](effect::EffectsManager)) creates
//!   and updates effect filters.
//!
//! The shared behaviour lives in the provided methods of
//! [`RuntimeLayer`](layer::RuntimeLayer); projections implement only the
//! camera and coordinate contract. [`Layer2D`](layer2d::Layer2D) is the
//! orthographic 2D projection.
//!
//! # Quick Start
//!
//! ```
//! use stratum_layer::prelude::*;
//!
//! let camera = CameraState { x: 100.0, y: 50.0, rotation: 30.0, zoom: 2.0 };
//! let origin = Point::new(400.0, 300.0);
//!
//! let on_screen = camera.to_parent(Point::new(120.0, 80.0), origin);
//! let back = camera.to_layer(on_screen, origin);
//!
//! assert!((back.x - 120.0).abs() < 1e-9);
//! assert!((back.y - 80.0).abs() < 1e-9);
//! ```

#![deny(unsafe_code)]

pub mod camera;
pub mod color;
pub mod container;
pub mod data;
pub mod effect;
pub mod layer;
pub mod layer2d;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when building or restructuring a set of layers.
///
/// Operations on an existing layer never fail: they validate their input and
/// ignore what they cannot accept.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// A layer with this name already exists in the container.
    #[error("layer '{name}' already exists")]
    DuplicateLayer { name: String },

    /// No layer with this name exists in the container.
    #[error("layer '{name}' not found. Existing layers: [{existing}]")]
    UnknownLayer { name: String, existing: String },

    /// The base layer (empty name) is required by every container.
    #[error("the base layer (named \"\") cannot be removed")]
    BaseLayerRemoval,

    /// The container definition did not include a base layer.
    #[error("container has no base layer (a layer named \"\")")]
    MissingBaseLayer,

    /// A serialized layer definition could not be parsed.
    #[error("invalid layer data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::camera::{CameraId, CameraState, Point, DEFAULT_CAMERA};
    pub use crate::color::ClearColor;
    pub use crate::container::{LayerContainer, LayerRenderer, Viewport};
    pub use crate::data::{EffectData, LayerData};
    pub use crate::effect::{
        EffectFilter, EffectsManager, EffectsTarget, LayerEffects, ParamValue, RenderTarget,
        RuntimeEffect,
    };
    pub use crate::layer::{
        EffectSnapshot, LayerSnapshot, LayerState, RuntimeLayer, BASE_LAYER_NAME,
    };
    pub use crate::layer2d::Layer2D;
    pub use crate::LayerError;
}
