//! Contracts of the collaborators a layer talks to.
//!
//! A layer never stores a reference to its container: the container passes a
//! [`LayerContainer`] view into every call that needs it, so sibling lookups
//! are resolved by name each time.

use std::fmt;
use std::rc::Rc;

use crate::camera::{CameraState, Point};
use crate::color::ClearColor;
use crate::data::LayerData;
use crate::effect::{EffectsManager, RenderTarget};

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Size of a coordinate space and the point where camera centers land in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub origin: Point,
}

impl Viewport {
    /// A viewport whose origin is its center.
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin: Point::new(width / 2.0, height / 2.0),
        }
    }
}

// ---------------------------------------------------------------------------
// LayerRenderer
// ---------------------------------------------------------------------------

/// Renderer delegate owned by a layer.
pub trait LayerRenderer: fmt::Debug {
    /// Refresh frame-local render state. Called once per frame, after the
    /// camera has been synchronized.
    fn update_pre_render(&mut self, camera: &CameraState, viewport: Viewport);

    fn update_visibility(&mut self, visible: bool);

    fn update_clear_color(&mut self, color: ClearColor);

    /// Native target the layer's effects are attached to.
    fn render_target(&self) -> RenderTarget;
}

// ---------------------------------------------------------------------------
// LayerContainer
// ---------------------------------------------------------------------------

/// What a layer needs from the scene (or other container) that owns it.
pub trait LayerContainer {
    /// Elapsed time of the current frame, in milliseconds.
    fn elapsed_time(&self) -> f64;

    /// Container coordinate space.
    fn viewport(&self) -> Viewport;

    /// Canvas coordinate space (e.g. mouse positions).
    fn canvas(&self) -> Viewport;

    /// Camera of the layer named `name`, if the container has one.
    fn layer_camera(&self, name: &str) -> Option<CameraState>;

    fn effects_manager(&self) -> Rc<dyn EffectsManager>;

    /// Build the renderer delegate for a new layer.
    fn create_layer_renderer(&self, data: &LayerData) -> Box<dyn LayerRenderer>;
}
