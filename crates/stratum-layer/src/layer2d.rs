//! Orthographic 2D projection of a layer.

use crate::camera::{CameraId, CameraState, Point};
use crate::container::LayerContainer;
use crate::data::LayerData;
use crate::layer::{LayerState, RuntimeLayer};

/// A layer seen through a single 2D orthographic camera.
#[derive(Debug)]
pub struct Layer2D {
    state: LayerState,
    camera: CameraState,
}

impl Layer2D {
    /// Build a layer from its definition.
    ///
    /// The camera starts centered on the container viewport origin with no
    /// rotation and no zoom. Initial visibility is pushed to the renderer,
    /// then the defined effects are added in order (a later effect with the
    /// same name replaces an earlier one).
    pub fn new(data: &LayerData, container: &dyn LayerContainer) -> Self {
        let mut layer = Self {
            state: LayerState::new(data, container),
            camera: CameraState::centered_on(container.viewport().origin),
        };
        layer.apply_initial_state();
        tracing::debug!(
            layer = %data.name,
            effects = layer.state.effects().len(),
            "layer created"
        );
        layer
    }

    /// The camera of the layer.
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }
}

impl RuntimeLayer for Layer2D {
    fn state(&self) -> &LayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LayerState {
        &mut self.state
    }

    fn camera_x(&self, _camera_id: CameraId) -> f64 {
        self.camera.x
    }

    fn set_camera_x(&mut self, x: f64, _camera_id: CameraId) {
        self.camera.x = x;
    }

    fn camera_y(&self, _camera_id: CameraId) -> f64 {
        self.camera.y
    }

    fn set_camera_y(&mut self, y: f64, _camera_id: CameraId) {
        self.camera.y = y;
    }

    fn camera_rotation(&self, _camera_id: CameraId) -> f64 {
        self.camera.rotation
    }

    fn set_camera_rotation(&mut self, rotation: f64, _camera_id: CameraId) {
        self.camera.rotation = rotation;
    }

    fn camera_zoom(&self, _camera_id: CameraId) -> f64 {
        self.camera.zoom
    }

    fn set_camera_zoom(&mut self, zoom: f64, _camera_id: CameraId) {
        if CameraState::is_valid_zoom(zoom) {
            self.camera.zoom = zoom;
        } else {
            tracing::warn!(layer = %self.name(), zoom, "rejected invalid camera zoom");
        }
    }

    fn camera_width(&self, container: &dyn LayerContainer, _camera_id: CameraId) -> f64 {
        let viewport = container.viewport();
        self.camera.visible_size(viewport.width, viewport.height).0
    }

    fn camera_height(&self, container: &dyn LayerContainer, _camera_id: CameraId) -> f64 {
        let viewport = container.viewport();
        self.camera.visible_size(viewport.width, viewport.height).1
    }

    fn on_viewport_resized(&mut self, container: &dyn LayerContainer, old_origin: Point) {
        // Keep what was on screen anchored: move the center with the origin.
        let origin = container.viewport().origin;
        self.camera.x += origin.x - old_origin.x;
        self.camera.y += origin.y - old_origin.y;
    }

    fn apply_layer_transformation(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        _camera_id: CameraId,
    ) -> Point {
        self.camera.to_parent(point, container.viewport().origin)
    }

    fn apply_layer_inverse_transformation(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        _camera_id: CameraId,
    ) -> Point {
        self.camera.to_layer(point, container.viewport().origin)
    }

    fn convert_coords(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        _camera_id: CameraId,
    ) -> Point {
        self.camera.to_layer(point, container.canvas().origin)
    }

    fn convert_inverse_coords(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        _camera_id: CameraId,
    ) -> Point {
        self.camera.to_parent(point, container.canvas().origin)
    }
}
