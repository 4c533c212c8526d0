//! The layer contract and its shared state.
//!
//! [`RuntimeLayer`] splits a layer in two halves:
//!
//! - **Required methods** -- the camera and coordinate contract. Only a
//!   projection knows how its camera maps points, so each projection
//!   (e.g. [`Layer2D`](crate::layer2d::Layer2D)) implements them.
//! - **Provided methods** -- everything else: visibility, time scale, clear
//!   color, effects, camera following and the per-frame update. They operate
//!   on the [`LayerState`] every projection embeds.
//!
//! # Frame update
//!
//! [`RuntimeLayer::update_pre_render`] runs once per frame, after events and
//! before rendering:
//!
//! 1. if the layer follows the base layer, its camera is copied from it;
//! 2. the renderer refreshes its frame state (it sees the synchronized
//!    camera);
//! 3. the effects manager advances the layer's effects.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraId, CameraState, Point, DEFAULT_CAMERA};
use crate::color::ClearColor;
use crate::container::{LayerContainer, LayerRenderer};
use crate::data::{EffectData, LayerData};
use crate::effect::{EffectsManager, EffectsTarget, LayerEffects, ParamValue};

/// Name of the base layer of every container.
pub const BASE_LAYER_NAME: &str = "";

// ---------------------------------------------------------------------------
// LayerState
// ---------------------------------------------------------------------------

/// State shared by every projection of a layer.
pub struct LayerState {
    name: String,
    /// Multiplier on elapsed time. Never negative.
    time_scale: f64,
    /// Z order given to objects created on this layer.
    default_z_order: i32,
    hidden: bool,
    initial_effects: Vec<EffectData>,
    is_lighting_layer: bool,
    follow_base_layer_camera: bool,
    clear_color: ClearColor,
    effects: LayerEffects,
    effects_manager: Rc<dyn EffectsManager>,
    renderer: Box<dyn LayerRenderer>,
}

impl LayerState {
    /// Build the shared state from a layer definition.
    ///
    /// Asks the container for its effects manager and a renderer delegate.
    /// Visibility is not yet pushed to the renderer and no effect is added:
    /// the projection does that through
    /// [`RuntimeLayer::apply_initial_state`] once its camera exists.
    pub fn new(data: &LayerData, container: &dyn LayerContainer) -> Self {
        Self {
            name: data.name.clone(),
            time_scale: 1.0,
            default_z_order: 0,
            hidden: !data.visibility,
            initial_effects: data.effects.clone(),
            is_lighting_layer: data.is_lighting_layer,
            follow_base_layer_camera: data.follow_base_layer_camera,
            clear_color: ClearColor::from_rgb8(
                data.ambient_light_color_r,
                data.ambient_light_color_g,
                data.ambient_light_color_b,
            ),
            effects: LayerEffects::new(),
            effects_manager: container.effects_manager(),
            renderer: container.create_layer_renderer(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renderer(&self) -> &dyn LayerRenderer {
        self.renderer.as_ref()
    }

    pub fn effects(&self) -> &LayerEffects {
        &self.effects
    }
}

impl fmt::Debug for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerState")
            .field("name", &self.name)
            .field("time_scale", &self.time_scale)
            .field("default_z_order", &self.default_z_order)
            .field("hidden", &self.hidden)
            .field("is_lighting_layer", &self.is_lighting_layer)
            .field("follow_base_layer_camera", &self.follow_base_layer_camera)
            .field("clear_color", &self.clear_color)
            .field("effects", &self.effects.names())
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Captured state of one effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    /// Definition recreating the effect with its current parameters.
    pub data: EffectData,
    pub enabled: bool,
}

/// Captured mutable state of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub name: String,
    pub camera: CameraState,
    pub time_scale: f64,
    pub default_z_order: i32,
    pub visible: bool,
    pub follow_base_layer_camera: bool,
    pub clear_color: ClearColor,
    /// Effects in application order.
    pub effects: Vec<EffectSnapshot>,
}

// ---------------------------------------------------------------------------
// RuntimeLayer
// ---------------------------------------------------------------------------

/// A layer of a container: camera contract plus shared behaviour.
///
/// Camera accessors take a [`CameraId`]; layers have a single camera and
/// implementations ignore it.
pub trait RuntimeLayer: fmt::Debug {
    fn state(&self) -> &LayerState;

    fn state_mut(&mut self) -> &mut LayerState;

    // -- camera contract ----------------------------------------------------

    fn camera_x(&self, camera_id: CameraId) -> f64;

    fn set_camera_x(&mut self, x: f64, camera_id: CameraId);

    fn camera_y(&self, camera_id: CameraId) -> f64;

    fn set_camera_y(&mut self, y: f64, camera_id: CameraId);

    /// Rotation in degrees.
    fn camera_rotation(&self, camera_id: CameraId) -> f64;

    /// Set the rotation in degrees. The pivot is the camera center.
    fn set_camera_rotation(&mut self, rotation: f64, camera_id: CameraId);

    fn camera_zoom(&self, camera_id: CameraId) -> f64;

    /// Set the zoom. Values that are not strictly positive and finite are
    /// ignored.
    fn set_camera_zoom(&mut self, zoom: f64, camera_id: CameraId);

    /// Width of the area seen by the camera (differs from the viewport width
    /// when zoomed).
    fn camera_width(&self, container: &dyn LayerContainer, camera_id: CameraId) -> f64;

    fn camera_height(&self, container: &dyn LayerContainer, camera_id: CameraId) -> f64;

    /// Called by the container after its viewport changed. `old_origin` is
    /// the viewport origin before the change.
    fn on_viewport_resized(&mut self, container: &dyn LayerContainer, old_origin: Point);

    /// Map a point from layer coordinates to container coordinates.
    fn apply_layer_transformation(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        camera_id: CameraId,
    ) -> Point;

    /// Map a point from container coordinates to layer coordinates. Exact
    /// inverse of [`apply_layer_transformation`](Self::apply_layer_transformation).
    fn apply_layer_inverse_transformation(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        camera_id: CameraId,
    ) -> Point;

    /// Map a point from canvas coordinates (e.g. the mouse) to layer
    /// coordinates.
    fn convert_coords(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        camera_id: CameraId,
    ) -> Point;

    /// Map a point from layer coordinates to canvas coordinates.
    fn convert_inverse_coords(
        &self,
        container: &dyn LayerContainer,
        point: Point,
        camera_id: CameraId,
    ) -> Point;

    // -- provided -----------------------------------------------------------

    fn name(&self) -> &str {
        &self.state().name
    }

    fn camera_state(&self, camera_id: CameraId) -> CameraState {
        CameraState {
            x: self.camera_x(camera_id),
            y: self.camera_y(camera_id),
            rotation: self.camera_rotation(camera_id),
            zoom: self.camera_zoom(camera_id),
        }
    }

    /// Push the initial visibility to the renderer and add the initial
    /// effects in list order. Projections call this once, at the end of
    /// construction.
    fn apply_initial_state(&mut self) {
        let visible = self.is_visible();
        self.show(visible);
        let initial = self.state().initial_effects.clone();
        for effect in &initial {
            self.add_effect(effect);
        }
    }

    /// Per-frame update, after events and before rendering.
    fn update_pre_render(&mut self, container: &dyn LayerContainer) {
        if self.follows_base_layer_camera() {
            self.follow_base_layer(container);
        }

        let camera = self.camera_state(DEFAULT_CAMERA);
        let elapsed_time = self.elapsed_time(container);
        let viewport = container.viewport();

        let state = self.state_mut();
        state.renderer.update_pre_render(&camera, viewport);

        let target = EffectsTarget {
            layer_name: &state.name,
            render_target: state.renderer.render_target(),
            elapsed_time,
            width: viewport.width,
            height: viewport.height,
        };
        state
            .effects_manager
            .update_pre_render(&mut state.effects, &target);
    }

    /// Copy X, Y, rotation and zoom (in that order) from the base layer
    /// camera.
    ///
    /// A missing base layer leaves the camera unchanged.
    fn follow_base_layer(&mut self, container: &dyn LayerContainer) {
        if self.name() == BASE_LAYER_NAME {
            return;
        }
        let Some(base) = container.layer_camera(BASE_LAYER_NAME) else {
            tracing::warn!(
                layer = %self.name(),
                "container has no base layer to follow; camera left unchanged"
            );
            return;
        };
        self.set_camera_x(base.x, DEFAULT_CAMERA);
        self.set_camera_y(base.y, DEFAULT_CAMERA);
        self.set_camera_rotation(base.rotation, DEFAULT_CAMERA);
        self.set_camera_zoom(base.zoom, DEFAULT_CAMERA);
    }

    /// Show or hide the layer and notify the renderer.
    fn show(&mut self, enable: bool) {
        let state = self.state_mut();
        state.hidden = !enable;
        state.renderer.update_visibility(enable);
    }

    fn is_visible(&self) -> bool {
        !self.state().hidden
    }

    fn time_scale(&self) -> f64 {
        self.state().time_scale
    }

    /// Set the time scale. Negative (and NaN) values are ignored.
    fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale >= 0.0 {
            self.state_mut().time_scale = time_scale;
        } else {
            tracing::warn!(
                layer = %self.name(),
                time_scale,
                "rejected negative time scale"
            );
        }
    }

    /// Elapsed time of the frame for objects on this layer, in milliseconds.
    fn elapsed_time(&self, container: &dyn LayerContainer) -> f64 {
        container.elapsed_time() * self.time_scale()
    }

    fn default_z_order(&self) -> i32 {
        self.state().default_z_order
    }

    fn set_default_z_order(&mut self, z_order: i32) {
        self.state_mut().default_z_order = z_order;
    }

    fn clear_color(&self) -> ClearColor {
        self.state().clear_color
    }

    /// Set the clear color from 0-255 channels and notify the renderer.
    fn set_clear_color(&mut self, r: u8, g: u8, b: u8) {
        let state = self.state_mut();
        state.clear_color.set_rgb8(r, g, b);
        state.renderer.update_clear_color(state.clear_color);
    }

    fn follows_base_layer_camera(&self) -> bool {
        self.state().follow_base_layer_camera
    }

    fn set_follow_base_layer_camera(&mut self, follow: bool) {
        self.state_mut().follow_base_layer_camera = follow;
    }

    fn is_lighting_layer(&self) -> bool {
        self.state().is_lighting_layer
    }

    fn width(&self, container: &dyn LayerContainer) -> f64 {
        container.viewport().width
    }

    fn height(&self, container: &dyn LayerContainer) -> f64 {
        container.viewport().height
    }

    /// Effects the layer was defined with, for renderer and tooling use.
    fn initial_effects_data(&self) -> &[EffectData] {
        &self.state().initial_effects
    }

    fn effects(&self) -> &LayerEffects {
        &self.state().effects
    }

    // -- effects ------------------------------------------------------------

    /// Add an effect, or replace the one with the same name.
    fn add_effect(&mut self, data: &EffectData) -> bool {
        let state = self.state_mut();
        let target = state.renderer.render_target();
        state
            .effects_manager
            .add_effect(data, &mut state.effects, target)
    }

    fn remove_effect(&mut self, name: &str) -> bool {
        let state = self.state_mut();
        let target = state.renderer.render_target();
        state
            .effects_manager
            .remove_effect(&mut state.effects, target, name)
    }

    fn set_effect_parameter(&mut self, name: &str, parameter: &str, value: ParamValue) -> bool {
        let state = self.state_mut();
        state
            .effects_manager
            .set_effect_parameter(&mut state.effects, name, parameter, value)
    }

    fn set_effect_double_parameter(&mut self, name: &str, parameter: &str, value: f64) -> bool {
        self.set_effect_parameter(name, parameter, ParamValue::Double(value))
    }

    fn set_effect_string_parameter(&mut self, name: &str, parameter: &str, value: &str) -> bool {
        self.set_effect_parameter(name, parameter, ParamValue::String(value.to_owned()))
    }

    fn set_effect_boolean_parameter(&mut self, name: &str, parameter: &str, value: bool) -> bool {
        self.set_effect_parameter(name, parameter, ParamValue::Boolean(value))
    }

    fn enable_effect(&mut self, name: &str, enable: bool) {
        let state = self.state_mut();
        state
            .effects_manager
            .enable_effect(&mut state.effects, name, enable);
    }

    fn is_effect_enabled(&self, name: &str) -> bool {
        let state = self.state();
        state.effects_manager.is_effect_enabled(&state.effects, name)
    }

    fn has_effect(&self, name: &str) -> bool {
        let state = self.state();
        state.effects_manager.has_effect(&state.effects, name)
    }

    // -- snapshots ----------------------------------------------------------

    fn capture_state(&self) -> LayerSnapshot {
        LayerSnapshot {
            name: self.name().to_owned(),
            camera: self.camera_state(DEFAULT_CAMERA),
            time_scale: self.time_scale(),
            default_z_order: self.default_z_order(),
            visible: self.is_visible(),
            follow_base_layer_camera: self.follows_base_layer_camera(),
            clear_color: self.clear_color(),
            effects: self
                .effects()
                .iter()
                .map(|effect| EffectSnapshot {
                    data: effect.to_effect_data(),
                    enabled: effect.is_enabled(),
                })
                .collect(),
        }
    }

    /// Restore captured state. Effects are rebuilt through the effects
    /// manager; the name in `snapshot` is not checked.
    fn restore_state(&mut self, snapshot: &LayerSnapshot) {
        self.set_camera_x(snapshot.camera.x, DEFAULT_CAMERA);
        self.set_camera_y(snapshot.camera.y, DEFAULT_CAMERA);
        self.set_camera_rotation(snapshot.camera.rotation, DEFAULT_CAMERA);
        self.set_camera_zoom(snapshot.camera.zoom, DEFAULT_CAMERA);
        self.set_time_scale(snapshot.time_scale);
        self.set_default_z_order(snapshot.default_z_order);
        self.set_follow_base_layer_camera(snapshot.follow_base_layer_camera);
        self.show(snapshot.visible);

        let state = self.state_mut();
        state.clear_color = snapshot.clear_color;
        state.renderer.update_clear_color(state.clear_color);

        let existing: Vec<String> = self
            .effects()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        for name in &existing {
            self.remove_effect(name);
        }
        for effect in &snapshot.effects {
            if self.add_effect(&effect.data) {
                self.enable_effect(&effect.data.name, effect.enabled);
            }
        }
    }
}
