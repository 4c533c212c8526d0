//! Scenes: the containers that own layers.
//!
//! A [`Scene`] holds its layers in creation order together with the frame
//! context they read through [`LayerContainer`]: the elapsed time of the
//! frame, the game resolution, the shared effects manager and the renderer
//! that hands out per-layer delegates.
//!
//! While a layer is being updated it cannot also be borrowed as part of the
//! scene, so each per-layer call receives a [`SceneView`]: the frame context
//! plus every *other* layer.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use stratum_layer::prelude::*;

use crate::config::SceneConfig;
use crate::render::HeadlessSceneRenderer;
use crate::SceneError;

// ---------------------------------------------------------------------------
// SceneData
// ---------------------------------------------------------------------------

/// Serialized definition of a scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneData {
    pub name: String,
    /// Layer definitions, in creation order. Must include the base layer.
    pub layers: Vec<LayerData>,
}

impl SceneData {
    /// Parse a scene definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Parse`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// SceneContext / SceneView
// ---------------------------------------------------------------------------

struct SceneContext {
    /// Elapsed time of the current frame, in milliseconds.
    elapsed_time: f64,
    resolution_width: f64,
    resolution_height: f64,
    effects_manager: Rc<dyn EffectsManager>,
    renderer: HeadlessSceneRenderer,
}

impl SceneContext {
    fn viewport(&self) -> Viewport {
        Viewport::centered(self.resolution_width, self.resolution_height)
    }
}

/// The container as seen by one layer of a [`Scene`].
pub struct SceneView<'a> {
    context: &'a SceneContext,
    before: &'a [Box<dyn RuntimeLayer>],
    after: &'a [Box<dyn RuntimeLayer>],
}

impl LayerContainer for SceneView<'_> {
    fn elapsed_time(&self) -> f64 {
        self.context.elapsed_time
    }

    fn viewport(&self) -> Viewport {
        self.context.viewport()
    }

    // The scene draws straight to the game canvas.
    fn canvas(&self) -> Viewport {
        self.context.viewport()
    }

    fn layer_camera(&self, name: &str) -> Option<CameraState> {
        self.before
            .iter()
            .chain(self.after)
            .find(|layer| layer.name() == name)
            .map(|layer| layer.camera_state(DEFAULT_CAMERA))
    }

    fn effects_manager(&self) -> Rc<dyn EffectsManager> {
        Rc::clone(&self.context.effects_manager)
    }

    fn create_layer_renderer(&self, data: &LayerData) -> Box<dyn LayerRenderer> {
        self.context.renderer.create_layer_renderer(data)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A container of layers.
///
/// The base layer (named `""`) always exists and cannot be removed.
pub struct Scene {
    name: String,
    context: SceneContext,
    layers: Vec<Box<dyn RuntimeLayer>>,
}

impl Scene {
    /// An empty scene holding only the base layer.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        name: &str,
        config: &SceneConfig,
        effects_manager: Rc<dyn EffectsManager>,
    ) -> Result<Self, SceneError> {
        let mut scene = Self::empty(name, config, effects_manager)?;
        scene.add_layer(&LayerData::new(BASE_LAYER_NAME))?;
        Ok(scene)
    }

    /// Build a scene from its definition, creating the layers in order.
    ///
    /// # Errors
    ///
    /// - [`LayerError::MissingBaseLayer`] if no layer is named `""`.
    /// - [`LayerError::DuplicateLayer`] if two layers share a name.
    /// - [`SceneError::InvalidConfig`] if `config` does not validate.
    pub fn from_data(
        data: &SceneData,
        config: &SceneConfig,
        effects_manager: Rc<dyn EffectsManager>,
    ) -> Result<Self, SceneError> {
        if !data.layers.iter().any(|layer| layer.name == BASE_LAYER_NAME) {
            return Err(LayerError::MissingBaseLayer.into());
        }
        let mut scene = Self::empty(&data.name, config, effects_manager)?;
        for layer in &data.layers {
            scene.add_layer(layer)?;
        }
        tracing::debug!(scene = %data.name, layers = scene.layers.len(), "scene built");
        Ok(scene)
    }

    /// Parse a scene definition and build it.
    ///
    /// # Errors
    ///
    /// See [`SceneData::from_json`] and [`Scene::from_data`].
    pub fn from_json(
        json: &str,
        config: &SceneConfig,
        effects_manager: Rc<dyn EffectsManager>,
    ) -> Result<Self, SceneError> {
        let data = SceneData::from_json(json)?;
        Self::from_data(&data, config, effects_manager)
    }

    fn empty(
        name: &str,
        config: &SceneConfig,
        effects_manager: Rc<dyn EffectsManager>,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self {
            name: name.to_owned(),
            context: SceneContext {
                elapsed_time: 0.0,
                resolution_width: config.game_resolution_width,
                resolution_height: config.game_resolution_height,
                effects_manager,
                renderer: HeadlessSceneRenderer::new(),
            },
            layers: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // -- layers -------------------------------------------------------------

    /// Create a layer on top of the existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::DuplicateLayer`] if the name is taken.
    pub fn add_layer(&mut self, data: &LayerData) -> Result<(), SceneError> {
        if self.has_layer(&data.name) {
            return Err(LayerError::DuplicateLayer {
                name: data.name.clone(),
            }
            .into());
        }
        let layer = Layer2D::new(data, &self.view());
        self.layers.push(Box::new(layer));
        Ok(())
    }

    /// Remove a layer and drop its renderer record.
    ///
    /// # Errors
    ///
    /// [`LayerError::BaseLayerRemoval`] for the base layer,
    /// [`LayerError::UnknownLayer`] if no layer has that name.
    pub fn remove_layer(&mut self, name: &str) -> Result<(), SceneError> {
        if name == BASE_LAYER_NAME {
            return Err(LayerError::BaseLayerRemoval.into());
        }
        let index = self
            .layer_index(name)
            .ok_or_else(|| self.unknown_layer(name))?;
        self.layers.remove(index);
        self.context.renderer.forget_layer(name);
        tracing::debug!(scene = %self.name, layer = name, "layer removed");
        Ok(())
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layer_index(name).is_some()
    }

    pub fn layer(&self, name: &str) -> Option<&dyn RuntimeLayer> {
        self.layers
            .iter()
            .find(|layer| layer.name() == name)
            .map(|layer| &**layer)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut dyn RuntimeLayer> {
        let layer: &mut dyn RuntimeLayer = self
            .layers
            .iter_mut()
            .find(|layer| layer.name() == name)?
            .as_mut();
        Some(layer)
    }

    /// Layer names in creation order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name() == name)
    }

    fn unknown_layer(&self, name: &str) -> SceneError {
        let existing = self
            .layer_names()
            .iter()
            .map(|name| format!("{name:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        LayerError::UnknownLayer {
            name: name.to_owned(),
            existing,
        }
        .into()
    }

    // -- frame context ------------------------------------------------------

    /// Set the elapsed time of the current frame, in milliseconds.
    ///
    /// Negative and NaN values are clamped to 0.
    pub fn set_elapsed_time(&mut self, elapsed_ms: f64) {
        if elapsed_ms.is_nan() || elapsed_ms < 0.0 {
            tracing::warn!(scene = %self.name, elapsed_ms, "clamped invalid elapsed time to 0");
        }
        self.context.elapsed_time = elapsed_ms.max(0.0);
    }

    pub fn elapsed_time(&self) -> f64 {
        self.context.elapsed_time
    }

    /// Elapsed time of the frame as seen by a layer, after its time scale.
    pub fn layer_elapsed_time(&self, name: &str) -> Option<f64> {
        let view = self.view();
        self.layer(name).map(|layer| layer.elapsed_time(&view))
    }

    /// `(width, height)` of the game resolution.
    pub fn game_resolution(&self) -> (f64, f64) {
        (self.context.resolution_width, self.context.resolution_height)
    }

    pub fn viewport(&self) -> Viewport {
        self.context.viewport()
    }

    /// Change the game resolution and let every layer react to the moved
    /// viewport origin.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] (and changes nothing) if either
    /// dimension is not positive and finite.
    pub fn set_game_resolution(&mut self, width: f64, height: f64) -> Result<(), SceneError> {
        SceneConfig {
            game_resolution_width: width,
            game_resolution_height: height,
        }
        .validate()?;

        let old_origin = self.context.viewport().origin;
        self.context.resolution_width = width;
        self.context.resolution_height = height;
        self.for_each_layer_mut(|layer, view| layer.on_viewport_resized(view, old_origin));
        tracing::debug!(scene = %self.name, width, height, "game resolution changed");
        Ok(())
    }

    /// Run the pre-render update of every layer, in creation order.
    pub fn update_pre_render(&mut self) {
        self.for_each_layer_mut(|layer, view| layer.update_pre_render(view));
    }

    /// The container view shared by every layer, for read-only queries.
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            context: &self.context,
            before: &self.layers,
            after: &[],
        }
    }

    fn for_each_layer_mut(&mut self, mut f: impl FnMut(&mut dyn RuntimeLayer, &SceneView<'_>)) {
        for index in 0..self.layers.len() {
            let (before, rest) = self.layers.split_at_mut(index);
            let Some((layer, after)) = rest.split_first_mut() else {
                break;
            };
            let view = SceneView {
                context: &self.context,
                before,
                after,
            };
            let layer: &mut dyn RuntimeLayer = layer.as_mut();
            f(layer, &view);
        }
    }

    // -- coordinates --------------------------------------------------------

    /// Convert a canvas point into the coordinates of a layer.
    pub fn convert_coords(&self, layer_name: &str, point: Point) -> Option<Point> {
        let layer = self.layer(layer_name)?;
        Some(layer.convert_coords(&self.view(), point, DEFAULT_CAMERA))
    }

    /// Convert a point of a layer into canvas coordinates.
    pub fn convert_inverse_coords(&self, layer_name: &str, point: Point) -> Option<Point> {
        let layer = self.layer(layer_name)?;
        Some(layer.convert_inverse_coords(&self.view(), point, DEFAULT_CAMERA))
    }

    pub fn apply_layer_transformation(&self, layer_name: &str, point: Point) -> Option<Point> {
        let layer = self.layer(layer_name)?;
        Some(layer.apply_layer_transformation(&self.view(), point, DEFAULT_CAMERA))
    }

    pub fn apply_layer_inverse_transformation(
        &self,
        layer_name: &str,
        point: Point,
    ) -> Option<Point> {
        let layer = self.layer(layer_name)?;
        Some(layer.apply_layer_inverse_transformation(&self.view(), point, DEFAULT_CAMERA))
    }

    /// `(width, height)` of the area seen by the camera of a layer.
    pub fn camera_size(&self, layer_name: &str) -> Option<(f64, f64)> {
        let layer = self.layer(layer_name)?;
        let view = self.view();
        Some((
            layer.camera_width(&view, DEFAULT_CAMERA),
            layer.camera_height(&view, DEFAULT_CAMERA),
        ))
    }

    // -- collaborators ------------------------------------------------------

    pub fn renderer(&self) -> &HeadlessSceneRenderer {
        &self.context.renderer
    }

    pub fn effects_manager(&self) -> Rc<dyn EffectsManager> {
        Rc::clone(&self.context.effects_manager)
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("elapsed_time", &self.context.elapsed_time)
            .field("resolution", &self.game_resolution())
            .field("layers", &self.layers)
            .finish()
    }
}
