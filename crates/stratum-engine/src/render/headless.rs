//! Headless renderer: records per-layer render state instead of drawing.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use stratum_layer::prelude::*;

// ---------------------------------------------------------------------------
// LayerRenderState
// ---------------------------------------------------------------------------

/// Everything a renderer has been told about one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRenderState {
    pub render_target: RenderTarget,
    pub visible: bool,
    pub is_lighting_layer: bool,
    pub clear_color: ClearColor,
    /// Camera of the last prepared frame, `None` before the first frame.
    pub camera: Option<CameraState>,
    /// Layer-to-viewport matrix of the last prepared frame, in
    /// `[a, b, c, d, e, f]` form.
    pub view_matrix: [f64; 6],
    pub frames_prepared: u64,
    pub visibility_updates: u64,
    pub clear_color_updates: u64,
}

// ---------------------------------------------------------------------------
// HeadlessLayerRenderer
// ---------------------------------------------------------------------------

/// Renderer delegate handed to a single layer.
///
/// Shares its state with the [`HeadlessSceneRenderer`] that created it.
#[derive(Debug)]
pub struct HeadlessLayerRenderer {
    layer_name: String,
    state: Rc<RefCell<LayerRenderState>>,
}

impl LayerRenderer for HeadlessLayerRenderer {
    fn update_pre_render(&mut self, camera: &CameraState, viewport: Viewport) {
        let mut state = self.state.borrow_mut();
        state.camera = Some(*camera);
        state.view_matrix = camera.to_parent_matrix(viewport.origin);
        state.frames_prepared += 1;
        tracing::trace!(
            layer = %self.layer_name,
            frame = state.frames_prepared,
            "prepared layer frame"
        );
    }

    fn update_visibility(&mut self, visible: bool) {
        let mut state = self.state.borrow_mut();
        state.visible = visible;
        state.visibility_updates += 1;
    }

    fn update_clear_color(&mut self, color: ClearColor) {
        let mut state = self.state.borrow_mut();
        state.clear_color = color;
        state.clear_color_updates += 1;
    }

    fn render_target(&self) -> RenderTarget {
        self.state.borrow().render_target
    }
}

// ---------------------------------------------------------------------------
// HeadlessSceneRenderer
// ---------------------------------------------------------------------------

/// Creates layer renderers and keeps an inspectable record of each.
///
/// Render targets are allocated sequentially from 0 and never reused.
#[derive(Debug, Default)]
pub struct HeadlessSceneRenderer {
    next_target: Cell<u64>,
    layers: RefCell<BTreeMap<String, Rc<RefCell<LayerRenderState>>>>,
}

impl HeadlessSceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the renderer delegate for a layer.
    ///
    /// A previous record under the same layer name is replaced.
    pub fn create_layer_renderer(&self, data: &LayerData) -> Box<dyn LayerRenderer> {
        let render_target = RenderTarget(self.next_target.get());
        self.next_target.set(render_target.0 + 1);

        let state = Rc::new(RefCell::new(LayerRenderState {
            render_target,
            visible: data.visibility,
            is_lighting_layer: data.is_lighting_layer,
            clear_color: ClearColor::from_rgb8(
                data.ambient_light_color_r,
                data.ambient_light_color_g,
                data.ambient_light_color_b,
            ),
            camera: None,
            view_matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            frames_prepared: 0,
            visibility_updates: 0,
            clear_color_updates: 0,
        }));
        self.layers
            .borrow_mut()
            .insert(data.name.clone(), Rc::clone(&state));

        tracing::trace!(layer = %data.name, render_target = render_target.0, "layer renderer created");
        Box::new(HeadlessLayerRenderer {
            layer_name: data.name.clone(),
            state,
        })
    }

    /// Copy of the recorded state of a layer.
    pub fn layer_state(&self, name: &str) -> Option<LayerRenderState> {
        self.layers
            .borrow()
            .get(name)
            .map(|state| state.borrow().clone())
    }

    /// Drop the record of a removed layer.
    pub fn forget_layer(&self, name: &str) {
        self.layers.borrow_mut().remove(name);
    }

    /// Number of layers with a live record.
    pub fn layer_count(&self) -> usize {
        self.layers.borrow().len()
    }
}
