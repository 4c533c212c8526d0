//! Layer renderers.
//!
//! Only a headless implementation is provided: it records what a GPU
//! renderer would be told each frame, so scenes can run (and be tested)
//! without a window.

pub mod headless;

pub use headless::{HeadlessLayerRenderer, HeadlessSceneRenderer, LayerRenderState};
