//! Fixed-frame loop driving a scene.
//!
//! Each call to [`FrameLoop::frame`]:
//!
//! 1. Sets the scene elapsed time to the configured frame time.
//! 2. Runs every registered system in registration order.
//! 3. Runs the pre-render update of every layer (base-camera following,
//!    renderer camera, effects).
//! 4. Advances the frame counter.
//!
//! Nothing reads the wall clock except diagnostics, so the same scene, the
//! same systems and the same frame count always end in the same state.
//!
//! ```
//! use std::rc::Rc;
//! use stratum_engine::prelude::*;
//!
//! let scene = Scene::new(
//!     "demo",
//!     &SceneConfig::default(),
//!     Rc::new(StandardEffectsManager::new()),
//! )
//! .unwrap();
//! let mut frames = FrameLoop::new(scene, FrameConfig { frame_time_ms: 20.0 });
//! frames.run_frames(5);
//!
//! assert_eq!(frames.frame_count(), 5);
//! assert_eq!(frames.elapsed_time_ms(), 100.0);
//! ```

use std::time::{Duration, Instant};

use crate::config::FrameConfig;
use crate::scene::Scene;

/// A system run once per frame before the layers update.
pub type FrameSystem = fn(&mut Scene);

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// Timing diagnostics for the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    /// Wall-clock time per system (in order of execution).
    pub system_times: Vec<(String, Duration)>,
    /// Time spent in the layers' pre-render update.
    pub pre_render_time: Duration,
    /// Total time for the frame.
    pub total_time: Duration,
}

#[derive(Debug)]
struct RegisteredSystem {
    name: String,
    func: FrameSystem,
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Runs systems and the layer update against a scene at a fixed frame time.
pub struct FrameLoop {
    scene: Scene,
    systems: Vec<RegisteredSystem>,
    frame_counter: u64,
    frame_time_ms: f64,
    last_diagnostics: FrameDiagnostics,
}

impl FrameLoop {
    /// Create a frame loop owning `scene`.
    ///
    /// # Panics
    ///
    /// Panics if `config.frame_time_ms` is not positive and finite.
    pub fn new(scene: Scene, config: FrameConfig) -> Self {
        assert!(
            config.frame_time_ms > 0.0 && config.frame_time_ms.is_finite(),
            "frame_time_ms must be positive and finite, got {}",
            config.frame_time_ms
        );
        Self {
            scene,
            systems: Vec::new(),
            frame_counter: 0,
            frame_time_ms: config.frame_time_ms,
            last_diagnostics: FrameDiagnostics::default(),
        }
    }

    /// Register a system, run after the ones already registered.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same name is already registered.
    pub fn add_system(&mut self, name: &str, func: FrameSystem) {
        assert!(
            !self.systems.iter().any(|s| s.name == name),
            "duplicate system name: {name:?}"
        );
        self.systems.push(RegisteredSystem {
            name: name.to_owned(),
            func,
        });
    }

    /// Run one frame.
    pub fn frame(&mut self) {
        let frame_start = Instant::now();
        self.scene.set_elapsed_time(self.frame_time_ms);

        let mut system_times = Vec::with_capacity(self.systems.len());
        for system in &self.systems {
            let start = Instant::now();
            (system.func)(&mut self.scene);
            system_times.push((system.name.clone(), start.elapsed()));
        }

        let pre_render_start = Instant::now();
        self.scene.update_pre_render();
        let pre_render_time = pre_render_start.elapsed();

        self.frame_counter += 1;
        self.last_diagnostics = FrameDiagnostics {
            system_times,
            pre_render_time,
            total_time: frame_start.elapsed(),
        };
        tracing::trace!(frame = self.frame_counter, "frame complete");
    }

    /// Run `count` frames in sequence.
    pub fn run_frames(&mut self, count: u64) {
        for _ in 0..count {
            self.frame();
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Total elapsed time in milliseconds, computed as
    /// `frame_count * frame_time_ms` so it does not drift.
    pub fn elapsed_time_ms(&self) -> f64 {
        self.frame_counter as f64 * self.frame_time_ms
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Give the scene back, dropping the systems.
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// The names of all registered systems, in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    /// Diagnostics from the last frame.
    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }
}
