//! Scene snapshot and restore with BLAKE3 hashing.
//!
//! A [`SceneSnapshot`] captures the mutable state of a scene: frame context
//! and, for every layer, its camera, time scale, visibility, clear color and
//! effects. The BLAKE3 digest of that state makes snapshots comparable
//! across runs.
//!
//! ```
//! use std::rc::Rc;
//! use stratum_engine::prelude::*;
//!
//! let mut scene = Scene::new(
//!     "demo",
//!     &SceneConfig::default(),
//!     Rc::new(StandardEffectsManager::new()),
//! )
//! .unwrap();
//! let snapshot = scene.capture_snapshot();
//! assert_eq!(snapshot.hash.len(), 64);
//!
//! scene.layer_mut("").unwrap().set_camera_zoom(3.0, DEFAULT_CAMERA);
//! assert_ne!(scene.state_hash(), snapshot.hash);
//!
//! scene.restore_from_snapshot(&snapshot).unwrap();
//! assert_eq!(scene.state_hash(), snapshot.hash);
//! ```
//!
//! # What Is NOT Captured
//!
//! - Internal filter state that a filter neither accepts as a parameter nor
//!   reports as animated.
//! - Renderer records: the renderer is told the restored visibility and
//!   clear color, but its counters keep running.
//! - Layers present in the scene but not in the snapshot are left as they
//!   are.

use serde::{Deserialize, Serialize};
use stratum_layer::prelude::*;

use crate::config::SceneConfig;
use crate::scene::Scene;

// ---------------------------------------------------------------------------
// SceneSnapshot
// ---------------------------------------------------------------------------

/// A serializable snapshot of the mutable state of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    /// Name of the captured scene.
    pub scene: String,
    /// Elapsed time of the frame at capture, in milliseconds.
    pub elapsed_time: f64,
    pub game_resolution_width: f64,
    pub game_resolution_height: f64,
    /// Layer states, in creation order.
    pub layers: Vec<LayerSnapshot>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of everything above
    /// except the scene name.
    pub hash: String,
}

/// Compute the BLAKE3 hex digest of the hashable scene state.
fn compute_hash(
    elapsed_time: f64,
    resolution: (f64, f64),
    layers: &[LayerSnapshot],
) -> String {
    #[derive(Serialize)]
    struct HashableState<'a> {
        elapsed_time: f64,
        resolution: (f64, f64),
        layers: &'a [LayerSnapshot],
    }

    let json_bytes = serde_json::to_vec(&HashableState {
        elapsed_time,
        resolution,
        layers,
    })
    .expect("scene state should always be JSON-serializable");

    blake3::hash(&json_bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// Scene snapshot/restore methods
// ---------------------------------------------------------------------------

impl Scene {
    fn capture_layers(&self) -> Vec<LayerSnapshot> {
        self.layer_names()
            .into_iter()
            .filter_map(|name| self.layer(name))
            .map(|layer| layer.capture_state())
            .collect()
    }

    /// Capture the mutable state of the scene and its layers.
    pub fn capture_snapshot(&self) -> SceneSnapshot {
        let layers = self.capture_layers();
        let (width, height) = self.game_resolution();
        let hash = compute_hash(self.elapsed_time(), (width, height), &layers);

        SceneSnapshot {
            scene: self.name().to_owned(),
            elapsed_time: self.elapsed_time(),
            game_resolution_width: width,
            game_resolution_height: height,
            layers,
            hash,
        }
    }

    /// Restore a previously captured state.
    ///
    /// The hash is verified and every captured layer must exist before
    /// anything is modified. Cameras are restored as captured: the
    /// resolution change does not shift them.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash does not match the data, the resolution
    /// is invalid, or a captured layer is missing from the scene.
    pub fn restore_from_snapshot(&mut self, snapshot: &SceneSnapshot) -> Result<(), anyhow::Error> {
        SceneConfig {
            game_resolution_width: snapshot.game_resolution_width,
            game_resolution_height: snapshot.game_resolution_height,
        }
        .validate()
        .map_err(|e| anyhow::anyhow!("snapshot has an invalid resolution: {e}"))?;

        let expected_hash = compute_hash(
            snapshot.elapsed_time,
            (snapshot.game_resolution_width, snapshot.game_resolution_height),
            &snapshot.layers,
        );
        if expected_hash != snapshot.hash {
            return Err(anyhow::anyhow!(
                "snapshot hash mismatch: recorded {} but recomputed {}. \
                 The snapshot may be corrupted or tampered with.",
                snapshot.hash,
                expected_hash
            ));
        }

        if let Some(missing) = snapshot
            .layers
            .iter()
            .find(|layer| !self.has_layer(&layer.name))
        {
            return Err(anyhow::anyhow!(
                "snapshot layer {:?} does not exist in scene {:?}",
                missing.name,
                self.name()
            ));
        }

        self.set_game_resolution(
            snapshot.game_resolution_width,
            snapshot.game_resolution_height,
        )?;
        self.set_elapsed_time(snapshot.elapsed_time);
        for captured in &snapshot.layers {
            if let Some(layer) = self.layer_mut(&captured.name) {
                layer.restore_state(captured);
            }
        }

        tracing::debug!(
            scene = %self.name(),
            layers = snapshot.layers.len(),
            hash = %snapshot.hash,
            "scene restored from snapshot"
        );
        Ok(())
    }

    /// BLAKE3 digest of the current state, equal to
    /// `capture_snapshot().hash`.
    pub fn state_hash(&self) -> String {
        compute_hash(
            self.elapsed_time(),
            self.game_resolution(),
            &self.capture_layers(),
        )
    }
}
