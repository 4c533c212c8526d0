//! Camera state and the 2D layer transform.
//!
//! A camera maps layer-local coordinates to the coordinates of the parent
//! container in four steps:
//!
//! 1. translate by `-center`,
//! 2. rotate by `-rotation` (degrees, pivot at the camera center),
//! 3. scale by `zoom`,
//! 4. translate by the viewport origin.
//!
//! [`CameraState::to_layer`] applies the exact inverse in reverse order, so
//! `to_layer(to_parent(p)) == p` up to floating-point error for any valid
//! zoom.

use serde::{Deserialize, Serialize};

/// Identifies a camera of a layer.
///
/// Only one camera per layer is supported; the id is threaded through the
/// camera accessors for API stability and is currently ignored.
pub type CameraId = u32;

/// The only camera a layer has.
pub const DEFAULT_CAMERA: CameraId = 0;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// CameraState
// ---------------------------------------------------------------------------

/// Position, rotation and zoom of a layer camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Camera center X, in layer coordinates.
    pub x: f64,
    /// Camera center Y, in layer coordinates.
    pub y: f64,
    /// Rotation in degrees around the camera center.
    pub rotation: f64,
    /// Zoom factor. Always `> 0`; 1 means no zoom.
    pub zoom: f64,
}

impl CameraState {
    /// A camera looking at `origin` with no rotation and no zoom.
    pub fn centered_on(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            rotation: 0.0,
            zoom: 1.0,
        }
    }

    /// Whether `zoom` can be applied to a camera.
    pub fn is_valid_zoom(zoom: f64) -> bool {
        zoom > 0.0 && zoom.is_finite()
    }

    /// Map a point in layer coordinates to parent coordinates.
    ///
    /// `origin` is where the camera center lands in the parent space (the
    /// viewport origin of the container).
    pub fn to_parent(&self, point: Point, origin: Point) -> Point {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let x = point.x - self.x;
        let y = point.y - self.y;

        // Rotate by -rotation.
        let rotated_x = cos * x + sin * y;
        let rotated_y = -sin * x + cos * y;

        Point {
            x: rotated_x * self.zoom + origin.x,
            y: rotated_y * self.zoom + origin.y,
        }
    }

    /// Map a point in parent coordinates back to layer coordinates.
    ///
    /// Exact inverse of [`to_parent`](Self::to_parent) for the same `origin`.
    pub fn to_layer(&self, point: Point, origin: Point) -> Point {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let x = (point.x - origin.x) / self.zoom;
        let y = (point.y - origin.y) / self.zoom;

        // Rotate by +rotation.
        let rotated_x = cos * x - sin * y;
        let rotated_y = sin * x + cos * y;

        Point {
            x: rotated_x + self.x,
            y: rotated_y + self.y,
        }
    }

    /// The forward transform as an affine matrix `[a, b, c, d, e, f]`.
    ///
    /// A point maps to `(a*x + c*y + e, b*x + d*y + f)`, which is the same
    /// result as [`to_parent`](Self::to_parent).
    pub fn to_parent_matrix(&self, origin: Point) -> [f64; 6] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let a = self.zoom * cos;
        let b = -self.zoom * sin;
        let c = self.zoom * sin;
        let d = self.zoom * cos;
        let e = origin.x - (a * self.x + c * self.y);
        let f = origin.y - (b * self.x + d * self.y);
        [a, b, c, d, e, f]
    }

    /// Size of the area seen by the camera for a viewport of the given size.
    pub fn visible_size(&self, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
        (viewport_width / self.zoom, viewport_height / self.zoom)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::centered_on(Point::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
