// src/picking/ray.rs
// Ray type, viewport-pixel to NDC conversion, and cursor unprojection through the camera.
// RELEVANT FILES:src/camera.rs,src/picking/service.rs,src/accel/intersect.rs

use crate::camera::Camera;
use crate::error::{PickError, PickResult};
use glam::{Vec2, Vec3, Vec4};

/// A ray in 3D space defined by an origin and unit direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Unproject a normalized device coordinate pair through the camera into
    /// a world-space ray.
    ///
    /// NDC is [-1, 1] on both axes, +y up. Depth follows the wgpu convention:
    /// near plane at z = 0, far plane at z = 1.
    pub fn from_ndc(ndc: Vec2, camera: &Camera) -> Self {
        let inv_view_proj = camera.view_proj_matrix().inverse();

        let near = project_homogeneous(inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0));
        let far = project_homogeneous(inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0));

        let direction = (far - near).normalize_or_zero();
        // Degenerate projection collapses near and far; fall back to the view axis
        let direction = if direction == Vec3::ZERO {
            camera.forward()
        } else {
            direction
        };

        Self {
            origin: near,
            direction,
        }
    }
}

fn project_homogeneous(v: Vec4) -> Vec3 {
    if v.w.abs() < 1e-10 {
        v.truncate()
    } else {
        v.truncate() / v.w
    }
}

/// Viewport dimensions for pixel to NDC conversion
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel coordinate (origin top-left, +y down) to NDC.
    ///
    /// Matches the pointer-event convention: x maps to [-1, 1] left to right,
    /// y is flipped so +1 is the top edge.
    pub fn ndc(&self, px: f32, py: f32) -> PickResult<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(PickError::viewport(format!(
                "non-positive dimensions {}x{}",
                self.width, self.height
            )));
        }
        Ok(Vec2::new(
            (px / self.width) * 2.0 - 1.0,
            -(py / self.height) * 2.0 + 1.0,
        ))
    }
}
