// src/scene/mesh.rs
// Base triangle mesh shared read-only by every instance in the scene.
// Provides per-triangle access used by the BVH builder and the unit box used by the demo.
// RELEVANT FILES:src/accel/builder.rs,src/scene/mod.rs

use glam::Vec3;

/// Triangle mesh - simple vertex/index representation
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<[u32; 3]>, // triangle indices (CCW winding)
}

impl TriangleMesh {
    pub fn new(vertices: Vec<[f32; 3]>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Get triangle vertices by index
    pub fn get_triangle(&self, tri_idx: usize) -> Option<([f32; 3], [f32; 3], [f32; 3])> {
        if tri_idx >= self.indices.len() {
            return None;
        }
        let indices = self.indices[tri_idx];
        let v0 = *self.vertices.get(indices[0] as usize)?;
        let v1 = *self.vertices.get(indices[1] as usize)?;
        let v2 = *self.vertices.get(indices[2] as usize)?;
        Some((v0, v1, v2))
    }

    /// Get triangle vertices translated to an instance position
    pub fn get_triangle_at(
        &self,
        tri_idx: usize,
        offset: Vec3,
    ) -> Option<([f32; 3], [f32; 3], [f32; 3])> {
        let (v0, v1, v2) = self.get_triangle(tri_idx)?;
        Some((
            (Vec3::from_array(v0) + offset).to_array(),
            (Vec3::from_array(v1) + offset).to_array(),
            (Vec3::from_array(v2) + offset).to_array(),
        ))
    }

    /// Axis-aligned unit cube centered at the origin (8 vertices, 12 triangles).
    ///
    /// Matches the demo scene's base geometry: half-extent 0.5 on every axis.
    pub fn unit_box() -> Self {
        let h = 0.5f32;
        let vertices = vec![
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ];
        let indices = vec![
            // Front face (-z)
            [0, 2, 1],
            [0, 3, 2],
            // Right face (+x)
            [1, 6, 5],
            [1, 2, 6],
            // Back face (+z)
            [5, 7, 4],
            [5, 6, 7],
            // Left face (-x)
            [4, 3, 0],
            [4, 7, 3],
            // Top face (+y)
            [3, 6, 2],
            [3, 7, 6],
            // Bottom face (-y)
            [4, 1, 5],
            [4, 0, 1],
        ];
        Self { vertices, indices }
    }
}
