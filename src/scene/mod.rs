// src/scene/mod.rs
// Instance store: the canonical list of instanced copies of the base geometry.
// Each instance carries a stable id, a deterministic name, and a translation-only transform.
// RELEVANT FILES:src/scene/mesh.rs,src/accel/mod.rs,src/picking/service.rs

mod mesh;

pub use mesh::TriangleMesh;

use crate::error::{PickError, PickResult};
use glam::{Mat4, Vec3};

/// One logical copy of the shared base geometry
#[derive(Debug, Clone)]
pub struct Instance {
    /// Stable id in [0, count); assigned at creation, never reused
    pub id: u32,
    /// Human-readable name, derived deterministically from the id
    pub name: String,
    /// Object-to-world transform (translation-only in this scene)
    pub transform: Mat4,
    /// World-space position, kept alongside the matrix for marker placement
    pub position: Vec3,
}

/// Owns the instance list and the base geometry they all share.
///
/// Effectively immutable once built: the demo scene is static, so there are
/// no mutation or deletion operations after `generate`.
pub struct InstanceStore {
    instances: Vec<Instance>,
    mesh: TriangleMesh,
}

impl InstanceStore {
    /// Allocate `count` instances, placing instance `i` at `position_fn(i)`.
    pub fn generate<F>(mesh: TriangleMesh, count: u32, mut position_fn: F) -> Self
    where
        F: FnMut(u32) -> Vec3,
    {
        let mut instances = Vec::with_capacity(count as usize);
        for id in 0..count {
            let position = position_fn(id);
            instances.push(Instance {
                id,
                name: format!("Instance_{}", id),
                transform: Mat4::from_translation(position),
                position,
            });
        }
        log::debug!("instance store generated: {} instances", count);
        Self { instances, mesh }
    }

    /// Look up an instance by id
    pub fn get(&self, id: u32) -> PickResult<&Instance> {
        self.instances
            .get(id as usize)
            .ok_or_else(|| PickError::out_of_range(id, self.count()))
    }

    pub fn count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The base geometry shared by every instance
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    /// Total vertex count across all live instances (N * base vertices)
    pub fn total_vertex_count(&self) -> u64 {
        self.count() as u64 * self.mesh.vertex_count() as u64
    }

    /// Total triangle count across all live instances
    pub fn total_triangle_count(&self) -> u64 {
        self.count() as u64 * self.mesh.triangle_count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_names_and_positions() {
        let store = InstanceStore::generate(TriangleMesh::unit_box(), 3, |i| {
            Vec3::new(i as f32 * 10.0, 0.0, 0.0)
        });

        assert_eq!(store.count(), 3);
        for i in 0..3 {
            let instance = store.get(i).unwrap();
            assert_eq!(instance.id, i);
            assert_eq!(instance.name, format!("Instance_{}", i));
            assert!((instance.position.x - i as f32 * 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let store = InstanceStore::generate(TriangleMesh::unit_box(), 2, |_| Vec3::ZERO);
        let err = store.get(2).unwrap_err();
        match err {
            PickError::InstanceOutOfRange { id, count } => {
                assert_eq!(id, 2);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_store() {
        let store = InstanceStore::generate(TriangleMesh::unit_box(), 0, |_| Vec3::ZERO);
        assert!(store.is_empty());
        assert!(store.get(0).is_err());
    }

    #[test]
    fn test_transform_is_translation() {
        let store =
            InstanceStore::generate(TriangleMesh::unit_box(), 1, |_| Vec3::new(1.0, 2.0, 3.0));
        let instance = store.get(0).unwrap();
        let moved = instance.transform.transform_point3(Vec3::ZERO);
        assert!((moved - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }
}
