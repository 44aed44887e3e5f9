// src/accel/mod.rs
// Geometry index: a BVH over the instanced scene with nearest-hit and all-hits ray queries.
// Triangles are laid out instance-major so a primitive hit resolves to its instance in O(1).
// RELEVANT FILES:src/accel/builder.rs,src/accel/types.rs,src/accel/intersect.rs

mod builder;
mod intersect;
pub mod types;

pub use intersect::WorldTriangle;
pub use types::{Aabb, BuildOptions, BuildStats, BvhNode};

use crate::picking::Ray;
use crate::scene::InstanceStore;
use intersect::{ray_aabb_entry, ray_triangle_intersect};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A ray/primitive intersection resolved to its owning instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// World-space hit point
    pub point: glam::Vec3,
    /// Distance from the ray origin (>= 0)
    pub distance: f32,
    /// Global triangle index across all instances
    pub triangle: u32,
    /// Owning instance id
    pub instance: u32,
}

/// Read-only spatial index over every instance's world-space triangles.
///
/// Built once after scene setup; the scene is static, so there is no refit
/// or rebuild path.
pub struct GeometryIndex {
    nodes: Vec<BvhNode>,
    /// Leaf slot -> global triangle index (reordered during the build)
    prim_indices: Vec<u32>,
    /// Flattened world-space triangles, instance-major
    triangles: Vec<WorldTriangle>,
    tris_per_instance: u32,
    world_aabb: Aabb,
    stats: BuildStats,
}

impl GeometryIndex {
    /// Build the index over every instance of the store's base mesh.
    ///
    /// Zero instances or an empty mesh produce an empty index; every query
    /// against it returns no hit.
    pub fn build(store: &InstanceStore, options: &BuildOptions) -> Self {
        let mesh = store.mesh();
        let tris_per_instance = mesh.triangle_count();

        let mut triangles =
            Vec::with_capacity((store.count() as usize) * (tris_per_instance as usize));
        for instance in store.iter() {
            for tri_idx in 0..tris_per_instance as usize {
                // get_triangle_at only fails on out-of-range indices, which
                // the loop bound excludes
                if let Some((v0, v1, v2)) = mesh.get_triangle_at(tri_idx, instance.position) {
                    triangles.push(WorldTriangle::new(v0, v1, v2));
                }
            }
        }

        let output = builder::build_bvh(&triangles, options);

        Self {
            nodes: output.nodes,
            prim_indices: output.prim_indices,
            triangles,
            tris_per_instance,
            world_aabb: output.world_aabb,
            stats: output.stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn primitive_count(&self) -> u32 {
        self.triangles.len() as u32
    }

    pub fn world_aabb(&self) -> Aabb {
        self.world_aabb
    }

    pub fn build_stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Resolve a global triangle index to its owning instance id
    pub fn instance_of_triangle(&self, triangle: u32) -> u32 {
        if self.tris_per_instance == 0 {
            0
        } else {
            triangle / self.tris_per_instance
        }
    }

    /// Find the nearest hit along the ray, or `None` if nothing is intersected
    pub fn raycast(&self, ray: &Ray) -> Option<Hit> {
        self.raycast_within(ray, f32::INFINITY)
    }

    /// Nearest hit within `max_t` along the ray.
    ///
    /// Stack-based branch-and-bound traversal: nodes whose slab entry
    /// distance exceeds the current best hit are pruned.
    pub fn raycast_within(&self, ray: &Ray, max_t: f32) -> Option<Hit> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<Hit> = None;
        let mut best_t = max_t;

        let mut stack: Vec<u32> = Vec::with_capacity(32);
        stack.push((self.nodes.len() - 1) as u32); // root is pushed last by the builder

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];

            if ray_aabb_entry(ray, &node.aabb(), best_t).is_none() {
                continue;
            }

            if node.is_leaf() {
                let (first, count) = node.primitives().unwrap_or((0, 0));
                for slot in first..first + count {
                    let tri_idx = self.prim_indices[slot as usize];
                    let triangle = &self.triangles[tri_idx as usize];
                    if let Some(t) = ray_triangle_intersect(ray, triangle) {
                        if t < best_t {
                            best_t = t;
                            best = Some(Hit {
                                point: ray.point_at(t),
                                distance: t,
                                triangle: tri_idx,
                                instance: self.instance_of_triangle(tri_idx),
                            });
                        }
                    }
                }
            } else if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            }
        }

        best
    }

    /// All hits along the ray, streamed in ascending distance order.
    ///
    /// Best-first traversal over a heap keyed on node entry distance, so the
    /// first yielded element always equals `raycast`'s result and the caller
    /// can stop early without paying for the full hit set.
    pub fn raycast_all<'a>(&'a self, ray: &Ray) -> HitIter<'a> {
        let mut heap = BinaryHeap::new();
        if !self.nodes.is_empty() {
            let root = (self.nodes.len() - 1) as u32;
            if let Some(entry) = ray_aabb_entry(ray, &self.nodes[root as usize].aabb(), f32::INFINITY)
            {
                heap.push(TraversalEntry::node(entry, root));
            }
        }
        HitIter {
            index: self,
            ray: *ray,
            heap,
        }
    }
}

/// Lazy ascending-distance hit iterator returned by [`GeometryIndex::raycast_all`]
pub struct HitIter<'a> {
    index: &'a GeometryIndex,
    ray: Ray,
    heap: BinaryHeap<TraversalEntry>,
}

impl<'a> Iterator for HitIter<'a> {
    type Item = Hit;

    fn next(&mut self) -> Option<Hit> {
        while let Some(entry) = self.heap.pop() {
            match entry.kind {
                EntryKind::Hit(hit) => return Some(hit),
                EntryKind::Node(node_idx) => {
                    let node = &self.index.nodes[node_idx as usize];
                    if node.is_leaf() {
                        let (first, count) = node.primitives().unwrap_or((0, 0));
                        for slot in first..first + count {
                            let tri_idx = self.index.prim_indices[slot as usize];
                            let triangle = &self.index.triangles[tri_idx as usize];
                            if let Some(t) = ray_triangle_intersect(&self.ray, triangle) {
                                self.heap.push(TraversalEntry::hit(Hit {
                                    point: self.ray.point_at(t),
                                    distance: t,
                                    triangle: tri_idx,
                                    instance: self.index.instance_of_triangle(tri_idx),
                                }));
                            }
                        }
                    } else if let Some((left, right)) = node.children() {
                        for child in [left, right] {
                            let aabb = self.index.nodes[child as usize].aabb();
                            if let Some(entry) =
                                ray_aabb_entry(&self.ray, &aabb, f32::INFINITY)
                            {
                                self.heap.push(TraversalEntry::node(entry, child));
                            }
                        }
                    }
                }
            }
        }
        None
    }
}

enum EntryKind {
    Node(u32),
    Hit(Hit),
}

/// Heap entry ordered so the smallest key pops first.
///
/// A hit's key is its distance; a node's key is its slab entry distance.
/// Any hit discovered inside a node is at least as far as the node's entry,
/// so popping in key order yields hits in ascending distance.
struct TraversalEntry {
    key: f32,
    kind: EntryKind,
}

impl TraversalEntry {
    fn node(key: f32, idx: u32) -> Self {
        Self {
            key,
            kind: EntryKind::Node(idx),
        }
    }

    fn hit(hit: Hit) -> Self {
        Self {
            key: hit.distance,
            kind: EntryKind::Hit(hit),
        }
    }
}

impl PartialEq for TraversalEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TraversalEntry {}

impl PartialOrd for TraversalEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TraversalEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the nearest entry first
        other
            .key
            .partial_cmp(&self.key)
            .unwrap_or(Ordering::Equal)
    }
}
