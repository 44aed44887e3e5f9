// src/accel/types.rs
// Core types for the BVH acceleration structure - AABB, packed nodes, and build options.
// Layouts are Pod and 16-byte friendly so the arrays can be uploaded to a GPU backend unchanged.
// RELEVANT FILES:src/accel/builder.rs,src/accel/mod.rs,src/accel/intersect.rs

use bytemuck::{Pod, Zeroable};

/// Axis-aligned bounding box - GPU compatible layout (16-byte aligned)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Aabb {
    pub min: [f32; 3],
    pub _pad0: f32,
    pub max: [f32; 3],
    pub _pad1: f32,
}

impl Aabb {
    /// Create empty AABB (inverted bounds for union operations)
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            _pad0: 0.0,
            max: [f32::NEG_INFINITY; 3],
            _pad1: 0.0,
        }
    }

    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            min,
            _pad0: 0.0,
            max,
            _pad1: 0.0,
        }
    }

    /// Expand AABB to include a point
    pub fn expand_point(&mut self, point: [f32; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    /// Expand AABB to include another AABB
    pub fn expand_aabb(&mut self, other: &Aabb) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    /// Get AABB center
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Get AABB extent (max - min)
    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Check if AABB is valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// Packed BVH node (32 bytes)
///
/// Internal nodes store child indices; leaves store a primitive range into
/// the reordered primitive-index array. The leaf flag lives in bit 0 of
/// `flags`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BvhNode {
    pub aabb_min: [f32; 3],
    pub left: u32, // if internal: left child index; if leaf: first primitive slot
    pub aabb_max: [f32; 3],
    pub right: u32, // if internal: right child index; if leaf: primitive count
    pub flags: u32, // bit 0: leaf flag (1 = leaf, 0 = internal)
    pub _pad: u32,  // padding for 16-byte stride
}

impl BvhNode {
    /// Create internal node
    pub fn internal(aabb: Aabb, left_idx: u32, right_idx: u32) -> Self {
        Self {
            aabb_min: aabb.min,
            left: left_idx,
            aabb_max: aabb.max,
            right: right_idx,
            flags: 0,
            _pad: 0,
        }
    }

    /// Create leaf node
    pub fn leaf(aabb: Aabb, first_prim: u32, prim_count: u32) -> Self {
        Self {
            aabb_min: aabb.min,
            left: first_prim,
            aabb_max: aabb.max,
            right: prim_count,
            flags: 1,
            _pad: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        (self.flags & 1) != 0
    }

    pub fn is_internal(&self) -> bool {
        (self.flags & 1) == 0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.aabb_min, self.aabb_max)
    }

    /// Get child indices for internal nodes
    pub fn children(&self) -> Option<(u32, u32)> {
        if self.is_internal() {
            Some((self.left, self.right))
        } else {
            None
        }
    }

    /// Get primitive range (first slot, count) for leaf nodes
    pub fn primitives(&self) -> Option<(u32, u32)> {
        if self.is_leaf() {
            Some((self.left, self.right))
        } else {
            None
        }
    }
}

// Verify the struct layout stays GPU-uploadable at compile time
const _: () = {
    assert!(std::mem::size_of::<BvhNode>() == 40); // 10 * 4 bytes
    assert!(std::mem::align_of::<BvhNode>() == 4);
};

/// Build options for BVH construction
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Maximum primitives per leaf node
    pub max_leaf_size: u32,
    /// Hard recursion limit; degenerate splits beyond this become leaves
    pub max_depth: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_leaf_size: 4,
            max_depth: 64,
        }
    }
}

/// Statistics from BVH construction
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub build_time_ms: f32,
    pub primitive_count: u32,
    pub node_count: u32,
    pub leaf_count: u32,
    pub internal_count: u32,
    pub max_depth: u32,
    pub avg_leaf_size: f32,
    pub memory_usage_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bvh_node_layout() {
        assert_eq!(std::mem::size_of::<BvhNode>(), 32);
        assert_eq!(std::mem::align_of::<BvhNode>(), 4);

        let aabb = Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let leaf = BvhNode::leaf(aabb, 0, 4);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.primitives(), Some((0, 4)));
        assert_eq!(leaf.children(), None);

        let internal = BvhNode::internal(aabb, 1, 2);
        assert!(internal.is_internal());
        assert_eq!(internal.children(), Some((1, 2)));
        assert_eq!(internal.primitives(), None);
    }

    #[test]
    fn test_aabb_expand() {
        let mut aabb = Aabb::empty();
        assert!(!aabb.is_valid());

        aabb.expand_point([1.0, 2.0, 3.0]);
        aabb.expand_point([-1.0, 0.0, 5.0]);
        assert!(aabb.is_valid());
        assert_eq!(aabb.min, [-1.0, 0.0, 3.0]);
        assert_eq!(aabb.max, [1.0, 2.0, 5.0]);

        let center = aabb.center();
        assert_eq!(center, [0.0, 1.0, 4.0]);
    }
}
