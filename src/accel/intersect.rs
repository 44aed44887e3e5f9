// src/accel/intersect.rs
// Ray/AABB slab tests and Moller-Trumbore ray/triangle intersection.
// These are the leaf-level predicates shared by the nearest-hit and all-hits traversals.
// RELEVANT FILES:src/accel/mod.rs,src/picking/ray.rs

use super::types::Aabb;
use crate::picking::Ray;

const EPSILON: f32 = 1e-7;

/// World-space triangle flattened from an instance of the base mesh
#[derive(Debug, Clone, Copy)]
pub struct WorldTriangle {
    pub v0: [f32; 3],
    pub v1: [f32; 3],
    pub v2: [f32; 3],
}

impl WorldTriangle {
    pub fn new(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn centroid(&self) -> [f32; 3] {
        [
            (self.v0[0] + self.v1[0] + self.v2[0]) / 3.0,
            (self.v0[1] + self.v1[1] + self.v2[1]) / 3.0,
            (self.v0[2] + self.v1[2] + self.v2[2]) / 3.0,
        ]
    }

    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        aabb.expand_point(self.v0);
        aabb.expand_point(self.v1);
        aabb.expand_point(self.v2);
        aabb
    }
}

/// Ray-AABB slab test returning the entry distance along the ray.
///
/// Returns `None` if the slabs are missed entirely or the box lies beyond
/// `max_t`. An origin inside the box reports entry distance 0.
pub fn ray_aabb_entry(ray: &Ray, aabb: &Aabb, max_t: f32) -> Option<f32> {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();

    let mut t_min = 0.0f32;
    let mut t_max = max_t;

    for i in 0..3 {
        if direction[i].abs() < 1e-10 {
            // Ray parallel to slab
            if origin[i] < aabb.min[i] || origin[i] > aabb.max[i] {
                return None;
            }
        } else {
            let inv_d = 1.0 / direction[i];
            let mut t1 = (aabb.min[i] - origin[i]) * inv_d;
            let mut t2 = (aabb.max[i] - origin[i]) * inv_d;

            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);

            if t_min > t_max {
                return None;
            }
        }
    }

    Some(t_min)
}

/// Moller-Trumbore ray-triangle intersection, returning the hit distance
pub fn ray_triangle_intersect(ray: &Ray, triangle: &WorldTriangle) -> Option<f32> {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();

    let edge1 = [
        triangle.v1[0] - triangle.v0[0],
        triangle.v1[1] - triangle.v0[1],
        triangle.v1[2] - triangle.v0[2],
    ];
    let edge2 = [
        triangle.v2[0] - triangle.v0[0],
        triangle.v2[1] - triangle.v0[1],
        triangle.v2[2] - triangle.v0[2],
    ];

    let h = cross(direction, edge2);
    let a = dot(edge1, h);

    if a.abs() < EPSILON {
        return None; // Ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = [
        origin[0] - triangle.v0[0],
        origin[1] - triangle.v0[1],
        origin[2] - triangle.v0[2],
    ];
    let u = f * dot(s, h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = cross(s, edge1);
    let v = f * dot(direction, q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * dot(edge2, q);

    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
