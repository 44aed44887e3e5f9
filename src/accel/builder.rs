// src/accel/builder.rs
// Median-split BVH builder over the flattened world-space triangles of every instance.
// Produces the packed node array plus a reordered primitive-index array, with build statistics.
// RELEVANT FILES:src/accel/types.rs,src/accel/mod.rs,src/scene/mesh.rs

use super::intersect::WorldTriangle;
use super::types::{Aabb, BuildOptions, BuildStats, BvhNode};
use std::time::Instant;

/// Output of a BVH build: node array, reordered primitive slots, scene bounds
pub(crate) struct BuildOutput {
    pub nodes: Vec<BvhNode>,
    pub prim_indices: Vec<u32>,
    pub world_aabb: Aabb,
    pub stats: BuildStats,
}

/// Build a BVH over world-space triangles using recursive median split.
///
/// An empty primitive set yields an empty node array rather than an error;
/// queries against it simply miss.
pub(crate) fn build_bvh(triangles: &[WorldTriangle], options: &BuildOptions) -> BuildOutput {
    let start_time = Instant::now();

    let primitive_count = triangles.len() as u32;

    let mut stats = BuildStats {
        primitive_count,
        ..Default::default()
    };

    if triangles.is_empty() {
        stats.build_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
        return BuildOutput {
            nodes: Vec::new(),
            prim_indices: Vec::new(),
            world_aabb: Aabb::empty(),
            stats,
        };
    }

    // Compute per-primitive AABBs and centroids once up front
    let prim_aabbs: Vec<Aabb> = triangles.iter().map(|t| t.aabb()).collect();
    let prim_centroids: Vec<[f32; 3]> = triangles.iter().map(|t| t.centroid()).collect();

    let mut world_aabb = Aabb::empty();
    for aabb in &prim_aabbs {
        world_aabb.expand_aabb(aabb);
    }

    // Primitive indices get reordered in place during the build
    let mut prim_indices: Vec<u32> = (0..primitive_count).collect();
    let mut nodes = Vec::new();

    let root_info = BuildInfo {
        aabb: world_aabb,
        first: 0,
        count: primitive_count,
        depth: 0,
    };

    build_recursive(
        &prim_aabbs,
        &prim_centroids,
        &mut prim_indices,
        &mut nodes,
        root_info,
        options,
        &mut stats,
    );

    stats.build_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    stats.node_count = nodes.len() as u32;
    stats.internal_count = stats.node_count - stats.leaf_count;
    stats.memory_usage_bytes = (nodes.len() * std::mem::size_of::<BvhNode>()
        + prim_indices.len() * std::mem::size_of::<u32>()) as u64;

    if stats.leaf_count > 0 {
        stats.avg_leaf_size = primitive_count as f32 / stats.leaf_count as f32;
    }

    log::debug!(
        "bvh build: {} prims, {} nodes ({} leaves), depth {}, {:.2} ms",
        stats.primitive_count,
        stats.node_count,
        stats.leaf_count,
        stats.max_depth,
        stats.build_time_ms
    );

    BuildOutput {
        nodes,
        prim_indices,
        world_aabb,
        stats,
    }
}

struct BuildInfo {
    aabb: Aabb,
    first: u32,
    count: u32,
    depth: u32,
}

/// Recursive median-split build; returns the created node's index
fn build_recursive(
    prim_aabbs: &[Aabb],
    prim_centroids: &[[f32; 3]],
    prim_indices: &mut [u32],
    nodes: &mut Vec<BvhNode>,
    info: BuildInfo,
    options: &BuildOptions,
    stats: &mut BuildStats,
) -> u32 {
    stats.max_depth = stats.max_depth.max(info.depth);

    if info.count <= options.max_leaf_size || info.depth >= options.max_depth {
        return push_leaf(nodes, stats, info.aabb, info.first, info.count);
    }

    let range = &prim_indices[info.first as usize..(info.first + info.count) as usize];
    let split = match find_median_split(prim_centroids, range, &info.aabb) {
        Some(split) => split,
        None => return push_leaf(nodes, stats, info.aabb, info.first, info.count),
    };

    let split_index = partition_primitives(
        prim_indices,
        info.first,
        info.count,
        split.0,
        split.1,
        prim_centroids,
    );

    let left_count = split_index - info.first;
    let right_count = info.count - left_count;

    if left_count == 0 || right_count == 0 {
        // Degenerate split (coincident centroids); stop here
        return push_leaf(nodes, stats, info.aabb, info.first, info.count);
    }

    let left_aabb = compute_bounds(
        prim_aabbs,
        &prim_indices[info.first as usize..split_index as usize],
    );
    let right_aabb = compute_bounds(
        prim_aabbs,
        &prim_indices[split_index as usize..(info.first + info.count) as usize],
    );

    let left_child = build_recursive(
        prim_aabbs,
        prim_centroids,
        prim_indices,
        nodes,
        BuildInfo {
            aabb: left_aabb,
            first: info.first,
            count: left_count,
            depth: info.depth + 1,
        },
        options,
        stats,
    );

    let right_child = build_recursive(
        prim_aabbs,
        prim_centroids,
        prim_indices,
        nodes,
        BuildInfo {
            aabb: right_aabb,
            first: split_index,
            count: right_count,
            depth: info.depth + 1,
        },
        options,
        stats,
    );

    let node_idx = nodes.len() as u32;
    nodes.push(BvhNode::internal(info.aabb, left_child, right_child));
    node_idx
}

fn push_leaf(
    nodes: &mut Vec<BvhNode>,
    stats: &mut BuildStats,
    aabb: Aabb,
    first: u32,
    count: u32,
) -> u32 {
    stats.leaf_count += 1;
    let node_idx = nodes.len() as u32;
    nodes.push(BvhNode::leaf(aabb, first, count));
    node_idx
}

/// Find the split axis (largest extent) and the median centroid position on it
fn find_median_split(
    prim_centroids: &[[f32; 3]],
    indices: &[u32],
    parent_aabb: &Aabb,
) -> Option<(usize, f32)> {
    if indices.len() < 2 {
        return None;
    }

    let extent = parent_aabb.extent();

    let axis = if extent[0] > extent[1] && extent[0] > extent[2] {
        0
    } else if extent[1] > extent[2] {
        1
    } else {
        2
    };

    let mut centroids: Vec<f32> = indices
        .iter()
        .map(|&idx| prim_centroids[idx as usize][axis])
        .collect();
    centroids.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let split_pos = centroids[centroids.len() / 2];

    Some((axis, split_pos))
}

/// Partition the index range around the split position; returns the split index
fn partition_primitives(
    indices: &mut [u32],
    first: u32,
    count: u32,
    axis: usize,
    split_pos: f32,
    prim_centroids: &[[f32; 3]],
) -> u32 {
    let range = &mut indices[first as usize..(first + count) as usize];

    let mut left = 0;
    let mut right = range.len();

    while left < right {
        let centroid = prim_centroids[range[left] as usize];
        if centroid[axis] < split_pos {
            left += 1;
        } else {
            right -= 1;
            range.swap(left, right);
        }
    }

    first + left as u32
}

fn compute_bounds(prim_aabbs: &[Aabb], indices: &[u32]) -> Aabb {
    let mut aabb = Aabb::empty();
    for &idx in indices {
        aabb.expand_aabb(&prim_aabbs[idx as usize]);
    }
    aabb
}
