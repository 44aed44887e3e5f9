// tests/test_bvh_queries.rs
// End-to-end BVH query properties: nearest-hit correctness, all-hits ordering,
// and empty-scene behavior, exercised through the public crate API.
// RELEVANT FILES:src/accel/mod.rs,src/accel/builder.rs

use glam::Vec3;
use raypick::{BuildOptions, GeometryIndex, Hit, InstanceStore, Ray, TriangleMesh};

fn row_of_boxes(count: u32, spacing: f32) -> InstanceStore {
    InstanceStore::generate(TriangleMesh::unit_box(), count, |i| {
        Vec3::new(i as f32 * spacing, 0.0, 0.0)
    })
}

#[test]
fn nearest_hit_resolves_to_middle_instance() {
    // Three unit boxes at (0,0,0), (10,0,0), (20,0,0); a ray
    // from (10,0,-5) along +z must hit instance 1 at distance ~4.5 (the box
    // half-extent is 0.5) and never report ids 0 or 2.
    let store = row_of_boxes(3, 10.0);
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    let ray = Ray::new(Vec3::new(10.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
    let hit = index.raycast(&ray).expect("ray aimed at instance 1 must hit");

    assert_eq!(hit.instance, 1);
    assert!(
        (hit.distance - 4.5).abs() < 1e-3,
        "expected distance ~4.5, got {}",
        hit.distance
    );

    // No other instance may appear nearer in the full hit set
    for h in index.raycast_all(&ray) {
        assert_eq!(h.instance, 1, "only instance 1 lies on this ray");
    }
}

#[test]
fn missing_ray_returns_none_and_empty_sequence() {
    let store = row_of_boxes(3, 10.0);
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    let ray = Ray::new(Vec3::new(0.0, 50.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
    assert!(index.raycast(&ray).is_none());
    assert_eq!(index.raycast_all(&ray).count(), 0);
}

#[test]
fn raycast_equals_first_of_raycast_all() {
    let store = row_of_boxes(16, 4.0);
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    // Down the row, piercing every box
    let ray = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

    let nearest = index.raycast(&ray).expect("row ray must hit");
    let mut all = index.raycast_all(&ray);
    let first = all.next().expect("all-hits must be non-empty when raycast hits");

    assert_eq!(first.instance, nearest.instance);
    assert_eq!(first.triangle, nearest.triangle);
    assert!((first.distance - nearest.distance).abs() < 1e-6);
}

#[test]
fn raycast_all_is_ascending_by_distance() {
    let store = row_of_boxes(16, 4.0);
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    let ray = Ray::new(Vec3::new(-3.0, 0.1, 0.1), Vec3::new(1.0, 0.0, 0.0));
    let hits: Vec<Hit> = index.raycast_all(&ray).collect();

    assert!(hits.len() >= 2, "row ray should produce multiple hits");
    for pair in hits.windows(2) {
        assert!(
            pair[0].distance <= pair[1].distance + 1e-6,
            "hits out of order: {} then {}",
            pair[0].distance,
            pair[1].distance
        );
    }
}

#[test]
fn empty_scene_builds_and_always_misses() {
    let store = InstanceStore::generate(TriangleMesh::unit_box(), 0, |_| Vec3::ZERO);
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    assert!(index.is_empty());
    assert_eq!(index.primitive_count(), 0);

    for direction in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::Z] {
        let ray = Ray::new(Vec3::ZERO, direction);
        assert!(index.raycast(&ray).is_none());
        assert_eq!(index.raycast_all(&ray).count(), 0);
    }
}

#[test]
fn build_stats_reflect_scene_size() {
    let store = row_of_boxes(100, 3.0);
    let index = GeometryIndex::build(&store, &BuildOptions::default());
    let stats = index.build_stats();

    assert_eq!(stats.primitive_count, 100 * 12);
    assert_eq!(stats.node_count, index.node_count());
    assert_eq!(stats.leaf_count + stats.internal_count, stats.node_count);
    assert!(stats.max_depth > 0);
    assert!(stats.memory_usage_bytes > 0);
}

#[test]
fn dense_scene_nearest_matches_streamed_minimum() {
    // 1000 instances in a cube grid; the branch-and-bound nearest hit must
    // agree with the minimum of the streamed hit set.
    let store = InstanceStore::generate(TriangleMesh::unit_box(), 1000, |i| {
        Vec3::new(
            (i % 10) as f32 * 2.0,
            ((i / 10) % 10) as f32 * 2.0,
            (i / 100) as f32 * 2.0,
        )
    });
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    let ray = Ray::new(Vec3::new(8.1, 8.1, -20.0), Vec3::new(0.0, 0.0, 1.0));
    if let Some(nearest) = index.raycast(&ray) {
        let streamed_min = index
            .raycast_all(&ray)
            .min_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap())
            .unwrap();
        assert_eq!(nearest.instance, streamed_min.instance);
        assert!((nearest.distance - streamed_min.distance).abs() < 1e-6);
    } else {
        panic!("grid ray should hit the lattice");
    }
}
