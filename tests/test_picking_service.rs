// tests/test_picking_service.rs
// Pick service and change-tracking properties: instance naming, pick
// idempotence, poll-change semantics, and camera preconditions.
// RELEVANT FILES:src/picking/service.rs,src/context.rs,src/scene/mod.rs

use glam::{Vec2, Vec3};
use raypick::{
    BuildOptions, Camera, GeometryIndex, InstanceStore, PickError, PickService, PickingConfig,
    Ray, TriangleMesh, Viewport,
};

fn scene() -> (InstanceStore, GeometryIndex) {
    let store = InstanceStore::generate(TriangleMesh::unit_box(), 3, |i| {
        Vec3::new(i as f32 * 10.0, 0.0, 0.0)
    });
    let index = GeometryIndex::build(&store, &BuildOptions::default());
    (store, index)
}

fn ray_at_instance(id: u32) -> Ray {
    Ray::new(
        Vec3::new(id as f32 * 10.0, 0.0, -5.0),
        Vec3::new(0.0, 0.0, 1.0),
    )
}

fn ray_at_nothing() -> Ray {
    Ray::new(Vec3::new(0.0, 100.0, -5.0), Vec3::new(0.0, 0.0, 1.0))
}

#[test]
fn instance_names_follow_id() {
    let store = InstanceStore::generate(TriangleMesh::unit_box(), 100, |i| {
        Vec3::new(i as f32, 0.0, 0.0)
    });
    for i in 0..100 {
        assert_eq!(store.get(i).unwrap().name, format!("Instance_{}", i));
    }
}

#[test]
fn store_lookup_out_of_range_fails() {
    let (store, _) = scene();
    assert!(matches!(
        store.get(3),
        Err(PickError::InstanceOutOfRange { id: 3, count: 3 })
    ));
}

#[test]
fn pick_resolves_hit_to_instance() {
    let (store, index) = scene();
    let service = PickService::new(PickingConfig::default());

    let instance = service
        .pick(&index, &store, &ray_at_instance(1))
        .expect("ray aimed at instance 1 must pick it");
    assert_eq!(instance.id, 1);
    assert_eq!(instance.name, "Instance_1");

    assert!(service.pick(&index, &store, &ray_at_nothing()).is_none());
}

#[test]
fn pick_is_idempotent() {
    let (store, index) = scene();
    let service = PickService::new(PickingConfig::default());
    let ray = ray_at_instance(2);

    let first = service.pick(&index, &store, &ray).map(|i| i.id);
    let second = service.pick(&index, &store, &ray).map(|i| i.id);
    assert_eq!(first, second);

    let report_a = service.pick_report(&index, &store, &ray).unwrap();
    let report_b = service.pick_report(&index, &store, &ray).unwrap();
    assert_eq!(report_a.instance_id, report_b.instance_id);
    assert_eq!(report_a.hit_distance, report_b.hit_distance);
}

#[test]
fn poll_change_sequence_semantics() {
    // R1 hits A, R2 hits A again, R3 hits B, R4 hits nothing.
    // Expected: changed=false at R2, changed=true at R3, changed=true at R4.
    let (_store, index) = scene();
    let service = PickService::new(PickingConfig::default());

    let mut previous = None;

    let r1 = service.poll_change(&index, &ray_at_instance(0), previous);
    assert!(r1.changed);
    assert_eq!(r1.current, Some(0));
    previous = r1.current;

    let r2 = service.poll_change(&index, &ray_at_instance(0), previous);
    assert!(!r2.changed, "same instance twice must not report a change");
    previous = r2.current;

    let r3 = service.poll_change(&index, &ray_at_instance(2), previous);
    assert!(r3.changed);
    assert_eq!(r3.current, Some(2));
    previous = r3.current;

    let r4 = service.poll_change(&index, &ray_at_nothing(), previous);
    assert!(r4.changed);
    assert_eq!(r4.current, None);
}

#[test]
fn poll_change_does_not_mutate_anything() {
    let (_store, index) = scene();
    let service = PickService::new(PickingConfig::default());

    // The same query with the same `previous` answers identically every time
    for _ in 0..3 {
        let outcome = service.poll_change(&index, &ray_at_instance(1), None);
        assert!(outcome.changed);
        assert_eq!(outcome.current, Some(1));
    }
}

#[test]
fn screen_to_ray_without_camera_is_an_error() {
    let service = PickService::new(PickingConfig::default());
    assert!(matches!(
        service.screen_to_ray(Vec2::ZERO),
        Err(PickError::CameraUninitialized)
    ));
    assert!(service
        .pixel_to_ray(10.0, 10.0, Viewport::new(100.0, 100.0))
        .is_err());
}

#[test]
fn camera_pick_through_viewport_center() {
    // Camera at z=50 looking at the origin; a box at the origin sits under
    // the viewport center pixel.
    let store = InstanceStore::generate(TriangleMesh::unit_box(), 1, |_| Vec3::ZERO);
    let index = GeometryIndex::build(&store, &BuildOptions::default());

    let mut service = PickService::new(PickingConfig::default());
    service.set_camera(Camera::demo_default(800.0 / 600.0));

    let ray = service
        .pixel_to_ray(400.0, 300.0, Viewport::new(800.0, 600.0))
        .unwrap();
    let instance = service
        .pick(&index, &store, &ray)
        .expect("center pixel must pick the origin box");
    assert_eq!(instance.id, 0);

    // A corner pixel looks well past the box
    let ray = service
        .pixel_to_ray(0.0, 0.0, Viewport::new(800.0, 600.0))
        .unwrap();
    assert!(service.pick(&index, &store, &ray).is_none());
}
