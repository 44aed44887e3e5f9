// src/picking/service.rs
// Raycast query service: bridges pointer/NDC input into geometry-index queries,
// resolves hits to instances, and tracks which instance is under the ray.
// RELEVANT FILES:src/picking/ray.rs,src/accel/mod.rs,src/context.rs

use super::ray::{Ray, Viewport};
use crate::accel::{GeometryIndex, Hit};
use crate::camera::Camera;
use crate::error::{PickError, PickResult};
use crate::scene::{Instance, InstanceStore};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Configuration for the pick service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingConfig {
    /// Maximum ray distance considered for a hit
    pub max_ray_distance: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            max_ray_distance: 10000.0,
        }
    }
}

/// Serializable pick result handed across the host boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickReport {
    pub instance_id: u32,
    pub instance_name: String,
    /// World position of the hit
    pub world_pos: [f32; 3],
    /// Hit distance along the ray
    pub hit_distance: f32,
}

/// Outcome of one poll-change query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOutcome {
    /// Whether the intersected instance differs from the previous poll
    pub changed: bool,
    /// Instance currently under the ray, if any
    pub current: Option<u32>,
}

/// Stateless-per-query pick service holding camera and config.
///
/// The index and store are owned elsewhere (see `SceneContext`) and passed
/// per call, so queries stay side-effect-free with respect to them.
pub struct PickService {
    camera: Option<Camera>,
    config: PickingConfig,
}

impl PickService {
    pub fn new(config: PickingConfig) -> Self {
        Self {
            camera: None,
            config,
        }
    }

    pub fn config(&self) -> &PickingConfig {
        &self.config
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Unproject an NDC coordinate into a world-space ray.
    ///
    /// Fails with `CameraUninitialized` before `set_camera` is called.
    pub fn screen_to_ray(&self, ndc: Vec2) -> PickResult<Ray> {
        let camera = self.camera.as_ref().ok_or(PickError::CameraUninitialized)?;
        Ok(Ray::from_ndc(ndc, camera))
    }

    /// Convert a viewport pixel coordinate to a world-space ray
    pub fn pixel_to_ray(&self, px: f32, py: f32, viewport: Viewport) -> PickResult<Ray> {
        let ndc = viewport.ndc(px, py)?;
        self.screen_to_ray(ndc)
    }

    /// Nearest raw hit along the ray, capped at the configured max distance
    pub fn raycast(&self, index: &GeometryIndex, ray: &Ray) -> Option<Hit> {
        index.raycast_within(ray, self.config.max_ray_distance)
    }

    /// Nearest hit resolved to its instance, or `None` on a miss
    pub fn pick<'s>(
        &self,
        index: &GeometryIndex,
        store: &'s InstanceStore,
        ray: &Ray,
    ) -> Option<&'s Instance> {
        let hit = self.raycast(index, ray)?;
        store.get(hit.instance).ok()
    }

    /// Nearest hit as a serializable report for the host boundary
    pub fn pick_report(
        &self,
        index: &GeometryIndex,
        store: &InstanceStore,
        ray: &Ray,
    ) -> Option<PickReport> {
        let hit = self.raycast(index, ray)?;
        let instance = store.get(hit.instance).ok()?;
        Some(PickReport {
            instance_id: instance.id,
            instance_name: instance.name.clone(),
            world_pos: hit.point.to_array(),
            hit_distance: hit.distance,
        })
    }

    /// Compare the instance under `ray` against `previous`.
    ///
    /// Pure with respect to index and store; the caller owns `previous` and
    /// is expected to update it from the returned outcome.
    pub fn poll_change(
        &self,
        index: &GeometryIndex,
        ray: &Ray,
        previous: Option<u32>,
    ) -> PollOutcome {
        let current = self.raycast(index, ray).map(|hit| hit.instance);
        PollOutcome {
            changed: current != previous,
            current,
        }
    }
}

/// Event emitted by the intersection tracker on a real state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Entered a new instance (from nothing or from another instance)
    Entered(u32),
    /// Left the last instance with nothing under the ray
    Left,
}

/// Last-intersected state machine: NONE or HIT(id).
///
/// Self-transitions (same id twice, or repeated misses) produce no event.
#[derive(Debug, Default)]
pub struct IntersectionTracker {
    current: Option<u32>,
}

impl IntersectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<u32> {
        self.current
    }

    /// Feed one observation; returns an event only when the state changed
    pub fn observe(&mut self, seen: Option<u32>) -> Option<TrackerEvent> {
        if seen == self.current {
            return None;
        }
        self.current = seen;
        match seen {
            Some(id) => Some(TrackerEvent::Entered(id)),
            None => Some(TrackerEvent::Left),
        }
    }
}
