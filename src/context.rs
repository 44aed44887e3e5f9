// src/context.rs
// Explicit scene context replacing the original demo's global singletons.
// Owns the store, index, pick service, tracker, and pointer-follower marker;
// the host's frame loop, pointer handler, and poll timer each call one method.
// RELEVANT FILES:src/picking/service.rs,src/accel/mod.rs,src/stats/mod.rs

use crate::accel::{BuildOptions, GeometryIndex, Hit};
use crate::camera::Camera;
use crate::error::PickResult;
use crate::picking::{
    IntersectionTracker, PickService, PickingConfig, PollOutcome, Ray, TrackerEvent, Viewport,
};
use crate::scene::InstanceStore;
use crate::stats::{FrameStats, FrameTimer, RenderCounters};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where the periodic intersection poll gets its ray from.
///
/// The original demo fired the poll ray from the pointer-follower marker
/// along a fixed axis, decoupled from the pointer; that behavior is kept
/// available but the default re-uses the last pointer ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RaySource {
    /// Reuse the most recent pointer ray
    Pointer,
    /// Fire from the marker position along a fixed direction
    MarkerAxis([f32; 3]),
}

impl Default for RaySource {
    fn default() -> Self {
        RaySource::Pointer
    }
}

/// Context-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConfig {
    pub ray_source: RaySource,
    pub picking: PickingConfig,
}

/// Owns the whole spatial-query scene for the process lifetime.
///
/// Single-threaded by design: the host's frame callback, pointer handler,
/// and poll timer are expected to run cooperatively on one thread.
pub struct SceneContext {
    store: InstanceStore,
    index: GeometryIndex,
    service: PickService,
    tracker: IntersectionTracker,
    config: ContextConfig,
    timer: FrameTimer,
    marker: Vec3,
    last_pointer_ray: Option<Ray>,
    last_stats: FrameStats,
}

impl SceneContext {
    /// Build the index over the store and wire up the context
    pub fn new(store: InstanceStore, build_options: &BuildOptions, config: ContextConfig) -> Self {
        let index = GeometryIndex::build(&store, build_options);
        let service = PickService::new(config.picking.clone());
        Self {
            store,
            index,
            service,
            tracker: IntersectionTracker::new(),
            config,
            timer: FrameTimer::new(),
            marker: Vec3::ZERO,
            last_pointer_ray: None,
            last_stats: FrameStats::default(),
        }
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.service.set_camera(camera);
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    pub fn index(&self) -> &GeometryIndex {
        &self.index
    }

    pub fn service(&self) -> &PickService {
        &self.service
    }

    /// Pointer-follower marker position (moved to the last pointer hit point)
    pub fn marker(&self) -> Vec3 {
        self.marker
    }

    pub fn last_intersected(&self) -> Option<u32> {
        self.tracker.current()
    }

    /// Pointer-move handler: unproject the cursor, raycast, and move the
    /// marker to the hit point. Returns the hit, if any.
    pub fn on_pointer_move(&mut self, px: f32, py: f32, viewport: Viewport) -> PickResult<Option<Hit>> {
        let ray = self.service.pixel_to_ray(px, py, viewport)?;
        self.last_pointer_ray = Some(ray);

        let hit = self.service.raycast(&self.index, &ray);
        if let Some(hit) = &hit {
            self.marker = hit.point;
        }
        Ok(hit)
    }

    /// Fixed-interval intersection check.
    ///
    /// Picks along the configured ray source, updates the last-intersected
    /// state, and logs real transitions. Returns `None` when no ray is
    /// available yet (pointer source before the first pointer event).
    pub fn on_poll(&mut self) -> Option<PollOutcome> {
        let ray = match self.config.ray_source {
            RaySource::Pointer => self.last_pointer_ray?,
            RaySource::MarkerAxis(direction) => {
                Ray::new(self.marker, Vec3::from_array(direction).normalize_or_zero())
            }
        };

        let outcome = self
            .service
            .poll_change(&self.index, &ray, self.tracker.current());

        match self.tracker.observe(outcome.current) {
            Some(TrackerEvent::Entered(id)) => {
                // Name lookup cannot fail: the id came out of the index
                if let Ok(instance) = self.store.get(id) {
                    log::info!("Intersected with: {}", instance.name);
                }
            }
            Some(TrackerEvent::Left) => {
                log::debug!("intersection cleared");
            }
            None => {}
        }

        Some(outcome)
    }

    /// Open the per-frame timing bracket
    pub fn begin_frame(&mut self) {
        self.timer.begin();
    }

    /// Close the frame: sample renderer counters and return the overlay text
    pub fn end_frame(&mut self, counters: &dyn RenderCounters) -> String {
        self.timer.end();
        self.last_stats = FrameStats::sample(counters);
        self.last_stats.overlay_text()
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn frame_timer(&self) -> &FrameTimer {
        &self.timer
    }
}
