// src/picking/mod.rs
// Picking subsystem: rays, viewport conversion, and the raycast query service.
// RELEVANT FILES:src/picking/ray.rs,src/picking/service.rs,src/accel/mod.rs

mod ray;
mod service;

pub use ray::{Ray, Viewport};
pub use service::{
    IntersectionTracker, PickReport, PickService, PickingConfig, PollOutcome, TrackerEvent,
};
