//! CPU spatial queries for instanced scenes.
//!
//! raypick owns a set of translated instances of one base triangle mesh,
//! builds a BVH over the flattened world-space geometry, and answers
//! nearest-hit and all-hits ray queries resolved back to stable instance
//! identities. A small picking layer converts pointer coordinates to rays,
//! tracks which instance is under the pointer, and samples renderer
//! counters into a formatted live-stats record.
//!
//! Rendering, windowing, and UI overlays are external collaborators reached
//! through trait boundaries; see [`stats::RenderCounters`].

pub mod accel;
pub mod camera;
pub mod context;
pub mod error;
pub mod picking;
pub mod scene;
pub mod stats;

pub use accel::{BuildOptions, BuildStats, GeometryIndex, Hit};
pub use camera::Camera;
pub use context::{ContextConfig, RaySource, SceneContext};
pub use error::{PickError, PickResult};
pub use picking::{
    IntersectionTracker, PickReport, PickService, PickingConfig, PollOutcome, Ray, TrackerEvent,
    Viewport,
};
pub use scene::{Instance, InstanceStore, TriangleMesh};
pub use stats::{FrameStats, FrameTimer, RenderCounters};
