// src/bin/picking_demo.rs
// Headless rendition of the instanced-picking demo: 10,000 unit boxes at
// deterministic pseudo-random positions, a few simulated pointer moves and
// poll ticks, and the live-stats overlay printed per simulated frame.

use anyhow::{Context, Result};
use glam::Vec3;
use raypick::{
    BuildOptions, Camera, ContextConfig, InstanceStore, RenderCounters, SceneContext,
    TriangleMesh, Viewport,
};

const INSTANCE_COUNT: u32 = 10_000;
const VIEW_WIDTH: f32 = 1280.0;
const VIEW_HEIGHT: f32 = 720.0;

/// xorshift32; deterministic stand-in for the original demo's Math.random()
struct Rng(u32);

impl Rng {
    fn next_f32(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [-50, 50)
    fn coord(&mut self) -> f32 {
        self.next_f32() * 100.0 - 50.0
    }
}

/// Stand-in renderer counters derived from the live scene
struct SceneCounters {
    vertices: u64,
    triangles: u64,
}

impl SceneCounters {
    fn from_store(store: &InstanceStore) -> Self {
        Self {
            vertices: store.total_vertex_count(),
            triangles: store.total_triangle_count(),
        }
    }
}

impl RenderCounters for SceneCounters {
    fn vertices(&self) -> u64 {
        self.vertices
    }
    fn triangles(&self) -> u64 {
        self.triangles
    }
    fn geometries(&self) -> u32 {
        1 // one shared base geometry
    }
    fn textures(&self) -> u32 {
        0
    }
    fn draw_calls(&self) -> u32 {
        1 // one instanced draw
    }
    fn programs(&self) -> u32 {
        1
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = Rng(0x2545_F491);
    let store = InstanceStore::generate(TriangleMesh::unit_box(), INSTANCE_COUNT, |_| {
        Vec3::new(rng.coord(), rng.coord(), rng.coord())
    });

    let mut ctx = SceneContext::new(store, &BuildOptions::default(), ContextConfig::default());
    ctx.set_camera(Camera::demo_default(VIEW_WIDTH / VIEW_HEIGHT));

    let stats = ctx.index().build_stats().clone();
    log::info!(
        "index built: {} primitives, {} nodes, {:.2} ms",
        stats.primitive_count,
        stats.node_count,
        stats.build_time_ms
    );
    let bounds = ctx.index().world_aabb();
    log::info!("scene bounds: {:?} .. {:?}", bounds.min, bounds.max);

    let viewport = Viewport::new(VIEW_WIDTH, VIEW_HEIGHT);

    // Sweep the pointer across the middle of the viewport, polling after
    // each move the way the original demo's 100ms timer did
    for step in 0..10 {
        let px = VIEW_WIDTH * (0.25 + 0.05 * step as f32);
        let py = VIEW_HEIGHT * 0.5;

        let hit = ctx
            .on_pointer_move(px, py, viewport)
            .context("pointer unprojection failed")?;
        if let Some(hit) = hit {
            log::debug!("pointer over instance {} at {:.2}", hit.instance, hit.distance);
        }

        if let Some(outcome) = ctx.on_poll() {
            if outcome.changed {
                println!(
                    "poll {}: now over {:?}",
                    step,
                    outcome.current.map(|id| format!("Instance_{id}"))
                );
            }
        }
    }

    // Emit the final pick under the last pointer position as JSON
    let ray = ctx
        .service()
        .pixel_to_ray(VIEW_WIDTH * 0.7, VIEW_HEIGHT * 0.5, viewport)?;
    if let Some(report) = ctx.service().pick_report(ctx.index(), ctx.store(), &ray) {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("no instance under final pointer position");
    }

    // One simulated frame with the stats overlay
    let counters = SceneCounters::from_store(ctx.store());
    ctx.begin_frame();
    let overlay = ctx.end_frame(&counters);
    println!("--- stats ---\n{overlay}");
    println!(
        "frame: {:.3} ms ({:.1} fps over last window)",
        ctx.frame_timer().last_frame_ms(),
        ctx.frame_timer().fps()
    );

    Ok(())
}
