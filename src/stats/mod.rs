// src/stats/mod.rs
// Live stats reporter: per-frame renderer/scene counters plus frame timing.
// Samples overwrite each other; no aggregation or smoothing is performed.
// RELEVANT FILES:src/context.rs,src/scene/mod.rs

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Rendering-engine boundary: counters sampled once per rendered frame
pub trait RenderCounters {
    /// Total vertex count across live mesh objects
    fn vertices(&self) -> u64;
    /// Triangles rendered this frame
    fn triangles(&self) -> u64;
    /// Live geometry count
    fn geometries(&self) -> u32;
    /// Live texture count
    fn textures(&self) -> u32;
    /// Draw calls this frame
    fn draw_calls(&self) -> u32;
    /// Active shader program count
    fn programs(&self) -> u32;
}

/// One flat stats sample, formatted for the host overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub vertices: u64,
    pub triangles: u64,
    pub geometries: u32,
    pub textures: u32,
    pub draw_calls: u32,
    pub programs: u32,
}

impl FrameStats {
    pub fn sample(counters: &dyn RenderCounters) -> Self {
        Self {
            vertices: counters.vertices(),
            triangles: counters.triangles(),
            geometries: counters.geometries(),
            textures: counters.textures(),
            draw_calls: counters.draw_calls(),
            programs: counters.programs(),
        }
    }

    /// Format as "Label: value" lines for a text overlay
    pub fn overlay_text(&self) -> String {
        format!(
            "Vertices: {}\nTriangles: {}\nGeometries: {}\nTextures: {}\nDraw Calls: {}\nPrograms: {}",
            self.vertices,
            self.triangles,
            self.geometries,
            self.textures,
            self.draw_calls,
            self.programs
        )
    }
}

/// Frame timer with begin/end brackets and a one-second FPS window
#[derive(Debug)]
pub struct FrameTimer {
    frame_start: Option<Instant>,
    window_start: Instant,
    frames_in_window: u32,
    last_frame_ms: f32,
    fps: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            frame_start: None,
            window_start: Instant::now(),
            frames_in_window: 0,
            last_frame_ms: 0.0,
            fps: 0.0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Close the current frame bracket; a missing `begin` records 0 ms
    pub fn end(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.last_frame_ms = start.elapsed().as_secs_f32() * 1000.0;
        } else {
            self.last_frame_ms = 0.0;
        }

        self.frames_in_window += 1;
        let window = self.window_start.elapsed();
        if window >= Duration::from_secs(1) {
            self.fps = self.frames_in_window as f32 / window.as_secs_f32();
            self.frames_in_window = 0;
            self.window_start = Instant::now();
        }
    }

    /// Duration of the most recent begin/end bracket in milliseconds
    pub fn last_frame_ms(&self) -> f32 {
        self.last_frame_ms
    }

    /// Frames per second over the last completed one-second window
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCounters;

    impl RenderCounters for FixedCounters {
        fn vertices(&self) -> u64 {
            80000
        }
        fn triangles(&self) -> u64 {
            120000
        }
        fn geometries(&self) -> u32 {
            1
        }
        fn textures(&self) -> u32 {
            0
        }
        fn draw_calls(&self) -> u32 {
            1
        }
        fn programs(&self) -> u32 {
            1
        }
    }

    #[test]
    fn test_sample_and_overlay() {
        let stats = FrameStats::sample(&FixedCounters);
        assert_eq!(stats.vertices, 80000);
        assert_eq!(stats.draw_calls, 1);

        let text = stats.overlay_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Vertices: 80000");
        assert_eq!(lines[1], "Triangles: 120000");
        assert_eq!(lines[5], "Programs: 1");
    }

    #[test]
    fn test_samples_overwrite() {
        let a = FrameStats::sample(&FixedCounters);
        let b = FrameStats::sample(&FixedCounters);
        // No smoothing: two identical sources give identical samples
        assert_eq!(a, b);
    }

    #[test]
    fn test_frame_timer_brackets() {
        let mut timer = FrameTimer::new();
        timer.begin();
        timer.end();
        assert!(timer.last_frame_ms() >= 0.0);

        // end without begin is tolerated
        timer.end();
        assert_eq!(timer.last_frame_ms(), 0.0);
    }
}
