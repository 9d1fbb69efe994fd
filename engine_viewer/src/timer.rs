//! Frame timing.

use std::time::Instant;

/// Wall-clock stopwatch with a per-frame lap.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    last_tick: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Seconds since construction or the last reset.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        dt
    }
}

/// Counts frames over one-second windows of frame time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    accumulated: f32,
    frames: u32,
}

impl FpsCounter {
    /// Adds one frame of length `dt`. Returns the frame count once a full
    /// second has accumulated, then starts a new window.
    pub fn record(&mut self, dt: f32) -> Option<u32> {
        self.accumulated += dt;
        self.frames += 1;
        if self.accumulated >= 1.0 {
            let frames = self.frames;
            self.accumulated = 0.0;
            self.frames = 0;
            return Some(frames);
        }
        None
    }
}
