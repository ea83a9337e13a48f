//! Time management utilities

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock frame timer used by the main loop to produce frame deltas
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock; the first tick measures from this moment
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the clock (once per frame) and return the new delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since clock creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Pausable stopwatch driven by frame deltas.
///
/// Elapsed time only advances through [`Stopwatch::tick`], so two runs fed
/// the same deltas measure the same time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stopwatch {
    elapsed: f32,
    playing: bool,
}

impl Stopwatch {
    /// Create a new paused stopwatch at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            elapsed: 0.0,
            playing: true,
        }
    }

    /// Resume measuring. Returns `false` if it was already playing.
    pub fn play(&mut self) -> bool {
        let changed = !self.playing;
        self.playing = true;
        changed
    }

    /// Stop measuring, keeping the elapsed time. Returns `false` if it was already paused.
    pub fn pause(&mut self) -> bool {
        let changed = self.playing;
        self.playing = false;
        changed
    }

    /// Shift the elapsed time by a signed offset, whatever the play state
    pub fn scan(&mut self, offset: f32) {
        self.elapsed += offset;
    }

    /// Return the elapsed time and reset to zero; play state is kept
    pub fn restart(&mut self) -> f32 {
        std::mem::take(&mut self.elapsed)
    }

    /// Advance by one frame delta if playing
    pub fn tick(&mut self, delta_time: f32) {
        if self.playing && delta_time > 0.0 {
            self.elapsed += delta_time;
        }
    }

    /// Get the elapsed time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Check if the stopwatch is currently running
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
