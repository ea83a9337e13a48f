//! Sprite data and frame-based animation
//!
//! A sprite plays one named animation at a time. Every frame the animation
//! progress grows by `dt * animation_speed`; once it passes a whole frame the
//! integer part moves into `frame_id`. Negative speeds play backwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Named frame sequence on a sprite sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Number of frames in the sequence
    pub frame_count: usize,

    /// Wrap around at either end instead of holding the last frame
    pub looping: bool,
}

impl Animation {
    /// Looping animation with `frame_count` frames
    pub fn looping(frame_count: usize) -> Self {
        Self {
            frame_count,
            looping: true,
        }
    }

    /// One-shot animation with `frame_count` frames
    pub fn once(frame_count: usize) -> Self {
        Self {
            frame_count,
            looping: false,
        }
    }
}

/// Raised when a sprite refers to an animation it does not have
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sprite has no animation named '{0}'")]
pub struct UnknownAnimation(pub String);

/// Textured, optionally animated renderable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sprite {
    /// Texture path relative to the asset root
    pub texture: String,

    /// Width of one frame in pixels
    pub frame_width: f32,

    /// Height of one frame in pixels
    pub frame_height: f32,

    /// Uniform scale applied when drawing
    pub scale: f32,

    /// Animations keyed by name
    pub animations: HashMap<String, Animation>,

    /// Animation currently playing
    pub current_animation: Option<String>,

    /// Index of the displayed frame
    pub frame_id: usize,

    /// Fractional progress towards the next frame
    pub progress: f32,

    /// Frames per second; negative plays backwards
    pub animation_speed: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            texture: String::new(),
            frame_width: 0.0,
            frame_height: 0.0,
            scale: 1.0,
            animations: HashMap::new(),
            current_animation: None,
            frame_id: 0,
            progress: 0.0,
            animation_speed: 1.0,
        }
    }
}

impl Sprite {
    /// Create a static sprite from a texture and frame size
    pub fn new(texture: impl Into<String>, frame_width: f32, frame_height: f32) -> Self {
        Self {
            texture: texture.into(),
            frame_width,
            frame_height,
            ..Default::default()
        }
    }

    /// Builder pattern: register an animation
    pub fn with_animation(mut self, name: impl Into<String>, animation: Animation) -> Self {
        self.animations.insert(name.into(), animation);
        self
    }

    /// Builder pattern: set the playback speed in frames per second
    pub fn with_speed(mut self, animation_speed: f32) -> Self {
        self.animation_speed = animation_speed;
        self
    }

    /// Switch to another animation, restarting at frame zero
    pub fn play(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.current_animation.as_deref() != Some(name.as_str()) {
            self.current_animation = Some(name);
            self.frame_id = 0;
            self.progress = 0.0;
        }
    }

    /// Stop animating, keeping the current frame
    pub fn stop(&mut self) {
        self.current_animation = None;
        self.progress = 0.0;
    }

    /// Advance the current animation by one frame delta.
    ///
    /// Returns `Ok(false)` when no animation is playing.
    pub fn advance(&mut self, delta_time: f32) -> Result<bool, UnknownAnimation> {
        let Some(name) = self.current_animation.as_ref() else {
            return Ok(false);
        };
        let animation = self
            .animations
            .get(name)
            .ok_or_else(|| UnknownAnimation(name.clone()))?;
        if animation.frame_count == 0 {
            return Ok(false);
        }

        self.progress += delta_time * self.animation_speed;
        if !self.progress.is_finite() {
            log::warn!("Animation '{name}' progress overflowed, resetting");
            self.progress = 0.0;
            return Ok(false);
        }
        if self.progress.abs() > 1.0 {
            let whole = self.progress.trunc();
            self.progress -= whole;
            self.frame_id = step_frame(self.frame_id, whole, animation);
        }
        Ok(true)
    }

    /// Pixel offset that centres the sprite on its anchor.
    ///
    /// Both axes use the frame width.
    pub fn origin_correction(&self) -> f32 {
        self.frame_width * self.scale / 2.0
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn step_frame(frame_id: usize, steps: f32, animation: &Animation) -> usize {
    let count = animation.frame_count as i64;
    if animation.looping {
        // Reduced in f32 first so the cast cannot saturate.
        let steps = (steps % animation.frame_count as f32) as i64;
        (frame_id as i64 + steps).rem_euclid(count) as usize
    } else {
        (frame_id as i64)
            .saturating_add(steps as i64)
            .clamp(0, count - 1) as usize
    }
}
