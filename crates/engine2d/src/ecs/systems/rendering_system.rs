//! # Rendering System
//!
//! Collects every visible [`Renderer`] into a [`RenderQueue`]. Positions are
//! resolved here so the queue and the canvas only deal in final coordinates.

use crate::ecs::components::{Renderer, Transform};
use crate::ecs::World;
use crate::render::{DrawCommand, RenderQueue};

/// System responsible for turning renderers into draw commands
#[derive(Debug, Clone)]
pub struct RenderingSystem {
    /// Flag to enable/disable the system
    enabled: bool,
}

impl Default for RenderingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderingSystem {
    /// Create a new rendering system
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Enable or disable the rendering system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if the system is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Push one command per renderable of every visible renderer.
    ///
    /// Returns the number of commands queued.
    pub fn collect(&self, world: &World, queue: &mut RenderQueue) -> usize {
        if !self.enabled {
            return 0;
        }

        let mut queued = 0;
        for (entity, renderer) in world.query::<Renderer>() {
            if !renderer.visible {
                continue;
            }
            let Some(transform) = world.get::<Transform>(entity) else {
                log::warn!("Entity {entity} has a Renderer but no Transform");
                continue;
            };
            for (name, renderable) in &renderer.assets {
                queue.push(DrawCommand {
                    entity,
                    name: name.clone(),
                    layer: renderable.layer,
                    priority: renderable.priority,
                    position: renderable.draw_position(transform),
                    rotation: transform.rotation,
                    kind: renderable.kind.clone(),
                });
                queued += 1;
            }
        }
        queued
    }
}
