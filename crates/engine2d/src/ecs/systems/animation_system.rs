//! Animation system: advances sprite animations once per frame

use crate::ecs::components::Renderer;
use crate::ecs::{System, World};
use crate::events::EventBus;

/// Advances every sprite that has a current animation
#[derive(Debug, Clone, Default)]
pub struct AnimationSystem;

impl AnimationSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }

    /// Advance all sprites by `delta_time`. Returns how many were advanced.
    pub fn update(&self, world: &mut World, delta_time: f32) -> usize {
        let mut advanced = 0;
        for (entity, renderer) in world.query_mut::<Renderer>() {
            for (name, sprite) in renderer.sprites_mut() {
                match sprite.advance(delta_time) {
                    Ok(true) => advanced += 1,
                    Ok(false) => {}
                    Err(e) => log::warn!("Sprite '{name}' on entity {entity}: {e}"),
                }
            }
        }
        advanced
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &'static str {
        "AnimationSystem"
    }

    fn run(&mut self, world: &mut World, _events: &mut EventBus, delta_time: f32) {
        self.update(world, delta_time);
    }
}
