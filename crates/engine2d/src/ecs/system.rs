//! System trait

use crate::ecs::World;
use crate::events::EventBus;

/// System trait for processing entities and components once per frame
pub trait System {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Run the system for one frame
    fn run(&mut self, world: &mut World, events: &mut EventBus, delta_time: f32);
}
