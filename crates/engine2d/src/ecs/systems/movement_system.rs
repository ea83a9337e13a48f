//! Movement system: applies rigidbody velocities to transforms

use crate::ecs::components::{Rigidbody, Transform};
use crate::ecs::{System, World};
use crate::events::EventBus;

/// Moves every entity holding both a [`Transform`] and a [`Rigidbody`]
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    integrate_motion: bool,
}

impl MovementSystem {
    /// Velocity-only movement
    pub fn new() -> Self {
        Self::default()
    }

    /// Also integrate acceleration and radial velocity
    pub fn with_motion_integration(integrate_motion: bool) -> Self {
        Self { integrate_motion }
    }

    /// Whether acceleration and radial velocity are applied
    pub fn integrates_motion(&self) -> bool {
        self.integrate_motion
    }

    /// Advance all movable entities by `delta_time`. Returns how many moved.
    pub fn update(&self, world: &mut World, delta_time: f32) -> usize {
        if delta_time <= 0.0 {
            return 0;
        }

        let mut moved = 0;
        for entity in world.entities_with::<Rigidbody>() {
            let Some(rigidbody) = world.get_mut::<Rigidbody>(entity) else {
                continue;
            };
            if self.integrate_motion {
                rigidbody.integrate(delta_time);
            }
            let rigidbody = *rigidbody;

            let Some(transform) = world.get_mut::<Transform>(entity) else {
                log::warn!("Entity {entity} has a Rigidbody but no Transform");
                continue;
            };
            transform.translate(rigidbody.position_delta(delta_time));
            if self.integrate_motion {
                transform.rotate(rigidbody.radial_velocity * delta_time);
            }
            moved += 1;
        }
        moved
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "MovementSystem"
    }

    fn run(&mut self, world: &mut World, _events: &mut EventBus, delta_time: f32) {
        let moved = self.update(world, delta_time);
        log::debug!("Moved {moved} entities");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    fn mover(world: &mut World, velocity: Vec2) -> crate::ecs::Entity {
        let entity = world.spawn();
        world
            .insert(entity, Rigidbody::with_velocity(velocity).with_acceleration(Vec2::new(5.0, 5.0)).with_radial_velocity(90.0))
            .unwrap();
        entity
    }

    #[test]
    fn test_velocity_only_by_default() {
        let mut world = World::new();
        let entity = mover(&mut world, Vec2::new(10.0, -4.0));

        MovementSystem::new().update(&mut world, 0.5);

        let transform = world.get::<Transform>(entity).unwrap();
        assert_relative_eq!(transform.position.x, 5.0);
        assert_relative_eq!(transform.position.y, -2.0);
        assert_relative_eq!(transform.rotation, 0.0);
        let rigidbody = world.get::<Rigidbody>(entity).unwrap();
        assert_relative_eq!(rigidbody.velocity.x, 10.0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut world = World::new();
        let entity = mover(&mut world, Vec2::new(10.0, 10.0));
        assert_eq!(MovementSystem::new().update(&mut world, 0.0), 0);
        assert_eq!(world.get::<Transform>(entity).unwrap().position, Vec2::zeros());
    }

    #[test]
    fn test_motion_integration() {
        let mut world = World::new();
        let entity = mover(&mut world, Vec2::new(0.0, 0.0));

        MovementSystem::with_motion_integration(true).update(&mut world, 1.0);

        let transform = world.get::<Transform>(entity).unwrap();
        assert_relative_eq!(transform.position.x, 5.0);
        assert_relative_eq!(transform.rotation, 90.0);
        assert_relative_eq!(world.get::<Rigidbody>(entity).unwrap().velocity.y, 5.0);
    }

    #[test]
    fn test_entities_without_rigidbody_stay_put() {
        let mut world = World::new();
        let still = world.spawn();
        world.insert(still, Transform::from_xy(3.0, 4.0)).unwrap();

        MovementSystem::new().update(&mut world, 1.0);
        assert_eq!(world.get::<Transform>(still).unwrap().position, Vec2::new(3.0, 4.0));
    }
}
