//! Collision system: pairwise box tests over the world
//!
//! Every tick the system snapshots each entity holding a box [`Collider`]
//! and a [`Transform`], tests pairs of [`BoundingBox`]es and publishes one
//! [`CollisionEvent`] per overlapping pair once the scan is complete.
//! Responding to a collision is left to subscribers.

use crate::ecs::components::{Collider, Rigidbody, Transform};
use crate::ecs::{Entity, System, World};
use crate::events::{Event, EventBus};
use crate::foundation::math::Vec2;
use crate::physics::BoundingBox;
use serde::{Deserialize, Serialize};

/// Which entity pairs are tested each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionScan {
    /// Every ordered pair, including an entity paired with itself
    #[default]
    AllOrderedPairs,
    /// Each unordered pair of distinct entities once
    UniquePairs,
}

/// Snapshot of one participant at detection time
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBody {
    /// The colliding entity
    pub entity: Entity,
    /// Transform at detection time
    pub transform: Transform,
    /// Rigidbody at detection time
    pub rigidbody: Rigidbody,
    /// Collider at detection time
    pub collider: Collider,
}

impl CollisionBody {
    /// World-space box at the snapshot position; `None` for circles
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.collider.bounds(self.transform.position)
    }
}

/// Published for every overlapping pair found by a scan
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// Outer entity of the scanned pair
    pub left: CollisionBody,
    /// Inner entity of the scanned pair
    pub right: CollisionBody,
    /// Midpoint between the two collider centres
    pub impact_point: Vec2,
}

impl Event for CollisionEvent {}

impl CollisionEvent {
    /// Whether `entity` takes part in this collision
    pub fn involves(&self, entity: Entity) -> bool {
        self.left.entity == entity || self.right.entity == entity
    }

    /// The participant that is not `entity`, if `entity` takes part
    pub fn other(&self, entity: Entity) -> Option<&CollisionBody> {
        if self.left.entity == entity {
            Some(&self.right)
        } else if self.right.entity == entity {
            Some(&self.left)
        } else {
            None
        }
    }

    /// Whether both sides are the same entity
    pub fn is_self_pair(&self) -> bool {
        self.left.entity == self.right.entity
    }
}

/// Detects overlapping box colliders and publishes [`CollisionEvent`]s
#[derive(Debug, Clone, Default)]
pub struct CollisionSystem {
    scan: CollisionScan,
    last_collision_count: usize,
}

impl CollisionSystem {
    /// Create a system using the given scan mode
    pub fn new(scan: CollisionScan) -> Self {
        Self {
            scan,
            last_collision_count: 0,
        }
    }

    /// Current scan mode
    pub fn scan(&self) -> CollisionScan {
        self.scan
    }

    /// Switch scan mode
    pub fn set_scan(&mut self, scan: CollisionScan) {
        self.scan = scan;
    }

    /// Number of events published by the last tick
    pub fn last_collision_count(&self) -> usize {
        self.last_collision_count
    }

    /// Snapshot every box-collider entity that also has a transform
    pub fn gather_bodies(world: &World) -> Vec<CollisionBody> {
        world
            .query::<Collider>()
            .into_iter()
            .filter(|(_, collider)| collider.is_box())
            .filter_map(|(entity, collider)| {
                let transform = *world.get::<Transform>(entity)?;
                let rigidbody = world.get::<Rigidbody>(entity).copied().unwrap_or_default();
                Some(CollisionBody {
                    entity,
                    transform,
                    rigidbody,
                    collider: collider.clone(),
                })
            })
            .collect()
    }

    /// Run the pairwise scan without publishing anything
    pub fn detect(&self, world: &World) -> Vec<CollisionEvent> {
        let bodies = Self::gather_bodies(world);
        let mut collisions = Vec::new();

        for (i, left) in bodies.iter().enumerate() {
            let start = match self.scan {
                CollisionScan::AllOrderedPairs => 0,
                CollisionScan::UniquePairs => i + 1,
            };
            for right in &bodies[start..] {
                if let Some(collision) = Self::test_pair(left, right) {
                    collisions.push(collision);
                }
            }
        }
        collisions
    }

    fn test_pair(left: &CollisionBody, right: &CollisionBody) -> Option<CollisionEvent> {
        let impact_point = left.bounds()?.impact_point(&right.bounds()?)?;
        Some(CollisionEvent {
            left: left.clone(),
            right: right.clone(),
            impact_point,
        })
    }

    /// Scan the world and publish every collision in scan order
    pub fn update(&mut self, world: &mut World, events: &mut EventBus) -> usize {
        let collisions = self.detect(world);
        self.last_collision_count = collisions.len();
        if !collisions.is_empty() {
            log::debug!("Publishing {} collision events", collisions.len());
        }
        for collision in collisions {
            events.emit(collision, world);
        }
        self.last_collision_count
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "CollisionSystem"
    }

    fn run(&mut self, world: &mut World, events: &mut EventBus, _delta_time: f32) {
        self.update(world, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventContext;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn box_at(world: &mut World, x: f32, y: f32) -> Entity {
        let entity = world.spawn();
        world.insert(entity, Collider::box_collider(64.0, 64.0)).unwrap();
        world.get_mut::<Transform>(entity).unwrap().position = Vec2::new(x, y);
        entity
    }

    #[test]
    fn test_all_ordered_pairs_counts_self_and_both_orders() {
        let mut world = World::new();
        box_at(&mut world, 0.0, 0.0);
        box_at(&mut world, 32.0, 0.0);

        let collisions = CollisionSystem::new(CollisionScan::AllOrderedPairs).detect(&world);
        assert_eq!(collisions.len(), 4);
        assert_eq!(collisions.iter().filter(|c| c.is_self_pair()).count(), 2);
    }

    #[test]
    fn test_unique_pairs_reports_once() {
        let mut world = World::new();
        let a = box_at(&mut world, 0.0, 0.0);
        let b = box_at(&mut world, 32.0, 0.0);

        let collisions = CollisionSystem::new(CollisionScan::UniquePairs).detect(&world);
        assert_eq!(collisions.len(), 1);
        assert!(collisions[0].involves(a));
        assert_eq!(collisions[0].other(a).map(|body| body.entity), Some(b));
        assert_relative_eq!(collisions[0].impact_point.x, 16.0);
        assert_relative_eq!(collisions[0].impact_point.y, 0.0);
    }

    #[test]
    fn test_separated_boxes_do_not_collide() {
        let mut world = World::new();
        box_at(&mut world, 0.0, 0.0);
        box_at(&mut world, 200.0, 0.0);

        let collisions = CollisionSystem::new(CollisionScan::UniquePairs).detect(&world);
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_offset_moves_collider_centre() {
        let mut world = World::new();
        box_at(&mut world, 0.0, 0.0);
        let shifted = world.spawn();
        world
            .insert(shifted, Collider::box_collider(64.0, 64.0).with_offset(Vec2::new(-150.0, 0.0)))
            .unwrap();
        world.get_mut::<Transform>(shifted).unwrap().position = Vec2::new(200.0, 0.0);

        let collisions = CollisionSystem::new(CollisionScan::UniquePairs).detect(&world);
        assert_eq!(collisions.len(), 1);
        assert_relative_eq!(collisions[0].impact_point.x, 25.0);
    }

    #[test]
    fn test_circle_colliders_are_skipped() {
        let mut world = World::new();
        box_at(&mut world, 0.0, 0.0);
        let round = world.spawn();
        world.insert(round, Collider::circle(50.0)).unwrap();

        let collisions = CollisionSystem::new(CollisionScan::AllOrderedPairs).detect(&world);
        assert_eq!(collisions.len(), 1);
        assert!(!collisions.iter().any(|c| c.involves(round)));
    }

    #[test]
    fn test_update_publishes_events() {
        let mut world = World::new();
        let mut events = EventBus::new();
        box_at(&mut world, 0.0, 0.0);
        box_at(&mut world, 10.0, 10.0);

        let received = Rc::new(RefCell::new(0));
        let counter = received.clone();
        events.subscribe(move |_: &CollisionEvent, _: &mut EventContext<'_>| {
            *counter.borrow_mut() += 1;
        });

        let mut system = CollisionSystem::default();
        assert_eq!(system.update(&mut world, &mut events), 4);
        assert_eq!(*received.borrow(), 4);
        assert_eq!(system.last_collision_count(), 4);
    }

    #[test]
    fn test_snapshot_holds_detection_time_values() {
        let mut world = World::new();
        let mut events = EventBus::new();
        let a = box_at(&mut world, 0.0, 0.0);
        let b = box_at(&mut world, 20.0, 0.0);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        events.subscribe(move |event: &CollisionEvent, context: &mut EventContext<'_>| {
            if let Some(transform) = context.world.get_mut::<Transform>(event.left.entity) {
                transform.position.y += 100.0;
            }
            sink.borrow_mut().push(event.left.transform.position.y);
        });

        CollisionSystem::new(CollisionScan::UniquePairs).update(&mut world, &mut events);
        assert_eq!(*seen.borrow(), vec![0.0]);
        assert!(world.get::<Transform>(a).unwrap().position.y > 0.0 || world.get::<Transform>(b).unwrap().position.y > 0.0);
    }
}
