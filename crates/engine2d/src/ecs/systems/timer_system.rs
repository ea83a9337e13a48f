//! Timer system: event-driven timer operations and per-frame ticking
//!
//! Timer operations are published as [`TimerEvent`]s. The handler installed
//! by [`TimerSystem::register`] applies them to the target entity's
//! [`Timers`] component. Invalid operations are logged and ignored.

use crate::ecs::components::{TimerError, Timers};
use crate::ecs::{Entity, System, World};
use crate::events::{Event, EventBus, EventContext, SubscriptionId};
use serde::{Deserialize, Serialize};

/// Operation carried by a [`TimerEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimerOp {
    /// Create a timer, playing from zero
    Add,
    /// Delete a timer
    Remove,
    /// Resume a paused timer
    Start,
    /// Stop a timer from accumulating
    Pause,
    /// Shift a timer by a signed number of seconds
    Scan(f32),
    /// Reset a timer to zero and publish [`TimerRestarted`]
    Restart,
}

/// Request to operate on a named timer of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEvent {
    /// Entity holding the timer
    pub entity: Entity,
    /// Timer name
    pub name: String,
    /// What to do
    pub op: TimerOp,
}

impl TimerEvent {
    /// Build a timer request
    pub fn new(entity: Entity, name: impl Into<String>, op: TimerOp) -> Self {
        Self {
            entity,
            name: name.into(),
            op,
        }
    }
}

impl Event for TimerEvent {}

/// Published after a restart, carrying the time accumulated before the reset
#[derive(Debug, Clone, PartialEq)]
pub struct TimerRestarted {
    /// Entity holding the timer
    pub entity: Entity,
    /// Timer name
    pub name: String,
    /// Elapsed seconds before the reset
    pub elapsed: f32,
}

impl Event for TimerRestarted {}

/// Applies timer events and ticks all playing timers
#[derive(Debug, Clone, Default)]
pub struct TimerSystem {
    subscription: Option<SubscriptionId>,
}

impl TimerSystem {
    /// Create the system; call [`TimerSystem::register`] to receive timer events
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the timer handler on `events`
    pub fn register(&mut self, events: &mut EventBus) -> SubscriptionId {
        if let Some(id) = self.subscription {
            return id;
        }
        let id = events.subscribe(Self::handle_event);
        self.subscription = Some(id);
        id
    }

    /// Remove the timer handler from `events`
    pub fn unregister(&mut self, events: &mut EventBus) {
        if let Some(id) = self.subscription.take() {
            events.unsubscribe(id);
        }
    }

    /// Whether the handler is subscribed
    pub fn is_registered(&self) -> bool {
        self.subscription.is_some()
    }

    fn handle_event(event: &TimerEvent, context: &mut EventContext<'_>) {
        match Self::apply(context.world, event) {
            Ok(Some(elapsed)) => context.emit(TimerRestarted {
                entity: event.entity,
                name: event.name.clone(),
                elapsed,
            }),
            Ok(None) => {}
            Err(e) => log::error!("Timer {:?} on entity {} failed: {}", event.op, event.entity, e),
        }
    }

    /// Apply one operation. Returns the pre-reset elapsed time for restarts.
    pub fn apply(world: &mut World, event: &TimerEvent) -> Result<Option<f32>, TimerError> {
        if event.op == TimerOp::Add {
            let timers = world
                .assign::<Timers>(event.entity)
                .map_err(|_| TimerError::NoTimers)?;
            timers.add(event.name.as_str())?;
            log::debug!("Added timer '{}' to entity {}", event.name, event.entity);
            return Ok(None);
        }

        let timers = world.get_mut::<Timers>(event.entity).ok_or(TimerError::NoTimers)?;
        let name = event.name.as_str();
        match event.op {
            TimerOp::Add => Ok(None),
            TimerOp::Remove => timers.remove(name).map(|_| None),
            TimerOp::Start => timers.start(name).map(|_| None),
            TimerOp::Pause => {
                if !timers.pause(name)? {
                    log::warn!("Timer '{}' on entity {} is already paused", name, event.entity);
                }
                Ok(None)
            }
            TimerOp::Scan(offset) => timers.scan(name, offset).map(|()| None),
            TimerOp::Restart => timers.restart(name).map(Some),
        }
    }

    /// Advance every playing timer by one frame delta
    pub fn update(&self, world: &mut World, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }
        for (_, timers) in world.query_mut::<Timers>() {
            timers.tick_all(delta_time);
        }
    }
}

impl System for TimerSystem {
    fn name(&self) -> &'static str {
        "TimerSystem"
    }

    fn run(&mut self, world: &mut World, _events: &mut EventBus, delta_time: f32) {
        self.update(world, delta_time);
    }
}
