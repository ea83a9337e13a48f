//! Typed synchronous event bus
//!
//! Systems publish plain event structs; subscribers are closures registered
//! per event type. Delivery rules:
//! - `emit` calls every current subscriber of the event type exactly once,
//!   in registration order, before it returns
//! - handlers may emit further events through their [`EventContext`]; other
//!   event types are delivered immediately, while an event of a type that is
//!   already being dispatched is queued and delivered once the current
//!   fan-out finishes, still inside the outer `emit`
//! - subscribing or unsubscribing from inside a handler takes effect for the
//!   next delivery of that type

use crate::ecs::World;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Marker trait for types that can travel over the [`EventBus`]
pub trait Event: 'static {}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Mutable engine state handed to every event handler
pub struct EventContext<'a> {
    /// The world the event originated from
    pub world: &'a mut World,

    /// The bus itself, for chained emission and (un)subscription
    pub events: &'a mut EventBus,
}

impl EventContext<'_> {
    /// Emit another event from inside a handler
    pub fn emit<E: Event>(&mut self, event: E) {
        self.events.emit(event, &mut *self.world);
    }
}

type Handler<E> = Box<dyn FnMut(&E, &mut EventContext<'_>)>;

struct Subscriber<E> {
    id: SubscriptionId,
    handler: Handler<E>,
}

struct Channel<E> {
    subscribers: Vec<Subscriber<E>>,
    dispatching: bool,
    in_flight: usize,
    pending: VecDeque<E>,
    removed: HashSet<SubscriptionId>,
}

impl<E> Default for Channel<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            dispatching: false,
            in_flight: 0,
            pending: VecDeque::new(),
            removed: HashSet::new(),
        }
    }
}

trait AnyChannel {
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
    fn subscriber_count(&self) -> usize;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_any(&self) -> &dyn Any;
}

impl<E: Event> AnyChannel for Channel<E> {
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        if self.subscribers.len() != before {
            return true;
        }
        // The subscriber is part of the list currently being dispatched
        self.dispatching && self.removed.insert(id)
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.len() + self.in_flight - self.removed.len()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Registry of typed subscribers with synchronous delivery
#[derive(Default)]
pub struct EventBus {
    channels: HashMap<TypeId, Box<dyn AnyChannel>>,
    owners: HashMap<SubscriptionId, TypeId>,
    next_id: u64,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events of type `E`
    pub fn subscribe<E, F>(&mut self, handler: F) -> SubscriptionId
    where
        E: Event,
        F: FnMut(&E, &mut EventContext<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let Some(channel) = self.channel_mut::<E>() else {
            log::error!("Event channel for {} has the wrong type", std::any::type_name::<E>());
            return id;
        };
        channel.subscribers.push(Subscriber {
            id,
            handler: Box::new(handler),
        });
        self.owners.insert(id, TypeId::of::<E>());
        log::debug!("Subscribed {:?} to {}", id, std::any::type_name::<E>());
        id
    }

    /// Remove a subscription. Returns `false` if it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(type_id) = self.owners.remove(&id) else {
            return false;
        };
        self.channels
            .get_mut(&type_id)
            .is_some_and(|channel| channel.unsubscribe(id))
    }

    /// Number of live subscribers for events of type `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.channels
            .get(&TypeId::of::<E>())
            .map_or(0, |channel| channel.subscriber_count())
    }

    /// Whether any event of type `E` is currently being delivered
    pub fn is_dispatching<E: Event>(&self) -> bool {
        self.channels
            .get(&TypeId::of::<E>())
            .and_then(|channel| channel.as_any().downcast_ref::<Channel<E>>())
            .is_some_and(|channel| channel.dispatching)
    }

    /// Deliver `event` to every subscriber of its type
    pub fn emit<E: Event>(&mut self, event: E, world: &mut World) {
        let Some(channel) = self.channel_mut::<E>() else {
            log::error!("Event channel for {} has the wrong type", std::any::type_name::<E>());
            return;
        };
        if channel.dispatching {
            channel.pending.push_back(event);
            return;
        }
        channel.dispatching = true;

        let mut next = Some(event);
        while let Some(event) = next {
            next = self.deliver(&event, world);
        }
    }

    /// Fan one event out and return the next queued event of the same type
    fn deliver<E: Event>(&mut self, event: &E, world: &mut World) -> Option<E> {
        let mut subscribers = {
            let channel = self.channel_mut::<E>()?;
            let subscribers = std::mem::take(&mut channel.subscribers);
            channel.in_flight = subscribers.len();
            subscribers
        };

        {
            let mut context = EventContext {
                world: &mut *world,
                events: &mut *self,
            };
            for subscriber in &mut subscribers {
                (subscriber.handler)(event, &mut context);
            }
        }

        let channel = self.channel_mut::<E>()?;
        subscribers.append(&mut channel.subscribers);
        let removed = std::mem::take(&mut channel.removed);
        subscribers.retain(|subscriber| !removed.contains(&subscriber.id));
        channel.subscribers = subscribers;
        channel.in_flight = 0;

        let next = channel.pending.pop_front();
        if next.is_none() {
            channel.dispatching = false;
        }
        next
    }

    fn channel_mut<E: Event>(&mut self) -> Option<&mut Channel<E>> {
        self.channels
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Channel::<E>::default()))
            .as_any_mut()
            .downcast_mut::<Channel<E>>()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("channels", &self.channels.len())
            .field("subscriptions", &self.owners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);
    impl Event for Ping {}

    #[derive(Debug, Clone, PartialEq)]
    struct Pong(u32);
    impl Event for Pong {}

    type Log = Rc<RefCell<Vec<String>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_emit_reaches_each_subscriber_once_in_order() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        let calls = log();

        for name in ["a", "b", "c"] {
            let calls = calls.clone();
            bus.subscribe(move |ping: &Ping, _: &mut EventContext<'_>| {
                calls.borrow_mut().push(format!("{name}{}", ping.0));
            });
        }

        bus.emit(Ping(1), &mut world);
        assert_eq!(*calls.borrow(), vec!["a1", "b1", "c1"]);
        assert_eq!(bus.subscriber_count::<Ping>(), 3);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        bus.emit(Ping(7), &mut world);
        assert_eq!(bus.subscriber_count::<Ping>(), 0);
    }

    #[test]
    fn test_other_type_is_delivered_immediately() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        let calls = log();

        let pong_calls = calls.clone();
        bus.subscribe(move |pong: &Pong, _: &mut EventContext<'_>| {
            pong_calls.borrow_mut().push(format!("pong{}", pong.0));
        });
        let ping_calls = calls.clone();
        bus.subscribe(move |ping: &Ping, context: &mut EventContext<'_>| {
            ping_calls.borrow_mut().push(format!("ping{}", ping.0));
            context.emit(Pong(ping.0));
            ping_calls.borrow_mut().push("after".to_string());
        });

        bus.emit(Ping(3), &mut world);
        assert_eq!(*calls.borrow(), vec!["ping3", "pong3", "after"]);
    }

    #[test]
    fn test_same_type_is_delivered_after_current_fan_out() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        let calls = log();

        let first = calls.clone();
        bus.subscribe(move |ping: &Ping, context: &mut EventContext<'_>| {
            first.borrow_mut().push(format!("first{}", ping.0));
            if ping.0 == 0 {
                context.emit(Ping(1));
            }
        });
        let second = calls.clone();
        bus.subscribe(move |ping: &Ping, _: &mut EventContext<'_>| {
            second.borrow_mut().push(format!("second{}", ping.0));
        });

        bus.emit(Ping(0), &mut world);
        assert_eq!(*calls.borrow(), vec!["first0", "second0", "first1", "second1"]);
        assert!(!bus.is_dispatching::<Ping>());
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        let calls = log();

        let counter = calls.clone();
        let id = bus.subscribe(move |_: &Ping, _: &mut EventContext<'_>| {
            counter.borrow_mut().push("hit".to_string());
        });

        bus.emit(Ping(0), &mut world);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(Ping(0), &mut world);

        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(bus.subscriber_count::<Ping>(), 0);
    }

    #[test]
    fn test_self_unsubscribe_applies_to_next_emit() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        let calls = log();
        let own_id: Rc<RefCell<Option<SubscriptionId>>> = Rc::new(RefCell::new(None));

        let counter = calls.clone();
        let handle = own_id.clone();
        let id = bus.subscribe(move |_: &Ping, context: &mut EventContext<'_>| {
            counter.borrow_mut().push("once".to_string());
            if let Some(id) = handle.borrow_mut().take() {
                context.events.unsubscribe(id);
            }
        });
        *own_id.borrow_mut() = Some(id);

        bus.emit(Ping(0), &mut world);
        bus.emit(Ping(1), &mut world);
        assert_eq!(*calls.borrow(), vec!["once"]);
    }

    #[test]
    fn test_subscribe_during_dispatch_applies_to_next_emit() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        let calls = log();

        let outer = calls.clone();
        bus.subscribe(move |ping: &Ping, context: &mut EventContext<'_>| {
            if ping.0 == 0 {
                let inner = outer.clone();
                context.events.subscribe(move |ping: &Ping, _: &mut EventContext<'_>| {
                    inner.borrow_mut().push(format!("late{}", ping.0));
                });
            }
        });

        bus.emit(Ping(0), &mut world);
        assert!(calls.borrow().is_empty());
        assert_eq!(bus.subscriber_count::<Ping>(), 2);

        bus.emit(Ping(1), &mut world);
        assert_eq!(*calls.borrow(), vec!["late1"]);
    }

    #[test]
    fn test_handlers_can_mutate_world() {
        let mut bus = EventBus::new();
        let mut world = World::new();
        bus.subscribe(|_: &Ping, context: &mut EventContext<'_>| {
            context.world.spawn();
        });

        bus.emit(Ping(0), &mut world);
        bus.emit(Ping(0), &mut world);
        assert_eq!(world.entity_count(), 2);
    }
}
