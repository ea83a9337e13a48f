//! ECS World implementation
//!
//! The world is the component store: it owns every entity and every
//! component column, and it enforces component prerequisites. Assigning a
//! component first default-constructs any missing prerequisite, walking the
//! declarations transitively (leaves first). Removing a component that
//! others on the same entity still require is refused; use
//! [`World::remove_cascade`] to take the dependents with it.
//!
//! References returned by the accessors are the store's "handles". They
//! borrow the world, so they end at the next structural change.

use super::component::ComponentInfo;
use super::storage::{AnyStorage, ComponentStorage};
use super::{Component, EcsError, Entity};
use slotmap::SlotMap;
use std::any::TypeId;
use std::collections::HashMap;

/// ECS World containing all entities and components
pub struct World {
    entities: SlotMap<Entity, ()>,
    component_storages: HashMap<TypeId, Box<dyn AnyStorage>>,
    registry: HashMap<TypeId, ComponentInfo>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            component_storages: HashMap::new(),
            registry: HashMap::new(),
        }
    }

    /// Create a new entity with no components
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.insert(());
        log::trace!("Spawned entity {entity}");
        entity
    }

    /// Destroy an entity together with all of its components
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EcsError> {
        if self.entities.remove(entity).is_none() {
            return Err(EcsError::DeadEntity(entity));
        }
        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        log::trace!("Despawned entity {entity}");
        Ok(())
    }

    /// Check whether a handle still refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate over all live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Remove every entity and component
    pub fn clear(&mut self) {
        self.entities.clear();
        self.component_storages.clear();
    }

    /// Assign a default-constructed component (plus its prerequisites).
    ///
    /// If the entity already holds a `T` it is kept and returned unchanged.
    pub fn assign<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.ensure_alive(entity)?;
        self.inject_requirements(entity, ComponentInfo::of::<T>());

        let storage = self.storage_mut_or_create::<T>();
        if storage.get(entity).is_none() {
            storage.insert(entity, T::default());
        }
        storage.get_mut(entity).ok_or(EcsError::DeadEntity(entity))
    }

    /// Insert a component value (plus its prerequisites), replacing any existing one
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<&mut T, EcsError> {
        self.ensure_alive(entity)?;
        self.inject_requirements(entity, ComponentInfo::of::<T>());

        let storage = self.storage_mut_or_create::<T>();
        storage.insert(entity, component);
        storage.get_mut(entity).ok_or(EcsError::DeadEntity(entity))
    }

    /// Check if an entity holds component `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.get(entity).is_some())
    }

    /// Get a component from an entity
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Remove a component.
    ///
    /// Fails with [`EcsError::RequiredBy`] while another component on the
    /// entity declares `T` as a prerequisite.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.ensure_alive(entity)?;
        let dependents = self.dependents_on(entity, TypeId::of::<T>());
        if !dependents.is_empty() {
            let mut names: Vec<_> = dependents.iter().map(ComponentInfo::name).collect();
            names.sort_unstable();
            return Err(EcsError::RequiredBy {
                entity,
                component: T::NAME,
                dependents: names,
            });
        }
        self.take::<T>(entity)
    }

    /// Remove a component after removing every component that depends on it
    pub fn remove_cascade<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.ensure_alive(entity)?;
        let mut path = vec![TypeId::of::<T>()];
        self.remove_dependents(entity, TypeId::of::<T>(), &mut path);
        self.take::<T>(entity)
    }

    /// All entities holding `T`, with their component
    pub fn query<T: Component>(&self) -> Vec<(Entity, &T)> {
        self.storage::<T>()
            .map(|storage| storage.iter().collect())
            .unwrap_or_default()
    }

    /// All entities holding `T`, with mutable access to their component
    pub fn query_mut<T: Component>(&mut self) -> Vec<(Entity, &mut T)> {
        self.storage_mut::<T>()
            .map(|storage| storage.iter_mut().collect())
            .unwrap_or_default()
    }

    /// All entities holding `T`
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.storage::<T>()
            .map(|storage| storage.iter().map(|(entity, _)| entity).collect())
            .unwrap_or_default()
    }

    /// Number of entities holding `T`
    pub fn count<T: Component>(&self) -> usize {
        self.component_storages
            .get(&TypeId::of::<T>())
            .map_or(0, |storage| storage.len())
    }

    /// Names of every registered component present on an entity, sorted
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .registry
            .values()
            .filter(|info| self.contains_raw(info.id(), entity))
            .map(ComponentInfo::name)
            .collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn storage_mut_or_create<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        let info = ComponentInfo::of::<T>();
        self.registry.entry(info.id()).or_insert(info);
        let storage = self
            .component_storages
            .entry(info.id())
            .or_insert_with(|| info.create_storage());
        debug_assert!(storage.as_any().is::<ComponentStorage<T>>());
        match storage.as_any_mut().downcast_mut::<ComponentStorage<T>>() {
            Some(storage) => storage,
            None => unreachable!("storage registered under {} holds another type", info.name()),
        }
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::DeadEntity(entity))
        }
    }

    fn contains_raw(&self, id: TypeId, entity: Entity) -> bool {
        self.component_storages
            .get(&id)
            .is_some_and(|storage| storage.contains(entity))
    }

    fn take<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.storage_mut::<T>()
            .and_then(|storage| storage.remove(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: T::NAME,
            })
    }

    /// Default-construct every missing prerequisite of `info`, leaves first
    fn inject_requirements(&mut self, entity: Entity, info: ComponentInfo) {
        self.registry.entry(info.id()).or_insert(info);
        let mut path = Vec::new();
        self.inject_recursive(entity, info, &mut path);
    }

    fn inject_recursive(&mut self, entity: Entity, info: ComponentInfo, path: &mut Vec<TypeId>) {
        path.push(info.id());
        for requirement in info.requirements() {
            if path.contains(&requirement.id()) {
                log::error!(
                    "Component requirement cycle: {} requires {}, skipping",
                    info.name(),
                    requirement.name()
                );
                continue;
            }
            self.registry.entry(requirement.id()).or_insert(requirement);
            self.inject_recursive(entity, requirement, path);
            if !self.contains_raw(requirement.id(), entity) {
                log::trace!(
                    "Injecting {} into entity {entity} (required by {})",
                    requirement.name(),
                    info.name()
                );
                requirement.insert_default_into(self, entity);
            }
        }
        path.pop();
    }

    /// Registered components on `entity` that directly require `id`
    fn dependents_on(&self, entity: Entity, id: TypeId) -> Vec<ComponentInfo> {
        self.registry
            .values()
            .filter(|info| info.id() != id && info.requires(id) && self.contains_raw(info.id(), entity))
            .copied()
            .collect()
    }

    fn remove_dependents(&mut self, entity: Entity, id: TypeId, path: &mut Vec<TypeId>) {
        for dependent in self.dependents_on(entity, id) {
            if path.contains(&dependent.id()) {
                continue;
            }
            path.push(dependent.id());
            self.remove_dependents(entity, dependent.id(), path);
            path.pop();
            if let Some(storage) = self.component_storages.get_mut(&dependent.id()) {
                if storage.remove_entity(entity) {
                    log::debug!("Removed {} from entity {entity} (cascade)", dependent.name());
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Requirements;

    #[derive(Default, Debug, PartialEq)]
    struct Base(i32);
    impl Component for Base {
        const NAME: &'static str = "Base";
    }

    #[derive(Default)]
    struct Middle;
    impl Component for Middle {
        const NAME: &'static str = "Middle";
        fn requirements(requirements: &mut Requirements) {
            requirements.require::<Base>();
        }
    }

    #[derive(Default)]
    struct Top;
    impl Component for Top {
        const NAME: &'static str = "Top";
        fn requirements(requirements: &mut Requirements) {
            requirements.require::<Middle>();
        }
    }

    #[derive(Default)]
    struct CycleA;
    #[derive(Default)]
    struct CycleB;
    impl Component for CycleA {
        const NAME: &'static str = "CycleA";
        fn requirements(requirements: &mut Requirements) {
            requirements.require::<CycleB>();
        }
    }
    impl Component for CycleB {
        const NAME: &'static str = "CycleB";
        fn requirements(requirements: &mut Requirements) {
            requirements.require::<CycleA>();
        }
    }

    #[test]
    fn test_spawn_and_despawn() {
        let mut world = World::new();
        let entity = world.spawn();
        world.insert(entity, Base(3)).unwrap();

        assert!(world.is_alive(entity));
        world.despawn(entity).unwrap();
        assert!(!world.is_alive(entity));
        assert!(world.get::<Base>(entity).is_none());
        assert_eq!(world.despawn(entity), Err(EcsError::DeadEntity(entity)));
    }

    #[test]
    fn test_stale_handle_does_not_alias_new_entity() {
        let mut world = World::new();
        let old = world.spawn();
        world.despawn(old).unwrap();

        let new = world.spawn();
        world.insert(new, Base(7)).unwrap();

        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert!(world.get::<Base>(old).is_none());
        assert!(matches!(world.assign::<Base>(old), Err(EcsError::DeadEntity(_))));
    }

    #[test]
    fn test_transitive_injection() {
        let mut world = World::new();
        let entity = world.spawn();
        world.assign::<Top>(entity).unwrap();

        assert!(world.has::<Middle>(entity));
        assert_eq!(world.get::<Base>(entity), Some(&Base(0)));
        assert_eq!(world.component_names(entity), vec!["Base", "Middle", "Top"]);
    }

    #[test]
    fn test_assign_keeps_existing_prerequisite() {
        let mut world = World::new();
        let entity = world.spawn();
        world.insert(entity, Base(42)).unwrap();
        world.assign::<Top>(entity).unwrap();
        assert_eq!(world.get::<Base>(entity), Some(&Base(42)));
    }

    #[test]
    fn test_assign_returns_existing_component() {
        let mut world = World::new();
        let entity = world.spawn();
        world.insert(entity, Base(5)).unwrap();
        assert_eq!(*world.assign::<Base>(entity).unwrap(), Base(5));
    }

    #[test]
    fn test_remove_refused_while_required() {
        let mut world = World::new();
        let entity = world.spawn();
        world.assign::<Middle>(entity).unwrap();

        let err = world.remove::<Base>(entity).unwrap_err();
        assert_eq!(
            err,
            EcsError::RequiredBy {
                entity,
                component: "Base",
                dependents: vec!["Middle"],
            }
        );
        assert!(world.has::<Base>(entity));
    }

    #[test]
    fn test_remove_cascade_removes_dependents() {
        let mut world = World::new();
        let entity = world.spawn();
        world.assign::<Top>(entity).unwrap();

        world.remove_cascade::<Base>(entity).unwrap();
        assert!(world.component_names(entity).is_empty());
        assert!(world.is_alive(entity));
    }

    #[test]
    fn test_remove_missing_component() {
        let mut world = World::new();
        let entity = world.spawn();
        assert!(matches!(
            world.remove::<Base>(entity),
            Err(EcsError::MissingComponent { component: "Base", .. })
        ));
    }

    #[test]
    fn test_requirement_cycle_terminates() {
        let mut world = World::new();
        let entity = world.spawn();
        world.assign::<CycleA>(entity).unwrap();
        assert!(world.has::<CycleA>(entity));
        assert!(world.has::<CycleB>(entity));
    }

    #[test]
    fn test_query_and_count() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.insert(a, Base(1)).unwrap();
        world.insert(b, Base(2)).unwrap();
        world.assign::<Middle>(b).unwrap();

        assert_eq!(world.query::<Base>().len(), 2);
        assert_eq!(world.entities_with::<Middle>(), vec![b]);
        assert_eq!(world.count::<Base>(), 2);
        assert_eq!(world.count::<Top>(), 0);

        for (_, base) in world.query_mut::<Base>() {
            base.0 *= 10;
        }
        assert_eq!(world.get::<Base>(b), Some(&Base(20)));
    }

    #[test]
    fn test_storage_is_created_once_per_type() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();

        world.storage_mut_or_create::<Base>().insert(a, Base(1));
        world.storage_mut_or_create::<Middle>().insert(a, Middle);
        world.storage_mut_or_create::<Base>().insert(b, Base(2));

        assert_eq!(world.storage_mut_or_create::<Base>().get(a), Some(&Base(1)));
        assert_eq!(world.count::<Base>(), 2);
        assert_eq!(world.count::<Middle>(), 1);
    }
}
