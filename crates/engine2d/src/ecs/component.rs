//! Component trait and the static prerequisite table
//!
//! Every component type declares the components it cannot exist without.
//! The world walks these declarations transitively when a component is
//! assigned, default-constructing whatever is missing.

use super::storage::{AnyStorage, ComponentStorage};
use super::{Entity, World};
use std::any::TypeId;
use std::fmt;

/// Trait implemented by every type stored on entities
pub trait Component: Default + 'static + Send + Sync {
    /// Human readable type name used in logs and errors
    const NAME: &'static str;

    /// Declare the components that must be present before this one
    fn requirements(requirements: &mut Requirements) {
        let _ = requirements;
    }
}

/// Type-erased description of a component type
#[derive(Clone, Copy)]
pub struct ComponentInfo {
    id: TypeId,
    name: &'static str,
    declare: fn(&mut Requirements),
    insert_default: fn(&mut World, Entity),
    new_storage: fn() -> Box<dyn AnyStorage>,
}

impl ComponentInfo {
    /// Describe component type `T`
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::NAME,
            declare: T::requirements,
            insert_default: insert_default::<T>,
            new_storage: new_storage::<T>,
        }
    }

    /// Type id of the component
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Name of the component
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direct prerequisites declared by this component
    pub fn requirements(&self) -> Vec<ComponentInfo> {
        let mut requirements = Requirements::default();
        (self.declare)(&mut requirements);
        requirements.infos
    }

    /// Whether `other` is a direct prerequisite of this component
    pub fn requires(&self, other: TypeId) -> bool {
        self.requirements().iter().any(|info| info.id == other)
    }

    pub(crate) fn insert_default_into(&self, world: &mut World, entity: Entity) {
        (self.insert_default)(world, entity);
    }

    pub(crate) fn create_storage(&self) -> Box<dyn AnyStorage> {
        (self.new_storage)()
    }
}

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInfo").field("name", &self.name).finish()
    }
}

impl PartialEq for ComponentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Builder passed to [`Component::requirements`]
#[derive(Default)]
pub struct Requirements {
    infos: Vec<ComponentInfo>,
}

impl Requirements {
    /// Declare that `T` must be present
    pub fn require<T: Component>(&mut self) -> &mut Self {
        let info = ComponentInfo::of::<T>();
        if !self.infos.contains(&info) {
            self.infos.push(info);
        }
        self
    }
}

fn insert_default<T: Component>(world: &mut World, entity: Entity) {
    world.storage_mut_or_create::<T>().insert(entity, T::default());
}

fn new_storage<T: Component>() -> Box<dyn AnyStorage> {
    Box::new(ComponentStorage::<T>::new())
}
