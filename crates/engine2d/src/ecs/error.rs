//! Errors raised by the component store

use super::Entity;
use thiserror::Error;

/// Structural errors from entity and component operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was despawned or never existed
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),

    /// The entity does not hold the requested component
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// Entity that was accessed
        entity: Entity,
        /// Name of the missing component type
        component: &'static str,
    },

    /// The component is a prerequisite of other components still on the entity
    #[error("cannot remove {component} from entity {entity}: required by {dependents:?}")]
    RequiredBy {
        /// Entity that was accessed
        entity: Entity,
        /// Component whose removal was refused
        component: &'static str,
        /// Components on the entity that depend on it
        dependents: Vec<&'static str>,
    },
}
