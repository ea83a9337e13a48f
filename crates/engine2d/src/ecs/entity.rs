//! Entity implementation

use slotmap::Key;
use std::fmt;

slotmap::new_key_type! {
    /// Generational entity identifier.
    ///
    /// The slot index may be reused after the entity is despawned, but the
    /// generation is bumped, so an old handle never matches the new entity.
    pub struct Entity;
}

impl Entity {
    /// Packed `(generation << 32) | index` representation
    pub fn to_bits(self) -> u64 {
        self.data().as_ffi()
    }

    /// Slot index of this entity
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(self) -> u32 {
        (self.to_bits() & 0xFFFF_FFFF) as u32
    }

    /// Generation counter of this entity's slot
    #[allow(clippy::cast_possible_truncation)]
    pub fn generation(self) -> u32 {
        (self.to_bits() >> 32) as u32
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}
