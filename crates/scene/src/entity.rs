use foundation::handles::Handle;

/// Opaque reference to an entity in a [`World`](crate::World).
///
/// Ids carry a generation, so an id kept after its entity was despawned never
/// aliases a later entity that reuses the slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub Handle);

impl EntityId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}
