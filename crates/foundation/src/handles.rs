/// Generational handle: `(index, generation)`.
///
/// A slot index may be reused after its occupant is released; the generation
/// distinguishes the new occupant from stale handles to the old one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;

    #[test]
    fn reused_slot_is_a_different_handle() {
        let old = Handle::new(7, 2);
        let new = Handle::new(7, 3);
        assert_eq!(old.index(), new.index());
        assert_eq!(new.generation(), 3);
        assert_ne!(old, new);
    }
}
