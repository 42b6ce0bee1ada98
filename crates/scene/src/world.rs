use crate::components::{Billboard, Label, Transform};
use crate::entity::EntityId;
use foundation::handles::Handle;

/// Entity storage for everything the viewer draws on top of the globe.
///
/// Components live in parallel `Vec<Option<_>>` columns indexed by slot.
/// Despawned slots are recycled with a bumped generation.
#[derive(Debug, Default)]
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    transforms: Vec<Option<Transform>>,
    billboards: Vec<Option<Billboard>>,
    labels: Vec<Option<Label>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = self.generations.len() as u32;
                self.ensure_capacity(index as usize);
                index
            }
        };
        let idx = index as usize;
        self.alive[idx] = true;
        EntityId(Handle::new(index, self.generations[idx]))
    }

    /// Remove an entity and all of its components.
    ///
    /// Returns `false` for stale or unknown ids.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.contains(entity) {
            return false;
        }
        let idx = entity.index() as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.transforms[idx] = None;
        self.billboards[idx] = None;
        self.labels[idx] = None;
        self.free.push(entity.index());
        true
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        let idx = entity.index() as usize;
        self.alive.get(idx).copied().unwrap_or(false)
            && self.generations[idx] == entity.generation()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        if self.contains(entity) {
            self.transforms[entity.index() as usize] = Some(transform);
        }
    }

    pub fn set_billboard(&mut self, entity: EntityId, billboard: Billboard) {
        if self.contains(entity) {
            self.billboards[entity.index() as usize] = Some(billboard);
        }
    }

    pub fn set_label(&mut self, entity: EntityId, label: Label) {
        if self.contains(entity) {
            self.labels[entity.index() as usize] = Some(label);
        }
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        if !self.contains(entity) {
            return None;
        }
        self.transforms[entity.index() as usize]
    }

    pub fn billboard(&self, entity: EntityId) -> Option<&Billboard> {
        if !self.contains(entity) {
            return None;
        }
        self.billboards[entity.index() as usize].as_ref()
    }

    pub fn label(&self, entity: EntityId) -> Option<&Label> {
        if !self.contains(entity) {
            return None;
        }
        self.labels[entity.index() as usize].as_ref()
    }

    /// Live entities that carry a billboard, in slot order.
    pub fn billboards(&self) -> Vec<(EntityId, Transform, &Billboard)> {
        let mut out = Vec::new();
        for (idx, billboard) in self.billboards.iter().enumerate() {
            let Some(billboard) = billboard else { continue };
            let Some(transform) = self.transforms[idx] else {
                continue;
            };
            let id = EntityId(Handle::new(idx as u32, self.generations[idx]));
            out.push((id, transform, billboard));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.generations.len() <= idx {
            let new_len = idx + 1;
            self.generations.resize(new_len, 0);
            self.alive.resize(new_len, false);
            self.transforms.resize(new_len, None);
            self.billboards.resize(new_len, None);
            self.labels.resize(new_len, None);
        }
    }
}
