use std::collections::BTreeMap;

use tracing::trace;

/// What a registered listener observes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    /// Left clicks on the scene's input surface.
    LeftClick,
    /// Tile-load progress reports from the terrain stream.
    TileProgress,
}

/// Registration token returned by [`ListenerRegistry::attach`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Attach/detach bookkeeping for input and progress listeners.
///
/// Ids are never reused, so detaching a stale id is a harmless no-op.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: BTreeMap<ListenerId, ListenerKind>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.active.insert(id, kind);
        trace!(id = id.0, ?kind, "listener attached");
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        let removed = self.active.remove(&id).is_some();
        if removed {
            trace!(id = id.0, "listener detached");
        }
        removed
    }

    pub fn count(&self, kind: ListenerKind) -> usize {
        self.active.values().filter(|k| **k == kind).count()
    }

    /// Detach everything; returns how many listeners were removed.
    pub fn clear(&mut self) -> usize {
        let n = self.active.len();
        self.active.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::{ListenerKind, ListenerRegistry};

    #[test]
    fn attach_detach_tracks_counts_per_kind() {
        let mut reg = ListenerRegistry::new();
        let click = reg.attach(ListenerKind::LeftClick);
        let progress = reg.attach(ListenerKind::TileProgress);

        assert_eq!(reg.count(ListenerKind::LeftClick), 1);
        assert_eq!(reg.count(ListenerKind::TileProgress), 1);

        assert!(reg.detach(click));
        assert!(!reg.detach(click));
        assert_eq!(reg.count(ListenerKind::LeftClick), 0);
        assert_eq!(reg.count(ListenerKind::TileProgress), 1);
        assert!(reg.detach(progress));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut reg = ListenerRegistry::new();
        let a = reg.attach(ListenerKind::LeftClick);
        reg.detach(a);
        let b = reg.attach(ListenerKind::LeftClick);
        assert_ne!(a, b);
        assert!(!reg.detach(a));
        assert_eq!(reg.count(ListenerKind::LeftClick), 1);
    }

    #[test]
    fn clear_detaches_everything() {
        let mut reg = ListenerRegistry::new();
        reg.attach(ListenerKind::LeftClick);
        reg.attach(ListenerKind::TileProgress);
        assert_eq!(reg.clear(), 2);
        assert_eq!(reg.count(ListenerKind::LeftClick), 0);
    }
}
