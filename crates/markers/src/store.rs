use foundation::math::{Ecef, Geodetic, Vec3, ecef_to_geodetic};
use scene::components::{Billboard, Label};
use scene::entity::EntityId;
use tracing::debug;

use crate::icons::IconTable;
use crate::kind::MarkerType;
use crate::style::MarkerStyle;

/// Renderable representation of one marker: an icon plus a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVisual {
    pub position: Vec3,
    pub billboard: Billboard,
    pub label: Label,
}

/// Scene capability the store draws markers into.
pub trait MarkerSink {
    fn spawn_marker(&mut self, visual: MarkerVisual) -> EntityId;
    /// Returns `false` if the entity was already gone.
    fn remove_marker(&mut self, id: EntityId) -> bool;
    /// Re-render now instead of waiting for the next natural frame.
    fn request_render(&mut self);
}

/// A placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: EntityId,
    pub kind: MarkerType,
    /// World-space position (ECEF meters).
    pub position: Vec3,
    pub label: String,
}

impl Marker {
    pub fn geodetic(&self) -> Geodetic {
        ecef_to_geodetic(Ecef::from_vec3(self.position))
    }
}

/// Ordered collection of placed markers; insertion order is display order.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    icons: IconTable,
    style: MarkerStyle,
}

impl MarkerStore {
    pub fn new(icons: IconTable, style: MarkerStyle) -> Self {
        Self {
            markers: Vec::new(),
            icons,
            style,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Label a marker would get if added now.
    ///
    /// Blank custom labels fall back to `"<type> <ordinal>"`.
    pub fn label_for(&self, kind: MarkerType, custom: Option<&str>) -> String {
        match custom.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("{} {}", kind, self.markers.len() + 1),
        }
    }

    /// Draw a new marker at `position` and append it.
    pub fn add<S: MarkerSink + ?Sized>(
        &mut self,
        sink: &mut S,
        kind: MarkerType,
        position: Vec3,
        label: Option<&str>,
    ) -> Marker {
        let text = self.label_for(kind, label);
        let visual = MarkerVisual {
            position,
            billboard: self.style.billboard(self.icons.icon_for(kind)),
            label: self.style.label(&text),
        };
        let id = sink.spawn_marker(visual);
        let marker = Marker {
            id,
            kind,
            position,
            label: text,
        };
        self.markers.push(marker.clone());
        sink.request_render();
        debug!(id = %id, %kind, label = %marker.label, "marker added");
        marker
    }

    /// Remove every marker from the scene and empty the store.
    ///
    /// Returns the number of markers removed. Clearing an empty store is a
    /// no-op and does not request a render.
    pub fn clear<S: MarkerSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        if self.markers.is_empty() {
            return 0;
        }
        let removed = std::mem::take(&mut self.markers);
        for marker in &removed {
            if !sink.remove_marker(marker.id) {
                debug!(id = %marker.id, "marker entity already gone");
            }
        }
        sink.request_render();
        debug!(count = removed.len(), "markers cleared");
        removed.len()
    }

    /// Forget all markers without touching the scene.
    ///
    /// Used when the scene itself is being destroyed.
    pub fn forget(&mut self) {
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerSink, MarkerStore, MarkerVisual};
    use crate::icons::IconTable;
    use crate::kind::MarkerType;
    use crate::style::MarkerStyle;
    use foundation::handles::Handle;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;
    use scene::entity::EntityId;

    #[derive(Default)]
    struct RecordingSink {
        next: u32,
        spawned: Vec<MarkerVisual>,
        removed: Vec<EntityId>,
        renders: usize,
    }

    impl MarkerSink for RecordingSink {
        fn spawn_marker(&mut self, visual: MarkerVisual) -> EntityId {
            self.spawned.push(visual);
            let id = EntityId(Handle::new(self.next, 0));
            self.next += 1;
            id
        }

        fn remove_marker(&mut self, id: EntityId) -> bool {
            self.removed.push(id);
            true
        }

        fn request_render(&mut self) {
            self.renders += 1;
        }
    }

    fn store() -> MarkerStore {
        MarkerStore::new(IconTable::default(), MarkerStyle::default())
    }

    #[test]
    fn default_labels_use_type_and_ordinal() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        let labels: Vec<String> = (0..3)
            .map(|_| store.add(&mut sink, MarkerType::Road, Vec3::ZERO, None).label)
            .collect();
        assert_eq!(labels, vec!["road 1", "road 2", "road 3"]);
    }

    #[test]
    fn ordinal_counts_all_types() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        store.add(&mut sink, MarkerType::Building, Vec3::ZERO, None);
        let m = store.add(&mut sink, MarkerType::Utility, Vec3::ZERO, Some("  "));
        assert_eq!(m.label, "utility 2");
    }

    #[test]
    fn custom_label_is_trimmed_and_used() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        let m = store.add(&mut sink, MarkerType::Building, Vec3::ZERO, Some(" Tower A "));
        assert_eq!(m.label, "Tower A");
        assert_eq!(sink.spawned[0].label.text, "Tower A");
        assert_eq!(sink.spawned[0].billboard.image, "/markers/building.svg");
    }

    #[test]
    fn add_requests_render_and_appends_in_order() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        let a = store.add(&mut sink, MarkerType::Road, Vec3::new(1.0, 0.0, 0.0), None);
        let b = store.add(&mut sink, MarkerType::Measurement, Vec3::new(2.0, 0.0, 0.0), None);
        assert_eq!(sink.renders, 2);
        let ids: Vec<_> = store.markers().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn clear_removes_every_entity_once() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        for _ in 0..4 {
            store.add(&mut sink, MarkerType::Utility, Vec3::ZERO, None);
        }
        let ids: Vec<_> = store.markers().iter().map(|m| m.id).collect();
        let renders_before = sink.renders;

        assert_eq!(store.clear(&mut sink), 4);
        assert!(store.is_empty());
        assert_eq!(sink.removed, ids);
        assert_eq!(sink.renders, renders_before + 1);

        assert_eq!(store.clear(&mut sink), 0);
        assert_eq!(sink.removed.len(), 4);
        assert_eq!(sink.renders, renders_before + 1);
    }

    #[test]
    fn labels_restart_after_clear() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        store.add(&mut sink, MarkerType::Road, Vec3::ZERO, None);
        store.clear(&mut sink);
        let m = store.add(&mut sink, MarkerType::Road, Vec3::ZERO, None);
        assert_eq!(m.label, "road 1");
    }

    #[test]
    fn long_custom_label_is_kept_intact() {
        let mut store = store();
        let mut sink = RecordingSink::default();
        let long = "x".repeat(300);
        let m = store.add(&mut sink, MarkerType::Road, Vec3::ZERO, Some(&long));
        assert_eq!(m.label, long);
        assert_eq!(store.markers()[0].label, long);
        assert_eq!(sink.spawned[0].label.text, long);
    }
}
