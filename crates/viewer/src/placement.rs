use markers::MarkerType;
use runtime::{ListenerId, ListenerKind};
use tracing::debug;

use crate::engine::{Cursor, SceneEngine};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlacementState {
    /// No click listener; clicks drive camera navigation.
    #[default]
    Idle,
    /// One click listener registered, waiting for its click.
    Armed,
}

/// What the next placement click should create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRequest {
    pub kind: MarkerType,
    pub label: String,
}

/// One-shot click listener bookkeeping.
///
/// The machine is ARMED exactly when it holds a listener id, so at most one
/// listener can ever be registered through it.
#[derive(Debug, Default)]
pub struct PlacementMachine {
    listener: Option<ListenerId>,
    request: Option<PlacementRequest>,
}

impl PlacementMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlacementState {
        if self.listener.is_some() {
            PlacementState::Armed
        } else {
            PlacementState::Idle
        }
    }

    /// IDLE -> ARMED.
    ///
    /// Arming while already armed keeps the registered listener and replaces
    /// the pending request. Returns `true` if a listener was registered.
    pub fn arm<E: SceneEngine + ?Sized>(&mut self, engine: &mut E, request: PlacementRequest) -> bool {
        if self.listener.is_some() {
            debug!(kind = %request.kind, "placement already armed; request replaced");
            self.request = Some(request);
            return false;
        }
        let id = engine.attach_listener(ListenerKind::LeftClick);
        engine.set_cursor(Cursor::Crosshair);
        debug!(listener = id.raw(), kind = %request.kind, "placement armed");
        self.listener = Some(id);
        self.request = Some(request);
        true
    }

    /// ARMED -> IDLE on the listener's click.
    ///
    /// Detaches the listener and hands back the pending request. `None` when
    /// idle, in which case the click belongs to camera navigation.
    pub fn take_click<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) -> Option<PlacementRequest> {
        let id = self.listener.take()?;
        engine.detach_listener(id);
        engine.set_cursor(Cursor::Default);
        self.request.take()
    }

    /// ARMED -> IDLE without a click. Returns `true` if it was armed.
    pub fn cancel<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        let was_armed = self.take_click(engine).is_some();
        if was_armed {
            debug!("placement cancelled");
        }
        was_armed
    }
}

#[cfg(test)]
mod tests {
    use super::{PlacementMachine, PlacementRequest, PlacementState};
    use crate::config::ViewerConfig;
    use crate::engine::{Container, Cursor, SceneProvider};
    use crate::headless::{HeadlessProvider, HeadlessScene};
    use markers::MarkerType;
    use pretty_assertions::assert_eq;
    use runtime::ListenerKind;
    use scene::terrain::Terrain;

    fn scene() -> HeadlessScene {
        HeadlessProvider::new(Terrain::ellipsoid())
            .create_scene(
                &Container::new("globe", 800.0, 600.0),
                Terrain::ellipsoid(),
                &ViewerConfig::default(),
            )
            .expect("scene")
    }

    fn request(kind: MarkerType, label: &str) -> PlacementRequest {
        PlacementRequest {
            kind,
            label: label.to_string(),
        }
    }

    #[test]
    fn repeated_arming_registers_one_listener() {
        let mut scene = scene();
        let mut machine = PlacementMachine::new();
        assert!(machine.arm(&mut scene, request(MarkerType::Road, "")));
        for _ in 0..5 {
            assert!(!machine.arm(&mut scene, request(MarkerType::Road, "")));
        }
        assert!(!machine.arm(&mut scene, request(MarkerType::Utility, "pipe")));

        assert_eq!(scene.listeners().count(ListenerKind::LeftClick), 1);
        assert_eq!(machine.state(), PlacementState::Armed);
        assert_eq!(scene.cursor(), Cursor::Crosshair);
        assert_eq!(
            machine.take_click(&mut scene),
            Some(request(MarkerType::Utility, "pipe"))
        );
    }

    #[test]
    fn click_disarms_and_detaches() {
        let mut scene = scene();
        let mut machine = PlacementMachine::new();
        machine.arm(&mut scene, request(MarkerType::Building, "HQ"));

        let taken = machine.take_click(&mut scene);
        assert_eq!(taken, Some(request(MarkerType::Building, "HQ")));
        assert_eq!(machine.state(), PlacementState::Idle);
        assert_eq!(scene.listeners().count(ListenerKind::LeftClick), 0);
        assert_eq!(scene.cursor(), Cursor::Default);

        assert_eq!(machine.take_click(&mut scene), None);
    }

    #[test]
    fn rearm_after_click_does_not_accumulate_listeners() {
        let mut scene = scene();
        let mut machine = PlacementMachine::new();
        for _ in 0..3 {
            machine.arm(&mut scene, request(MarkerType::Road, ""));
            machine.take_click(&mut scene);
        }
        assert_eq!(scene.listeners().count(ListenerKind::LeftClick), 0);
    }

    #[test]
    fn cancel_only_when_armed() {
        let mut scene = scene();
        let mut machine = PlacementMachine::new();
        assert!(!machine.cancel(&mut scene));
        machine.arm(&mut scene, request(MarkerType::Road, ""));
        assert!(machine.cancel(&mut scene));
        assert_eq!(machine.state(), PlacementState::Idle);
        assert_eq!(machine.take_click(&mut scene), None);
    }
}
