//! Software scene engine.
//!
//! Implements the engine capabilities on top of [`scene::World`] and the CPU
//! picking routines, recording every visible side effect on an event bus.
//! Used by the demo binary and by tests.

use std::cell::Cell;
use std::future::{Future, ready};
use std::rc::Rc;

use foundation::math::{Geodetic, Vec2, Vec3};
use markers::{MarkerSink, MarkerVisual};
use runtime::{EventBus, ListenerId, ListenerKind, ListenerRegistry};
use scene::World;
use scene::camera::{Camera, HeadingPitchRoll};
use scene::components::Transform;
use scene::entity::EntityId;
use scene::picking::{Ray, intersect_terrain};
use scene::terrain::Terrain;
use tracing::{debug, trace};

use crate::config::ViewerConfig;
use crate::engine::{Container, Cursor, SceneEngine, SceneProvider};
use crate::error::ViewerError;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SceneEvent {
    ViewSet,
    Rendered,
    EntityAdded(EntityId),
    EntityRemoved(EntityId),
    CursorChanged(Cursor),
    Destroyed,
}

#[derive(Debug)]
pub struct HeadlessScene {
    world: World,
    camera: Camera,
    terrain: Terrain,
    listeners: ListenerRegistry,
    events: EventBus<SceneEvent>,
    cursor: Cursor,
    target_frame_rate: u32,
    destroyed: bool,
    live: Rc<Cell<usize>>,
}

impl HeadlessScene {
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn events(&self) -> &EventBus<SceneEvent> {
        &self.events
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn target_frame_rate(&self) -> u32 {
        self.target_frame_rate
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl MarkerSink for HeadlessScene {
    fn spawn_marker(&mut self, visual: MarkerVisual) -> EntityId {
        let id = self.world.spawn();
        self.world.set_transform(id, Transform::translate(visual.position));
        self.world.set_billboard(id, visual.billboard);
        self.world.set_label(id, visual.label);
        self.events.emit(SceneEvent::EntityAdded(id));
        id
    }

    fn remove_marker(&mut self, id: EntityId) -> bool {
        let removed = self.world.despawn(id);
        if removed {
            self.events.emit(SceneEvent::EntityRemoved(id));
        }
        removed
    }

    fn request_render(&mut self) {
        trace!(entities = self.world.len(), "render");
        self.events.emit(SceneEvent::Rendered);
    }
}

impl SceneEngine for HeadlessScene {
    fn set_view(&mut self, destination: Geodetic, orientation: HeadingPitchRoll) {
        self.camera.set_view(destination, orientation);
        self.events.emit(SceneEvent::ViewSet);
    }

    fn camera_ray(&self, px: Vec2) -> Option<Ray> {
        self.camera.ray_for_pixel(px)
    }

    fn depth_pick_supported(&self) -> bool {
        self.terrain.has_depth()
    }

    fn pick_depth(&self, ray: Ray) -> Option<Vec3> {
        if !self.terrain.has_depth() {
            return None;
        }
        intersect_terrain(ray, &self.terrain).map(|hit| hit.point)
    }

    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.listeners.attach(kind)
    }

    fn detach_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.detach(id)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.events.emit(SceneEvent::CursorChanged(cursor));
        }
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let detached = self.listeners.clear();
        self.world = World::new();
        self.events.emit(SceneEvent::Destroyed);
        self.live.set(self.live.get().saturating_sub(1));
        debug!(detached, "headless scene destroyed");
    }
}

/// Provider that hands out [`HeadlessScene`]s over a fixed terrain dataset.
#[derive(Debug, Clone)]
pub struct HeadlessProvider {
    terrain: Result<Terrain, String>,
    live: Rc<Cell<usize>>,
}

impl HeadlessProvider {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain: Ok(terrain),
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Provider whose terrain load always fails.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            terrain: Err(reason.into()),
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Scenes created and not yet destroyed.
    pub fn live_scenes(&self) -> usize {
        self.live.get()
    }
}

impl SceneProvider for HeadlessProvider {
    type Engine = HeadlessScene;

    fn load_terrain(&self, access_token: &str) -> impl Future<Output = Result<Terrain, ViewerError>> {
        debug!(token_len = access_token.len(), "loading headless terrain");
        ready(self.terrain.clone().map_err(ViewerError::TerrainUnavailable))
    }

    fn create_scene(
        &self,
        container: &Container,
        terrain: Terrain,
        config: &ViewerConfig,
    ) -> Result<HeadlessScene, ViewerError> {
        let viewport = container.viewport()?;
        self.live.set(self.live.get() + 1);
        debug!(container = %container.id, width = viewport.width, height = viewport.height, "headless scene created");
        Ok(HeadlessScene {
            world: World::new(),
            camera: Camera::new(viewport),
            terrain,
            listeners: ListenerRegistry::new(),
            events: EventBus::new(),
            cursor: Cursor::Default,
            target_frame_rate: config.target_frame_rate,
            destroyed: false,
            live: Rc::clone(&self.live),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadlessProvider, HeadlessScene, SceneEvent};
    use crate::config::ViewerConfig;
    use crate::engine::{Container, Cursor, SceneEngine, SceneProvider};
    use foundation::math::{Geodetic, Vec3};
    use markers::{MarkerSink, MarkerStyle, MarkerVisual};
    use pretty_assertions::assert_eq;
    use runtime::ListenerKind;
    use scene::camera::HeadingPitchRoll;
    use scene::terrain::{Heightfield, Terrain};

    fn scene(provider: &HeadlessProvider, terrain: Terrain) -> HeadlessScene {
        provider
            .create_scene(
                &Container::new("globe", 1280.0, 720.0),
                terrain,
                &ViewerConfig::default(),
            )
            .expect("scene")
    }

    fn visual() -> MarkerVisual {
        let style = MarkerStyle::default();
        MarkerVisual {
            position: Vec3::new(1.0, 2.0, 3.0),
            billboard: style.billboard("/markers/road.svg"),
            label: style.label("road 1"),
        }
    }

    #[test]
    fn spawned_markers_land_in_world() {
        let provider = HeadlessProvider::new(Terrain::ellipsoid());
        let mut scene = scene(&provider, Terrain::ellipsoid());
        let id = scene.spawn_marker(visual());
        assert!(scene.world().contains(id));
        assert_eq!(scene.world().billboards().len(), 1);

        assert!(scene.remove_marker(id));
        assert!(!scene.remove_marker(id));
        assert_eq!(
            scene.events().events(),
            &[SceneEvent::EntityAdded(id), SceneEvent::EntityRemoved(id)]
        );
    }

    #[test]
    fn cursor_changes_are_recorded_once() {
        let provider = HeadlessProvider::new(Terrain::ellipsoid());
        let mut scene = scene(&provider, Terrain::ellipsoid());
        scene.set_cursor(Cursor::Crosshair);
        scene.set_cursor(Cursor::Crosshair);
        scene.set_cursor(Cursor::Default);
        assert_eq!(
            scene.events().events(),
            &[
                SceneEvent::CursorChanged(Cursor::Crosshair),
                SceneEvent::CursorChanged(Cursor::Default)
            ]
        );
    }

    #[test]
    fn depth_support_follows_heightfield() {
        let provider = HeadlessProvider::new(Terrain::ellipsoid());
        let flat = scene(&provider, Terrain::ellipsoid());
        assert!(!flat.depth_pick_supported());
        let ray = flat.camera_ray(flat.camera().viewport.center()).expect("ray");
        assert!(flat.pick_depth(ray).is_none());

        let hilly = Terrain::with_heightfield(Heightfield::flat([-119.0, 33.5, -117.5, 34.5], 80.0));
        let mut scene = scene(&provider, hilly);
        scene.set_view(
            Geodetic::from_degrees(-118.2437, 34.0522, 500.0),
            HeadingPitchRoll::from_degrees(0.0, -30.0, 0.0),
        );
        assert!(scene.depth_pick_supported());
        let ray = scene.camera_ray(scene.camera().viewport.center()).expect("ray");
        assert!(scene.pick_depth(ray).is_some());
    }

    #[test]
    fn destroy_is_idempotent_and_releases_listeners() {
        let provider = HeadlessProvider::new(Terrain::ellipsoid());
        let mut scene = scene(&provider, Terrain::ellipsoid());
        scene.attach_listener(ListenerKind::LeftClick);
        scene.spawn_marker(visual());
        assert_eq!(provider.live_scenes(), 1);

        scene.destroy();
        scene.destroy();
        assert!(scene.is_destroyed());
        assert!(scene.world().is_empty());
        assert_eq!(scene.listeners().count(ListenerKind::LeftClick), 0);
        assert_eq!(scene.events().count(|e| *e == SceneEvent::Destroyed), 1);
        assert_eq!(provider.live_scenes(), 0);
    }

    #[test]
    fn failing_provider_reports_terrain_error() {
        let provider = HeadlessProvider::unavailable("offline");
        let result = pollster::block_on(provider.load_terrain(""));
        assert!(result.is_err());
    }
}
