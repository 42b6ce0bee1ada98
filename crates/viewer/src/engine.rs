//! Capabilities the viewer consumes from the rendering engine.
//!
//! The engine owns camera controls, tile streaming and the render pipeline.
//! The viewer only needs the narrow surface below.

use std::future::Future;

use foundation::math::{Geodetic, Vec2, Vec3};
use markers::MarkerSink;
use runtime::{ListenerId, ListenerKind};
use scene::camera::{HeadingPitchRoll, Viewport};
use scene::picking::Ray;
use scene::terrain::Terrain;

use crate::config::ViewerConfig;
use crate::error::ViewerError;

/// Host surface the scene is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Viewport covering the whole container.
    pub fn viewport(&self) -> Result<Viewport, ViewerError> {
        if self.id.trim().is_empty() {
            return Err(ViewerError::MissingContainer);
        }
        let viewport = Viewport::new(self.width, self.height);
        if viewport.is_empty() {
            return Err(ViewerError::EmptyContainer {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(viewport)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// A live scene instance.
pub trait SceneEngine: MarkerSink {
    /// Move the camera instantly.
    fn set_view(&mut self, destination: Geodetic, orientation: HeadingPitchRoll);

    /// Camera ray through a viewport pixel.
    fn camera_ray(&self, px: Vec2) -> Option<Ray>;

    /// Whether [`SceneEngine::pick_depth`] can return terrain positions.
    fn depth_pick_supported(&self) -> bool;

    /// First terrain surface point along a camera ray, recovered from
    /// rendered depth.
    fn pick_depth(&self, ray: Ray) -> Option<Vec3>;

    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerId;

    fn detach_listener(&mut self, id: ListenerId) -> bool;

    fn set_cursor(&mut self, cursor: Cursor);

    /// Release every engine resource. Called exactly once per instance.
    fn destroy(&mut self);
}

/// Source of terrain datasets and scenes.
pub trait SceneProvider {
    type Engine: SceneEngine;

    fn load_terrain(&self, access_token: &str) -> impl Future<Output = Result<Terrain, ViewerError>>;

    fn create_scene(
        &self,
        container: &Container,
        terrain: Terrain,
        config: &ViewerConfig,
    ) -> Result<Self::Engine, ViewerError>;
}
