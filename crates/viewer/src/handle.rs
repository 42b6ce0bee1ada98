use tracing::debug;

use crate::engine::SceneEngine;

/// Exclusive owner of a live scene.
///
/// Dropping the handle destroys the scene, so a handle that is discarded on
/// any path (teardown, failed init, stale init) never leaks engine resources.
#[derive(Debug)]
pub struct ViewerHandle<E: SceneEngine> {
    engine: E,
}

impl<E: SceneEngine> ViewerHandle<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: SceneEngine> Drop for ViewerHandle<E> {
    fn drop(&mut self) {
        debug!("destroying scene");
        self.engine.destroy();
    }
}
