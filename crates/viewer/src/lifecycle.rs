use runtime::{ListenerId, ListenerKind, ReadinessLatch};
use tracing::{debug, info};

use crate::config::HomeView;
use crate::engine::SceneEngine;
use crate::handle::ViewerHandle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unmounted,
    /// Waiting for the terrain dataset.
    Initializing,
    /// Scene built, waiting for the initial tile load to drain.
    Loading,
    Ready,
    /// Initialization failed; no scene exists.
    Failed,
    TornDown,
}

impl Phase {
    /// Whether `initialize` may start from this phase.
    pub fn can_initialize(&self) -> bool {
        matches!(self, Phase::Unmounted | Phase::Failed | Phase::TornDown)
    }
}

/// Token identifying one mount. Unmounting invalidates it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MountEpoch(u64);

/// Owns the scene for the viewer's mounted lifetime.
#[derive(Debug)]
pub struct Lifecycle<E: SceneEngine> {
    phase: Phase,
    epoch: u64,
    readiness: ReadinessLatch,
    observer: Option<ListenerId>,
    handle: Option<ViewerHandle<E>>,
}

impl<E: SceneEngine> Default for Lifecycle<E> {
    fn default() -> Self {
        Self {
            phase: Phase::Unmounted,
            epoch: 0,
            readiness: ReadinessLatch::new(),
            observer: None,
            handle: None,
        }
    }
}

impl<E: SceneEngine> Lifecycle<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready() && self.handle.is_some()
    }

    pub fn engine(&self) -> Option<&E> {
        self.handle.as_ref().map(ViewerHandle::engine)
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.handle.as_mut().map(ViewerHandle::engine_mut)
    }

    /// Start a mount. Returns `Err` with the current phase when a mount is
    /// already in progress or live.
    pub fn begin(&mut self) -> Result<MountEpoch, Phase> {
        if !self.phase.can_initialize() {
            return Err(self.phase);
        }
        self.readiness = ReadinessLatch::new();
        self.phase = Phase::Initializing;
        info!(epoch = self.epoch, "viewer initializing");
        Ok(MountEpoch(self.epoch))
    }

    pub fn is_current(&self, epoch: MountEpoch) -> bool {
        self.epoch == epoch.0 && self.phase == Phase::Initializing
    }

    /// Install a freshly built scene and register its progress observer.
    ///
    /// A stale epoch drops the engine immediately, destroying it.
    pub fn attach(&mut self, epoch: MountEpoch, engine: E) -> bool {
        let mut handle = ViewerHandle::new(engine);
        if !self.is_current(epoch) {
            debug!("discarding scene built for a stale mount");
            return false;
        }
        self.observer = Some(handle.engine_mut().attach_listener(ListenerKind::TileProgress));
        self.handle = Some(handle);
        self.phase = Phase::Loading;
        info!("scene constructed; waiting for terrain tiles");
        true
    }

    /// Record an initialization failure. Stale epochs are ignored.
    pub fn fail(&mut self, epoch: MountEpoch) -> bool {
        if self.epoch != epoch.0 || self.phase != Phase::Initializing {
            return false;
        }
        self.handle = None;
        self.observer = None;
        self.phase = Phase::Failed;
        true
    }

    /// Tile-load progress callback.
    ///
    /// On the first report with nothing pending: detach the observer, fly to
    /// `home`, render, and become ready. Returns `true` only for that report.
    pub fn observe_progress(&mut self, pending: usize, home: &HomeView) -> bool {
        if self.phase != Phase::Loading || !self.readiness.observe(pending) {
            return false;
        }
        let observer = self.observer.take();
        let Some(engine) = self.handle.as_mut().map(ViewerHandle::engine_mut) else {
            return false;
        };
        if let Some(id) = observer {
            engine.detach_listener(id);
        }
        engine.set_view(home.destination(), home.orientation());
        engine.request_render();
        self.phase = Phase::Ready;
        info!(
            reports = self.readiness.reports(),
            lon = home.lon_deg,
            lat = home.lat_deg,
            "viewer ready"
        );
        true
    }

    /// Invalidate the current mount and destroy the scene if one exists.
    pub fn teardown(&mut self) {
        self.epoch += 1;
        if let (Some(id), Some(engine)) = (self.observer.take(), self.engine_mut()) {
            engine.detach_listener(id);
        }
        let had_scene = self.handle.take().is_some();
        self.readiness = ReadinessLatch::new();
        self.phase = Phase::TornDown;
        info!(had_scene, "viewer torn down");
    }
}
