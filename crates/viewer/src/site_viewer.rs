//! The viewer component: lifecycle, placement and markers behind one handle.
//!
//! Everything runs on one cooperative UI thread. The only suspension point is
//! the terrain load inside [`SiteViewer::initialize`]; no `RefCell` borrow is
//! held across it, so engine callbacks and user controls can run while it is
//! pending.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::Vec2;
use markers::{Marker, MarkerStore, MarkerStyle, MarkerType};
use tracing::{debug, error, info, warn};

use crate::config::ViewerConfig;
use crate::engine::{Container, SceneProvider};
use crate::error::ViewerError;
use crate::lifecycle::{Lifecycle, MountEpoch, Phase};
use crate::placement::{PlacementMachine, PlacementRequest, PlacementState};
use crate::resolver::{ResolveMiss, resolve};

/// Result of delivering a left click to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The armed listener fired and a marker was created.
    Placed(Marker),
    /// The armed listener fired but nothing was hit; no marker.
    Missed(ResolveMiss),
    /// Not armed; the click is left to camera navigation.
    PassedThrough,
}

struct Inner<P: SceneProvider> {
    config: ViewerConfig,
    lifecycle: Lifecycle<P::Engine>,
    placement: PlacementMachine,
    store: MarkerStore,
}

pub struct SiteViewer<P: SceneProvider> {
    provider: Rc<P>,
    inner: Rc<RefCell<Inner<P>>>,
}

impl<P: SceneProvider> Clone for SiteViewer<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Rc::clone(&self.provider),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: SceneProvider> SiteViewer<P> {
    pub fn new(provider: P, config: ViewerConfig) -> Self {
        let store = MarkerStore::new(config.icons.clone(), MarkerStyle::default());
        Self {
            provider: Rc::new(provider),
            inner: Rc::new(RefCell::new(Inner {
                config,
                lifecycle: Lifecycle::new(),
                placement: PlacementMachine::new(),
                store,
            })),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mount the viewer into `container`.
    ///
    /// Resolves once the scene is constructed (or construction failed). Ready
    /// is signalled later by [`SiteViewer::on_tile_progress`]. Failures are
    /// logged and leave the viewer not ready with no scene.
    pub async fn initialize(&self, container: &Container, access_token: &str) {
        let epoch = match self.inner.borrow_mut().lifecycle.begin() {
            Ok(epoch) => epoch,
            Err(phase) => {
                warn!(?phase, "initialize ignored; viewer already mounted");
                return;
            }
        };
        if let Err(err) = self.try_initialize(epoch, container, access_token).await {
            if self.inner.borrow_mut().lifecycle.fail(epoch) {
                error!(error = %err, "viewer initialization failed");
            } else {
                debug!(error = %err, "initialization failed after unmount");
            }
        }
    }

    async fn try_initialize(
        &self,
        epoch: MountEpoch,
        container: &Container,
        access_token: &str,
    ) -> Result<(), ViewerError> {
        container.viewport()?;
        if access_token.trim().is_empty() {
            warn!("empty access token; terrain service may be degraded");
        }

        let terrain = self.provider.load_terrain(access_token).await?;

        let mut inner = self.inner.borrow_mut();
        if !inner.lifecycle.is_current(epoch) {
            info!("viewer unmounted while terrain was loading; skipping scene construction");
            return Ok(());
        }
        let engine = self.provider.create_scene(container, terrain, &inner.config)?;
        inner.lifecycle.attach(epoch, engine);
        Ok(())
    }

    /// Progress observer callback: `pending` tiles still loading.
    pub fn on_tile_progress(&self, pending: usize) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.lifecycle.observe_progress(pending, &inner.config.home_view);
    }

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().lifecycle.is_ready()
    }

    pub fn phase(&self) -> Phase {
        self.inner.borrow().lifecycle.phase()
    }

    /// Arm the one-shot placement listener. A no-op until the viewer is ready.
    pub fn begin_placement(&self, kind: MarkerType, label: &str) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if !inner.lifecycle.is_ready() {
            debug!(%kind, "placement requested before viewer is ready; ignored");
            return;
        }
        let Some(engine) = inner.lifecycle.engine_mut() else {
            return;
        };
        inner.placement.arm(
            engine,
            PlacementRequest {
                kind,
                label: label.to_string(),
            },
        );
    }

    /// Disarm without placing. Returns `true` if placement was armed.
    pub fn cancel_placement(&self) -> bool {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        match inner.lifecycle.engine_mut() {
            Some(engine) => inner.placement.cancel(engine),
            None => false,
        }
    }

    pub fn placement_state(&self) -> PlacementState {
        self.inner.borrow().placement.state()
    }

    /// Left click on the scene at viewport pixel `position`.
    pub fn on_left_click(&self, position: Vec2) -> ClickOutcome {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let Some(engine) = inner.lifecycle.engine_mut() else {
            return ClickOutcome::PassedThrough;
        };
        let Some(request) = inner.placement.take_click(engine) else {
            return ClickOutcome::PassedThrough;
        };

        match resolve(Some(&*engine), inner.config.pick_strategy, position, request.kind) {
            Ok(hit) => {
                let marker = inner
                    .store
                    .add(engine, request.kind, hit.position, Some(request.label.as_str()));
                info!(id = %marker.id, kind = %marker.kind, label = %marker.label, "marker placed");
                ClickOutcome::Placed(marker)
            }
            Err(miss) => {
                warn!(%miss, x = position.x, y = position.y, "placement click missed; no marker created");
                ClickOutcome::Missed(miss)
            }
        }
    }

    /// Remove every marker. Returns how many were removed.
    pub fn clear_markers(&self) -> usize {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let Some(engine) = inner.lifecycle.engine_mut() else {
            return 0;
        };
        inner.store.clear(engine)
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.inner.borrow().store.markers().to_vec()
    }

    /// Run `f` against the live scene, if there is one.
    pub fn with_engine<R>(&self, f: impl FnOnce(&P::Engine) -> R) -> Option<R> {
        self.inner.borrow().lifecycle.engine().map(f)
    }

    /// Full teardown: disarm placement, detach the progress observer and
    /// destroy the scene. An in-flight `initialize` finishes as a no-op.
    pub fn unmount(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if let Some(engine) = inner.lifecycle.engine_mut() {
            inner.placement.cancel(engine);
        }
        inner.store.forget();
        inner.lifecycle.teardown();
    }
}
