use foundation::math::{Ecef, Vec2, Vec3, WGS84_RADII, clamp_to_surface};
use markers::MarkerType;
use scene::picking::intersect_ellipsoid;
use thiserror::Error;
use tracing::debug;

use crate::config::PickStrategy;
use crate::engine::SceneEngine;

/// Why a click produced no world position.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolveMiss {
    #[error("viewer is not ready")]
    NotReady,
    #[error("pointer is outside the viewport")]
    NoRay,
    #[error("no ground geometry under the pointer")]
    NoGeometry,
    #[error("marker needs terrain height but depth picking is unavailable")]
    DepthUnavailable,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickMethod {
    Depth,
    Ellipsoid,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Resolution {
    /// World-space position (ECEF meters).
    pub position: Vec3,
    pub method: PickMethod,
}

/// Pick method a strategy settles on for a given scene and marker type.
pub fn pick_method<E: SceneEngine + ?Sized>(
    engine: &E,
    strategy: PickStrategy,
    kind: MarkerType,
) -> Result<PickMethod, ResolveMiss> {
    let depth = engine.depth_pick_supported();
    let method = match strategy {
        PickStrategy::Auto if depth => PickMethod::Depth,
        PickStrategy::Auto => PickMethod::Ellipsoid,
        PickStrategy::DepthPick if depth => PickMethod::Depth,
        PickStrategy::DepthPick => return Err(ResolveMiss::DepthUnavailable),
        PickStrategy::Ellipsoid => PickMethod::Ellipsoid,
    };
    if method == PickMethod::Ellipsoid && kind.requires_terrain_height() {
        return Err(ResolveMiss::DepthUnavailable);
    }
    Ok(method)
}

/// Convert a viewport pixel into a world position on the ground.
///
/// `None` for the engine means the viewer has no live scene.
pub fn resolve<E: SceneEngine + ?Sized>(
    engine: Option<&E>,
    strategy: PickStrategy,
    px: Vec2,
    kind: MarkerType,
) -> Result<Resolution, ResolveMiss> {
    let engine = engine.ok_or(ResolveMiss::NotReady)?;
    let method = pick_method(engine, strategy, kind)?;
    let ray = engine.camera_ray(px).ok_or(ResolveMiss::NoRay)?;

    let position = match method {
        PickMethod::Depth => engine.pick_depth(ray),
        PickMethod::Ellipsoid => intersect_ellipsoid(ray, WGS84_RADII)
            .map(|hit| clamp_to_surface(Ecef::from_vec3(hit.point)).as_vec3()),
    }
    .filter(|p| p.is_finite())
    .ok_or(ResolveMiss::NoGeometry)?;

    debug!(?method, x = px.x, y = px.y, "click resolved");
    Ok(Resolution { position, method })
}

#[cfg(test)]
mod tests {
    use super::{PickMethod, ResolveMiss, resolve};
    use crate::config::{PickStrategy, ViewerConfig};
    use crate::engine::{Container, SceneEngine, SceneProvider};
    use crate::headless::{HeadlessProvider, HeadlessScene};
    use foundation::math::{Ecef, Geodetic, Vec2, ecef_to_geodetic};
    use markers::MarkerType;
    use scene::camera::HeadingPitchRoll;
    use scene::terrain::{Heightfield, Terrain};

    fn site_scene(terrain: Terrain, pitch_deg: f64) -> HeadlessScene {
        let provider = HeadlessProvider::new(terrain.clone());
        let mut scene = provider
            .create_scene(
                &Container::new("globe", 1280.0, 720.0),
                terrain,
                &ViewerConfig::default(),
            )
            .expect("scene");
        scene.set_view(
            Geodetic::from_degrees(-118.2437, 34.0522, 500.0),
            HeadingPitchRoll::from_degrees(0.0, pitch_deg, 0.0),
        );
        scene
    }

    fn hills() -> Terrain {
        Terrain::with_heightfield(Heightfield::flat([-118.5, 33.8, -118.0, 34.3], 120.0))
    }

    fn height_of(position: foundation::math::Vec3) -> f64 {
        ecef_to_geodetic(Ecef::from_vec3(position)).alt_m
    }

    #[test]
    fn missing_scene_is_not_ready() {
        let miss = resolve::<HeadlessScene>(
            None,
            PickStrategy::Auto,
            Vec2::new(10.0, 10.0),
            MarkerType::Building,
        );
        assert_eq!(miss, Err(ResolveMiss::NotReady));
    }

    #[test]
    fn auto_prefers_depth_pick_on_terrain() {
        let scene = site_scene(hills(), -30.0);
        let center = scene.camera().viewport.center();
        let hit = resolve(Some(&scene), PickStrategy::Auto, center, MarkerType::Measurement)
            .expect("hit");
        assert_eq!(hit.method, PickMethod::Depth);
        assert!((height_of(hit.position) - 120.0).abs() < 0.5);
    }

    #[test]
    fn ellipsoid_hits_are_clamped_to_zero_height() {
        let scene = site_scene(hills(), -30.0);
        let center = scene.camera().viewport.center();
        let hit = resolve(Some(&scene), PickStrategy::Ellipsoid, center, MarkerType::Road)
            .expect("hit");
        assert_eq!(hit.method, PickMethod::Ellipsoid);
        assert!(height_of(hit.position).abs() < 1e-3);
    }

    #[test]
    fn auto_falls_back_to_ellipsoid_without_depth() {
        let scene = site_scene(Terrain::ellipsoid(), -30.0);
        let center = scene.camera().viewport.center();
        let hit = resolve(Some(&scene), PickStrategy::Auto, center, MarkerType::Utility)
            .expect("hit");
        assert_eq!(hit.method, PickMethod::Ellipsoid);
    }

    #[test]
    fn measurement_needs_depth() {
        let scene = site_scene(Terrain::ellipsoid(), -30.0);
        let center = scene.camera().viewport.center();
        assert_eq!(
            resolve(Some(&scene), PickStrategy::Auto, center, MarkerType::Measurement),
            Err(ResolveMiss::DepthUnavailable)
        );
        assert_eq!(
            resolve(Some(&scene), PickStrategy::DepthPick, center, MarkerType::Road),
            Err(ResolveMiss::DepthUnavailable)
        );
    }

    #[test]
    fn sky_and_offscreen_clicks_miss() {
        let scene = site_scene(hills(), -10.0);
        for strategy in [PickStrategy::Auto, PickStrategy::Ellipsoid] {
            assert_eq!(
                resolve(Some(&scene), strategy, Vec2::new(640.0, 100.0), MarkerType::Road),
                Err(ResolveMiss::NoGeometry)
            );
        }
        assert_eq!(
            resolve(
                Some(&scene),
                PickStrategy::Auto,
                Vec2::new(-5.0, 100.0),
                MarkerType::Road
            ),
            Err(ResolveMiss::NoRay)
        );
    }
}
