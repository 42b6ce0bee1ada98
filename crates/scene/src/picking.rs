use foundation::math::{Ecef, Vec3, WGS84_RADII, ecef_to_geodetic};

use crate::terrain::Terrain;

/// Steps used to bracket the first terrain crossing along a ray.
const TERRAIN_MARCH_STEPS: usize = 512;
/// Bisection iterations used to refine a bracketed crossing.
const TERRAIN_REFINE_STEPS: usize = 48;
/// Slack (meters) added around the terrain height range when building shells.
const SHELL_MARGIN_M: f64 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceHit {
    /// World-space hit point (ECEF meters).
    pub point: Vec3,
    /// Distance along the normalized ray.
    pub distance: f64,
}

/// Entry and exit distances of a ray through an origin-centered ellipsoid.
///
/// Returns `None` when the ray misses or the whole intersection lies behind
/// the origin. The entry distance may be negative when the origin is inside.
pub fn ray_ellipsoid_interval(ray: Ray, radii: Vec3) -> Option<(f64, f64)> {
    let dir = ray.dir.normalized()?;
    let inv = Vec3::new(
        1.0 / (radii.x * radii.x),
        1.0 / (radii.y * radii.y),
        1.0 / (radii.z * radii.z),
    );
    let o = ray.origin;

    let a = dir.x * dir.x * inv.x + dir.y * dir.y * inv.y + dir.z * dir.z * inv.z;
    if a.abs() < 1e-30 {
        return None;
    }
    let b = 2.0 * (o.x * dir.x * inv.x + o.y * dir.y * inv.y + o.z * dir.z * inv.z);
    let c = o.x * o.x * inv.x + o.y * o.y * inv.y + o.z * o.z * inv.z - 1.0;

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sdisc = disc.sqrt();
    let t0 = (-b - sdisc) / (2.0 * a);
    let t1 = (-b + sdisc) / (2.0 * a);
    let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    if t1 < 0.0 {
        return None;
    }
    Some((t0, t1))
}

/// Nearest forward intersection of a ray with an origin-centered ellipsoid.
pub fn intersect_ellipsoid(ray: Ray, radii: Vec3) -> Option<SurfaceHit> {
    let dir = ray.dir.normalized()?;
    let (t0, t1) = ray_ellipsoid_interval(ray, radii)?;
    let t = if t0 > 0.0 { t0 } else { t1 };
    if t <= 0.0 {
        return None;
    }
    Some(SurfaceHit {
        point: ray.origin + dir * t,
        distance: t,
    })
}

/// First crossing of a ray with the terrain surface.
///
/// The ray is clipped to the shell between the lowest and highest possible
/// surface heights, marched to bracket the first point that lies at or below
/// the surface, and then refined by bisection.
pub fn intersect_terrain(ray: Ray, terrain: &Terrain) -> Option<SurfaceHit> {
    let dir = ray.dir.normalized()?;
    let ray = Ray::new(ray.origin, dir);
    let (lo, hi) = terrain.height_bounds();

    let outer = inflate(WGS84_RADII, hi + SHELL_MARGIN_M);
    let inner = inflate(WGS84_RADII, lo - SHELL_MARGIN_M);

    let (outer_t0, outer_t1) = ray_ellipsoid_interval(ray, outer)?;
    let t_start = outer_t0.max(0.0);
    let t_end = match ray_ellipsoid_interval(ray, inner) {
        Some((inner_t0, _)) if inner_t0 > t_start => inner_t0,
        _ => outer_t1,
    };
    if !(t_end > t_start) {
        return None;
    }

    let below = |t: f64| {
        let geo = ecef_to_geodetic(Ecef::from_vec3(ray.at(t)));
        geo.alt_m <= terrain.surface_height(geo)
    };

    if below(t_start) {
        return Some(SurfaceHit {
            point: ray.at(t_start),
            distance: t_start,
        });
    }

    let step = (t_end - t_start) / TERRAIN_MARCH_STEPS as f64;
    let mut prev = t_start;
    for i in 1..=TERRAIN_MARCH_STEPS {
        let t = t_start + step * i as f64;
        if below(t) {
            let (mut above_t, mut below_t) = (prev, t);
            for _ in 0..TERRAIN_REFINE_STEPS {
                let mid = 0.5 * (above_t + below_t);
                if below(mid) {
                    below_t = mid;
                } else {
                    above_t = mid;
                }
            }
            return Some(SurfaceHit {
                point: ray.at(below_t),
                distance: below_t,
            });
        }
        prev = t;
    }
    None
}

fn inflate(radii: Vec3, by_m: f64) -> Vec3 {
    Vec3::new(radii.x + by_m, radii.y + by_m, radii.z + by_m)
}
