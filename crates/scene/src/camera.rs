//! Perspective camera placed in ECEF space.
//!
//! Orientation follows the usual globe-viewer convention: heading is measured
//! clockwise from north, pitch is positive above the local horizon, and both
//! are relative to the East-North-Up frame at the camera position.

use foundation::math::{EnuFrame, Geodetic, Vec2, Vec3, WGS84_A, geodetic_to_ecef};

use crate::picking::Ray;

/// Default vertical field of view (radians).
pub const DEFAULT_FOV_Y_RAD: f64 = std::f64::consts::FRAC_PI_3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width >= 1.0 && self.height >= 1.0)
    }

    pub fn contains(&self, px: Vec2) -> bool {
        px.x >= 0.0 && px.y >= 0.0 && px.x <= self.width && px.y <= self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct HeadingPitchRoll {
    pub heading_rad: f64,
    pub pitch_rad: f64,
    pub roll_rad: f64,
}

impl HeadingPitchRoll {
    pub fn new(heading_rad: f64, pitch_rad: f64, roll_rad: f64) -> Self {
        Self {
            heading_rad,
            pitch_rad,
            roll_rad,
        }
    }

    pub fn from_degrees(heading_deg: f64, pitch_deg: f64, roll_deg: f64) -> Self {
        Self::new(
            heading_deg.to_radians(),
            pitch_deg.to_radians(),
            roll_deg.to_radians(),
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub fov_y_rad: f64,
    pub viewport: Viewport,
}

impl Camera {
    /// Camera looking straight down at (0°, 0°) from two Earth radii up.
    pub fn new(viewport: Viewport) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            direction: Vec3::new(-1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 0.0, 1.0),
            right: Vec3::new(0.0, 1.0, 0.0),
            fov_y_rad: DEFAULT_FOV_Y_RAD,
            viewport,
        };
        camera.set_view(
            Geodetic::new(0.0, 0.0, 2.0 * WGS84_A),
            HeadingPitchRoll::from_degrees(0.0, -90.0, 0.0),
        );
        camera
    }

    /// Fly instantly to `destination` with the given local orientation.
    pub fn set_view(&mut self, destination: Geodetic, orientation: HeadingPitchRoll) {
        let frame = EnuFrame::at(destination);
        let (sh, ch) = orientation.heading_rad.sin_cos();
        let (sp, cp) = orientation.pitch_rad.sin_cos();
        let (sr, cr) = orientation.roll_rad.sin_cos();

        let forward = Vec3::new(sh * cp, ch * cp, sp);
        let right = Vec3::new(ch, -sh, 0.0);
        let up = right.cross(forward);

        // Roll spins right/up about the forward axis.
        let rolled_right = right * cr + up * sr;
        let rolled_up = up * cr - right * sr;

        self.position = geodetic_to_ecef(destination).as_vec3();
        self.direction = frame.direction_to_ecef(forward);
        self.right = frame.direction_to_ecef(rolled_right);
        self.up = frame.direction_to_ecef(rolled_up);
    }

    /// Primary ray through a pixel (origin top-left, y down).
    ///
    /// Returns `None` for pixels outside the viewport or a degenerate viewport.
    pub fn ray_for_pixel(&self, px: Vec2) -> Option<Ray> {
        if self.viewport.is_empty() || !self.viewport.contains(px) {
            return None;
        }
        let aspect = self.viewport.width / self.viewport.height;
        let tan = (0.5 * self.fov_y_rad).tan();

        let ndc_x = 2.0 * (px.x / self.viewport.width) - 1.0;
        let ndc_y = 1.0 - 2.0 * (px.y / self.viewport.height);

        let dir = self.direction + self.right * (ndc_x * tan * aspect) + self.up * (ndc_y * tan);
        Some(Ray::new(self.position, dir.normalized()?))
    }
}
