use super::{Ecef, Geodetic, Vec3, geodetic_to_ecef};

/// Local East-North-Up frame anchored at a geodetic origin.
///
/// Basis vectors are unit length and expressed in ECEF.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub origin: Ecef,
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

impl EnuFrame {
    pub fn at(origin: Geodetic) -> Self {
        let sin_lat = origin.lat_rad.sin();
        let cos_lat = origin.lat_rad.cos();
        let sin_lon = origin.lon_rad.sin();
        let cos_lon = origin.lon_rad.cos();

        Self {
            origin: geodetic_to_ecef(origin),
            east: Vec3::new(-sin_lon, cos_lon, 0.0),
            north: Vec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
            up: Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }

    /// Rotate a local `(east, north, up)` direction into ECEF.
    pub fn direction_to_ecef(&self, enu: Vec3) -> Vec3 {
        self.east * enu.x + self.north * enu.y + self.up * enu.z
    }
}

#[cfg(test)]
mod tests {
    use super::EnuFrame;
    use crate::math::{Ecef, Geodetic, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn basis_at_equator_prime_meridian() {
        let frame = EnuFrame::at(Geodetic::new(0.0, 0.0, 0.0));
        assert_eq!(frame.east, Vec3::new(-0.0, 1.0, 0.0));
        assert_close(frame.north.z, 1.0, 1e-12);
        assert_close(frame.up.x, 1.0, 1e-12);
    }

    #[test]
    fn direction_projects_back_onto_basis() {
        let frame = EnuFrame::at(Geodetic::new(0.1, -0.2, 35.0));
        let offset = Vec3::new(15.0, -8.0, 2.5);
        let ecef = Ecef::from_vec3(frame.origin.as_vec3() + frame.direction_to_ecef(offset));
        let d = ecef.as_vec3() - frame.origin.as_vec3();
        assert_close(d.dot(frame.east), offset.x, 1e-6);
        assert_close(d.dot(frame.north), offset.y, 1e-6);
        assert_close(d.dot(frame.up), offset.z, 1e-6);
    }
}
