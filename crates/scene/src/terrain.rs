use foundation::math::Geodetic;

/// Regular grid of terrain heights over a longitude/latitude rectangle.
///
/// Samples are row-major starting at the south-west corner; rows run north.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    pub west_deg: f64,
    pub south_deg: f64,
    pub east_deg: f64,
    pub north_deg: f64,
    pub cols: usize,
    pub rows: usize,
    pub heights_m: Vec<f32>,
}

impl Heightfield {
    /// Build a heightfield by sampling `f(lon_deg, lat_deg)` at every grid node.
    pub fn from_fn(
        bounds_deg: [f64; 4],
        cols: usize,
        rows: usize,
        mut f: impl FnMut(f64, f64) -> f32,
    ) -> Self {
        let [west_deg, south_deg, east_deg, north_deg] = bounds_deg;
        let cols = cols.max(2);
        let rows = rows.max(2);
        let mut heights_m = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            let lat = south_deg + (north_deg - south_deg) * r as f64 / (rows - 1) as f64;
            for c in 0..cols {
                let lon = west_deg + (east_deg - west_deg) * c as f64 / (cols - 1) as f64;
                heights_m.push(f(lon, lat));
            }
        }
        Self {
            west_deg,
            south_deg,
            east_deg,
            north_deg,
            cols,
            rows,
            heights_m,
        }
    }

    /// Constant-height heightfield.
    pub fn flat(bounds_deg: [f64; 4], height_m: f32) -> Self {
        Self::from_fn(bounds_deg, 2, 2, |_, _| height_m)
    }

    pub fn covers(&self, lon_deg: f64, lat_deg: f64) -> bool {
        lon_deg >= self.west_deg
            && lon_deg <= self.east_deg
            && lat_deg >= self.south_deg
            && lat_deg <= self.north_deg
    }

    /// Bilinearly interpolated height, or `None` outside the covered rectangle.
    ///
    /// Grids with fewer than two samples along either axis have no cell to
    /// interpolate in and report no height anywhere.
    pub fn height_at(&self, lon_deg: f64, lat_deg: f64) -> Option<f64> {
        if self.cols < 2
            || self.rows < 2
            || !self.covers(lon_deg, lat_deg)
            || self.heights_m.len() < self.cols * self.rows
        {
            return None;
        }
        let span_x = (self.east_deg - self.west_deg).max(f64::EPSILON);
        let span_y = (self.north_deg - self.south_deg).max(f64::EPSILON);
        let fx = (lon_deg - self.west_deg) / span_x * (self.cols - 1) as f64;
        let fy = (lat_deg - self.south_deg) / span_y * (self.rows - 1) as f64;

        let x0 = (fx.floor() as usize).min(self.cols - 2);
        let y0 = (fy.floor() as usize).min(self.rows - 2);
        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let h = |x: usize, y: usize| self.heights_m[y * self.cols + x] as f64;
        let south = h(x0, y0) * (1.0 - tx) + h(x0 + 1, y0) * tx;
        let north = h(x0, y0 + 1) * (1.0 - tx) + h(x0 + 1, y0 + 1) * tx;
        Some(south * (1.0 - ty) + north * ty)
    }

    pub fn height_range(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for h in &self.heights_m {
            lo = lo.min(*h as f64);
            hi = hi.max(*h as f64);
        }
        if lo > hi { (0.0, 0.0) } else { (lo, hi) }
    }
}

/// Terrain dataset backing a scene.
///
/// Without a heightfield the globe is the bare reference ellipsoid and the
/// scene has no depth information to pick against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Terrain {
    pub heightfield: Option<Heightfield>,
}

impl Terrain {
    pub fn ellipsoid() -> Self {
        Self { heightfield: None }
    }

    pub fn with_heightfield(heightfield: Heightfield) -> Self {
        Self {
            heightfield: Some(heightfield),
        }
    }

    pub fn has_depth(&self) -> bool {
        self.heightfield.is_some()
    }

    /// Surface height at a position; zero outside the heightfield.
    pub fn surface_height(&self, geo: Geodetic) -> f64 {
        self.heightfield
            .as_ref()
            .and_then(|hf| hf.height_at(geo.lon_deg(), geo.lat_deg()))
            .unwrap_or(0.0)
    }

    /// `(min, max)` surface height over the whole dataset, including the
    /// zero-height ellipsoid outside the heightfield.
    pub fn height_bounds(&self) -> (f64, f64) {
        match &self.heightfield {
            Some(hf) => {
                let (lo, hi) = hf.height_range();
                (lo.min(0.0), hi.max(0.0))
            }
            None => (0.0, 0.0),
        }
    }
}
