use std::path::Path;

use foundation::math::Geodetic;
use markers::IconTable;
use scene::camera::HeadingPitchRoll;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ViewerError;

/// Environment variable consulted by [`ViewerConfig::from_env`].
pub const ACCESS_TOKEN_ENV: &str = "SITE_VIEWER_ACCESS_TOKEN";

/// How a screen click is turned into a world position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickStrategy {
    /// Depth pick when the scene has terrain depth, ellipsoid otherwise.
    #[default]
    Auto,
    /// Always depth pick; clicks miss when the scene has no depth.
    #[serde(rename = "depth")]
    DepthPick,
    /// Always intersect the reference ellipsoid.
    Ellipsoid,
}

impl std::str::FromStr for PickStrategy {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PickStrategy::Auto),
            "depth" => Ok(PickStrategy::DepthPick),
            "ellipsoid" => Ok(PickStrategy::Ellipsoid),
            other => Err(ViewerError::InvalidConfig(format!(
                "unknown pick strategy {other:?} (expected auto, depth or ellipsoid)"
            ))),
        }
    }
}

/// Camera viewpoint applied once the terrain finishes its initial load.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeView {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub height_m: f64,
    pub heading_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            lon_deg: -118.2437,
            lat_deg: 34.0522,
            height_m: 500.0,
            heading_deg: 0.0,
            pitch_deg: -30.0,
            roll_deg: 0.0,
        }
    }
}

impl HomeView {
    pub fn destination(&self) -> Geodetic {
        Geodetic::from_degrees(self.lon_deg, self.lat_deg, self.height_m)
    }

    pub fn orientation(&self) -> HeadingPitchRoll {
        HeadingPitchRoll::from_degrees(self.heading_deg, self.pitch_deg, self.roll_deg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Token for the terrain service. May be empty.
    pub access_token: String,
    pub home_view: HomeView,
    pub pick_strategy: PickStrategy,
    pub icons: IconTable,
    pub target_frame_rate: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            home_view: HomeView::default(),
            pick_strategy: PickStrategy::Auto,
            icons: IconTable::default(),
            target_frame_rate: 60,
        }
    }
}

impl ViewerConfig {
    /// Defaults with the access token taken from the environment.
    pub fn from_env() -> Self {
        let access_token = std::env::var(ACCESS_TOKEN_ENV).unwrap_or_default();
        if access_token.is_empty() {
            warn!(var = ACCESS_TOKEN_ENV, "no access token in environment");
        }
        Self {
            access_token,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ViewerError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ViewerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        let view = &self.home_view;
        let fields = [
            ("home_view.lon_deg", view.lon_deg),
            ("home_view.lat_deg", view.lat_deg),
            ("home_view.height_m", view.height_m),
            ("home_view.heading_deg", view.heading_deg),
            ("home_view.pitch_deg", view.pitch_deg),
            ("home_view.roll_deg", view.roll_deg),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ViewerError::InvalidConfig(format!("{name} must be finite")));
        }
        if !(-90.0..=90.0).contains(&view.lat_deg) {
            return Err(ViewerError::InvalidConfig(format!(
                "home_view.lat_deg {} outside [-90, 90]",
                view.lat_deg
            )));
        }
        if !(-90.0..=90.0).contains(&view.pitch_deg) {
            return Err(ViewerError::InvalidConfig(format!(
                "home_view.pitch_deg {} outside [-90, 90]",
                view.pitch_deg
            )));
        }
        if self.target_frame_rate == 0 {
            return Err(ViewerError::InvalidConfig(
                "target_frame_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
