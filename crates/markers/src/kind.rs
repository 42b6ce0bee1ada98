use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a placed site marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    Building,
    Road,
    Utility,
    Measurement,
}

impl MarkerType {
    pub const ALL: [MarkerType; 4] = [
        MarkerType::Building,
        MarkerType::Road,
        MarkerType::Utility,
        MarkerType::Measurement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerType::Building => "building",
            MarkerType::Road => "road",
            MarkerType::Utility => "utility",
            MarkerType::Measurement => "measurement",
        }
    }

    /// Whether a marker of this type needs the true terrain height under the
    /// cursor, rather than a point on the bare reference ellipsoid.
    pub fn requires_terrain_height(&self) -> bool {
        matches!(self, MarkerType::Measurement)
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown marker type: {0:?}")]
pub struct UnknownMarkerType(pub String);

impl std::str::FromStr for MarkerType {
    type Err = UnknownMarkerType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        MarkerType::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownMarkerType(s.to_string()))
    }
}
