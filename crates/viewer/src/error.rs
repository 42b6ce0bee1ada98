use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("terrain dataset unavailable: {0}")]
    TerrainUnavailable(String),
    #[error("scene construction failed: {0}")]
    SceneConstruction(String),
    #[error("no container element supplied")]
    MissingContainer,
    #[error("container {id:?} has no drawable area ({width}x{height})")]
    EmptyContainer { id: String, width: f64, height: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
