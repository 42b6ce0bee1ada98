pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod headless;
pub mod lifecycle;
pub mod placement;
pub mod resolver;
pub mod site_viewer;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use handle::*;
pub use lifecycle::*;
pub use placement::*;
pub use resolver::*;
pub use site_viewer::*;
