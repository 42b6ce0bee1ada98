pub mod camera;
pub mod components;
pub mod entity;
pub mod picking;
pub mod terrain;
pub mod world;

pub use world::*;
