pub mod event_bus;
pub mod latch;
pub mod listeners;

pub use event_bus::*;
pub use latch::*;
pub use listeners::*;
