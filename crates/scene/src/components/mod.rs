pub mod billboard;
pub mod label;
pub mod transform;

pub use billboard::*;
pub use label::*;
pub use transform::*;
