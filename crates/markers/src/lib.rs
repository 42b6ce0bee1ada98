pub mod icons;
pub mod kind;
pub mod store;
pub mod style;

pub use icons::*;
pub use kind::*;
pub use store::*;
pub use style::*;
