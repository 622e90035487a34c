mod character;
mod effects;
mod physics;

pub use character::*;
pub use effects::*;
pub use physics::*;
