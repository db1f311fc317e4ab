pub mod gesture;
pub mod transform;

pub use gesture::{Gesture, PointerSet};
pub use transform::{Transform, Vec2, MAX_SCALE, MIN_SCALE};
