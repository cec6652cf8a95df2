// Geometry primitives shared by the collision and physics engines

pub mod math;
pub mod rect;

pub use rect::{Rect, Size};
