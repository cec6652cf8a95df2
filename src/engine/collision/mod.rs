// Pixel-mask collision detection
//
// Colliders register an image-sized mask with a `CollisionWorld`. Checking a
// collider compares it against every other registered collider, first by
// bounding box and then pixel by pixel, and queues a `CollisionInfo` for each
// non-static side of every overlapping pair.

mod detect;
pub mod mask;
pub mod vertices;
mod world;

pub use mask::{Mask, Rgba};
pub use vertices::{get_normal, get_vertices, outlined_rect, VertexColors};
pub use world::{Collider, ColliderHandle, CollisionWorld};

use crate::core::{Rect, Size};
use glam::Vec2;

/// Result of one collider overlapping another, from the receiving side's view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// The collider that was hit
    pub other: ColliderHandle,
    /// Contact point in world space
    pub point: Vec2,
    /// Displacement that separates the receiver from `other`
    pub correction: Vec2,
    /// Surface normal of `other` at `point`, unit length or zero
    pub normal: Vec2,
}

/// Collision setup and lookup errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollisionError {
    #[error("Mask has {len} pixels but its size is {size}")]
    MaskSizeMismatch { len: usize, size: Size },

    #[error("Region {region} does not fit in a {size} mask")]
    RegionOutOfBounds { region: Rect, size: Size },

    #[error("Could not find the starting pixel")]
    MissingStartPixel,

    #[error("Found more than one starting pixel: ({first_x}, {first_y}) and ({second_x}, {second_y})")]
    DuplicateStartPixel {
        first_x: u32,
        first_y: u32,
        second_x: u32,
        second_y: u32,
    },

    #[error("Collider {0:?} is not registered with this collision world")]
    UnknownCollider(ColliderHandle),
}
