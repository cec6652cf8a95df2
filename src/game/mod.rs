// Game layer: entities and the level that simulates them

pub mod entity;
pub mod level;

pub use entity::{Entity, EntityId, EntityTemplate, PhysicsState};
pub use level::{Level, LevelError};
