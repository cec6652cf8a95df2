// Platformer physics on top of pixel-mask collisions
//
// Every physics-enabled entity owns a `PhysicsIntegrator`, which runs fixed
// ticks against the shared `CollisionWorld` and reports contacts back as
// `PhysicsEvent`s.

pub mod body;
pub mod config;
mod integrator;
mod synthesis;

pub use body::PhysicsBody;
pub use config::{PhysicsConfig, BASE_CONFIG};
pub use integrator::{classify_surface, PhysicsEvent, PhysicsIntegrator, Surface};
pub use synthesis::{synthesize, Synthesis};

use crate::engine::collision::CollisionError;

/// Errors raised while stepping physics
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),
}
