use glam::Vec2;

/// Physics-facing state of one entity
///
/// The owner writes the requested `movement`, `gravity`, `max_gravspeed` and
/// `physics_applied`; the integrator writes back `grounded`, `walled`,
/// `velocity` and `normal_speed`. Units are pixels and ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Requested movement per tick. Negative y is a jump (against gravity),
    /// x runs along the ground
    pub movement: Vec2,
    /// Acceleration per tick
    pub gravity: Vec2,
    /// Terminal falling speed
    pub max_gravspeed: f32,
    /// Pauses the integrator's clock while false
    pub physics_applied: bool,

    /// Standing on something (integrator output)
    pub grounded: bool,
    /// Pressed against a wall (integrator output)
    pub walled: bool,
    /// Displacement applied on the last tick (integrator output)
    pub velocity: Vec2,
    /// Velocity along "up"; positive while rising (integrator output)
    pub normal_speed: f32,
}

impl PhysicsBody {
    /// Body falling with `gravity` and capped at `max_gravspeed`
    pub fn new(gravity: Vec2, max_gravspeed: f32) -> Self {
        Self {
            movement: Vec2::ZERO,
            gravity,
            max_gravspeed,
            physics_applied: true,
            grounded: false,
            walled: false,
            velocity: Vec2::ZERO,
            normal_speed: 0.0,
        }
    }

    /// Set the requested movement
    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    /// Set whether physics runs at all
    pub fn with_physics_applied(mut self, applied: bool) -> Self {
        self.physics_applied = applied;
        self
    }

    /// Moving against gravity on the last tick
    pub fn rising(&self) -> bool {
        self.normal_speed > 0.0
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        presets::knight_body()
    }
}

/// Common body configurations for game objects
pub mod presets {
    use super::*;

    /// Standard downward gravity, one pixel per tick squared
    pub const GRAVITY: Vec2 = Vec2::new(0.0, 1.0);

    /// Terminal speed for walking characters
    pub const MAX_GRAVSPEED: f32 = 8.0;

    /// Jump speed of the player character
    pub const JUMP_SPEED: f32 = 13.0;

    /// Player character: standard gravity and terminal speed
    pub fn knight_body() -> PhysicsBody {
        PhysicsBody::new(GRAVITY, MAX_GRAVSPEED)
    }

    /// Walking enemy, same physics as the player
    pub fn snail_body() -> PhysicsBody {
        PhysicsBody::new(GRAVITY, MAX_GRAVSPEED)
    }

    /// Thrown rock: no gravity, flies in a straight line
    pub fn rock_body(movement: Vec2) -> PhysicsBody {
        PhysicsBody::new(Vec2::ZERO, MAX_GRAVSPEED).with_movement(movement)
    }
}
