// Entity records: a collider plus optional physics

use glam::Vec2;

use crate::engine::collision::{ColliderHandle, Collider};
use crate::engine::physics::{PhysicsBody, PhysicsIntegrator};

/// Unique identifier for an entity within a level
pub type EntityId = u32;

/// Physics capability of an entity
#[derive(Debug, Clone)]
pub struct PhysicsState {
    /// Requested movement in, contact flags out
    pub body: PhysicsBody,
    /// Drives the entity's collider every tick
    pub integrator: PhysicsIntegrator,
}

/// Anything placed in a level
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Display name, not required to be unique
    pub name: String,
    /// The entity's collider in the level's collision world
    pub collider: ColliderHandle,
    /// Present for entities that move under physics
    pub physics: Option<PhysicsState>,
}

impl Entity {
    pub fn has_physics(&self) -> bool {
        self.physics.is_some()
    }

    pub fn body(&self) -> Option<&PhysicsBody> {
        self.physics.as_ref().map(|physics| &physics.body)
    }

    pub fn body_mut(&mut self) -> Option<&mut PhysicsBody> {
        self.physics.as_mut().map(|physics| &mut physics.body)
    }
}

/// Everything needed to spawn an entity
#[derive(Debug, Clone)]
pub struct EntityTemplate {
    pub name: String,
    pub collider: Collider,
    /// Spawns a physics integrator when set
    pub body: Option<PhysicsBody>,
}

impl EntityTemplate {
    /// Template for an entity without physics
    pub fn new(name: &str, collider: Collider) -> Self {
        Self {
            name: name.to_string(),
            collider,
            body: None,
        }
    }

    /// Attach a physics body
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Move the spawn point
    pub fn at(mut self, position: Vec2) -> Self {
        self.collider.position = position;
        self
    }
}

/// Templates for the game's entities
pub mod presets {
    use super::*;
    use crate::core::Size;
    use crate::engine::collision::{
        get_vertices, outlined_rect, CollisionError, Mask, Rgba, VertexColors,
    };
    use crate::engine::physics::body::presets as bodies;

    /// Knight hitbox
    pub const KNIGHT_SIZE: Size = Size::new(32, 48);

    /// Snail hitbox
    pub const SNAIL_SIZE: Size = Size::new(32, 24);

    /// Thrown rock hitbox
    pub const ROCK_SIZE: Size = Size::new(8, 8);

    /// Walking speed of the knight in pixels per tick
    pub const KNIGHT_WALK_SPEED: f32 = 4.0;

    /// Marker colors used by environment art
    pub const ENVIRONMENT_COLORS: VertexColors = VertexColors {
        start: Rgba::rgb(255, 0, 0),
        include: Rgba::rgb(0, 255, 0),
        exclude: Rgba::rgb(0, 0, 255),
    };

    /// The player character
    pub fn knight(position: Vec2) -> EntityTemplate {
        let collider = Collider::new(position, Mask::filled(KNIGHT_SIZE, Rgba::WHITE));
        EntityTemplate::new("knight", collider).with_body(bodies::knight_body())
    }

    /// Walking enemy
    pub fn snail(position: Vec2) -> EntityTemplate {
        let collider = Collider::new(position, Mask::filled(SNAIL_SIZE, Rgba::WHITE));
        EntityTemplate::new("snail", collider).with_body(bodies::snail_body())
    }

    /// Projectile flying in a straight line
    pub fn rock(position: Vec2, movement: Vec2) -> EntityTemplate {
        let collider = Collider::new(position, Mask::filled(ROCK_SIZE, Rgba::WHITE));
        EntityTemplate::new("rock", collider).with_body(bodies::rock_body(movement))
    }

    /// Static rectangular block with an outline, for floors and walls
    pub fn block(position: Vec2, size: Size) -> Result<EntityTemplate, CollisionError> {
        let mask = outlined_rect(size, ENVIRONMENT_COLORS);
        let vertices = get_vertices(&mask, ENVIRONMENT_COLORS)?;
        let collider = Collider::new(position, mask)
            .with_static(true)
            .with_vertices(vertices);
        Ok(EntityTemplate::new("block", collider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Size;

    #[test]
    fn test_knight_preset() {
        let template = presets::knight(Vec2::new(10.0, 20.0));
        assert_eq!(template.name, "knight");
        assert_eq!(template.collider.size(), Size::new(32, 48));
        assert_eq!(template.collider.position, Vec2::new(10.0, 20.0));
        assert!(!template.collider.is_static);
        assert!(template.body.is_some());
    }

    #[test]
    fn test_block_preset() {
        let template = presets::block(Vec2::ZERO, Size::new(16, 8)).unwrap();
        assert!(template.collider.is_static);
        assert!(template.body.is_none());
        // Every border pixel is an outline vertex
        assert_eq!(template.collider.vertices().len(), 2 * 16 + 2 * 8 - 4);
    }

    #[test]
    fn test_template_builder() {
        let template = presets::rock(Vec2::ZERO, Vec2::new(6.0, 0.0)).at(Vec2::new(3.0, 4.0));
        assert_eq!(template.collider.position, Vec2::new(3.0, 4.0));
        assert_eq!(template.body.unwrap().movement, Vec2::new(6.0, 0.0));
    }
}
