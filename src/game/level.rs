// Level: owns the collision world and every entity simulated in it

use glam::Vec2;

use super::entity::{Entity, EntityId, EntityTemplate, PhysicsState};
use crate::core::{Rect, Size};
use crate::engine::collision::{
    get_vertices, Collider, ColliderHandle, CollisionError, CollisionWorld, Mask, VertexColors,
};
use crate::engine::physics::{PhysicsConfig, PhysicsError, PhysicsEvent, PhysicsIntegrator};

/// Level setup and simulation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("Level mask {mask} is not a whole number of {grid} tiles")]
    GridMismatch { mask: Size, grid: Size },

    #[error("Entity not found: {0}")]
    UnknownEntity(EntityId),

    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}

/// A collision world and the entities living in it
#[derive(Debug, Default)]
pub struct Level {
    collision: CollisionWorld,
    entities: Vec<Entity>,
    pending_despawn: Vec<EntityId>,
    next_id: EntityId,
    config: PhysicsConfig,
}

impl Level {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            collision: CollisionWorld::new(),
            entities: Vec::new(),
            pending_despawn: Vec::new(),
            next_id: 0,
            config,
        }
    }

    /// Register the template's collider and, if it has a body, its integrator
    pub fn spawn(&mut self, template: EntityTemplate) -> Result<EntityId, LevelError> {
        let EntityTemplate {
            name,
            collider,
            body,
        } = template;

        let handle = self.collision.insert(collider);
        let physics = match body {
            Some(body) => {
                let integrator =
                    PhysicsIntegrator::new(handle, &self.collision, self.config.clone())?;
                Some(PhysicsState { body, integrator })
            }
            None => None,
        };

        let id = self.next_id;
        self.next_id += 1;

        log::debug!("Spawned entity {} ({}) with collider {:?}", id, name, handle);
        self.entities.push(Entity {
            id,
            name,
            collider: handle,
            physics,
        });
        Ok(id)
    }

    /// Schedule removal at the start of the next update.
    ///
    /// Returns false if the entity doesn't exist.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if !self.pending_despawn.contains(&id) {
            self.pending_despawn.push(id);
        }
        true
    }

    fn apply_despawns(&mut self) {
        for id in std::mem::take(&mut self.pending_despawn) {
            if let Some(index) = self.entities.iter().position(|entity| entity.id == id) {
                let entity = self.entities.remove(index);
                self.collision.remove(entity.collider);
                log::debug!("Despawned entity {} ({})", id, entity.name);
            }
        }
    }

    /// Advance every physics entity by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) -> Result<(), LevelError> {
        self.apply_despawns();

        for entity in &mut self.entities {
            if let Some(physics) = &mut entity.physics {
                physics
                    .integrator
                    .update(&mut physics.body, &mut self.collision, dt)?;
            }
        }
        Ok(())
    }

    /// Slice a level-sized mask into `grid` tiles and spawn a static wall for
    /// every tile with an opaque pixel. Returns the spawned ids, row by row.
    pub fn load_environment(
        &mut self,
        mask: &Mask,
        grid: Size,
        colors: VertexColors,
    ) -> Result<Vec<EntityId>, LevelError> {
        let size = mask.size();
        if grid.area() == 0 || size.width % grid.width != 0 || size.height % grid.height != 0 {
            return Err(LevelError::GridMismatch { mask: size, grid });
        }

        let columns = size.width / grid.width;
        let rows = size.height / grid.height;

        // Build every tile before spawning so a bad tile leaves the level untouched
        let mut walls = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let x = (column * grid.width) as i32;
                let y = (row * grid.height) as i32;
                let tile = mask.sub_mask(Rect::new(x, y, grid.width as i32, grid.height as i32))?;
                if !tile.any_opaque() {
                    continue;
                }
                let vertices = get_vertices(&tile, colors)?;
                let collider = Collider::new(Vec2::new(x as f32, y as f32), tile)
                    .with_static(true)
                    .with_vertices(vertices);
                walls.push(EntityTemplate::new("wall", collider));
            }
        }

        let ids = walls
            .into_iter()
            .map(|wall| self.spawn(wall))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Loaded environment: {} walls from {} {} tiles",
            ids.len(),
            columns * rows,
            grid
        );
        Ok(ids)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Find the entity owning a collider, e.g. the `other` of an event
    pub fn entity_for_collider(&self, handle: ColliderHandle) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.collider == handle)
    }

    /// Current position of an entity's collider
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        let entity = self.get(id)?;
        self.collision
            .get(entity.collider)
            .map(|collider| collider.position)
    }

    /// Teleport an entity
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> Result<(), LevelError> {
        let handle = self.get(id).ok_or(LevelError::UnknownEntity(id))?.collider;
        self.collision.expect_collider_mut(handle)?.position = position;
        Ok(())
    }

    /// Take every pending physics event of an entity, oldest first
    pub fn drain_events(&mut self, id: EntityId) -> Vec<PhysicsEvent> {
        self.get_mut(id)
            .and_then(|entity| entity.physics.as_mut())
            .map(|physics| physics.integrator.drain_events())
            .unwrap_or_default()
    }

    /// All entities, in spawn order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    pub fn collision_mut(&mut self) -> &mut CollisionWorld {
        &mut self.collision
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}
