// Per-entity physics: fixed ticks of gravity, movement and collision response

use std::collections::VecDeque;

use glam::Vec2;

use super::body::PhysicsBody;
use super::config::PhysicsConfig;
use super::synthesis::{synthesize, Synthesis};
use super::PhysicsError;
use crate::core::math::perpendicular;
use crate::engine::collision::{ColliderHandle, CollisionInfo, CollisionWorld};
use crate::engine::game_loop::FixedTimestep;

/// A contact reported to the entity that owns an integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsEvent {
    /// The collider that was touched
    pub other: ColliderHandle,
    /// True when this entity's own tick found the contact, false when another
    /// entity ran into it
    pub self_collided: bool,
    /// Contact point in world space
    pub point: Vec2,
    /// Surface normal of `other` at `point`
    pub normal: Vec2,
}

impl PhysicsEvent {
    fn external(info: CollisionInfo) -> Self {
        Self {
            other: info.other,
            self_collided: false,
            point: info.point,
            normal: info.normal,
        }
    }
}

/// How a contact surface is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Walkable: movement follows it and falling stops
    Ground,
    /// Too steep to stand on: horizontal movement stops
    Wall,
}

/// Classify a contact by how closely its normal points "up"
pub fn classify_surface(up: Vec2, normal: Vec2, slope_threshold: f32) -> Surface {
    if up.dot(normal) > slope_threshold {
        Surface::Ground
    } else {
        Surface::Wall
    }
}

/// Simulated motion of one collider
///
/// Each fixed tick moves the collider by its fall velocity plus the current
/// movement, re-checks collisions and turns the combined result into ground,
/// wall and ceiling contacts. Contacts are remembered for a few ticks through
/// counters so a body doesn't flicker between grounded and airborne.
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    handle: ColliderHandle,
    config: PhysicsConfig,
    timestep: FixedTimestep,
    events: VecDeque<PhysicsEvent>,

    // Gravity frame
    gravity: Vec2,
    default_normal: Vec2,
    gravity_magnitude: f32,
    fall_velocity: Vec2,

    // Movement
    movement: Vec2,
    memorized: Vec2,
    last_position: Vec2,
    last_normal: Vec2,

    // Contact memory
    ground_counter: u32,
    wall_counter: u32,
    ceiling_counter: u32,
}

impl PhysicsIntegrator {
    /// Create an integrator driving the collider behind `handle`
    pub fn new(
        handle: ColliderHandle,
        world: &CollisionWorld,
        config: PhysicsConfig,
    ) -> Result<Self, PhysicsError> {
        let position = world.expect_collider(handle)?.position;
        let timestep = FixedTimestep::new(config.tick_period, config.max_ticks_per_frame);

        Ok(Self {
            handle,
            config,
            timestep,
            events: VecDeque::new(),
            // Zero so the body's gravity is picked up on the first update
            gravity: Vec2::ZERO,
            default_normal: Vec2::ZERO,
            gravity_magnitude: 0.0,
            fall_velocity: Vec2::ZERO,
            movement: Vec2::ZERO,
            memorized: Vec2::ZERO,
            last_position: position,
            last_normal: Vec2::ZERO,
            ground_counter: 0,
            wall_counter: 0,
            ceiling_counter: 0,
        })
    }

    /// Advance by one frame of `dt` seconds, running as many fixed ticks as
    /// have accumulated
    pub fn update(
        &mut self,
        body: &mut PhysicsBody,
        world: &mut CollisionWorld,
        dt: f32,
    ) -> Result<(), PhysicsError> {
        self.timestep.set_active(body.physics_applied);
        self.publish_flags(body);

        if body.gravity != self.gravity {
            self.set_gravity(body.gravity);
        }

        // Contacts queued by other entities' ticks since the last frame
        world.expect_collider(self.handle)?;
        for info in world.drain_collisions(self.handle) {
            self.events.push_back(PhysicsEvent::external(info));
        }

        let ticks = self.timestep.advance(dt);
        for _ in 0..ticks {
            self.tick(body, world)?;
        }

        self.publish_flags(body);
        Ok(())
    }

    fn tick(&mut self, body: &mut PhysicsBody, world: &mut CollisionWorld) -> Result<(), PhysicsError> {
        let collider = world.expect_collider_mut(self.handle)?;

        if collider.is_static {
            // Still checked so moving colliders hear about it
            body.velocity = Vec2::ZERO;
            body.normal_speed = 0.0;
            world.check_for_collision(self.handle)?;
            return Ok(());
        }

        let velocity = self.fall_velocity + self.movement;
        body.velocity = velocity;
        body.normal_speed = velocity.dot(self.default_normal);
        collider.position += velocity;

        self.fall_velocity += self.gravity;
        if self.fall_velocity.length() > body.max_gravspeed {
            self.fall_velocity = body.max_gravspeed * -self.default_normal;
        }

        self.memorize(body.movement);

        self.ground_counter = self.ground_counter.saturating_sub(1);
        self.wall_counter = self.wall_counter.saturating_sub(1);
        self.ceiling_counter = self.ceiling_counter.saturating_sub(1);

        world.check_for_collision(self.handle)?;
        let infos = world.drain_collisions(self.handle);
        match synthesize(&infos, self.default_normal) {
            Some(synthesis) => self.respond(synthesis, world)?,
            None => self.coast(),
        }

        self.settle(world)
    }

    /// Apply one tick's combined collision
    fn respond(&mut self, synthesis: Synthesis, world: &mut CollisionWorld) -> Result<(), PhysicsError> {
        let up = self.default_normal;
        let normal = synthesis.normal;

        let horizontal = match classify_surface(up, normal, self.config.slope_threshold) {
            Surface::Ground => {
                self.ground_counter = self.config.ground_refresh;
                self.fall_velocity = -up;
                self.last_normal = normal;
                self.memorized.x * perpendicular(normal)
            }
            Surface::Wall => {
                self.wall_counter = self.config.wall_refresh;
                Vec2::ZERO
            }
        };

        let mut vertical = -self.memorized.y * up;
        if vertical.dot(normal) < 0.0 {
            // Moving into the surface: a ceiling
            vertical = Vec2::ZERO;
            self.ceiling_counter = self.config.ceiling_refresh;
        }

        self.movement = horizontal + vertical;

        for &other in &synthesis.others {
            self.events.push_back(PhysicsEvent {
                other,
                self_collided: true,
                point: synthesis.point,
                normal,
            });
        }

        let collider = world.expect_collider_mut(self.handle)?;
        collider.position += synthesis.correction;

        // Pushed straight back to where it was: nudge out along the normal
        if self.ground_counter == 0 && collider.position == self.last_position {
            collider.position += normal;
        }

        log::trace!(
            "Collider {:?} corrected by {} (normal {}, {} contacts)",
            self.handle,
            synthesis.correction,
            normal,
            synthesis.others.len()
        );
        Ok(())
    }

    /// Movement for a tick without contacts
    fn coast(&mut self) {
        if self.ground_counter > 0 {
            // Recently grounded: keep following the last surface
            self.movement = self.memorized.x * perpendicular(self.last_normal)
                - self.memorized.y * self.default_normal;
        } else {
            self.movement = self.memorized;
        }
    }

    /// Pin the position against contacts that would otherwise jitter it
    fn settle(&mut self, world: &mut CollisionWorld) -> Result<(), PhysicsError> {
        let collider = world.expect_collider_mut(self.handle)?;
        if self.ground_counter > 0 && self.wall_counter > 0 {
            collider.position = self.last_position;
        } else if self.ceiling_counter > 0 {
            collider.position.y = self.last_position.y;
        } else {
            self.last_position = collider.position;
        }
        Ok(())
    }

    /// Track the requested movement, letting a released jump decay at
    /// gravity's rate instead of stopping dead
    fn memorize(&mut self, requested: Vec2) {
        if requested.y <= 0.0 {
            if requested.y <= self.memorized.y {
                self.memorized.y = requested.y;
            } else {
                self.memorized.y = (self.memorized.y + self.gravity_magnitude).min(requested.y);
            }
        } else {
            self.memorized.y = requested.y;
        }
        self.memorized.x = requested.x;
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
        self.default_normal = -gravity.normalize_or_zero();
        self.gravity_magnitude = -self.default_normal.dot(gravity);
        self.fall_velocity = -self.default_normal;

        self.ground_counter = 0;
        self.wall_counter = 0;
        self.ceiling_counter = 0;

        log::debug!("Collider {:?} gravity set to {}", self.handle, gravity);
    }

    fn publish_flags(&self, body: &mut PhysicsBody) {
        body.grounded = self.ground_counter > 0;
        body.walled = self.wall_counter > 0;
    }

    /// Pop the oldest pending event
    pub fn next_event(&mut self) -> Option<PhysicsEvent> {
        self.events.pop_front()
    }

    /// Take every pending event, oldest first
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        self.events.drain(..).collect()
    }

    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    /// Unit vector opposite gravity, zero without gravity
    pub fn default_normal(&self) -> Vec2 {
        self.default_normal
    }

    /// Movement applied on the next tick, after collision response
    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    /// Requested movement as lagged by the jump memory
    pub fn memorized_movement(&self) -> Vec2 {
        self.memorized
    }

    pub fn ground_counter(&self) -> u32 {
        self.ground_counter
    }

    pub fn wall_counter(&self) -> u32 {
        self.wall_counter
    }

    pub fn ceiling_counter(&self) -> u32 {
        self.ceiling_counter
    }

    /// Fixed ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.timestep.tick_count()
    }
}
