// Collider registry: an arena of colliders addressed by generational handles

use std::collections::VecDeque;

use glam::Vec2;

use super::mask::Mask;
use super::{CollisionError, CollisionInfo};
use crate::core::{Rect, Size};

/// Handle to a collider registered in a `CollisionWorld`
///
/// The generation makes handles to removed colliders stale instead of letting
/// them alias whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle {
    index: u32,
    generation: u32,
}

impl ColliderHandle {
    /// Slot index inside the world
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// A collidable entity: placement, pixel mask and optional outline polygon
#[derive(Debug, Clone)]
pub struct Collider {
    /// Top-left corner in world space
    pub position: Vec2,
    /// Whether this collider takes part in detection
    pub collidable: bool,
    /// Static colliders never receive corrections
    pub is_static: bool,
    mask: Mask,
    vertices: Option<Vec<Vec2>>,
    infos: VecDeque<CollisionInfo>,
}

impl Collider {
    /// Create a non-static, collidable collider at `position`
    pub fn new(position: Vec2, mask: Mask) -> Self {
        Self {
            position,
            collidable: true,
            is_static: false,
            mask,
            vertices: None,
            infos: VecDeque::new(),
        }
    }

    /// Mark as static (never corrected)
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Set whether the collider participates in detection
    pub fn with_collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }

    /// Attach an outline polygon, in local pixel coordinates, used for contact normals
    pub fn with_vertices(mut self, vertices: Vec<Vec2>) -> Self {
        self.vertices = Some(vertices);
        self
    }

    pub fn size(&self) -> Size {
        self.mask.size()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn vertices(&self) -> &[Vec2] {
        self.vertices.as_deref().unwrap_or(&[])
    }

    /// Pixel-aligned bounding box
    pub fn bounds(&self) -> Rect {
        Rect::from_position(self.position, self.size())
    }

    /// Number of collision infos waiting to be drained
    pub fn pending_collisions(&self) -> usize {
        self.infos.len()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    collider: Option<Collider>,
}

/// Owns every collider of one level
#[derive(Debug, Default)]
pub struct CollisionWorld {
    slots: Vec<Slot>,
    free: Vec<u32>,
    count: usize,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider and return its handle
    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        self.count += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.collider = Some(collider);
            let handle = ColliderHandle {
                index,
                generation: slot.generation,
            };
            log::debug!("Registered collider {:?} (reused slot)", handle);
            return handle;
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            collider: Some(collider),
        });
        let handle = ColliderHandle {
            index,
            generation: 0,
        };
        log::debug!("Registered collider {:?}", handle);
        handle
    }

    /// Unregister a collider. Pending infos queued for it are dropped with it.
    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let collider = slot.collider.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.count -= 1;
        log::debug!("Removed collider {:?}", handle);
        Some(collider)
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.collider.as_ref())
    }

    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.collider.as_mut())
    }

    /// Lookup that treats an unknown handle as an error
    pub(crate) fn expect_collider(
        &self,
        handle: ColliderHandle,
    ) -> Result<&Collider, CollisionError> {
        self.get(handle)
            .ok_or(CollisionError::UnknownCollider(handle))
    }

    pub(crate) fn expect_collider_mut(
        &mut self,
        handle: ColliderHandle,
    ) -> Result<&mut Collider, CollisionError> {
        self.get_mut(handle)
            .ok_or(CollisionError::UnknownCollider(handle))
    }

    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over all registered colliders
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.collider.as_ref().map(|collider| {
                (
                    ColliderHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    collider,
                )
            })
        })
    }

    /// Pop the oldest collision info queued for `handle`
    pub fn next_collision(&mut self, handle: ColliderHandle) -> Option<CollisionInfo> {
        self.get_mut(handle)?.infos.pop_front()
    }

    /// Take every collision info queued for `handle`, oldest first
    pub fn drain_collisions(&mut self, handle: ColliderHandle) -> Vec<CollisionInfo> {
        self.get_mut(handle)
            .map(|collider| collider.infos.drain(..).collect())
            .unwrap_or_default()
    }

    /// Queue an info for `handle` unless it is static or gone
    pub(super) fn enqueue(&mut self, handle: ColliderHandle, info: CollisionInfo) {
        if let Some(collider) = self.get_mut(handle) {
            if !collider.is_static {
                collider.infos.push_back(info);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collision::Rgba;

    fn square(position: Vec2) -> Collider {
        Collider::new(position, Mask::filled(Size::new(4, 4), Rgba::WHITE))
    }

    #[test]
    fn test_insert_and_get() {
        let mut world = CollisionWorld::new();
        let handle = world.insert(square(Vec2::new(1.0, 2.0)));
        assert_eq!(world.len(), 1);
        assert_eq!(world.get(handle).unwrap().position, Vec2::new(1.0, 2.0));
        assert_eq!(world.get(handle).unwrap().bounds(), Rect::new(1, 2, 4, 4));
    }

    #[test]
    fn test_removed_handle_is_stale() {
        let mut world = CollisionWorld::new();
        let first = world.insert(square(Vec2::ZERO));
        assert!(world.remove(first).is_some());
        assert!(world.is_empty());

        let second = world.insert(square(Vec2::ONE));
        assert_eq!(first.index(), second.index(), "slot should be reused");
        assert!(world.get(first).is_none());
        assert!(world.remove(first).is_none());
        assert!(world.contains(second));
        assert!(matches!(
            world.expect_collider(first),
            Err(CollisionError::UnknownCollider(_))
        ));
    }

    #[test]
    fn test_static_colliders_receive_nothing() {
        let mut world = CollisionWorld::new();
        let wall = world.insert(square(Vec2::ZERO).with_static(true));
        let ball = world.insert(square(Vec2::ZERO));
        let info = CollisionInfo {
            other: ball,
            point: Vec2::ZERO,
            correction: Vec2::X,
            normal: Vec2::X,
        };
        world.enqueue(wall, info);
        world.enqueue(ball, CollisionInfo { other: wall, ..info });

        assert!(world.drain_collisions(wall).is_empty());
        assert_eq!(world.get(ball).unwrap().pending_collisions(), 1);
        assert_eq!(world.next_collision(ball).unwrap().other, wall);
        assert!(world.next_collision(ball).is_none());
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut world = CollisionWorld::new();
        let a = world.insert(square(Vec2::ZERO));
        let b = world.insert(square(Vec2::ONE));
        world.remove(a);
        let handles: Vec<_> = world.iter().map(|(handle, _)| handle).collect();
        assert_eq!(handles, vec![b]);
    }
}
