// Narrow phase: per-pixel overlap between two colliders and the corrections
// that separate them

use glam::Vec2;

use super::vertices::get_normal;
use super::world::{Collider, ColliderHandle, CollisionWorld};
use super::{CollisionError, CollisionInfo};
use crate::core::Rect;

/// One side's view of a colliding pair
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    point: Vec2,
    correction: Vec2,
    normal: Vec2,
}

impl Contact {
    fn into_info(self, other: ColliderHandle) -> CollisionInfo {
        CollisionInfo {
            other,
            point: self.point,
            correction: self.correction,
            normal: self.normal,
        }
    }
}

/// Overlapping pixels on each side of a collider's own midlines
#[derive(Debug, Default, Clone, Copy)]
struct Sums {
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

impl Sums {
    fn tally(&mut self, x: i32, y: i32, bounds: &Rect) {
        if y < bounds.height / 2 {
            self.top += 1;
        } else {
            self.bottom += 1;
        }
        if x < bounds.width / 2 {
            self.left += 1;
        } else {
            self.right += 1;
        }
    }
}

/// Shape of the overlap region, in intersection-local pixels
#[derive(Debug, Clone, Copy)]
struct Overlap {
    /// Thickest horizontal run (largest row count)
    width: i32,
    /// Thickest vertical run (largest column count)
    height: i32,
    row_of_max: i32,
    col_of_max: i32,
    row_min: i32,
    row_max: i32,
    col_min: i32,
    col_max: i32,
}

impl Overlap {
    /// A thinner vertical overlap than horizontal one means the pair meets
    /// along a horizontal surface
    fn is_vertical(&self) -> bool {
        self.height < self.width
    }

    /// Correction and contact point for one side.
    ///
    /// `adjust` is the sub-pixel offset of the collider from its bounding box,
    /// `offset` maps intersection-local pixels into world space through the
    /// other collider's frame.
    fn resolve(&self, sums: &Sums, adjust: Vec2, offset: Vec2) -> (Vec2, Vec2) {
        if self.is_vertical() {
            let height = self.height as f32;
            let (correction, row) = if sums.bottom > sums.top {
                (-height - adjust.y, self.row_min)
            } else {
                (height - adjust.y, self.row_max)
            };
            (
                Vec2::new(0.0, correction),
                Vec2::new(self.col_of_max as f32, row as f32) + offset,
            )
        } else {
            let width = self.width as f32;
            let (correction, col) = if sums.right > sums.left {
                (-width - adjust.x, self.col_min)
            } else {
                (width - adjust.x, self.col_max)
            };
            (
                Vec2::new(correction, 0.0),
                Vec2::new(col as f32, self.row_of_max as f32) + offset,
            )
        }
    }
}

/// Index of the first maximum, with the maximum itself
fn first_max(counts: &[i32]) -> (i32, i32) {
    let mut best = 0;
    for (index, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = index;
        }
    }
    (best as i32, counts.get(best).copied().unwrap_or(0))
}

/// Test two colliders against each other.
///
/// Returns the contact seen by `a` and the contact seen by `b`, or `None` when
/// no opaque pixels overlap.
fn collide(a: &Collider, b: &Collider) -> Result<Option<(Contact, Contact)>, CollisionError> {
    if !a.collidable && !b.collidable {
        return Ok(None);
    }

    let bounds_a = a.bounds();
    let bounds_b = b.bounds();
    let Some(intersection) = bounds_a.intersection(&bounds_b) else {
        return Ok(None);
    };

    let local_a = intersection.relative_to(&bounds_a);
    let local_b = intersection.relative_to(&bounds_b);
    let pixels_a = a.mask().extract(local_a)?;
    let pixels_b = b.mask().extract(local_b)?;

    let solid: Vec<bool> = pixels_a
        .iter()
        .zip(&pixels_b)
        .map(|(pa, pb)| pa.is_opaque() && pb.is_opaque())
        .collect();
    if !solid.contains(&true) {
        return Ok(None);
    }

    let width = intersection.width;
    let height = intersection.height;
    let mut sums_a = Sums::default();
    let mut sums_b = Sums::default();
    let mut row_counts = vec![0; height as usize];
    let mut col_counts = vec![0; width as usize];
    let (mut row_min, mut row_max) = (height - 1, 0);
    let (mut col_min, mut col_max) = (width - 1, 0);

    for row in 0..height {
        for col in 0..width {
            if !solid[(col + row * width) as usize] {
                continue;
            }
            sums_a.tally(col + local_a.x, row + local_a.y, &bounds_a);
            sums_b.tally(col + local_b.x, row + local_b.y, &bounds_b);

            row_min = row_min.min(row);
            row_max = row_max.max(row);
            col_min = col_min.min(col);
            col_max = col_max.max(col);

            row_counts[row as usize] += 1;
            col_counts[col as usize] += 1;
        }
    }

    let (row_of_max, overlap_width) = first_max(&row_counts);
    let (col_of_max, overlap_height) = first_max(&col_counts);
    let overlap = Overlap {
        width: overlap_width,
        height: overlap_height,
        row_of_max,
        col_of_max,
        row_min,
        row_max,
        col_min,
        col_max,
    };

    let (correction_a, point_a) = overlap.resolve(
        &sums_a,
        a.position - bounds_a.origin(),
        local_b.origin() + b.position,
    );
    let (correction_b, point_b) = overlap.resolve(
        &sums_b,
        b.position - bounds_b.origin(),
        local_a.origin() + a.position,
    );

    let contact_a = Contact {
        point: point_a,
        correction: correction_a,
        normal: get_normal(b.vertices(), b.position, point_a),
    };
    let contact_b = Contact {
        point: point_b,
        correction: correction_b,
        normal: get_normal(a.vertices(), a.position, point_b),
    };

    Ok(Some((contact_a, contact_b)))
}

impl CollisionWorld {
    /// Check `handle` against every other registered collider.
    ///
    /// Each colliding pair queues a `CollisionInfo` for both sides, skipping
    /// static ones. Returns whether anything collided.
    pub fn check_for_collision(&mut self, handle: ColliderHandle) -> Result<bool, CollisionError> {
        let collider = self.expect_collider(handle)?;

        // Finish reading the whole registry before queueing anything
        let mut hits = Vec::new();
        for (other_handle, other) in self.iter() {
            if other_handle == handle {
                continue;
            }
            if let Some((near, far)) = collide(collider, other)? {
                hits.push((other_handle, near, far));
            }
        }

        for (other_handle, near, far) in &hits {
            self.enqueue(handle, near.into_info(*other_handle));
            self.enqueue(*other_handle, far.into_info(handle));
        }

        Ok(!hits.is_empty())
    }
}
