// Reduce every collision of one tick into a single response

use glam::Vec2;

use crate::core::math::approx_equal;
use crate::engine::collision::{ColliderHandle, CollisionInfo};

/// Combined response to all collisions of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Displacement that clears every overlap at once
    pub correction: Vec2,
    /// Representative surface normal, unit length or zero
    pub normal: Vec2,
    /// Contact point of the deepest collision
    pub point: Vec2,
    /// Every collider involved, first-seen order, no duplicates
    pub others: Vec<ColliderHandle>,
}

/// Combine collision infos into one response, `None` if there are none.
///
/// Corrections combine per axis: the largest push in each direction is kept,
/// so overlapping contacts (two floor tiles) don't stack while contacts on
/// different axes (floor and wall) both apply. Pushes in opposite directions
/// partially cancel.
///
/// The normal and point come from the deepest contact. Equally deep contacts
/// prefer the normal closest to `up`, so standing still against a wall reads
/// as ground while pushing into it reads as wall.
pub fn synthesize(infos: &[CollisionInfo], up: Vec2) -> Option<Synthesis> {
    let deepest = infos.iter().fold(None::<&CollisionInfo>, |best, info| {
        let Some(best) = best else {
            return Some(info);
        };
        let best_depth = best.correction.length_squared();
        let depth = info.correction.length_squared();
        if depth > best_depth
            || (approx_equal(depth, best_depth, 1e-4)
                && contact_normal(info).dot(up) > contact_normal(best).dot(up))
        {
            Some(info)
        } else {
            Some(best)
        }
    })?;

    let mut positive = Vec2::ZERO;
    let mut negative = Vec2::ZERO;
    let mut others = Vec::with_capacity(infos.len());

    for info in infos {
        positive = positive.max(info.correction);
        negative = negative.min(info.correction);
        if !others.contains(&info.other) {
            others.push(info.other);
        }
    }

    Some(Synthesis {
        correction: positive + negative,
        normal: contact_normal(deepest),
        point: deepest.point,
        others,
    })
}

/// Surface normal of one contact, checked against its correction.
///
/// Outline normals are estimated from the nearest polygon edge and can pick
/// the wrong side of a corner (a floor tile's top-left pixel reports its left
/// edge). A normal that doesn't point along the correction is replaced by the
/// correction's direction.
fn contact_normal(info: &CollisionInfo) -> Vec2 {
    let along = info.correction.normalize_or_zero();
    if info.normal.dot(along) > 1e-3 {
        info.normal
    } else {
        along
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Size;
    use crate::engine::collision::{Collider, CollisionWorld, Mask, Rgba};

    fn handles(count: usize) -> Vec<ColliderHandle> {
        let mut world = CollisionWorld::new();
        (0..count)
            .map(|_| {
                world.insert(Collider::new(
                    Vec2::ZERO,
                    Mask::filled(Size::new(1, 1), Rgba::WHITE),
                ))
            })
            .collect()
    }

    fn info(other: ColliderHandle, correction: Vec2, normal: Vec2) -> CollisionInfo {
        CollisionInfo {
            other,
            point: correction * 10.0,
            correction,
            normal,
        }
    }

    const UP: Vec2 = Vec2::new(0.0, -1.0);

    #[test]
    fn test_empty() {
        assert!(synthesize(&[], UP).is_none());
    }

    #[test]
    fn test_single_info_passes_through() {
        let h = handles(1);
        let only = info(h[0], Vec2::new(0.0, -3.0), UP);
        let synthesis = synthesize(&[only], UP).unwrap();
        assert_eq!(synthesis.correction, only.correction);
        assert_eq!(synthesis.normal, only.normal);
        assert_eq!(synthesis.point, only.point);
        assert_eq!(synthesis.others, vec![h[0]]);
    }

    #[test]
    fn test_same_direction_pushes_do_not_stack() {
        let h = handles(2);
        let synthesis = synthesize(
            &[
                info(h[0], Vec2::new(0.0, -2.0), UP),
                info(h[1], Vec2::new(0.0, -3.0), UP),
            ],
            UP,
        )
        .unwrap();
        assert_eq!(synthesis.correction, Vec2::new(0.0, -3.0));
        assert_eq!(synthesis.normal, UP);
        assert_eq!(synthesis.point, Vec2::new(0.0, -30.0));
    }

    #[test]
    fn test_floor_and_wall_combine() {
        let h = handles(2);
        let wall_normal = Vec2::new(-1.0, 0.0);
        let synthesis = synthesize(
            &[
                info(h[0], Vec2::new(0.0, -1.0), UP),
                info(h[1], Vec2::new(-4.0, 0.0), wall_normal),
            ],
            UP,
        )
        .unwrap();
        assert_eq!(synthesis.correction, Vec2::new(-4.0, -1.0));
        // The wall is the deeper contact
        assert_eq!(synthesis.normal, wall_normal);
        assert_eq!(synthesis.point, Vec2::new(-40.0, 0.0));
        assert_eq!(synthesis.others, h);
    }

    #[test]
    fn test_equal_depth_prefers_ground() {
        let h = handles(2);
        let synthesis = synthesize(
            &[
                info(h[0], Vec2::new(-1.0, 0.0), Vec2::new(-1.0, 0.0)),
                info(h[1], Vec2::new(0.0, -1.0), UP),
            ],
            UP,
        )
        .unwrap();
        assert_eq!(synthesis.normal, UP);
        assert_eq!(synthesis.correction, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_opposing_pushes_cancel() {
        let h = handles(2);
        let down = Vec2::new(0.0, 1.0);
        let synthesis = synthesize(
            &[
                info(h[0], Vec2::new(0.0, -1.0), UP),
                info(h[1], Vec2::new(0.0, 4.0), down),
            ],
            UP,
        )
        .unwrap();
        // Squeezed between floor and ceiling
        assert_eq!(synthesis.correction, Vec2::new(0.0, 3.0));
        assert_eq!(synthesis.normal, down);
    }

    #[test]
    fn test_others_are_deduplicated() {
        let h = handles(2);
        let synthesis = synthesize(
            &[
                info(h[1], Vec2::new(0.0, -1.0), UP),
                info(h[0], Vec2::new(0.0, -1.0), UP),
                info(h[1], Vec2::new(0.0, -1.0), UP),
            ],
            UP,
        )
        .unwrap();
        assert_eq!(synthesis.others, vec![h[1], h[0]]);
    }

    #[test]
    fn test_corner_normal_across_the_correction_is_replaced() {
        let h = handles(2);
        // Vertical push out of a tile whose corner reported its left edge
        let synthesis = synthesize(
            &[
                info(h[0], Vec2::new(0.0, -1.0), Vec2::new(-1.0, 0.0)),
                info(h[1], Vec2::new(0.0, -1.0), UP),
            ],
            UP,
        )
        .unwrap();
        assert_eq!(synthesis.normal, UP);
        assert_eq!(synthesis.correction, Vec2::new(0.0, -1.0));

        let synthesis =
            synthesize(&[info(h[0], Vec2::new(0.0, -2.0), Vec2::new(1.0, 0.0))], UP).unwrap();
        assert_eq!(synthesis.normal, UP);
    }

    #[test]
    fn test_missing_normal_follows_the_correction() {
        let h = handles(1);
        let synthesis =
            synthesize(&[info(h[0], Vec2::new(3.0, 0.0), Vec2::ZERO)], UP).unwrap();
        assert_eq!(synthesis.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_slope_normal_is_kept() {
        let h = handles(1);
        let slope = Vec2::new(-1.0, -1.0).normalize();
        let synthesis = synthesize(&[info(h[0], Vec2::new(0.0, -1.0), slope)], UP).unwrap();
        assert_eq!(synthesis.normal, slope);
    }
}
