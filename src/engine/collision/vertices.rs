// Boundary polygons derived from hand-authored mask art, and contact normals
// estimated from them

use super::mask::{Mask, Rgba};
use super::CollisionError;
use crate::core::math::{perpendicular, wrap_angle, wrap_index};
use crate::core::Size;
use glam::Vec2;

/// Marker colors painted into mask art to describe a collider's outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexColors {
    /// Exactly one pixel of this color marks where the outline begins
    pub start: Rgba,
    /// Outline pixels
    pub include: Rgba,
    /// Interior pixels that only pull the centroid
    pub exclude: Rgba,
}

/// Rectangle filled with the interior color whose border carries outline
/// markers, starting in the top-left corner
pub fn outlined_rect(size: Size, colors: VertexColors) -> Mask {
    let mut mask = Mask::filled(size, colors.exclude);
    let (width, height) = (size.width, size.height);
    for x in 0..width {
        mask.set(x, 0, colors.include);
        mask.set(x, height.saturating_sub(1), colors.include);
    }
    for y in 0..height {
        mask.set(0, y, colors.include);
        mask.set(width.saturating_sub(1), y, colors.include);
    }
    mask.set(0, 0, colors.start);
    mask
}

/// Derive an ordered outline polygon (local pixel coordinates) from a mask.
///
/// Outline pixels are sorted by their angle around the centroid of all marked
/// pixels, starting at the start pixel. This is an angular sort, not a hull:
/// it assumes the outline roughly surrounds the centroid.
pub fn get_vertices(mask: &Mask, colors: VertexColors) -> Result<Vec<Vec2>, CollisionError> {
    let size = mask.size();
    let mut include = Vec::new();
    let mut exclude = Vec::new();
    let mut start: Option<(u32, u32)> = None;

    for row in 0..size.height {
        for col in 0..size.width {
            let Some(pixel) = mask.get(col, row) else {
                continue;
            };
            let vertex = Vec2::new(col as f32, row as f32);
            if pixel == colors.start {
                if let Some((first_x, first_y)) = start {
                    return Err(CollisionError::DuplicateStartPixel {
                        first_x,
                        first_y,
                        second_x: col,
                        second_y: row,
                    });
                }
                start = Some((col, row));
                include.push(vertex);
            } else if pixel == colors.include {
                include.push(vertex);
            } else if pixel == colors.exclude {
                exclude.push(vertex);
            }
        }
    }

    let (start_x, start_y) = start.ok_or(CollisionError::MissingStartPixel)?;

    let marked = include.len() + exclude.len();
    let sum: Vec2 = include.iter().chain(exclude.iter()).copied().sum();
    let center = sum / marked as f32;

    let angle_of = |v: Vec2| f64::atan2((v.y - center.y) as f64, (v.x - center.x) as f64);
    let start_angle = angle_of(Vec2::new(start_x as f32, start_y as f32));

    let mut sorted: Vec<(f64, Vec2)> = include
        .into_iter()
        .map(|v| (wrap_angle(angle_of(v) - start_angle), v))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(sorted.into_iter().map(|(_, v)| v).collect())
}

/// Estimate the outward surface normal of `polygon` (placed at `origin`) near `point`.
///
/// Returns zero for polygons with fewer than three vertices.
pub fn get_normal(polygon: &[Vec2], origin: Vec2, point: Vec2) -> Vec2 {
    let count = polygon.len();
    if count < 3 {
        return Vec2::ZERO;
    }

    let local = point - origin;
    let distances: Vec<f32> = polygon.iter().map(|v| v.distance_squared(local)).collect();

    // First occurrence of the minimum
    let mut nearest = 0;
    for (index, distance) in distances.iter().enumerate() {
        if *distance < distances[nearest] {
            nearest = index;
        }
    }
    let lower = wrap_index(nearest as isize - 1, count);
    let higher = wrap_index(nearest as isize + 1, count);

    let mut candidates = [nearest, lower, higher];
    candidates.sort_by(|a, b| distances[*a].total_cmp(&distances[*b]));
    let (first, second) = if candidates[0] <= candidates[1] {
        (candidates[0], candidates[1])
    } else {
        (candidates[1], candidates[0])
    };

    // A gap wider than one means the pair straddles the wrap-around, so flip
    // to keep the winding consistent
    let direction = if second - first > 1 {
        polygon[first] - polygon[second]
    } else {
        polygon[second] - polygon[first]
    };

    (-perpendicular(direction)).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const START: Rgba = Rgba::rgb(255, 0, 0);
    const INCLUDE: Rgba = Rgba::rgb(0, 255, 0);
    const EXCLUDE: Rgba = Rgba::rgb(0, 0, 255);

    const COLORS: VertexColors = VertexColors {
        start: START,
        include: INCLUDE,
        exclude: EXCLUDE,
    };

    fn ring_mask(side: u32) -> Mask {
        outlined_rect(Size::new(side, side), COLORS)
    }

    fn outline(side: u32) -> Vec<Vec2> {
        get_vertices(&ring_mask(side), COLORS).unwrap()
    }

    #[test]
    fn test_ring_vertices_are_angularly_sorted() {
        let vertices = outline(5);
        assert_eq!(vertices.len(), 16);
        assert_eq!(vertices[0], Vec2::new(0.0, 0.0));

        let center = Vec2::new(2.0, 2.0);
        let start_angle = f64::atan2(-2.0, -2.0);
        let angles: Vec<f64> = vertices
            .iter()
            .map(|v| {
                let d = *v - center;
                wrap_angle(f64::atan2(d.y as f64, d.x as f64) - start_angle)
            })
            .collect();

        for pair in angles.windows(2) {
            assert!(pair[0] <= pair[1], "angles out of order: {:?}", angles);
        }
    }

    #[test]
    fn test_ring_winds_along_top_edge_first() {
        let vertices = outline(5);
        // y points down, so increasing angle walks the top edge left to right
        assert_eq!(vertices[1], Vec2::new(1.0, 0.0));
        assert_eq!(vertices[4], Vec2::new(4.0, 0.0));
        assert_eq!(*vertices.last().unwrap(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_missing_start_pixel() {
        let mut mask = ring_mask(5);
        mask.set(0, 0, INCLUDE);
        assert_eq!(
            get_vertices(&mask, COLORS),
            Err(CollisionError::MissingStartPixel)
        );
    }

    #[test]
    fn test_duplicate_start_pixel() {
        let mut mask = ring_mask(5);
        mask.set(4, 4, START);
        assert_eq!(
            get_vertices(&mask, COLORS),
            Err(CollisionError::DuplicateStartPixel {
                first_x: 0,
                first_y: 0,
                second_x: 4,
                second_y: 4,
            })
        );
    }

    #[test]
    fn test_exclude_pixels_shift_centroid_only() {
        let mut mask = Mask::filled(Size::new(5, 5), Rgba::TRANSPARENT);
        mask.set(0, 0, START);
        mask.set(4, 0, INCLUDE);
        mask.set(4, 4, EXCLUDE);
        let vertices = get_vertices(&mask, COLORS).unwrap();
        assert_eq!(vertices, vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)]);
    }

    #[test]
    fn test_normal_needs_three_vertices() {
        let line = [Vec2::ZERO, Vec2::new(4.0, 0.0)];
        assert_eq!(get_normal(&line, Vec2::ZERO, Vec2::new(2.0, 0.0)), Vec2::ZERO);
        assert_eq!(get_normal(&[], Vec2::ZERO, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_normal_on_each_side_of_ring() {
        let vertices = outline(9);
        let origin = Vec2::new(100.0, 50.0);

        let top = get_normal(&vertices, origin, origin + Vec2::new(4.0, 0.0));
        assert_abs_diff_eq!(top.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(top.y, -1.0, epsilon = 1e-6);

        let left = get_normal(&vertices, origin, origin + Vec2::new(0.0, 4.0));
        assert_abs_diff_eq!(left.x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(left.y, 0.0, epsilon = 1e-6);

        let right = get_normal(&vertices, origin, origin + Vec2::new(8.0, 4.0));
        assert_abs_diff_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(right.y, 0.0, epsilon = 1e-6);

        let bottom = get_normal(&vertices, origin, origin + Vec2::new(4.0, 8.0));
        assert_abs_diff_eq!(bottom.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bottom.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_on_slope() {
        // Ramp rising to the right, listed in outline order
        let polygon = [
            Vec2::new(0.0, 8.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(8.0, 8.0),
        ];
        let normal = get_normal(&polygon, Vec2::ZERO, Vec2::new(3.0, 5.0));
        let expected = Vec2::new(-1.0, -1.0).normalize();
        assert_abs_diff_eq!(normal.x, expected.x, epsilon = 1e-6);
        assert_abs_diff_eq!(normal.y, expected.y, epsilon = 1e-6);
    }
}
