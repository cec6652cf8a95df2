// Math utilities and helper functions

use glam::Vec2;
use std::f64::consts::TAU;

/// Rotate a vector a quarter turn: `(x, y) -> (-y, x)`
///
/// With y pointing down this turns an "up" normal into the direction of
/// travel along the surface (rightward for a flat floor).
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Wrap `x` into `[min, max)`
pub fn wrap_min_max(x: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    let wrapped = (x - min).rem_euclid(span);
    // rem_euclid can round up to exactly `span`
    if wrapped >= span {
        min
    } else {
        min + wrapped
    }
}

/// Wrap an angle in radians into `[0, 2π)`
pub fn wrap_angle(angle: f64) -> f64 {
    wrap_min_max(angle, 0.0, TAU)
}

/// Wrap a (possibly negative) index into `[0, len)`
pub fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
