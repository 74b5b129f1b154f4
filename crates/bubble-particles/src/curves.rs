//! Interpolation laws and path evaluation

use bubble_core::Point;
use std::f32::consts::PI;

/// Ease-in-ease-out curve: slow start, fast middle, slow end.
///
/// `f(0) = 0`, `f(1) = 1`, symmetric around `x = 0.5`.
pub fn accel_decel(x: f32) -> f32 {
    ((x + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Identity curve, clamped to [0, 1]
pub fn linear(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Evaluate a cubic Bezier curve at `t`, truncating each coordinate toward zero.
pub fn cubic_bezier(t: f32, s: Point, c1: Point, c2: Point, e: Point) -> Point {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;

    let x = s.x as f32 * uuu
        + 3.0 * c1.x as f32 * t * uu
        + 3.0 * c2.x as f32 * tt * u
        + e.x as f32 * ttt;
    let y = s.y as f32 * uuu
        + 3.0 * c1.y as f32 * t * uu
        + 3.0 * c2.y as f32 * tt * u
        + e.y as f32 * ttt;

    Point::new(x as i32, y as i32)
}
