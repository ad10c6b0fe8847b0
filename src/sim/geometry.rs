//! Pure geometry helpers: target steering vectors and AABB overlap tests
//!
//! No state, no side effects. Everything the collision and combat code
//! needs to reason about boxes and directions lives here.

use glam::Vec2;

/// Unit direction from `src` to `dest` plus its angle (atan2, 0 = east,
/// positive angles point south in screen coordinates).
///
/// Returns `None` when `src == dest`: a zero-distance target has no
/// direction, and propagating NaN into position state corrupts the whole
/// simulation. Callers keep their previous heading (hero aim) or stay
/// still (foe steering).
pub fn direction_and_angle(src: Vec2, dest: Vec2) -> Option<(Vec2, f32)> {
    let delta = dest - src;
    let hypotenuse = delta.length();
    if hypotenuse == 0.0 {
        return None;
    }
    let dir = delta / hypotenuse;
    Some((dir, dir.y.atan2(dir.x)))
}

/// Deterministic point on the circle of `radius` around `center` at `angle`
#[inline]
pub fn point_on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + radius * Vec2::new(angle.cos(), angle.sin())
}

/// Result of an AABB overlap test
///
/// The four penetration depths are computed unconditionally so the collision
/// resolver can pick the smallest one without re-testing. Each depth is how
/// far one box's edge reaches past the other's opposing edge; all four are
/// positive exactly when the boxes overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub collides: bool,
    /// A's right edge past B's left edge
    pub max_x: f32,
    /// A's bottom edge past B's top edge
    pub max_y: f32,
    /// B's right edge past A's left edge
    pub min_x: f32,
    /// B's bottom edge past A's top edge
    pub min_y: f32,
}

/// Standard AABB overlap test between box A (`a_min`, `a_size`) and
/// box B (`b_min`, `b_size`). Boxes are top-left anchored.
pub fn overlap(a_min: Vec2, a_size: Vec2, b_min: Vec2, b_size: Vec2) -> Overlap {
    let a_max = a_min + a_size;
    let b_max = b_min + b_size;

    let max_x = a_max.x - b_min.x;
    let max_y = a_max.y - b_min.y;
    let min_x = b_max.x - a_min.x;
    let min_y = b_max.y - a_min.y;

    Overlap {
        collides: max_x > 0.0 && max_y > 0.0 && min_x > 0.0 && min_y > 0.0,
        max_x,
        max_y,
        min_x,
        min_y,
    }
}
