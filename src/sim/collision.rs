//! AABB collision response
//!
//! Detection is `geometry::overlap`; this module decides which axis to
//! correct along and by how much. The axis choice is driven by the mover's
//! velocity sign: for each diagonal quadrant, compare the penetration of
//! the two leading edges and resolve along the smaller one (the side that
//! hit first). Pure-axis movement needs no comparison. That is an explicit
//! eight-branch table, matched by both resolution strategies:
//!
//! - symmetric: two movers split the correction 50/50
//! - one-sided: the full correction is applied to the mover, the wall
//!   never moves
//!
//! Not a physics solver: no mass, no impulses, just position correction
//! along a single axis ("wall sliding").

use glam::Vec2;

use super::geometry::Overlap;

/// Displacement that moves entity A fully out of the overlap, chosen by
/// A's velocity sign. Zero when A isn't moving (nothing to tie-break on).
fn escape_displacement(vel: Vec2, ov: &Overlap) -> Vec2 {
    // moving down-right: leading edges are right and bottom
    if vel.x > 0.0 && vel.y > 0.0 {
        if ov.max_x < ov.max_y {
            Vec2::new(-ov.max_x, 0.0)
        } else {
            Vec2::new(0.0, -ov.max_y)
        }
    }
    // moving up-right
    else if vel.x > 0.0 && vel.y < 0.0 {
        if ov.max_x < ov.min_y {
            Vec2::new(-ov.max_x, 0.0)
        } else {
            Vec2::new(0.0, ov.min_y)
        }
    }
    // moving right
    else if vel.x > 0.0 {
        Vec2::new(-ov.max_x, 0.0)
    }
    // moving down-left
    else if vel.x < 0.0 && vel.y > 0.0 {
        if ov.min_x < ov.max_y {
            Vec2::new(ov.min_x, 0.0)
        } else {
            Vec2::new(0.0, -ov.max_y)
        }
    }
    // moving up-left
    else if vel.x < 0.0 && vel.y < 0.0 {
        if ov.min_x < ov.min_y {
            Vec2::new(ov.min_x, 0.0)
        } else {
            Vec2::new(0.0, ov.min_y)
        }
    }
    // moving left
    else if vel.x < 0.0 {
        Vec2::new(ov.min_x, 0.0)
    }
    // moving down
    else if vel.y > 0.0 {
        Vec2::new(0.0, -ov.max_y)
    }
    // moving up
    else if vel.y < 0.0 {
        Vec2::new(0.0, ov.min_y)
    } else {
        Vec2::ZERO
    }
}

/// Push two movers apart: each gets half the chosen-axis overlap,
/// in opposite directions. `a_vel` is the velocity of the entity that
/// moved into the other.
pub fn resolve_symmetric(a_pos: &mut Vec2, a_vel: Vec2, b_pos: &mut Vec2, ov: &Overlap) {
    let d = escape_displacement(a_vel, ov);
    *a_pos += d / 2.0;
    *b_pos -= d / 2.0;
}

/// Push the mover fully out of a static wall; the wall is untouched.
pub fn resolve_against_wall(pos: &mut Vec2, vel: Vec2, ov: &Overlap) {
    *pos += escape_displacement(vel, ov);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::overlap;

    // 10x10 box A overlapping 10x10 box B at (8, 6): A is 2 deep on x,
    // 4 deep on y when approaching from the upper-left.
    fn setup() -> (Vec2, Vec2, Vec2, Vec2) {
        (
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(8.0, 6.0),
            Vec2::new(10.0, 10.0),
        )
    }

    #[test]
    fn test_down_right_picks_shallower_axis() {
        let (a, asz, b, bsz) = setup();
        let ov = overlap(a, asz, b, bsz);
        let mut a_pos = a;
        let mut b_pos = b;
        // max_x (2) < max_y (4): resolve along x
        resolve_symmetric(&mut a_pos, Vec2::new(1.0, 1.0), &mut b_pos, &ov);
        assert_eq!(a_pos, Vec2::new(-1.0, 0.0));
        assert_eq!(b_pos, Vec2::new(9.0, 6.0));
    }

    #[test]
    fn test_symmetric_conserves_penetration() {
        let (a, asz, b, bsz) = setup();
        let ov = overlap(a, asz, b, bsz);
        let mut a_pos = a;
        let mut b_pos = b;
        resolve_symmetric(&mut a_pos, Vec2::new(1.0, 1.0), &mut b_pos, &ov);
        // Sum of displacements equals the original penetration depth exactly
        let a_moved = (a_pos - a).x.abs();
        let b_moved = (b_pos - b).x.abs();
        assert_eq!(a_moved + b_moved, ov.max_x);
        // And the pair no longer overlaps
        assert!(!overlap(a_pos, asz, b_pos, bsz).collides);
    }

    #[test]
    fn test_pure_axis_cases_skip_comparison() {
        let (a, asz, b, bsz) = setup();
        let ov = overlap(a, asz, b, bsz);

        // Moving right only: always resolve x, even though y is shallower
        // in some other configuration
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::new(1.0, 0.0), &ov);
        assert_eq!(pos, Vec2::new(-2.0, 0.0));

        // Moving down only: always resolve y
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::new(0.0, 1.0), &ov);
        assert_eq!(pos, Vec2::new(0.0, -4.0));

        // Moving up only: push down past B's bottom edge
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::new(0.0, -1.0), &ov);
        assert_eq!(pos, Vec2::new(0.0, ov.min_y));

        // Moving left only: push right past B's right edge
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::new(-1.0, 0.0), &ov);
        assert_eq!(pos, Vec2::new(ov.min_x, 0.0));
    }

    #[test]
    fn test_up_left_quadrant() {
        // A approaches B from below-right: A at (12, 12), B at (5, 5)
        let a = Vec2::new(12.0, 12.0);
        let b = Vec2::new(5.0, 5.0);
        let size = Vec2::new(10.0, 10.0);
        let ov = overlap(a, size, b, size);
        assert!(ov.collides);
        // min_x = 3, min_y = 3: tie goes to y (strict less-than on x)
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::new(-1.0, -1.0), &ov);
        assert_eq!(pos, Vec2::new(12.0, 15.0));
    }

    #[test]
    fn test_wall_is_never_mutated() {
        let (a, asz, b, bsz) = setup();
        let ov = overlap(a, asz, b, bsz);
        let wall_before = b;
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::new(1.0, 1.0), &ov);
        // One-sided: only the mover's binding exists; post-resolution the
        // mover has zero penetration against the wall
        assert_eq!(b, wall_before);
        assert!(!overlap(pos, asz, b, bsz).collides);
    }

    #[test]
    fn test_stationary_mover_is_left_alone() {
        let (a, asz, b, bsz) = setup();
        let ov = overlap(a, asz, b, bsz);
        let mut pos = a;
        resolve_against_wall(&mut pos, Vec2::ZERO, &ov);
        assert_eq!(pos, a);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn boxes() -> impl Strategy<Value = (Vec2, Vec2, Vec2, Vec2)> {
            (
                -500.0f32..500.0,
                -500.0f32..500.0,
                1.0f32..64.0,
                1.0f32..64.0,
                -40.0f32..40.0,
                -40.0f32..40.0,
                1.0f32..64.0,
                1.0f32..64.0,
            )
                .prop_map(|(ax, ay, aw, ah, dx, dy, bw, bh)| {
                    // B is placed near A so overlapping pairs are common
                    (
                        Vec2::new(ax, ay),
                        Vec2::new(aw, ah),
                        Vec2::new(ax + dx, ay + dy),
                        Vec2::new(bw, bh),
                    )
                })
        }

        proptest! {
            #[test]
            fn wall_resolution_separates_moving_boxes(
                (a, asz, b, bsz) in boxes(),
                vx in -1.0f32..1.0,
                vy in -1.0f32..1.0,
            ) {
                let ov = overlap(a, asz, b, bsz);
                prop_assume!(ov.collides);
                let vel = Vec2::new(vx, vy);
                prop_assume!(vel != Vec2::ZERO);

                let mut pos = a;
                resolve_against_wall(&mut pos, vel, &ov);
                // Single-axis correction
                let moved = pos - a;
                prop_assert!(moved.x == 0.0 || moved.y == 0.0);
                // Separated up to float rounding at the touching edge
                let after = overlap(pos, asz, b, bsz);
                let shallowest = after.max_x.min(after.max_y).min(after.min_x).min(after.min_y);
                prop_assert!(!after.collides || shallowest < 1e-3);
            }

            #[test]
            fn symmetric_resolution_conserves_displacement(
                (a, asz, b, bsz) in boxes(),
                vx in -1.0f32..1.0,
                vy in -1.0f32..1.0,
            ) {
                let ov = overlap(a, asz, b, bsz);
                prop_assume!(ov.collides);
                let vel = Vec2::new(vx, vy);
                prop_assume!(vel != Vec2::ZERO);

                let (mut a_pos, mut b_pos) = (a, b);
                resolve_symmetric(&mut a_pos, vel, &mut b_pos, &ov);
                // Both movers shift by the same amount in opposite directions
                let residual = (a_pos - a) + (b_pos - b);
                prop_assert!(residual.length() < 1e-3);
            }

            #[test]
            fn overlap_is_symmetric((a, asz, b, bsz) in boxes()) {
                let ab = overlap(a, asz, b, bsz);
                let ba = overlap(b, bsz, a, asz);
                prop_assert_eq!(ab.collides, ba.collides);
                // Penetrations swap roles between the two orderings
                prop_assert!((ab.max_x - ba.min_x).abs() < 1e-3);
                prop_assert!((ab.max_y - ba.min_y).abs() < 1e-3);
            }
        }
    }
}
