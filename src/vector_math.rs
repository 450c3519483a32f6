//! Basic 2D vector and angle helpers.
//!
//! World space is screen space: `x` grows to the right and `y` grows
//! downward. Orientations are radians in `(-π, π]` as produced by
//! [`f32::atan2`]; the "normalised" form used by sweeping logic lives in
//! `[0, 2π)`.
use std::f32::consts::{PI, TAU};

use glam::Vec2;
use log::trace;

/// Maps an orientation in `(-π, π]` onto `[0, 2π)`.
///
/// Out-of-range input is wrapped rather than rejected.
///
/// # Examples
/// ```
/// use isowalk::vector_math::normalize_angle;
/// use std::f32::consts::PI;
/// assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-6);
/// assert_eq!(normalize_angle(0.5), 0.5);
/// ```
#[must_use]
pub fn normalize_angle(radian: f32) -> f32 {
    if !(-PI..=PI).contains(&radian) {
        trace!("wrapping out-of-range radian {radian}");
    }
    let wrapped = radian.rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Maps a normalised angle in `[0, 2π)` back onto `(-π, π]`.
///
/// # Examples
/// ```
/// use isowalk::vector_math::denormalize_angle;
/// use std::f32::consts::PI;
/// assert!((denormalize_angle(1.5 * PI) + PI / 2.0).abs() < 1e-6);
/// assert_eq!(denormalize_angle(PI), PI);
/// ```
#[must_use]
pub fn denormalize_angle(normal: f32) -> f32 {
    let wrapped = normal.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Absolute angular distance between two orientations, wrap aware.
#[must_use]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff)
}

/// Heading of a vector in `(-π, π]`; zero for the zero vector.
#[must_use]
pub fn heading_of(vector: Vec2) -> f32 {
    if vector.length_squared() == 0.0 {
        0.0
    } else {
        vector.y.atan2(vector.x)
    }
}

/// Returns the heading pointing the opposite way.
#[must_use]
pub fn reverse_heading(heading: f32) -> f32 {
    denormalize_angle(normalize_angle(heading) + PI)
}

/// Unit vector for a heading.
#[must_use]
pub fn unit_from_heading(heading: f32) -> Vec2 {
    Vec2::from_angle(heading)
}

/// Velocity pointing along `offset` whose magnitude never exceeds `speed`.
///
/// Used by motors to steer a body toward a path point without overshooting
/// it on the next integration step.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use isowalk::vector_math::limit_speed;
/// assert_eq!(limit_speed(Vec2::new(10.0, 0.0), 2.0), Vec2::new(2.0, 0.0));
/// assert_eq!(limit_speed(Vec2::new(1.0, 0.0), 2.0), Vec2::new(1.0, 0.0));
/// ```
#[must_use]
pub fn limit_speed(offset: Vec2, speed: f32) -> Vec2 {
    if !offset.is_finite() || speed <= 0.0 {
        return Vec2::ZERO;
    }
    offset.clamp_length_max(speed)
}

/// Intersection point of the bounded segments `a1→a2` and `b1→b2`.
///
/// Endpoints count as part of the segments. Parallel and collinear segments
/// report no intersection.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use isowalk::vector_math::segment_intersection;
/// let hit = segment_intersection(
///     Vec2::new(0.0, 0.0),
///     Vec2::new(10.0, 0.0),
///     Vec2::new(5.0, -5.0),
///     Vec2::new(5.0, 5.0),
/// );
/// assert_eq!(hit, Some(Vec2::new(5.0, 0.0)));
/// ```
#[must_use]
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denominator = r.perp_dot(s);
    if denominator.abs() <= f32::EPSILON {
        return None;
    }
    let offset = b1 - a1;
    let t = offset.perp_dot(s) / denominator;
    let u = offset.perp_dot(r) / denominator;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1 + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(PI, PI)]
    #[case(-FRAC_PI_2, 1.5 * PI)]
    #[case(FRAC_PI_2, FRAC_PI_2)]
    fn normalize_maps_into_full_turn(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(normalize_angle(input), expected, epsilon = 1e-6);
    }

    #[rstest]
    #[case(0.3)]
    #[case(-2.5)]
    #[case(PI)]
    fn denormalize_inverts_normalize(#[case] radian: f32) {
        assert_relative_eq!(
            denormalize_angle(normalize_angle(radian)),
            radian,
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn angular_distance_wraps_through_zero() {
        assert_relative_eq!(angular_distance(0.1, TAU - 0.1), 0.2, epsilon = 1e-5);
        assert_relative_eq!(angular_distance(-PI + 0.1, PI - 0.1), 0.2, epsilon = 1e-5);
    }

    #[rstest]
    fn reverse_heading_flips_direction() {
        assert_relative_eq!(reverse_heading(0.0), PI, epsilon = 1e-6);
        assert_relative_eq!(reverse_heading(FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-6);
    }

    #[rstest]
    fn parallel_segments_do_not_intersect() {
        let hit = segment_intersection(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[rstest]
    fn disjoint_segments_do_not_intersect() {
        let hit = segment_intersection(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(5.0, -1.0),
            Vec2::new(5.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[rstest]
    fn limit_speed_rejects_non_finite_offsets() {
        assert_eq!(limit_speed(Vec2::new(f32::NAN, 0.0), 1.0), Vec2::ZERO);
    }
}
