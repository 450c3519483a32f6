//! Utility helpers for tests.
pub mod fixtures;

use glam::Vec2;
use isowalk::vector_math::segment_intersection;
use isowalk::Rect;

/// Assert that `actual` lies within `epsilon` of `expected`.
///
/// # Panics
/// Panics with both points and their distance if they are too far apart.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use test_utils::assert_vec2_near;
/// assert_vec2_near(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1e-6), 1e-4);
/// ```
pub fn assert_vec2_near(actual: Vec2, expected: Vec2, epsilon: f32) {
    let distance = actual.distance(expected);
    assert!(
        distance <= epsilon,
        "{actual} is {distance} away from {expected} (allowed {epsilon})"
    );
}

/// Assert that `path` keeps out of `blocked`.
///
/// Interior waypoints must lie outside the area and no leg of the path may
/// touch it. The endpoints are exact world coordinates and are only checked
/// as part of their legs.
///
/// # Panics
/// Panics naming the first offending waypoint or leg.
pub fn assert_waypoints_avoid(path: &[Vec2], blocked: Rect) {
    let inner = path.iter().skip(1).take(path.len().saturating_sub(2));
    for point in inner {
        assert!(
            !blocked.contains(*point),
            "waypoint {point} lies inside blocked area {blocked:?}"
        );
    }
    for leg in path.windows(2) {
        if let [start, end] = leg {
            assert!(
                !leg_touches(*start, *end, blocked),
                "leg {start} -> {end} passes through blocked area {blocked:?}"
            );
        }
    }
}

fn leg_touches(start: Vec2, end: Vec2, area: Rect) -> bool {
    if area.contains(start) || area.contains(end) {
        return true;
    }
    let corners = [
        area.min,
        Vec2::new(area.max.x, area.min.y),
        area.max,
        Vec2::new(area.min.x, area.max.y),
    ];
    let mut edges = corners.iter().zip(corners.iter().cycle().skip(1));
    edges.any(|(a, b)| segment_intersection(start, end, *a, *b).is_some())
}
