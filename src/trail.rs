//! Breadcrumb trail of an entity's free movement.
//!
//! While an entity is driven externally (chasing a target, fleeing) its
//! positions are fed into a [`TrailRecorder`]. The recorder keeps the trail
//! sparse and loop-free so that walking it backwards is a reasonable route
//! home without running a search.

use glam::Vec2;
use log::trace;

use crate::vector_math::segment_intersection;
use crate::TRAIL_MIN_SPACING;

/// Records and prunes a trail of points.
///
/// Invariants maintained on every insert:
/// - consecutive points are at least `min_spacing` apart, except where a
///   loop was cut and replaced by its crossing point;
/// - no two non-adjacent segments intersect.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailRecorder {
    points: Vec<Vec2>,
    last_heading: Option<f32>,
    min_spacing: f32,
}

impl Default for TrailRecorder {
    fn default() -> Self {
        Self::new(TRAIL_MIN_SPACING)
    }
}

impl TrailRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new(min_spacing: f32) -> Self {
        Self {
            points: Vec::new(),
            last_heading: None,
            min_spacing,
        }
    }

    /// Recorded points, oldest first.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Heading of the most recently accepted point.
    #[must_use]
    pub const fn last_heading(&self) -> Option<f32> {
        self.last_heading
    }

    /// Minimum spacing between recorded points.
    #[must_use]
    pub const fn min_spacing(&self) -> f32 {
        self.min_spacing
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the distances between consecutive points.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| match pair {
                [a, b] => a.distance(*b),
                _ => 0.0,
            })
            .sum()
    }

    /// Forgets the whole trail.
    pub fn reset(&mut self) {
        self.points.clear();
        self.last_heading = None;
    }

    /// Offers a new sample to the trail. Returns `true` when the trail
    /// changed.
    ///
    /// Samples continuing in exactly the last heading, or closer than the
    /// minimum spacing to the last point, are dropped. When the new segment
    /// crosses an earlier one, everything after the crossed segment is cut
    /// and replaced with the crossing point.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use isowalk::trail::TrailRecorder;
    /// let mut trail = TrailRecorder::new(1.0);
    /// trail.add_point(Vec2::new(0.0, 0.0), 0.0);
    /// trail.add_point(Vec2::new(10.0, 0.0), 0.0);
    /// trail.add_point(Vec2::new(10.0, 10.0), 1.0);
    /// trail.add_point(Vec2::new(0.0, -10.0), 2.0);
    /// assert_eq!(trail.points(), &[Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(0.0, -10.0)]);
    /// ```
    #[expect(
        clippy::float_cmp,
        reason = "Only an exactly repeated heading marks a straight continuation."
    )]
    pub fn add_point(&mut self, point: Vec2, heading: f32) -> bool {
        let Some(&last) = self.points.last() else {
            self.points.push(point);
            self.last_heading = Some(heading);
            return true;
        };
        if self.points.len() >= 2 && self.last_heading.is_some_and(|prev| prev == heading) {
            return false;
        }
        if last.distance(point) < self.min_spacing {
            return false;
        }
        if let Some((index, crossing)) = self.first_crossing(last, point) {
            trace!(
                "trail loop closed at {crossing}, dropping {} point(s)",
                self.points.len() - index - 1
            );
            self.points.truncate(index + 1);
            self.points.push(crossing);
        }
        self.points.push(point);
        self.last_heading = Some(heading);
        true
    }

    /// First earlier segment crossed by `from → to`, with the crossing
    /// point. The segment ending at `from` is skipped since it shares that
    /// endpoint.
    fn first_crossing(&self, from: Vec2, to: Vec2) -> Option<(usize, Vec2)> {
        let earlier = self.points.len().saturating_sub(2);
        self.points
            .windows(2)
            .take(earlier)
            .enumerate()
            .find_map(|(index, pair)| match pair {
                [a, b] => segment_intersection(*a, *b, from, to).map(|hit| (index, hit)),
                _ => None,
            })
    }

    /// Route back to the first recorded point starting from the trail point
    /// nearest `position`.
    ///
    /// Points recorded after the nearest one are skipped, so an entity
    /// rejoins its own route instead of retracing the final stretch.
    #[must_use]
    pub fn homeward_from(&self, position: Vec2) -> Vec<Vec2> {
        let Some(nearest) = self
            .points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(index, _)| index)
        else {
            return Vec::new();
        };
        self.points
            .iter()
            .take(nearest + 1)
            .rev()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn drops_straight_continuation() {
        let mut trail = TrailRecorder::new(1.0);
        assert!(trail.add_point(Vec2::ZERO, 0.0));
        assert!(trail.add_point(Vec2::new(10.0, 0.0), 0.0));
        assert!(!trail.add_point(Vec2::new(20.0, 0.0), 0.0));
        assert_eq!(trail.points().len(), 2);
    }

    #[rstest]
    fn second_point_is_kept_even_with_same_heading() {
        let mut trail = TrailRecorder::new(1.0);
        trail.add_point(Vec2::ZERO, 0.5);
        assert!(trail.add_point(Vec2::new(10.0, 0.0), 0.5));
    }

    #[rstest]
    #[case(9.9, false)]
    #[case(10.0, true)]
    #[case(15.0, true)]
    fn enforces_min_spacing(#[case] x: f32, #[case] accepted: bool) {
        let mut trail = TrailRecorder::new(10.0);
        trail.add_point(Vec2::ZERO, 0.0);
        assert_eq!(trail.add_point(Vec2::new(x, 0.0), 1.0), accepted);
    }

    #[rstest]
    fn crossing_collapses_loop() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(20.0, 0.0);
        let c = Vec2::new(20.0, 20.0);
        let d = Vec2::new(0.0, -20.0);
        let mut trail = TrailRecorder::new(1.0);
        for (point, heading) in [(a, 0.0), (b, 0.1), (c, 0.2), (d, 0.3)] {
            trail.add_point(point, heading);
        }
        assert_eq!(trail.points(), &[a, Vec2::new(10.0, 0.0), d]);
    }

    #[rstest]
    fn homeward_starts_at_nearest_point() {
        let mut trail = TrailRecorder::new(1.0);
        let samples = [
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 10.0),
        ];
        for (i, point) in samples.iter().enumerate() {
            trail.add_point(*point, i as f32);
        }
        let route = trail.homeward_from(Vec2::new(11.0, 11.0));
        assert_eq!(route, vec![Vec2::new(10.0, 10.0), Vec2::new(10.0, 0.0), Vec2::ZERO]);
    }

    #[rstest]
    fn reset_clears_heading() {
        let mut trail = TrailRecorder::default();
        trail.add_point(Vec2::ZERO, 1.0);
        trail.reset();
        assert!(trail.is_empty());
        assert_eq!(trail.last_heading(), None);
        assert!(trail.homeward_from(Vec2::ONE).is_empty());
    }
}
