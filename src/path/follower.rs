//! Scalar-distance walker over a [`Polyline`].

use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};

use super::Polyline;
use crate::vector_math::reverse_heading;
use crate::PATH_EPSILON;

/// Direction of travel along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// From the first point toward the last.
    #[default]
    Forward,
    /// From the last point toward the first.
    Backward,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Position along a path expressed as a travelled distance.
///
/// The follower owns its polyline and a current distance. Open paths clamp
/// the distance into `[0, total]`; closed paths wrap it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    path: Option<Polyline>,
    direction: Direction,
    distance: f32,
    epsilon: f32,
}

impl Default for PathFollower {
    fn default() -> Self {
        Self {
            path: None,
            direction: Direction::Forward,
            distance: 0.0,
            epsilon: PATH_EPSILON,
        }
    }
}

impl PathFollower {
    /// Creates a follower positioned at the start of travel for `direction`.
    ///
    /// A degenerate polyline leaves the follower without a path.
    #[must_use]
    pub fn new(path: Polyline, direction: Direction) -> Self {
        let mut follower = Self {
            direction,
            ..Self::default()
        };
        follower.set_path(path);
        follower
    }

    /// Overrides the endpoint tolerance used by [`Self::at_start`] and
    /// [`Self::at_end`].
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Installs a new path and rewinds to the start of travel.
    ///
    /// Returns `false` and clears any previous path when `path` has fewer
    /// than two distinct points.
    pub fn set_path(&mut self, path: Polyline) -> bool {
        if path.points().len() < 2 || path.is_degenerate() {
            warn!(
                "ignoring degenerate path with {} point(s)",
                path.points().len()
            );
            self.path = None;
            self.distance = 0.0;
            return false;
        }
        self.distance = match self.direction {
            Direction::Forward => 0.0,
            Direction::Backward => path.total_length(),
        };
        self.path = Some(path);
        true
    }

    /// Drops the current path.
    pub fn clear(&mut self) {
        self.path = None;
        self.distance = 0.0;
    }

    /// The installed path, if any.
    #[must_use]
    pub const fn path(&self) -> Option<&Polyline> {
        self.path.as_ref()
    }

    /// Whether a usable path is installed.
    #[must_use]
    pub const fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Total length of the installed path, zero without one.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.path.as_ref().map_or(0.0, Polyline::total_length)
    }

    /// Current direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes the direction of travel without moving.
    pub const fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Current travelled distance.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Jumps to `distance`, normalised like [`Self::advance`] would.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.advance(distance, 0.0, self.direction);
    }

    /// Distance reached by moving `step` units from `distance` in
    /// `direction`.
    ///
    /// Open paths clamp the result into `[0, total]`; closed paths wrap it
    /// modulo the total length. Without a path the result is zero.
    #[must_use]
    pub fn advance(&self, distance: f32, step: f32, direction: Direction) -> f32 {
        let Some(path) = self.path.as_ref() else {
            return 0.0;
        };
        let total = path.total_length();
        let moved = match direction {
            Direction::Forward => distance + step,
            Direction::Backward => distance - step,
        };
        if path.is_closed() {
            let wrapped = moved.rem_euclid(total);
            if wrapped >= total {
                0.0
            } else {
                wrapped
            }
        } else {
            moved.clamp(0.0, total)
        }
    }

    /// Moves the follower `step` units along its direction and returns the
    /// new distance.
    pub fn step(&mut self, step: f32) -> f32 {
        self.distance = self.advance(self.distance, step, self.direction);
        self.distance
    }

    /// Point and heading at `distance` along the path.
    ///
    /// The heading is the covering segment's direction, turned around when
    /// travelling backward. Returns `None` without a path.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use isowalk::path::{Direction, PathFollower, Polyline};
    /// let follower = PathFollower::new(
    ///     Polyline::open(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]),
    ///     Direction::Forward,
    /// );
    /// let (point, heading) = follower.position_at_distance(4.0).unwrap();
    /// assert_eq!(point, Vec2::new(4.0, 0.0));
    /// assert_eq!(heading, 0.0);
    /// ```
    #[must_use]
    pub fn position_at_distance(&self, distance: f32) -> Option<(Vec2, f32)> {
        let path = self.path.as_ref()?;
        let clamped = self.advance(distance, 0.0, Direction::Forward);
        let index = path.segment_index_at(clamped)?;
        let segment = path.segments().get(index)?;
        let point = segment.point_at(clamped - segment.offset);
        let heading = match self.direction {
            Direction::Forward => segment.heading,
            Direction::Backward => reverse_heading(segment.heading),
        };
        Some((point, heading))
    }

    /// Point and heading at the current distance.
    #[must_use]
    pub fn current(&self) -> Option<(Vec2, f32)> {
        self.position_at_distance(self.distance)
    }

    /// Whether the follower sits on the first point.
    #[must_use]
    pub const fn at_start(&self) -> bool {
        self.path.is_some() && self.distance <= self.epsilon
    }

    /// Whether the follower sits on the last point.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.path
            .as_ref()
            .is_some_and(|path| self.distance >= path.total_length() - self.epsilon)
    }

    /// Whether the follower sits at the end of travel for its direction.
    #[must_use]
    pub fn at_destination(&self) -> bool {
        match self.direction {
            Direction::Forward => self.at_end(),
            Direction::Backward => self.at_start(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};
    use std::f32::consts::{FRAC_PI_2, PI};

    #[fixture]
    fn elbow() -> Polyline {
        Polyline::open(vec![
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 5.0),
        ])
    }

    #[rstest]
    fn full_length_returns_final_vertex(elbow: Polyline) {
        let follower = PathFollower::new(elbow, Direction::Forward);
        let (point, heading) = follower.position_at_distance(15.0).unwrap();
        assert_eq!(point, Vec2::new(10.0, 5.0));
        assert_relative_eq!(heading, FRAC_PI_2);
    }

    #[rstest]
    fn open_path_clamps(elbow: Polyline) {
        let follower = PathFollower::new(elbow, Direction::Forward);
        assert_relative_eq!(follower.advance(14.0, 5.0, Direction::Forward), 15.0);
        assert_relative_eq!(follower.advance(1.0, 5.0, Direction::Backward), 0.0);
    }

    #[rstest]
    fn closed_path_wraps(elbow: Polyline) {
        let closed = Polyline::closed(elbow.points().to_vec());
        let total = closed.total_length();
        let follower = PathFollower::new(closed, Direction::Forward);
        assert_relative_eq!(follower.advance(total - 1.0, 1.0, Direction::Forward), 0.0);
        assert_relative_eq!(follower.advance(total - 1.0, 3.0, Direction::Forward), 2.0);
        assert_relative_eq!(
            follower.advance(1.0, 3.0, Direction::Backward),
            total - 2.0,
            epsilon = 1e-4
        );
    }

    #[rstest]
    fn vertex_uses_first_segment_heading(elbow: Polyline) {
        let follower = PathFollower::new(elbow, Direction::Forward);
        let (point, heading) = follower.position_at_distance(10.0).unwrap();
        assert_eq!(point, Vec2::new(10.0, 0.0));
        assert_relative_eq!(heading, 0.0);
    }

    #[rstest]
    fn backward_heading_is_reversed(elbow: Polyline) {
        let follower = PathFollower::new(elbow, Direction::Backward);
        assert_relative_eq!(follower.distance(), 15.0);
        let (_, heading) = follower.position_at_distance(5.0).unwrap();
        assert_relative_eq!(heading, PI, epsilon = 1e-6);
    }

    #[rstest]
    fn degenerate_path_leaves_follower_empty() {
        let mut follower = PathFollower::default();
        assert!(!follower.set_path(Polyline::open(vec![Vec2::ONE])));
        assert!(!follower.has_path());
        assert!(follower.position_at_distance(1.0).is_none());
        assert!(!follower.at_end());
    }

    #[rstest]
    fn endpoints_detected_within_epsilon(elbow: Polyline) {
        let mut follower = PathFollower::new(elbow, Direction::Forward);
        assert!(follower.at_start());
        follower.step(15.0 - PATH_EPSILON / 2.0);
        assert!(follower.at_end());
        assert!(follower.at_destination());
    }
}
