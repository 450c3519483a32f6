//! Patrol along a fixed polyline.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{WaitState, WaitTimer};
use crate::body::Body;
use crate::clock::TickClock;
use crate::path::{Direction, PathFollower, Polyline};
use crate::vector_math::limit_speed;

/// Saved position of a [`PathMotor`] along its path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathProgress {
    /// Travelled distance from the first point.
    pub distance: f32,
    /// Direction of travel.
    pub direction: Direction,
}

/// Walks a body along a polyline, pausing at the ends of open paths.
///
/// Open paths are walked back and forth: on reaching an end the motor waits
/// for the configured dwell and then turns around. Closed paths loop without
/// pausing.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMotor {
    follower: PathFollower,
    wait_at_start_ms: u64,
    wait_at_end_ms: u64,
    timer: WaitTimer,
}

impl PathMotor {
    /// Creates a motor walking `path` in `direction` without dwelling.
    #[must_use]
    pub fn new(path: Polyline, direction: Direction) -> Self {
        Self {
            follower: PathFollower::new(path, direction),
            wait_at_start_ms: 0,
            wait_at_end_ms: 0,
            timer: WaitTimer::default(),
        }
    }

    /// Sets the pause, in milliseconds, at the first and last point.
    #[must_use]
    pub const fn with_dwell(mut self, at_start_ms: u64, at_end_ms: u64) -> Self {
        self.wait_at_start_ms = at_start_ms;
        self.wait_at_end_ms = at_end_ms;
        self
    }

    /// Sets the endpoint tolerance used to decide when to turn around.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.follower = self.follower.with_epsilon(epsilon);
        self
    }

    /// The underlying follower.
    #[must_use]
    pub const fn follower(&self) -> &PathFollower {
        &self.follower
    }

    /// Pause at the first point in milliseconds.
    #[must_use]
    pub const fn wait_at_start_ms(&self) -> u64 {
        self.wait_at_start_ms
    }

    /// Pause at the last point in milliseconds.
    #[must_use]
    pub const fn wait_at_end_ms(&self) -> u64 {
        self.wait_at_end_ms
    }

    /// Where the path begins.
    #[must_use]
    pub fn base_point(&self) -> Option<Vec2> {
        self.follower
            .path()
            .and_then(|path| path.points().first().copied())
    }

    /// Current distance and direction.
    #[must_use]
    pub const fn progress(&self) -> PathProgress {
        PathProgress {
            distance: self.follower.distance(),
            direction: self.follower.direction(),
        }
    }

    /// Jumps to a previously saved [`PathProgress`].
    pub fn restore(&mut self, progress: PathProgress) {
        self.follower.set_direction(progress.direction);
        self.follower.set_distance(progress.distance);
        self.timer.disarm();
    }

    /// Whether the motor is pausing at an endpoint.
    #[must_use]
    pub fn is_waiting(&self, clock: &dyn TickClock) -> bool {
        self.timer.is_running(clock)
    }

    /// Handles dwelling and turning at an endpoint. Returns `true` while the
    /// body must stay put.
    fn dwell(&mut self, clock: &dyn TickClock) -> bool {
        let is_closed = self.follower.path().is_some_and(Polyline::is_closed);
        if is_closed || !self.follower.at_destination() {
            return false;
        }
        let wait_ms = match self.follower.direction() {
            Direction::Forward => self.wait_at_end_ms,
            Direction::Backward => self.wait_at_start_ms,
        };
        match self.timer.state(clock) {
            WaitState::Invalid if wait_ms > 0 => {
                self.timer.arm(clock, wait_ms);
                true
            }
            WaitState::Running => true,
            WaitState::Invalid | WaitState::Overdue => {
                self.timer.disarm();
                let turned = self.follower.direction().reversed();
                self.follower.set_direction(turned);
                false
            }
        }
    }

    /// Advances one tick. Returns the heading the body should face, or
    /// `None` while dwelling or without a path.
    pub fn update_body(
        &mut self,
        body: &mut dyn Body,
        speed: f32,
        clock: &dyn TickClock,
    ) -> Option<f32> {
        if !self.follower.has_path() || self.dwell(clock) {
            body.stop();
            return None;
        }
        self.follower.step(speed);
        let (point, heading) = self.follower.current()?;
        body.set_velocity(limit_speed(point - body.position(), speed));
        Some(heading)
    }
}
