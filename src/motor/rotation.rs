//! Stationary motor sweeping its orientation back and forth.

use std::f32::consts::TAU;

use glam::Vec2;

use super::WaitTimer;
use crate::body::Body;
use crate::clock::TickClock;
use crate::numeric::index_to_f32;
use crate::rotation::SweepDirection;
use crate::vector_math::denormalize_angle;

/// Wraps degrees into `[0, 360)`.
fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Looks around from a fixed spot, like a sentry scanning a doorway.
///
/// The orientation moves from `from` toward `to` (degrees, increasing
/// clockwise in screen space) in `steps` equal increments, turning in the
/// configured direction. Each increment is followed by a wait; on reaching
/// either extreme the sweep reverses. When `from` equals `to` the motor
/// keeps turning the same way through full circles.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationMotor {
    point: Vec2,
    from: f32,
    to: f32,
    steps: u32,
    wait_ms: u64,
    direction: SweepDirection,
    arc: f32,
    delta: f32,
    progress: f32,
    outbound: bool,
    started: bool,
    timer: WaitTimer,
}

impl RotationMotor {
    /// Creates a motor at `point` sweeping between `from_degrees` and
    /// `to_degrees`.
    ///
    /// Zero `increments` behave like one.
    #[must_use]
    pub fn new(
        point: Vec2,
        from_degrees: f32,
        to_degrees: f32,
        increments: u32,
        wait_ms: u64,
        direction: SweepDirection,
    ) -> Self {
        let from = normalize_degrees(from_degrees);
        let to = normalize_degrees(to_degrees);
        let steps = increments.max(1);
        let arc_degrees = match direction {
            _ if (from - to).abs() <= f32::EPSILON => 360.0,
            SweepDirection::Clockwise => (to - from).rem_euclid(360.0),
            SweepDirection::CounterClockwise => (from - to).rem_euclid(360.0),
        };
        let arc = arc_degrees.to_radians();
        Self {
            point,
            from,
            to,
            steps,
            wait_ms,
            direction,
            arc,
            delta: arc / index_to_f32(steps as usize),
            progress: 0.0,
            outbound: true,
            started: false,
            timer: WaitTimer::default(),
        }
    }

    /// Start of the sweep in degrees.
    #[must_use]
    pub const fn from_degrees(&self) -> f32 {
        self.from
    }

    /// End of the sweep in degrees.
    #[must_use]
    pub const fn to_degrees(&self) -> f32 {
        self.to
    }

    /// Number of increments between the extremes.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Angle turned per increment in radians.
    #[must_use]
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Configured turning direction for the outbound leg.
    #[must_use]
    pub const fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Direction of the leg currently being swept.
    #[must_use]
    pub const fn current_direction(&self) -> SweepDirection {
        match (self.outbound, self.direction) {
            (true, direction) => direction,
            (false, SweepDirection::Clockwise) => SweepDirection::CounterClockwise,
            (false, SweepDirection::CounterClockwise) => SweepDirection::Clockwise,
        }
    }

    /// The spot the motor holds its body at.
    #[must_use]
    pub const fn point(&self) -> Vec2 {
        self.point
    }

    const fn is_full_circle(&self) -> bool {
        (self.from - self.to).abs() <= f32::EPSILON
    }

    /// Current orientation in `(-π, π]`.
    #[must_use]
    pub fn orientation(&self) -> f32 {
        let start = self.from.to_radians();
        let turned = match self.direction {
            SweepDirection::Clockwise => start + self.progress,
            SweepDirection::CounterClockwise => start - self.progress,
        };
        denormalize_angle(turned)
    }

    fn advance(&mut self) {
        if self.is_full_circle() {
            self.progress = (self.progress + self.delta).rem_euclid(TAU);
            return;
        }
        if self.outbound {
            self.progress += self.delta;
            if self.progress >= self.arc - f32::EPSILON {
                self.progress = self.arc;
                self.outbound = false;
            }
        } else {
            self.progress -= self.delta;
            if self.progress <= f32::EPSILON {
                self.progress = 0.0;
                self.outbound = true;
            }
        }
    }

    /// Holds the body still and returns the orientation it should face.
    ///
    /// The first call faces `from`; later calls advance one increment each
    /// time the wait elapses.
    pub fn update_body(&mut self, body: &mut dyn Body, clock: &dyn TickClock) -> Option<f32> {
        body.stop();
        if !self.started {
            self.started = true;
            self.progress = 0.0;
            self.outbound = true;
        } else if self.timer.is_running(clock) {
            return Some(self.orientation());
        } else {
            self.advance();
        }
        self.timer.arm(clock, self.wait_ms);
        Some(self.orientation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KinematicBody;
    use crate::clock::FixedRateClock;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn sweep(motor: &mut RotationMotor, ticks: usize) -> Vec<f32> {
        let mut body = KinematicBody::default();
        let mut clock = FixedRateClock::default();
        (0..ticks)
            .map(|_| {
                let heading = motor.update_body(&mut body, &clock).unwrap();
                clock.advance();
                heading.to_degrees()
            })
            .collect()
    }

    #[rstest]
    fn oscillates_between_extremes() {
        let mut motor =
            RotationMotor::new(Vec2::ZERO, 0.0, 90.0, 2, 0, SweepDirection::Clockwise);
        let seen = sweep(&mut motor, 6);
        let expected = [0.0, 45.0, 90.0, 45.0, 0.0, 45.0];
        for (got, want) in seen.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-3);
        }
    }

    #[rstest]
    fn counter_clockwise_wraps_through_zero() {
        let mut motor = RotationMotor::new(
            Vec2::ZERO,
            30.0,
            330.0,
            3,
            0,
            SweepDirection::CounterClockwise,
        );
        let seen = sweep(&mut motor, 4);
        let expected = [30.0, 10.0, -10.0, -30.0];
        for (got, want) in seen.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-3);
        }
        assert_eq!(motor.current_direction(), SweepDirection::Clockwise);
    }

    #[rstest]
    fn equal_extremes_spin_full_circles() {
        let mut motor =
            RotationMotor::new(Vec2::ZERO, 0.0, 0.0, 4, 0, SweepDirection::Clockwise);
        let seen = sweep(&mut motor, 6);
        let expected = [0.0, 90.0, 180.0, -90.0, 0.0, 90.0];
        for (got, want) in seen.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-3);
        }
    }

    #[rstest]
    fn zero_increments_sweep_in_one_step() {
        let mut motor =
            RotationMotor::new(Vec2::ZERO, 360.0, 450.0, 0, 0, SweepDirection::Clockwise);
        let seen = sweep(&mut motor, 4);
        let expected = [0.0, 90.0, 0.0, 90.0];
        for (got, want) in seen.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-3);
        }
    }

    #[rstest]
    fn waits_between_increments() {
        // 50 ms at 60 Hz is three ticks.
        let mut motor =
            RotationMotor::new(Vec2::ZERO, 0.0, 90.0, 1, 50, SweepDirection::Clockwise);
        let seen = sweep(&mut motor, 5);
        let expected = [0.0, 0.0, 0.0, 90.0, 90.0];
        for (got, want) in seen.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-3);
        }
    }
}
