//! Bounded-rate orientation animation.
//!
//! Bodies never snap to a new heading. [`RotationSmoother`] turns them a
//! limited angle per tick, always the short way round, and lands exactly on
//! the requested orientation.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::vector_math::{angular_distance, denormalize_angle, normalize_angle};
use crate::{ROTATION_MAX_STEP, ROTATION_STEP_PER_TICK, ROTATION_TOLERANCE};

/// Turning sense in screen space, where `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    /// Increasing angle.
    Clockwise,
    /// Decreasing angle.
    CounterClockwise,
}

impl SweepDirection {
    /// Short-way direction from `current` to `desired`, both normalised.
    ///
    /// A difference of exactly half a turn resolves clockwise.
    #[must_use]
    pub fn shortest(current: f32, desired: f32) -> Self {
        if (desired - current).rem_euclid(TAU) > PI {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    /// Angle left to travel from `current` to `target` in this direction.
    #[must_use]
    pub fn remaining(self, current: f32, target: f32) -> f32 {
        match self {
            Self::Clockwise => (target - current).rem_euclid(TAU),
            Self::CounterClockwise => (current - target).rem_euclid(TAU),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sweep {
    target: f32,
    direction: SweepDirection,
}

/// Turns a body toward a desired orientation at a bounded rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationSmoother {
    step_per_tick: f32,
    tolerance: f32,
    sweep: Option<Sweep>,
}

impl Default for RotationSmoother {
    fn default() -> Self {
        Self::new(ROTATION_STEP_PER_TICK, ROTATION_TOLERANCE)
    }
}

impl RotationSmoother {
    /// Creates a smoother. The step is capped at a quarter of a half turn.
    #[must_use]
    pub const fn new(step_per_tick: f32, tolerance: f32) -> Self {
        Self {
            step_per_tick: step_per_tick.abs().min(ROTATION_MAX_STEP),
            tolerance: tolerance.abs(),
            sweep: None,
        }
    }

    /// Effective angular step per tick.
    #[must_use]
    pub const fn step_per_tick(&self) -> f32 {
        self.step_per_tick
    }

    /// Whether a sweep is in progress.
    #[must_use]
    pub const fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Direction of the sweep in progress.
    #[must_use]
    pub fn direction(&self) -> Option<SweepDirection> {
        self.sweep.map(|sweep| sweep.direction)
    }

    /// Abandons any sweep in progress.
    pub const fn cancel(&mut self) {
        self.sweep = None;
    }

    /// Advances `body` one tick toward `desired`. Returns `false` when the
    /// body already faces `desired`.
    ///
    /// # Examples
    /// ```
    /// use isowalk::body::{Body, KinematicBody};
    /// use isowalk::rotation::RotationSmoother;
    /// use std::f32::consts::PI;
    /// let mut body = KinematicBody::default();
    /// let mut smoother = RotationSmoother::new(0.5, 1e-4);
    /// while smoother.rotate(&mut body, PI) {}
    /// assert_eq!(body.orientation(), PI);
    /// ```
    #[expect(
        clippy::float_cmp,
        reason = "The target is recomputed only when the request changes."
    )]
    pub fn rotate(&mut self, body: &mut dyn Body, desired: f32) -> bool {
        let current = normalize_angle(body.orientation());
        let target = normalize_angle(desired);
        if angular_distance(current, target) <= self.tolerance {
            self.sweep = None;
            return false;
        }
        let direction = match self.sweep {
            Some(sweep) if sweep.target == target => sweep.direction,
            _ => SweepDirection::shortest(current, target),
        };
        self.sweep = Some(Sweep { target, direction });

        let remaining = direction.remaining(current, target);
        if self.step_per_tick >= remaining {
            body.set_orientation(denormalize_angle(target));
            self.sweep = None;
            return true;
        }
        let next = match direction {
            SweepDirection::Clockwise => current + self.step_per_tick,
            SweepDirection::CounterClockwise => current - self.step_per_tick,
        };
        body.set_orientation(denormalize_angle(next));
        true
    }
}
