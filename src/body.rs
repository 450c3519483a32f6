//! Physics body handle driven by motors and the interpolator.
//!
//! The rigid-body solver lives outside this crate. Motors only talk to it
//! through [`Body`], which exposes exactly the handful of operations they
//! need. [`KinematicBody`] is the in-crate implementation used by the world
//! table and tests: velocities are expressed in world units per tick and
//! integrated once per step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::vector_math::{denormalize_angle, unit_from_heading};
use crate::STOPPED_EPSILON;

/// Operations a motor may perform on the body it drives.
pub trait Body {
    /// Current world position.
    fn position(&self) -> Vec2;

    /// Teleports the body to `position`.
    fn set_position(&mut self, position: Vec2);

    /// Current linear velocity in world units per tick.
    fn velocity(&self) -> Vec2;

    /// Replaces the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Sets the velocity to `speed` along `angle`.
    fn set_velocity_from_angle(&mut self, angle: f32, speed: f32) {
        self.set_velocity(unit_from_heading(angle) * speed);
    }

    /// Current orientation in `(-π, π]`.
    fn orientation(&self) -> f32;

    /// Replaces the orientation.
    fn set_orientation(&mut self, radian: f32);

    /// Zeroes the linear velocity.
    fn stop(&mut self) {
        self.set_velocity(Vec2::ZERO);
    }

    /// Whether the body is effectively at rest.
    fn is_stopped(&self) -> bool {
        self.velocity().length() <= STOPPED_EPSILON
    }
}

/// Minimal kinematic body integrating its own velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicBody {
    /// World position.
    pub position: Vec2,
    /// Linear velocity in world units per tick.
    pub velocity: Vec2,
    /// Orientation in `(-π, π]`.
    pub orientation: f32,
}

impl KinematicBody {
    /// Creates a body at rest at `position` facing `orientation`.
    #[must_use]
    pub fn at(position: Vec2, orientation: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            orientation: denormalize_angle(orientation),
        }
    }

    /// Advances the position by one tick of velocity.
    ///
    /// Non-finite velocities are discarded instead of poisoning the
    /// position.
    pub fn integrate(&mut self) {
        if !self.velocity.is_finite() {
            log::warn!("discarding non-finite velocity {:?}", self.velocity);
            self.velocity = Vec2::ZERO;
            return;
        }
        self.position += self.velocity;
    }
}

impl Body for KinematicBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn orientation(&self) -> f32 {
        self.orientation
    }

    fn set_orientation(&mut self, radian: f32) {
        self.orientation = radian;
    }
}
