//! Pluggable movement strategies driving an entity's body.
//!
//! The set of motors is closed, so [`Motor`] is a plain enum rather than a
//! trait object. Every variant answers the same two questions each tick:
//! how should the body move, and which way should it face.

mod fix_position;
mod path;
mod return_path;
mod rotation;
mod wait_timer;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::clock::TickClock;

pub use fix_position::FixPositionMotor;
pub use path::{PathMotor, PathProgress};
pub use return_path::{ReturnPathMotor, ReturnState, RouteSource};
pub use rotation::RotationMotor;
pub use wait_timer::{WaitState, WaitTimer};

/// Discriminant of a [`Motor`], handy for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorKind {
    /// [`PathMotor`].
    Path,
    /// [`FixPositionMotor`].
    FixPosition,
    /// [`RotationMotor`].
    Rotation,
    /// [`ReturnPathMotor`].
    ReturnPath,
}

/// Movement strategy attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Motor {
    /// Patrols a polyline.
    Path(PathMotor),
    /// Holds one spot.
    FixPosition(FixPositionMotor),
    /// Scans back and forth on the spot.
    Rotation(RotationMotor),
    /// Returns home after a chase.
    ReturnPath(ReturnPathMotor),
}

impl Motor {
    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> MotorKind {
        match self {
            Self::Path(_) => MotorKind::Path,
            Self::FixPosition(_) => MotorKind::FixPosition,
            Self::Rotation(_) => MotorKind::Rotation,
            Self::ReturnPath(_) => MotorKind::ReturnPath,
        }
    }

    /// Drives `body` for one tick at up to `speed` units per tick.
    ///
    /// Returns the heading the body should turn toward, if the motor has an
    /// opinion this tick.
    pub fn update_body(
        &mut self,
        body: &mut dyn Body,
        speed: f32,
        clock: &dyn TickClock,
    ) -> Option<f32> {
        match self {
            Self::Path(motor) => motor.update_body(body, speed, clock),
            Self::FixPosition(motor) => motor.update_body(body),
            Self::Rotation(motor) => motor.update_body(body, clock),
            Self::ReturnPath(motor) => motor.update_body(body, speed, clock),
        }
    }

    /// The point the motor considers home, if it has one.
    #[must_use]
    pub fn base_point(&self) -> Option<Vec2> {
        match self {
            Self::Path(motor) => motor.base_point(),
            Self::FixPosition(motor) => Some(motor.point()),
            Self::Rotation(motor) => Some(motor.point()),
            Self::ReturnPath(motor) => Some(motor.base_point()),
        }
    }

    /// The return motor, when this is one.
    #[must_use]
    pub const fn as_return_path(&self) -> Option<&ReturnPathMotor> {
        match self {
            Self::ReturnPath(motor) => Some(motor),
            _ => None,
        }
    }

    /// Mutable access to the return motor, when this is one.
    pub const fn as_return_path_mut(&mut self) -> Option<&mut ReturnPathMotor> {
        match self {
            Self::ReturnPath(motor) => Some(motor),
            _ => None,
        }
    }

    /// The patrol motor, when this is one.
    #[must_use]
    pub const fn as_path(&self) -> Option<&PathMotor> {
        match self {
            Self::Path(motor) => Some(motor),
            _ => None,
        }
    }
}

impl From<PathMotor> for Motor {
    fn from(motor: PathMotor) -> Self {
        Self::Path(motor)
    }
}

impl From<FixPositionMotor> for Motor {
    fn from(motor: FixPositionMotor) -> Self {
        Self::FixPosition(motor)
    }
}

impl From<RotationMotor> for Motor {
    fn from(motor: RotationMotor) -> Self {
        Self::Rotation(motor)
    }
}

impl From<ReturnPathMotor> for Motor {
    fn from(motor: ReturnPathMotor) -> Self {
        Self::ReturnPath(motor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facing::Facing;
    use crate::path::{Direction, Polyline};
    use crate::rotation::SweepDirection;
    use rstest::rstest;

    #[rstest]
    #[case(
        PathMotor::new(
            Polyline::open(vec![Vec2::ONE, Vec2::splat(5.0)]),
            Direction::Forward,
        )
        .into(),
        MotorKind::Path,
        Some(Vec2::ONE)
    )]
    #[case(
        FixPositionMotor::new(Vec2::new(2.0, 3.0), Some(Facing::North)).into(),
        MotorKind::FixPosition,
        Some(Vec2::new(2.0, 3.0))
    )]
    #[case(
        RotationMotor::new(Vec2::X, 0.0, 90.0, 3, 100, SweepDirection::Clockwise).into(),
        MotorKind::Rotation,
        Some(Vec2::X)
    )]
    #[case(ReturnPathMotor::new(Vec2::Y).into(), MotorKind::ReturnPath, Some(Vec2::Y))]
    fn dispatch_reports_kind_and_base(
        #[case] motor: Motor,
        #[case] kind: MotorKind,
        #[case] base: Option<Vec2>,
    ) {
        assert_eq!(motor.kind(), kind);
        assert_eq!(motor.base_point(), base);
        assert_eq!(motor.as_return_path().is_some(), kind == MotorKind::ReturnPath);
    }
}
