//! Stationary motor for guards and props.

use glam::Vec2;

use crate::body::Body;
use crate::facing::Facing;

/// Holds a body at one point, optionally facing a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixPositionMotor {
    point: Vec2,
    facing: Option<Facing>,
}

impl FixPositionMotor {
    /// Creates a motor anchored at `point`.
    #[must_use]
    pub const fn new(point: Vec2, facing: Option<Facing>) -> Self {
        Self { point, facing }
    }

    /// The anchor point.
    #[must_use]
    pub const fn point(&self) -> Vec2 {
        self.point
    }

    /// Facing the body snaps to each tick, if any.
    #[must_use]
    pub const fn facing(&self) -> Option<Facing> {
        self.facing
    }

    /// Stops the body and reports the configured facing as a heading.
    pub fn update_body(&self, body: &mut dyn Body) -> Option<f32> {
        body.stop();
        self.facing.map(Facing::to_radian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KinematicBody;
    use rstest::rstest;

    #[rstest]
    #[case(Some(Facing::West), Some(std::f32::consts::PI))]
    #[case(None, None)]
    fn stops_and_reports_facing(#[case] facing: Option<Facing>, #[case] heading: Option<f32>) {
        let motor = FixPositionMotor::new(Vec2::new(3.0, 4.0), facing);
        let mut body = KinematicBody::default();
        body.set_velocity(Vec2::new(1.0, 1.0));
        assert_eq!(motor.update_body(&mut body), heading);
        assert!(body.is_stopped());
    }
}
