//! Converts bracketing snapshots into body motion.

use glam::Vec2;
use log::{trace, warn};

use super::{InterpolationBundle, MovementState, Snapshot};
use crate::body::Body;
use crate::numeric::ticks_to_f32;
use crate::vector_math::limit_speed;
use crate::{SETTLE_TICKS, STOPPED_EPSILON, TELEPORT_FACTOR};

/// What [`SnapshotInterpolator::apply`] did to the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolationOutcome {
    /// The target is already in the past; nothing changed.
    StaleTarget,
    /// No target snapshot; nothing changed.
    Holding,
    /// A snapshot lacked a position; nothing changed.
    MissingPosition,
    /// Idle-to-idle correction too large to walk, steered at the implied
    /// speed.
    Teleporting {
        /// Speed in world units per tick.
        speed: f32,
    },
    /// Body already rests on the target.
    AlreadyStopped,
    /// Body was stopped and snapped onto the target.
    Settled,
    /// Body steered to reach the target on its tick.
    Steering {
        /// Speed in world units per tick.
        speed: f32,
    },
    /// The state pair has no defined transition; nothing changed.
    InvalidTransition {
        /// State of the earlier snapshot.
        from: MovementState,
        /// State of the target snapshot.
        to: MovementState,
    },
}

impl InterpolationOutcome {
    /// Whether the body's motion was changed.
    #[must_use]
    pub const fn moved_body(&self) -> bool {
        matches!(
            self,
            Self::Teleporting { .. } | Self::Settled | Self::Steering { .. }
        )
    }
}

/// Reconciles a body with authoritative snapshots.
///
/// The interpolator keeps the tick of the last target it saw so it can flag
/// snapshots arriving out of order. Such anomalies are logged and otherwise
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInterpolator {
    teleport_factor: f32,
    settle_ticks: f32,
    last_target_tick: Option<u64>,
}

impl Default for SnapshotInterpolator {
    fn default() -> Self {
        Self::new(TELEPORT_FACTOR, SETTLE_TICKS)
    }
}

impl SnapshotInterpolator {
    /// Creates an interpolator.
    ///
    /// `teleport_factor` multiplies the normal per-tick speed to give the
    /// speed above which an idle correction counts as a teleport;
    /// `settle_ticks` is how many ticks of normal travel still count as
    /// "close enough" to snap.
    #[must_use]
    pub const fn new(teleport_factor: f32, settle_ticks: f32) -> Self {
        Self {
            teleport_factor,
            settle_ticks,
            last_target_tick: None,
        }
    }

    /// Tick of the last target snapshot seen.
    #[must_use]
    pub const fn last_target_tick(&self) -> Option<u64> {
        self.last_target_tick
    }

    fn track_order(&mut self, bundle: &InterpolationBundle) {
        if let Some(previous) = self.last_target_tick {
            if bundle.s1.tick > previous {
                warn!(
                    "snapshot order anomaly: s1 tick {} passed previous target tick {previous}",
                    bundle.s1.tick
                );
            }
        }
        if let Some(s2) = &bundle.s2 {
            self.last_target_tick = Some(s2.tick);
        }
    }

    /// Applies `bundle` to `body`, whose normal speed is `normal_speed`
    /// units per tick.
    pub fn apply(
        &mut self,
        bundle: &InterpolationBundle,
        body: &mut dyn Body,
        normal_speed: f32,
    ) -> InterpolationOutcome {
        self.track_order(bundle);
        let Some(s2) = bundle.s2.as_ref() else {
            trace!("no target snapshot at tick {}", bundle.current_tick);
            return InterpolationOutcome::Holding;
        };
        if s2.tick <= bundle.current_tick {
            warn!(
                "stale target snapshot {} at tick {}",
                s2.tick, bundle.current_tick
            );
            return InterpolationOutcome::StaleTarget;
        }
        let (Some(_), Some(target)) = (bundle.s1.position, s2.position) else {
            return InterpolationOutcome::MissingPosition;
        };

        let remaining = ticks_to_f32(s2.tick - bundle.current_tick);
        let offset = target - body.position();
        let distance = offset.length();
        let implied_speed = distance / remaining;
        let settle_distance = self.settle_ticks * normal_speed;

        match (bundle.s1.movement, s2.movement) {
            (MovementState::Idle, MovementState::Idle) => {
                if implied_speed > self.teleport_factor * normal_speed {
                    body.set_velocity(limit_speed(offset, implied_speed));
                    InterpolationOutcome::Teleporting {
                        speed: implied_speed,
                    }
                } else if body.velocity().length() <= STOPPED_EPSILON
                    && distance <= settle_distance.max(STOPPED_EPSILON)
                {
                    InterpolationOutcome::AlreadyStopped
                } else {
                    settle(body, target, s2);
                    InterpolationOutcome::Settled
                }
            }
            (_, MovementState::Idle) if distance < settle_distance => {
                settle(body, target, s2);
                InterpolationOutcome::Settled
            }
            (_, MovementState::Moving) => {
                body.set_velocity(limit_speed(offset, implied_speed));
                InterpolationOutcome::Steering {
                    speed: implied_speed,
                }
            }
            (from, to) => {
                warn!(
                    "invalid snapshot transition {from:?} -> {to:?} at tick {}",
                    bundle.current_tick
                );
                InterpolationOutcome::InvalidTransition { from, to }
            }
        }
    }
}

fn settle(body: &mut dyn Body, target: Vec2, s2: &Snapshot) {
    body.stop();
    body.set_position(target);
    body.set_orientation(s2.orientation);
}
