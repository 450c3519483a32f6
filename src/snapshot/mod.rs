//! Authoritative state snapshots and their reconciliation with local motion.
//!
//! Remote entities receive sparse, tick-stamped [`Snapshot`]s. The
//! [`SnapshotStore`] keeps them in tick order and, for each rendered tick,
//! picks the pair bracketing it. [`SnapshotInterpolator`] then turns that
//! pair into a velocity so the body glides toward the authoritative state
//! instead of jumping between samples.

mod interpolator;
mod store;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use interpolator::{InterpolationOutcome, SnapshotInterpolator};
pub use store::SnapshotStore;

/// Coarse activity of an entity at a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementState {
    /// Standing still.
    #[default]
    Idle,
    /// Walking or running.
    Moving,
    /// Busy with an action such as an attack.
    Acting,
}

/// Entity state as seen by the authority at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick the state was sampled at.
    pub tick: u64,
    /// World position, when the authority sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    /// Orientation in `(-π, π]`.
    #[serde(default)]
    pub orientation: f32,
    /// Activity.
    #[serde(default)]
    pub movement: MovementState,
    /// Velocity in world units per tick, when sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec2>,
}

impl Snapshot {
    /// Snapshot with a position and no velocity.
    #[must_use]
    pub const fn at(tick: u64, position: Vec2, movement: MovementState) -> Self {
        Self {
            tick,
            position: Some(position),
            orientation: 0.0,
            movement,
            velocity: None,
        }
    }

    /// Sets the orientation.
    #[must_use]
    pub const fn facing(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the velocity.
    #[must_use]
    pub const fn moving_at(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Whether `next` continues the same motion, so the two can be treated
    /// as one segment when picking an interpolation target.
    #[expect(
        clippy::float_cmp,
        reason = "Continuation is decided on the exact values sent by the authority."
    )]
    #[must_use]
    pub fn can_merge(&self, next: &Self) -> bool {
        self.movement == next.movement
            && self.orientation == next.orientation
            && self.velocity == next.velocity
    }
}

/// Snapshots bracketing the tick being simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationBundle {
    /// Latest known state at or before `current_tick`.
    pub s1: Snapshot,
    /// Target state after `current_tick`, if one has arrived.
    pub s2: Option<Snapshot>,
    /// Most recently received state.
    pub last: Option<Snapshot>,
    /// Tick being simulated.
    pub current_tick: u64,
}

impl InterpolationBundle {
    /// Bundle without a target.
    #[must_use]
    pub const fn holding(s1: Snapshot, current_tick: u64) -> Self {
        Self {
            s1,
            s2: None,
            last: None,
            current_tick,
        }
    }

    /// Bundle interpolating from `s1` toward `s2`.
    #[must_use]
    pub const fn between(s1: Snapshot, s2: Snapshot, current_tick: u64) -> Self {
        Self {
            s1,
            s2: Some(s2),
            last: None,
            current_tick,
        }
    }
}
