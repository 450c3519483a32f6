#![cfg_attr(docsrs, feature(doc_cfg))]
//! Entity locomotion and state reconciliation for an isometric action game.
//!
//! Every simulation tick an entity's [`Motor`] decides where its body goes
//! and which way it faces. Patrols follow polylines, guards hold a spot or
//! scan an arc, and lured enemies find their way home over a coarse
//! walkability grid or their own recorded trail. Remotely driven entities
//! are instead reconciled against sparse authoritative [`Snapshot`]s.
pub mod body;
pub mod clock;
pub mod config;
pub mod constants;
pub mod entity;
pub mod facing;
pub mod grid;
pub mod logging;
pub mod motor;
pub mod numeric;
pub mod path;
pub mod rotation;
pub mod snapshot;
pub mod trail;
pub mod vector_math;
pub mod world_handle;
pub use constants::*;

// Re-export commonly used items
pub use body::{Body, KinematicBody};
pub use clock::{FixedRateClock, TickClock};
pub use config::{ConfigError, LocomotionConfig, MotorSpec};
pub use entity::WorldEntity;
pub use facing::{Facing, FacingNames, FacingResolution};
pub use grid::{BlockingShape, ChunkPathfinder, GridError, Rect, WalkabilityGrid};
pub use logging::init as init_logging;
pub use motor::{
    FixPositionMotor, Motor, MotorKind, PathMotor, ReturnPathMotor, ReturnState, RotationMotor,
};
pub use path::{Direction, PathFollower, Polyline};
pub use rotation::{RotationSmoother, SweepDirection};
pub use snapshot::{
    InterpolationBundle, InterpolationOutcome, MovementState, Snapshot, SnapshotInterpolator,
    SnapshotStore,
};
pub use trail::TrailRecorder;
pub use world_handle::{BlockerId, EntityId, WorldError, WorldHandle};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use isowalk::prelude::*;
    //! ```

    pub use crate::Body;
    pub use crate::ChunkPathfinder;
    pub use crate::Direction;
    pub use crate::LocomotionConfig;
    pub use crate::Motor;
    pub use crate::PathMotor;
    pub use crate::Polyline;
    pub use crate::ReturnPathMotor;
    pub use crate::TickClock;
    pub use crate::WorldEntity;
    pub use crate::WorldHandle;
    pub use glam::Vec2;
}
