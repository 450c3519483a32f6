//! A simulated entity: its body, discrete facing and movement strategy.

use glam::Vec2;
use log::trace;

use crate::body::{Body, KinematicBody};
use crate::clock::TickClock;
use crate::facing::{Facing, FacingResolution};
use crate::grid::ChunkPathfinder;
use crate::motor::{Motor, ReturnPathMotor};
use crate::rotation::RotationSmoother;
use crate::snapshot::{InterpolationOutcome, Snapshot, SnapshotInterpolator, SnapshotStore};
use crate::vector_math::{denormalize_angle, heading_of, normalize_angle};

/// Snapshot history and reconciliation state of a remotely driven entity.
#[derive(Debug, Clone, PartialEq)]
struct RemoteSync {
    store: SnapshotStore,
    interpolator: SnapshotInterpolator,
}

/// Entity owned by the [`WorldHandle`](crate::world_handle::WorldHandle).
///
/// Each tick the attached [`Motor`] (if any) sets the body's velocity and
/// names a heading. The heading is applied through the optional
/// [`RotationSmoother`] so sprites turn gradually, then the body is
/// integrated and the discrete [`Facing`] refreshed.
///
/// Remote entities have no motor; their motion comes from authoritative
/// snapshots pushed through [`Self::push_snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldEntity {
    body: KinematicBody,
    speed: f32,
    facing: Facing,
    resolution: FacingResolution,
    motor: Option<Motor>,
    smoother: Option<RotationSmoother>,
    remote: Option<RemoteSync>,
}

impl WorldEntity {
    /// Creates an entity at rest at `position` moving up to `speed` units
    /// per tick.
    #[must_use]
    pub fn new(position: Vec2, speed: f32) -> Self {
        let body = KinematicBody::at(position, 0.0);
        let resolution = FacingResolution::default();
        Self {
            facing: Facing::nearest(resolution, body.orientation),
            body,
            speed,
            resolution,
            motor: None,
            smoother: None,
            remote: None,
        }
    }

    /// Limits the entity to the facings its sprite set supports.
    #[must_use]
    pub fn with_resolution(mut self, resolution: FacingResolution) -> Self {
        self.resolution = resolution;
        self.refresh_facing();
        self
    }

    /// Turns gradually using `smoother` instead of snapping to headings.
    #[must_use]
    pub const fn with_smoother(mut self, smoother: RotationSmoother) -> Self {
        self.smoother = Some(smoother);
        self
    }

    /// Drives the entity from authoritative snapshots.
    #[must_use]
    pub fn with_remote_sync(
        mut self,
        store: SnapshotStore,
        interpolator: SnapshotInterpolator,
    ) -> Self {
        self.remote = Some(RemoteSync {
            store,
            interpolator,
        });
        self
    }

    /// The physics body.
    #[must_use]
    pub const fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// Mutable access to the physics body.
    pub const fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Maximum speed in world units per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Changes the maximum speed.
    pub const fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Discrete facing after the last tick.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Facing resolution of the sprite set.
    #[must_use]
    pub const fn resolution(&self) -> FacingResolution {
        self.resolution
    }

    /// The attached motor.
    #[must_use]
    pub const fn motor(&self) -> Option<&Motor> {
        self.motor.as_ref()
    }

    /// Mutable access to the attached motor.
    pub const fn motor_mut(&mut self) -> Option<&mut Motor> {
        self.motor.as_mut()
    }

    /// Whether a motor is attached.
    #[must_use]
    pub const fn has_motor(&self) -> bool {
        self.motor.is_some()
    }

    /// The attached return motor, if that is what drives the entity.
    #[must_use]
    pub fn return_motor(&self) -> Option<&ReturnPathMotor> {
        self.motor.as_ref().and_then(Motor::as_return_path)
    }

    /// Whether the entity follows snapshots rather than a motor.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Attaches `motor`.
    ///
    /// # Panics
    /// Panics when a motor is already attached; call [`Self::clear_motor`]
    /// first.
    pub fn attach_motor(&mut self, motor: impl Into<Motor>) {
        let attached: Motor = motor.into();
        assert!(
            self.motor.is_none(),
            "attaching {:?} motor over an existing one",
            attached.kind()
        );
        trace!("attached {:?} motor", attached.kind());
        self.motor = Some(attached);
    }

    /// Detaches and returns the motor, stopping the body and any turn in
    /// progress.
    pub fn clear_motor(&mut self) -> Option<Motor> {
        let motor = self.motor.take();
        if motor.is_some() {
            self.body.stop();
            if let Some(smoother) = self.smoother.as_mut() {
                smoother.cancel();
            }
        }
        motor
    }

    /// Steers the entity externally along `angle` at full speed, recording
    /// its trail. Returns `false` without a return motor.
    pub fn drive(&mut self, angle: f32) -> bool {
        let speed = self.speed;
        let Some(motor) = self.motor.as_mut().and_then(Motor::as_return_path_mut) else {
            return false;
        };
        motor.move_body(&mut self.body, angle, speed);
        true
    }

    /// Starts the return home from the current position.
    ///
    /// Returns `None` without a return motor, otherwise whether a route was
    /// found.
    pub fn finish_return(
        &mut self,
        pathfinder: Option<&ChunkPathfinder>,
        clock: &dyn TickClock,
    ) -> Option<bool> {
        let position = self.body.position;
        let motor = self.motor.as_mut().and_then(Motor::as_return_path_mut)?;
        Some(motor.finish(position, pathfinder, clock))
    }

    /// Queues an authoritative snapshot. Returns `false` for entities not
    /// driven by snapshots.
    pub fn push_snapshot(&mut self, snapshot: Snapshot) -> bool {
        let Some(remote) = self.remote.as_mut() else {
            return false;
        };
        remote.store.insert(snapshot);
        true
    }

    /// Reconciles the body with the snapshot history for `current_tick`.
    ///
    /// Returns `None` for local entities or before any usable snapshot has
    /// arrived.
    pub fn reconcile(&mut self, current_tick: u64) -> Option<InterpolationOutcome> {
        let remote = self.remote.as_mut()?;
        let bundle = remote.store.bundle(current_tick)?;
        let outcome = remote
            .interpolator
            .apply(&bundle, &mut self.body, self.speed);
        remote.store.zap(bundle.current_tick);
        Some(outcome)
    }

    /// Runs one simulation tick.
    pub fn tick(&mut self, clock: &dyn TickClock) {
        let desired = if self.remote.is_some() {
            self.reconcile(clock.current_tick());
            (!self.body.is_stopped()).then(|| heading_of(self.body.velocity))
        } else {
            let speed = self.speed;
            self.motor
                .as_mut()
                .and_then(|motor| motor.update_body(&mut self.body, speed, clock))
        };
        if let Some(heading) = desired {
            self.turn_towards(heading);
        }
        self.body.integrate();
        self.refresh_facing();
    }

    fn turn_towards(&mut self, heading: f32) {
        match self.smoother.as_mut() {
            Some(smoother) => {
                smoother.rotate(&mut self.body, heading);
            }
            None => self
                .body
                .set_orientation(denormalize_angle(normalize_angle(heading))),
        }
    }

    fn refresh_facing(&mut self) {
        self.facing = Facing::nearest(self.resolution, self.body.orientation);
    }
}
