//! Tunable locomotion settings and authored motor definitions.
//!
//! Every empirically tuned number lives in [`LocomotionConfig`]. Defaults
//! come from [`constants`](crate::constants); a TOML file may override any
//! subset of them.
//!
//! ```toml
//! tick_rate_hz = 30
//!
//! [interpolation]
//! teleport_factor = 20.0
//!
//! [motors.gate_guard]
//! kind = "fix_position"
//! point = [120.0, 40.0]
//! facing = "south"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::FixedRateClock;
use crate::facing::FacingNames;
use crate::motor::{FixPositionMotor, Motor, PathMotor, ReturnPathMotor, RotationMotor};
use crate::path::{Direction, Polyline};
use crate::rotation::{RotationSmoother, SweepDirection};
use crate::snapshot::{SnapshotInterpolator, SnapshotStore};
use crate::{
    CHUNK_SIZE, DIAGONAL_COST, JITTER_TICKS, PATH_EPSILON, ROTATION_STEP_PER_TICK,
    ROTATION_TOLERANCE, SETTLE_TICKS, TELEPORT_FACTOR, TICK_RATE_HZ, TRAIL_MIN_SPACING,
};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML was malformed or had unexpected fields.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A facing name was not recognised.
    #[error("unknown facing '{0}'")]
    UnknownFacing(String),
    /// A value was out of range.
    #[error("{field} {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Walkability grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Target chunk edge length in world units.
    pub chunk_size: f32,
    /// Cost of a diagonal step relative to an orthogonal one.
    pub diagonal_cost: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            diagonal_cost: DIAGONAL_COST,
        }
    }
}

/// Path following settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathConfig {
    /// Endpoint tolerance.
    pub epsilon: f32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            epsilon: PATH_EPSILON,
        }
    }
}

/// Trail recording settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailConfig {
    /// Minimum spacing between recorded points.
    pub min_spacing: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            min_spacing: TRAIL_MIN_SPACING,
        }
    }
}

/// Snapshot interpolation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpolationConfig {
    /// Multiple of normal speed beyond which idle corrections teleport.
    pub teleport_factor: f32,
    /// Ticks of normal travel within which a target is snapped to.
    pub settle_ticks: f32,
    /// Render delay in ticks.
    pub jitter_ticks: u64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            teleport_factor: TELEPORT_FACTOR,
            settle_ticks: SETTLE_TICKS,
            jitter_ticks: JITTER_TICKS,
        }
    }
}

/// Rotation smoothing settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationConfig {
    /// Radians turned per tick.
    pub step_per_tick: f32,
    /// Angle under which orientations count as equal.
    pub tolerance: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            step_per_tick: ROTATION_STEP_PER_TICK,
            tolerance: ROTATION_TOLERANCE,
        }
    }
}

/// Return-to-base settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReturnPathConfig {
    /// Delay before setting off home, in milliseconds.
    pub wait_ms: u64,
}

/// Motor definition as authored in a scene or configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum MotorSpec {
    /// Patrol along `points`.
    Path {
        /// Path vertices.
        points: Vec<Vec2>,
        /// Whether the path loops.
        #[serde(default)]
        closed: bool,
        /// Initial direction.
        #[serde(default)]
        direction: Direction,
        /// Pause at the first point in milliseconds.
        #[serde(default)]
        wait_at_start_ms: u64,
        /// Pause at the last point in milliseconds.
        #[serde(default)]
        wait_at_end_ms: u64,
    },
    /// Stand at `point`.
    FixPosition {
        /// Anchor point.
        point: Vec2,
        /// Facing name such as `"north"` or `"se"`.
        #[serde(default)]
        facing: Option<String>,
    },
    /// Scan between two angles in degrees.
    Rotation {
        /// Anchor point.
        point: Vec2,
        /// First extreme in degrees.
        from: f32,
        /// Second extreme in degrees.
        to: f32,
        /// Increments between extremes.
        #[serde(default = "default_steps")]
        steps: u32,
        /// Pause after each increment in milliseconds.
        #[serde(default)]
        wait_ms: u64,
        /// Turning direction of the outbound leg.
        #[serde(default = "default_sweep")]
        direction: SweepDirection,
    },
    /// Return to `base` after a chase.
    ReturnPath {
        /// Home point.
        base: Vec2,
    },
}

const fn default_steps() -> u32 {
    1
}

const fn default_sweep() -> SweepDirection {
    SweepDirection::Clockwise
}

impl MotorSpec {
    /// Builds the motor, resolving facing names through `names`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownFacing`] for an unrecognised facing
    /// name.
    pub fn build(
        &self,
        names: &FacingNames,
        config: &LocomotionConfig,
    ) -> Result<Motor, ConfigError> {
        let motor = match self {
            Self::Path {
                points,
                closed,
                direction,
                wait_at_start_ms,
                wait_at_end_ms,
            } => {
                let line = if *closed {
                    Polyline::closed(points.clone())
                } else {
                    Polyline::open(points.clone())
                };
                PathMotor::new(line, *direction)
                    .with_dwell(*wait_at_start_ms, *wait_at_end_ms)
                    .with_epsilon(config.path.epsilon)
                    .into()
            }
            Self::FixPosition { point, facing } => {
                let resolved = facing
                    .as_deref()
                    .map(|name| {
                        names
                            .resolve(name)
                            .ok_or_else(|| ConfigError::UnknownFacing(name.to_owned()))
                    })
                    .transpose()?;
                FixPositionMotor::new(*point, resolved).into()
            }
            Self::Rotation {
                point,
                from,
                to,
                steps,
                wait_ms,
                direction,
            } => RotationMotor::new(*point, *from, *to, *steps, *wait_ms, *direction).into(),
            Self::ReturnPath { base } => config.return_path_motor(*base).into(),
        };
        Ok(motor)
    }
}

/// All tunable locomotion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    /// Simulation rate in ticks per second.
    pub tick_rate_hz: u32,
    /// Grid settings.
    pub grid: GridConfig,
    /// Path following settings.
    pub path: PathConfig,
    /// Trail settings.
    pub trail: TrailConfig,
    /// Interpolation settings.
    pub interpolation: InterpolationConfig,
    /// Rotation smoothing settings.
    pub rotation: RotationConfig,
    /// Return-to-base settings.
    pub return_path: ReturnPathConfig,
    /// Named motor definitions.
    pub motors: BTreeMap<String, MotorSpec>,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            grid: GridConfig::default(),
            path: PathConfig::default(),
            trail: TrailConfig::default(),
            interpolation: InterpolationConfig::default(),
            rotation: RotationConfig::default(),
            return_path: ReturnPathConfig::default(),
            motors: BTreeMap::new(),
        }
    }
}

const fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

const fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

const fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

impl LocomotionConfig {
    /// Parses and validates TOML text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("loaded locomotion config from {}", path.display());
        Ok(config)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.tick_rate_hz > 0, "tick_rate_hz", "must be positive")?;
        ensure(positive(self.grid.chunk_size), "grid.chunk_size", "must be positive")?;
        ensure(
            positive(self.grid.diagonal_cost),
            "grid.diagonal_cost",
            "must be positive",
        )?;
        ensure(non_negative(self.path.epsilon), "path.epsilon", "must not be negative")?;
        ensure(
            non_negative(self.trail.min_spacing),
            "trail.min_spacing",
            "must not be negative",
        )?;
        ensure(
            positive(self.interpolation.teleport_factor),
            "interpolation.teleport_factor",
            "must be positive",
        )?;
        ensure(
            non_negative(self.interpolation.settle_ticks),
            "interpolation.settle_ticks",
            "must not be negative",
        )?;
        ensure(
            positive(self.rotation.step_per_tick),
            "rotation.step_per_tick",
            "must be positive",
        )?;
        ensure(
            non_negative(self.rotation.tolerance),
            "rotation.tolerance",
            "must not be negative",
        )
    }

    /// Builds the named motor.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an unknown name, otherwise as
    /// [`MotorSpec::build`].
    pub fn motor(&self, name: &str, names: &FacingNames) -> Result<Motor, ConfigError> {
        let spec = self.motors.get(name).ok_or(ConfigError::Invalid {
            field: "motors",
            reason: "has no entry with that name",
        })?;
        spec.build(names, self)
    }

    /// Clock running at the configured rate.
    #[must_use]
    pub const fn clock(&self) -> FixedRateClock {
        FixedRateClock::new(self.tick_rate_hz)
    }

    /// Rotation smoother with the configured step and tolerance.
    #[must_use]
    pub fn rotation_smoother(&self) -> RotationSmoother {
        RotationSmoother::new(self.rotation.step_per_tick, self.rotation.tolerance)
    }

    /// Interpolator with the configured thresholds.
    #[must_use]
    pub const fn interpolator(&self) -> SnapshotInterpolator {
        SnapshotInterpolator::new(
            self.interpolation.teleport_factor,
            self.interpolation.settle_ticks,
        )
    }

    /// Empty snapshot store with the configured jitter delay.
    #[must_use]
    pub const fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.interpolation.jitter_ticks)
    }

    /// Idle return motor heading to `base`.
    #[must_use]
    pub fn return_path_motor(&self, base: Vec2) -> ReturnPathMotor {
        ReturnPathMotor::with_settings(base, self.trail.min_spacing, self.return_path.wait_ms)
    }
}
