//! Default tuning constants used across the locomotion systems.
//!
//! Apart from the grid size limit, every value here is mirrored by a field in
//! [`LocomotionConfig`](crate::config::LocomotionConfig); these are only the
//! defaults a freshly constructed configuration starts from.

/// Fixed simulation rate in ticks per second.
pub const TICK_RATE_HZ: u32 = 60;
/// Target edge length of a pathfinding chunk in world units.
pub const CHUNK_SIZE: f32 = 30.0;
/// Largest number of chunks a walkability grid may hold.
pub const MAX_GRID_CHUNKS: usize = 1 << 20;
/// Cost of a diagonal step between chunks, relative to an orthogonal step.
pub const DIAGONAL_COST: f32 = 1.0;
/// Distance under which a path position counts as sitting on an endpoint.
pub const PATH_EPSILON: f32 = 1e-4;
/// Minimum spacing between consecutive trail points.
pub const TRAIL_MIN_SPACING: f32 = 10.0;
/// Multiple of the normal per-tick speed above which an idle-to-idle
/// correction is treated as a deliberate teleport.
pub const TELEPORT_FACTOR: f32 = 30.0;
/// Number of ticks of normal-speed travel under which a target is settled.
pub const SETTLE_TICKS: f32 = 1.0;
/// Render delay, in ticks, applied by the snapshot store's jitter buffer.
pub const JITTER_TICKS: u64 = 6;
/// Default angular step of the rotation smoother in radians per tick.
pub const ROTATION_STEP_PER_TICK: f32 = 0.2;
/// Hard cap on a single rotation step.
pub const ROTATION_MAX_STEP: f32 = std::f32::consts::FRAC_PI_4;
/// Angular tolerance under which two orientations are considered equal.
pub const ROTATION_TOLERANCE: f32 = 1e-4;
/// Velocity magnitude under which a body counts as stopped.
pub const STOPPED_EPSILON: f32 = 1e-4;
