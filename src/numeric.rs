//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains: world coordinates into chunk indices and milliseconds into tick
//! counts.

/// Floor a world-space offset divided by a cell size into a cell index.
///
/// Returns `None` for non-finite input or when the result falls outside the
/// `usize` domain (including negative offsets).
///
/// # Examples
/// ```
/// use isowalk::numeric::floor_to_index;
/// assert_eq!(floor_to_index(45.0, 30.0), Some(1));
/// assert_eq!(floor_to_index(-0.5, 30.0), None);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The floored value is validated against the usize domain."
)]
#[must_use]
pub fn floor_to_index(offset: f32, cell_size: f32) -> Option<usize> {
    if !offset.is_finite() || !cell_size.is_finite() || cell_size <= 0.0 {
        return None;
    }
    let floored = (offset / cell_size).floor();
    if floored < 0.0 || floored >= usize::MAX as f32 {
        return None;
    }
    Some(floored as usize)
}

/// Number of whole cells needed to cover `extent` with cells of at most
/// `cell_size`, never fewer than one.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Callers validate that both inputs are finite and positive."
)]
#[must_use]
pub fn cell_count(extent: f32, cell_size: f32) -> usize {
    debug_assert!(extent.is_finite() && extent > 0.0, "extent must be positive");
    debug_assert!(
        cell_size.is_finite() && cell_size > 0.0,
        "cell size must be positive"
    );
    ((extent / cell_size).ceil() as usize).max(1)
}

/// Convert a cell index into `f32` for coordinate arithmetic.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid dimensions stay far below the f32 mantissa limit."
)]
#[must_use]
pub const fn index_to_f32(index: usize) -> f32 {
    index as f32
}

/// Convert a millisecond duration into whole ticks at `rate_hz`, rounding up
/// so that a non-zero wait always lasts at least one tick.
///
/// # Examples
/// ```
/// use isowalk::numeric::ms_to_ticks;
/// assert_eq!(ms_to_ticks(1000, 60), 60);
/// assert_eq!(ms_to_ticks(10, 60), 1);
/// assert_eq!(ms_to_ticks(0, 60), 0);
/// ```
#[must_use]
pub fn ms_to_ticks(ms: u64, rate_hz: u32) -> u64 {
    (ms * u64::from(rate_hz)).div_ceil(1000)
}

/// Convert a tick count into `f32` for speed arithmetic.
#[expect(
    clippy::cast_precision_loss,
    reason = "Tick differences used for speed arithmetic are small."
)]
#[must_use]
pub const fn ticks_to_f32(ticks: u64) -> f32 {
    ticks as f32
}
