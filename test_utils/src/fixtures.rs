//! Ready-made worlds, grids and clocks shared by integration tests.

use glam::Vec2;
use isowalk::{
    BlockingShape, ChunkPathfinder, FixedRateClock, LocomotionConfig, Rect, WalkabilityGrid,
    WorldHandle,
};

/// Square scene with its top-left corner at the origin.
///
/// # Examples
/// ```
/// use test_utils::fixtures::scene;
/// assert_eq!(scene(90.0).width(), 90.0);
/// ```
pub fn scene(size: f32) -> Rect {
    Rect::new(Vec2::ZERO, Vec2::splat(size))
}

/// Clock at `tick` running at the default rate.
pub fn clock_at(tick: u64) -> FixedRateClock {
    FixedRateClock::starting_at(tick, isowalk::TICK_RATE_HZ)
}

/// Rectangle blocking chunk `(col, row)` of a grid with `chunk`-sized cells,
/// inset so it does not touch the neighbouring chunks.
pub fn chunk_blocker(col: u16, row: u16, chunk: f32) -> BlockingShape {
    let min = Vec2::new(f32::from(col), f32::from(row)) * chunk + Vec2::ONE;
    BlockingShape::Rect(Rect::new(min, min + Vec2::splat(chunk - 2.0)))
}

/// 60x60 scene of 30-unit chunks with the top-right chunk blocked.
///
/// # Panics
/// Panics if the grid cannot be built, which would be a bug in the fixture.
pub fn two_by_two_with_blocked_corner() -> ChunkPathfinder {
    let blocker = chunk_blocker(1, 0, 30.0);
    let grid = WalkabilityGrid::build(scene(60.0), 30.0, [&blocker])
        .unwrap_or_else(|err| panic!("fixture grid failed to build: {err}"));
    ChunkPathfinder::new(grid)
}

/// Empty world over a `size`-by-`size` scene with default tuning.
///
/// # Panics
/// Panics if the world cannot be created, which would be a bug in the
/// fixture.
pub fn empty_world(size: f32) -> WorldHandle {
    WorldHandle::new(scene(size), LocomotionConfig::default())
        .unwrap_or_else(|err| panic!("fixture world failed to build: {err}"))
}
