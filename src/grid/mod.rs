//! Walkability rasterisation and coarse pathfinding.
//!
//! A scene's blocking geometry is rasterised into a [`WalkabilityGrid`] of
//! chunks much larger than a map tile. [`ChunkPathfinder`] searches that
//! grid, keeping route finding cheap enough to run synchronously for many
//! seekers within one tick.

mod pathfinder;
mod shape;
mod walkability;

use thiserror::Error;

pub use pathfinder::ChunkPathfinder;
pub use shape::{BlockingShape, Rect};
pub use walkability::{ChunkCoord, WalkabilityGrid};

/// Errors raised while building a walkability grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The scene bounds have no area.
    #[error("scene bounds must have positive area, got {width}x{height}")]
    EmptyBounds {
        /// Width of the rejected bounds.
        width: f32,
        /// Height of the rejected bounds.
        height: f32,
    },
    /// The requested chunk size is not a positive finite number.
    #[error("chunk size must be positive and finite, got {0}")]
    InvalidChunkSize(f32),
    /// The bounds divided by the chunk size need more chunks than a grid
    /// may hold.
    #[error("a {cols}x{rows} chunk grid exceeds the chunk limit")]
    TooManyChunks {
        /// Chunk columns the bounds would need.
        cols: usize,
        /// Chunk rows the bounds would need.
        rows: usize,
    },
}
