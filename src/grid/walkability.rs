//! Coarse boolean grid over a scene.

use glam::Vec2;
use log::debug;

use super::{BlockingShape, GridError, Rect};
use crate::numeric::{cell_count, floor_to_index, index_to_f32};
use crate::MAX_GRID_CHUNKS;

/// Column and row of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Column, growing to the right.
    pub col: usize,
    /// Row, growing downward.
    pub row: usize,
}

impl ChunkCoord {
    /// Builds a coordinate.
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Uniform chunk grid marking which chunks can be walked through.
///
/// The grid is immutable once built. When the blocking geometry changes the
/// owner builds a fresh grid and swaps it in.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkabilityGrid {
    bounds: Rect,
    cols: usize,
    rows: usize,
    chunk: Vec2,
    walkable: Vec<bool>,
}

impl WalkabilityGrid {
    /// Rasterises `blockers` over `bounds`.
    ///
    /// The number of chunks per axis is `ceil(extent / chunk_size)` and each
    /// chunk is then stretched so the grid covers the bounds exactly. A chunk
    /// is blocked when any shape overlaps its interior.
    ///
    /// # Errors
    /// Returns [`GridError`] when the bounds are empty, the chunk size is
    /// not a positive finite number, or the grid would exceed
    /// [`MAX_GRID_CHUNKS`] chunks.
    pub fn build<'a, I>(bounds: Rect, chunk_size: f32, blockers: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = &'a BlockingShape>,
    {
        if !bounds.is_valid() {
            return Err(GridError::EmptyBounds {
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        if !chunk_size.is_finite() || chunk_size <= 0.0 {
            return Err(GridError::InvalidChunkSize(chunk_size));
        }
        let cols = cell_count(bounds.width(), chunk_size);
        let rows = cell_count(bounds.height(), chunk_size);
        let total = cols
            .checked_mul(rows)
            .filter(|total| *total <= MAX_GRID_CHUNKS)
            .ok_or(GridError::TooManyChunks { cols, rows })?;
        let chunk = Vec2::new(
            bounds.width() / index_to_f32(cols),
            bounds.height() / index_to_f32(rows),
        );
        let mut grid = Self {
            bounds,
            cols,
            rows,
            chunk,
            walkable: vec![true; total],
        };
        let mut blocked = 0_usize;
        for shape in blockers {
            blocked += grid.rasterise(shape);
        }
        debug!(
            "built {cols}x{rows} walkability grid ({:.1}x{:.1} chunks, {blocked} blocked)",
            chunk.x, chunk.y
        );
        Ok(grid)
    }

    fn rasterise(&mut self, shape: &BlockingShape) -> usize {
        let Some(area) = shape.bounds() else {
            return 0;
        };
        let (lo, hi) = self.clamped_span(&area);
        let mut newly_blocked = 0;
        for row in lo.row..=hi.row {
            for col in lo.col..=hi.col {
                let coord = ChunkCoord::new(col, row);
                if !shape.intersects_rect(&self.chunk_rect(coord)) {
                    continue;
                }
                let index = self.index_of(coord);
                if let Some(cell) = self.walkable.get_mut(index) {
                    if *cell {
                        newly_blocked += 1;
                    }
                    *cell = false;
                }
            }
        }
        newly_blocked
    }

    /// Chunk range covering `area`, clamped to the grid.
    fn clamped_span(&self, area: &Rect) -> (ChunkCoord, ChunkCoord) {
        let clamp = |point: Vec2| {
            let local = (point - self.bounds.min).max(Vec2::ZERO);
            let col = floor_to_index(local.x, self.chunk.x).unwrap_or(0);
            let row = floor_to_index(local.y, self.chunk.y).unwrap_or(0);
            ChunkCoord::new(
                col.min(self.cols.saturating_sub(1)),
                row.min(self.rows.saturating_sub(1)),
            )
        };
        (clamp(area.min), clamp(area.max))
    }

    const fn index_of(&self, coord: ChunkCoord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Scene bounds covered by the grid.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of chunk columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of chunk rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Size of a single chunk.
    #[must_use]
    pub const fn chunk_size(&self) -> Vec2 {
        self.chunk
    }

    /// Chunk containing `point`, `None` outside the bounds.
    ///
    /// Points on the far edge of the bounds belong to the last chunk.
    #[must_use]
    pub fn chunk_of(&self, point: Vec2) -> Option<ChunkCoord> {
        if !self.bounds.contains(point) {
            return None;
        }
        let local = point - self.bounds.min;
        let col = floor_to_index(local.x, self.chunk.x)?.min(self.cols - 1);
        let row = floor_to_index(local.y, self.chunk.y)?.min(self.rows - 1);
        Some(ChunkCoord::new(col, row))
    }

    /// Whether `coord` lies inside the grid and is unblocked.
    #[must_use]
    pub fn is_walkable(&self, coord: ChunkCoord) -> bool {
        coord.col < self.cols
            && coord.row < self.rows
            && self
                .walkable
                .get(self.index_of(coord))
                .copied()
                .unwrap_or(false)
    }

    /// World rectangle covered by `coord`.
    #[must_use]
    pub fn chunk_rect(&self, coord: ChunkCoord) -> Rect {
        let min = self.bounds.min
            + Vec2::new(index_to_f32(coord.col), index_to_f32(coord.row)) * self.chunk;
        Rect::from_min_size(min, self.chunk)
    }

    /// World centre of `coord`.
    #[must_use]
    pub fn center_of(&self, coord: ChunkCoord) -> Vec2 {
        self.chunk_rect(coord).center()
    }

    /// Walkable neighbours of `coord` in the eight compass directions,
    /// paired with whether the step is diagonal.
    pub fn neighbours(&self, coord: ChunkCoord) -> impl Iterator<Item = (ChunkCoord, bool)> + '_ {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let col = coord.col.checked_add_signed(dx)?;
            let row = coord.row.checked_add_signed(dy)?;
            let next = ChunkCoord::new(col, row);
            self.is_walkable(next).then_some((next, dx != 0 && dy != 0))
        })
    }

    /// Whether a step from `from` to `to` stays clear of blocked chunks.
    ///
    /// For a diagonal step both chunks sharing an edge with `from` and `to`
    /// must be walkable. Orthogonal steps only need their endpoints.
    #[must_use]
    pub fn clears_corner(&self, from: ChunkCoord, to: ChunkCoord) -> bool {
        self.is_walkable(ChunkCoord::new(to.col, from.row))
            && self.is_walkable(ChunkCoord::new(from.col, to.row))
    }

    /// Count of blocked chunks.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.walkable.iter().filter(|cell| !**cell).count()
    }
}
