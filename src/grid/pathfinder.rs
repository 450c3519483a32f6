//! Chunk-level shortest path search.

use glam::Vec2;
use log::{debug, trace};
use ordered_float::OrderedFloat;
use pathfinding::prelude::dijkstra;

use super::{ChunkCoord, WalkabilityGrid};
use crate::DIAGONAL_COST;

/// Finds coarse routes between world points over a [`WalkabilityGrid`].
///
/// Routes start and end on the exact requested points; every waypoint in
/// between is the centre of a chunk the search passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPathfinder {
    grid: WalkabilityGrid,
    diagonal_cost: f32,
}

impl ChunkPathfinder {
    /// Wraps `grid` using the default diagonal step cost.
    #[must_use]
    pub fn new(grid: WalkabilityGrid) -> Self {
        Self::with_diagonal_cost(grid, DIAGONAL_COST)
    }

    /// Wraps `grid` with a custom diagonal step cost. Non-positive or
    /// non-finite costs fall back to the default.
    #[must_use]
    pub fn with_diagonal_cost(grid: WalkabilityGrid, diagonal_cost: f32) -> Self {
        let cost = if diagonal_cost.is_finite() && diagonal_cost > 0.0 {
            diagonal_cost
        } else {
            DIAGONAL_COST
        };
        Self {
            grid,
            diagonal_cost: cost,
        }
    }

    /// The grid searched by this pathfinder.
    #[must_use]
    pub const fn grid(&self) -> &WalkabilityGrid {
        &self.grid
    }

    /// Replaces the grid after the scene's blocking geometry changed.
    pub fn replace_grid(&mut self, grid: WalkabilityGrid) {
        self.grid = grid;
    }

    /// Route from `from` to `to`.
    ///
    /// Returns `None` when the points coincide, when `from` lies outside the
    /// grid or in a blocked chunk, and when `to` cannot be reached. Points
    /// sharing a chunk produce `[to]` without searching.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use isowalk::grid::{ChunkPathfinder, Rect, WalkabilityGrid};
    /// let bounds = Rect::from_min_size(Vec2::ZERO, Vec2::new(90.0, 30.0));
    /// let grid = WalkabilityGrid::build(bounds, 30.0, []).unwrap();
    /// let finder = ChunkPathfinder::new(grid);
    /// let route = finder.find_path(Vec2::new(5.0, 5.0), Vec2::new(85.0, 5.0)).unwrap();
    /// assert_eq!(route, vec![Vec2::new(5.0, 5.0), Vec2::new(45.0, 15.0), Vec2::new(85.0, 5.0)]);
    /// ```
    #[must_use]
    pub fn find_path(&self, from: Vec2, to: Vec2) -> Option<Vec<Vec2>> {
        if from == to {
            trace!("path request to own position {from}");
            return None;
        }
        let Some(start) = self.grid.chunk_of(from) else {
            debug!("path start {from} outside the scene");
            return None;
        };
        if !self.grid.is_walkable(start) {
            debug!("path start {from} sits in blocked chunk {start:?}");
            return None;
        }
        let Some(goal) = self.grid.chunk_of(to) else {
            debug!("path goal {to} outside the scene");
            return None;
        };
        if start == goal {
            return Some(vec![to]);
        }
        let Some(chunks) = self.search(start, goal) else {
            debug!("no route from {from} to {to}");
            return None;
        };
        let inner = chunks
            .get(1..chunks.len().saturating_sub(1))
            .unwrap_or_default();
        let mut route = Vec::with_capacity(inner.len() + 2);
        route.push(from);
        route.extend(inner.iter().map(|coord| self.grid.center_of(*coord)));
        route.push(to);
        Some(route)
    }

    /// Dijkstra over walkable chunks, returning the chunk sequence from
    /// `start` to `goal` inclusive.
    fn search(&self, start: ChunkCoord, goal: ChunkCoord) -> Option<Vec<ChunkCoord>> {
        if !self.grid.is_walkable(goal) {
            return None;
        }
        let (chunks, cost) = dijkstra(
            &start,
            |coord| self.successors(*coord),
            |coord| *coord == goal,
        )?;
        trace!(
            "chunk route {start:?} -> {goal:?}: {} steps, cost {}",
            chunks.len().saturating_sub(1),
            cost.0
        );
        Some(chunks)
    }

    /// Steps out of `coord` with their costs. Diagonal steps are only
    /// offered when both chunks beside them are walkable, so a straight
    /// segment between route points never clips a blocked corner.
    fn successors(
        &self,
        coord: ChunkCoord,
    ) -> impl Iterator<Item = (ChunkCoord, OrderedFloat<f32>)> + '_ {
        self.grid
            .neighbours(coord)
            .filter(move |&(next, diagonal)| !diagonal || self.grid.clears_corner(coord, next))
            .map(|(next, diagonal)| {
                let step = if diagonal { self.diagonal_cost } else { 1.0 };
                (next, OrderedFloat(step))
            })
    }
}
