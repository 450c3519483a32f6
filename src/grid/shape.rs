//! Blocking geometry rasterised into the walkability grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::vector_math::segment_intersection;

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Rect {
    /// Builds a rectangle from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min, min + size)
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether both extents are positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    fn contains_strictly(&self, point: Vec2) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }

    /// Whether the interiors of two rectangles overlap. Touching edges do not
    /// count.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Point of the rectangle closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    const fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> {
        closed_edges(self.corners().to_vec())
    }
}

/// Geometry that makes the chunks it covers unwalkable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockingShape {
    /// Axis-aligned box such as a wall or crate.
    Rect(Rect),
    /// Round obstacle.
    Circle {
        /// Centre of the circle.
        center: Vec2,
        /// Radius in world units.
        radius: f32,
    },
    /// Simple polygon given by its vertices in order.
    Polygon(Vec<Vec2>),
}

impl BlockingShape {
    /// Bounding rectangle of the shape, `None` for an empty polygon.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(rect) => Some(*rect),
            Self::Circle { center, radius } => {
                let extent = Vec2::splat(radius.abs());
                Some(Rect::new(*center - extent, *center + extent))
            }
            Self::Polygon(points) => {
                let first = *points.first()?;
                let (min, max) = points
                    .iter()
                    .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
                Some(Rect::new(min, max))
            }
        }
    }

    /// Whether the shape covers part of the interior of `rect`.
    #[must_use]
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        match self {
            Self::Rect(shape) => shape.overlaps(rect),
            Self::Circle { center, radius } => {
                rect.closest_point(*center).distance_squared(*center) < radius * radius
            }
            Self::Polygon(points) => polygon_intersects_rect(points, rect),
        }
    }
}

fn polygon_intersects_rect(points: &[Vec2], rect: &Rect) -> bool {
    if points.len() < 3 {
        return false;
    }
    if points.iter().any(|p| rect.contains_strictly(*p)) {
        return true;
    }
    if point_in_polygon(rect.center(), points) {
        return true;
    }
    let corners = rect.corners();
    closed_edges(points.to_vec()).any(|(a, b)| {
        rect.edges().any(|(c, d)| {
            segment_intersection(a, b, c, d).is_some_and(|hit| !corners.contains(&hit))
        })
    })
}

/// Consecutive vertex pairs including the closing edge back to the start.
fn closed_edges(points: Vec<Vec2>) -> impl Iterator<Item = (Vec2, Vec2)> {
    let next = points.clone().into_iter().cycle().skip(1);
    points.into_iter().zip(next)
}

/// Even-odd ray casting test.
fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    closed_edges(polygon.to_vec())
        .filter(|(a, b)| {
            (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        })
        .count()
        % 2
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cell() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::splat(10.0))
    }

    #[rstest]
    #[case(Rect::from_min_size(Vec2::splat(5.0), Vec2::splat(10.0)), true)]
    #[case(Rect::from_min_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0)), false)]
    #[case(Rect::from_min_size(Vec2::splat(2.0), Vec2::splat(1.0)), true)]
    fn rect_overlap_excludes_touching_edges(#[case] other: Rect, #[case] expected: bool) {
        assert_eq!(BlockingShape::Rect(other).intersects_rect(&cell()), expected);
    }

    #[rstest]
    #[case(Vec2::new(15.0, 5.0), 6.0, true)]
    #[case(Vec2::new(15.0, 5.0), 5.0, false)]
    #[case(Vec2::new(20.0, 20.0), 3.0, false)]
    fn circle_uses_closest_point(#[case] center: Vec2, #[case] radius: f32, #[case] hit: bool) {
        let shape = BlockingShape::Circle { center, radius };
        assert_eq!(shape.intersects_rect(&cell()), hit);
    }

    #[rstest]
    fn polygon_enclosing_cell_intersects() {
        let shape = BlockingShape::Polygon(vec![
            Vec2::splat(-5.0),
            Vec2::new(20.0, -5.0),
            Vec2::splat(20.0),
            Vec2::new(-5.0, 20.0),
        ]);
        assert!(shape.intersects_rect(&cell()));
    }

    #[rstest]
    fn polygon_crossing_cell_edge_intersects() {
        let shape = BlockingShape::Polygon(vec![
            Vec2::new(-5.0, 4.0),
            Vec2::new(20.0, 4.0),
            Vec2::new(20.0, 6.0),
            Vec2::new(-5.0, 6.0),
        ]);
        assert!(shape.intersects_rect(&cell()));
    }

    #[rstest]
    fn distant_polygon_misses() {
        let shape = BlockingShape::Polygon(vec![
            Vec2::new(30.0, 30.0),
            Vec2::new(40.0, 30.0),
            Vec2::new(35.0, 40.0),
        ]);
        assert!(!shape.intersects_rect(&cell()));
    }
}
