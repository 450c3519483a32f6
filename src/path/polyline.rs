//! Ordered point sequences with cached segment geometry.

use glam::Vec2;

use crate::vector_math::heading_of;

/// One straight piece of a [`Polyline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First point of the segment.
    pub start: Vec2,
    /// Last point of the segment.
    pub end: Vec2,
    /// Euclidean length.
    pub length: f32,
    /// Direction of travel from `start` to `end`.
    pub heading: f32,
    /// Cumulative path length at `start`.
    pub offset: f32,
}

impl Segment {
    /// Cumulative path length at `end`.
    #[must_use]
    pub const fn end_offset(&self) -> f32 {
        self.offset + self.length
    }

    /// Point `along` units from `start`, clamped to the segment.
    #[must_use]
    pub fn point_at(&self, along: f32) -> Vec2 {
        if self.length <= 0.0 {
            return self.start;
        }
        let t = (along / self.length).clamp(0.0, 1.0);
        self.start.lerp(self.end, t)
    }
}

/// Open or closed sequence of points.
///
/// Segment lengths, headings and the total length are computed once on
/// construction. Consecutive duplicate points contribute no segment, so a
/// polyline never contains zero-length segments. A closed polyline adds a
/// final segment from the last point back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Vec2>,
    closed: bool,
    segments: Vec<Segment>,
    total_length: f32,
}

impl Polyline {
    /// Builds an open polyline.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use isowalk::path::Polyline;
    /// let line = Polyline::open(vec![Vec2::ZERO, Vec2::new(3.0, 4.0)]);
    /// assert_eq!(line.total_length(), 5.0);
    /// ```
    #[must_use]
    pub fn open(points: Vec<Vec2>) -> Self {
        Self::build(points, false)
    }

    /// Builds a closed polyline that loops back to its first point.
    #[must_use]
    pub fn closed(points: Vec<Vec2>) -> Self {
        Self::build(points, true)
    }

    fn build(points: Vec<Vec2>, closed: bool) -> Self {
        let mut segments = Vec::with_capacity(points.len());
        let mut offset = 0.0;
        let closing = if closed {
            points.last().copied().zip(points.first().copied())
        } else {
            None
        };
        let pairs = points
            .windows(2)
            .filter_map(|pair| match pair {
                [start, end] => Some((*start, *end)),
                _ => None,
            })
            .chain(closing);
        for (start, end) in pairs {
            let length = start.distance(end);
            if length <= 0.0 {
                continue;
            }
            segments.push(Segment {
                start,
                end,
                length,
                heading: heading_of(end - start),
                offset,
            });
            offset += length;
        }
        Self {
            points,
            closed,
            segments,
            total_length: offset,
        }
    }

    /// Points as supplied.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Whether the path loops back to its start.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Cached segments in travel order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Sum of all segment lengths.
    #[must_use]
    pub const fn total_length(&self) -> f32 {
        self.total_length
    }

    /// `true` when the polyline has no walkable length.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the segment covering `distance`.
    ///
    /// Segments are scanned in order and the first whose end offset reaches
    /// `distance` wins, so a distance sitting exactly on a vertex belongs to
    /// the segment ending there.
    #[must_use]
    pub fn segment_index_at(&self, distance: f32) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        let found = self
            .segments
            .iter()
            .position(|segment| distance <= segment.end_offset());
        Some(found.unwrap_or(self.segments.len() - 1))
    }
}
