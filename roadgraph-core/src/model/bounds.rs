//! Spatial extent of the input data, used for boundary detection

use geo::{BoundingRect, Coord, MultiPoint, Point, Rect};

use super::RawSegment;

/// Bounding rectangle of every raw point plus the boundary buffer.
///
/// Computed once from the input, before clustering, and passed explicitly to
/// the stages that need it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    rect: Rect<f64>,
    buffer: f64,
}

impl DataBounds {
    pub fn new(rect: Rect<f64>, buffer: f64) -> Self {
        Self { rect, buffer }
    }

    /// Extent of all points of all segments, `None` when there are no points
    pub fn from_segments(segments: &[RawSegment], buffer: f64) -> Option<Self> {
        let points: MultiPoint = segments
            .iter()
            .flat_map(|segment| segment.points.iter())
            .map(|p| Point::new(p[0], p[2]))
            .collect();

        points.bounding_rect().map(|rect| Self::new(rect, buffer))
    }

    pub fn rect(&self) -> Rect<f64> {
        self.rect
    }

    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    /// True when `position` is closer than the buffer to any side of the extent
    pub fn is_near_boundary(&self, position: Coord<f64>) -> bool {
        let min = self.rect.min();
        let max = self.rect.max();
        position.x < min.x + self.buffer
            || position.x > max.x - self.buffer
            || position.y < min.y + self.buffer
            || position.y > max.y - self.buffer
    }
}
