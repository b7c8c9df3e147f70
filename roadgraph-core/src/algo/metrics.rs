//! Per-segment measurements: headings, polyline length and speed ratio

use crate::Heading;
use crate::model::{Point3, RawSegment};

/// Lower clamp of the speed ratio; a stopped segment still moves a little
pub const MIN_SPEED_RATIO: f64 = 0.01;
pub const MAX_SPEED_RATIO: f64 = 1.0;

/// Derived measurements of one segment, computed once per build
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentMetrics {
    /// Bearing of the first polyline leg
    pub start_heading_deg: Heading,
    /// Bearing of the last polyline leg
    pub end_heading_deg: Heading,
    /// Planar polyline length, rounded to centimetres
    pub length_meters: f64,
    /// Average over free-flow speed, rounded and clamped
    pub speed_ratio: f64,
}

impl SegmentMetrics {
    /// Measure a segment with at least two points
    pub fn of(segment: &RawSegment) -> Self {
        let pts = &segment.points;
        let last = pts.len() - 1;
        Self {
            start_heading_deg: heading(pts[0], pts[1]),
            end_heading_deg: heading(pts[last - 1], pts[last]),
            length_meters: round_to(polyline_length(pts), 2),
            speed_ratio: speed_ratio(segment.avg_speed_mph, segment.free_flow_speed_mph),
        }
    }
}

/// Compass bearing from `from` to `to` in `[0, 360)`.
///
/// 0° is north (negative z), 90° is east (positive x).
pub fn heading(from: Point3, to: Point3) -> Heading {
    let dx = to[0] - from[0];
    let dz = to[2] - from[2];
    let bearing = dx.atan2(-dz).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Smallest angle between two headings, in `[0, 180]`
pub fn angle_difference(a: Heading, b: Heading) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

/// Sum of planar distances between consecutive points
pub fn polyline_length(points: &[Point3]) -> f64 {
    points
        .windows(2)
        .map(|leg| {
            let dx = leg[1][0] - leg[0][0];
            let dz = leg[1][2] - leg[0][2];
            (dx * dx + dz * dz).sqrt()
        })
        .sum()
}

pub fn speed_ratio(avg_speed: f64, free_flow_speed: f64) -> f64 {
    round_to(avg_speed / free_flow_speed, 3).clamp(MIN_SPEED_RATIO, MAX_SPEED_RATIO)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn headings_follow_compass() {
        let origin = [0.0, 0.0, 0.0];
        assert!(close(heading(origin, [0.0, 0.0, -10.0]), 0.0));
        assert!(close(heading(origin, [10.0, 0.0, 0.0]), 90.0));
        assert!(close(heading(origin, [0.0, 0.0, 10.0]), 180.0));
        assert!(close(heading(origin, [-10.0, 0.0, 0.0]), 270.0));
        assert!(close(heading(origin, [10.0, 5.0, -10.0]), 45.0));
    }

    #[test]
    fn angle_difference_wraps_around_north() {
        assert!(close(angle_difference(350.0, 10.0), 20.0));
        assert!(close(angle_difference(10.0, 350.0), 20.0));
        assert!(close(angle_difference(0.0, 180.0), 180.0));
        assert!(close(angle_difference(90.0, 90.0), 0.0));
    }

    #[test]
    fn length_ignores_elevation() {
        let points = [[0.0, 0.0, 0.0], [3.0, 100.0, 4.0], [3.0, -7.0, 10.0]];
        assert!(close(polyline_length(&points), 11.0));
    }

    #[test]
    fn speed_ratio_is_clamped() {
        assert!(close(speed_ratio(30.0, 15.0), 1.0));
        assert!(close(speed_ratio(0.0, 30.0), MIN_SPEED_RATIO));
        assert!(close(speed_ratio(12.0, 30.0), 0.4));
        assert!(close(speed_ratio(1.0, 3.0), 0.333));
    }

    #[test]
    fn metrics_use_first_and_last_legs() {
        let segment = RawSegment {
            points: vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 10.0]],
            avg_speed_mph: 10.0,
            free_flow_speed_mph: 20.0,
            ..RawSegment::default()
        };
        let metrics = SegmentMetrics::of(&segment);

        assert!(close(metrics.start_heading_deg, 90.0));
        assert!(close(metrics.end_heading_deg, 180.0));
        assert!(close(metrics.length_meters, 20.0));
        assert!(close(metrics.speed_ratio, 0.5));
    }
}
