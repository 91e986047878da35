//! Douglas-Peucker polyline simplification.
//!
//! Works on any [`Planar`] point type, so the same routine simplifies
//! `(lat, lon)` track points and projected meters alike. The output is
//! always a subsequence of the input, keeps both endpoints, and a second
//! pass at the same tolerance returns it unchanged. A second pass at a
//! larger tolerance gives the same result as simplifying the original at
//! that tolerance.
//!
//! Ranges are processed from an explicit stack rather than by recursion,
//! so very long tracks cannot exhaust the call stack.

use crate::{GeoError, Planar, Result};

/// Distance from `point` to the segment `start`-`end`.
///
/// The projection parameter is clamped to `[0, 1]`, so the foot of the
/// perpendicular never lies beyond either end. A zero-length segment
/// degrades to the straight distance from `point` to `start`.
pub fn perpendicular_distance<P: Planar>(point: &P, start: &P, end: &P) -> f64 {
    let dx = end.x() - start.x();
    let dy = end.y() - start.y();

    if dx == 0.0 && dy == 0.0 {
        return (point.x() - start.x()).hypot(point.y() - start.y());
    }

    let t = ((point.x() - start.x()) * dx + (point.y() - start.y()) * dy) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);

    let foot_x = start.x() + t * dx;
    let foot_y = start.y() + t * dy;

    (point.x() - foot_x).hypot(point.y() - foot_y)
}

/// Simplify a polyline, returning the kept points in their original order.
///
/// # Errors
/// [`GeoError::InvalidTolerance`] when `tolerance` is not a positive finite number.
///
/// # Example
/// ```
/// use routemap_geo::simplify;
///
/// let line = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
/// let simplified = simplify(&line, 0.1).unwrap();
/// assert_eq!(simplified, vec![(0.0, 0.0), (3.0, 0.0)]);
/// ```
pub fn simplify<P: Planar + Clone>(points: &[P], tolerance: f64) -> Result<Vec<P>> {
    let indices = simplify_indices(points, tolerance)?;
    Ok(indices.into_iter().map(|i| points[i].clone()).collect())
}

/// Simplify a polyline, returning the indices of the kept points.
///
/// # Errors
/// [`GeoError::InvalidTolerance`] when `tolerance` is not a positive finite number.
pub fn simplify_indices<P: Planar>(points: &[P], tolerance: f64) -> Result<Vec<usize>> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(GeoError::InvalidTolerance(tolerance));
    }

    let n = points.len();
    if n <= 2 {
        return Ok((0..n).collect());
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last - first < 2 {
            continue;
        }

        if let Some((index, distance)) = farthest_point(points, first, last) {
            if distance > tolerance {
                keep[index] = true;
                stack.push((index, last));
                stack.push((first, index));
            }
        }
    }

    let kept: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect();

    tracing::trace!(input = n, output = kept.len(), tolerance, "Simplified polyline");

    Ok(kept)
}

/// Interior point of `first..=last` farthest from the chord; ties keep the earliest.
fn farthest_point<P: Planar>(points: &[P], first: usize, last: usize) -> Option<(usize, f64)> {
    let start = &points[first];
    let end = &points[last];

    let mut best: Option<(usize, f64)> = None;
    let mut max_distance = 0.0;
    for (offset, point) in points[first + 1..last].iter().enumerate() {
        let distance = perpendicular_distance(point, start, end);
        if distance > max_distance {
            max_distance = distance;
            best = Some((first + 1 + offset, distance));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeoPoint, PlanarPoint};
    use proptest::prelude::*;

    #[test]
    fn test_perpendicular_distance_interior() {
        let d = perpendicular_distance(&(1.0, 1.0), &(0.0, 0.0), &(2.0, 0.0));
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular_distance_clamped_to_segment() {
        // Beyond the end: distance to the end point, not to the infinite line
        let d = perpendicular_distance(&(5.0, 0.0), &(0.0, 0.0), &(2.0, 0.0));
        assert!((d - 3.0).abs() < 1e-12);

        let d = perpendicular_distance(&(-3.0, 4.0), &(0.0, 0.0), &(2.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular_distance_degenerate_segment() {
        let d = perpendicular_distance(&(3.0, 4.0), &(0.0, 0.0), &(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_tolerance() {
        let line = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert!(matches!(simplify(&line, 0.0), Err(GeoError::InvalidTolerance(_))));
        assert!(matches!(simplify(&line, -1.0), Err(GeoError::InvalidTolerance(_))));
        assert!(matches!(simplify(&line, f64::NAN), Err(GeoError::InvalidTolerance(_))));
    }

    #[test]
    fn test_invalid_tolerance_rejected_for_short_input() {
        let empty: [(f64, f64); 0] = [];
        assert!(simplify(&empty, 0.0).is_err());
    }

    #[test]
    fn test_short_input_unchanged() {
        let empty: [(f64, f64); 0] = [];
        assert!(simplify(&empty, 1.0).unwrap().is_empty());
        assert_eq!(simplify(&[(1.0, 2.0)], 1.0).unwrap(), vec![(1.0, 2.0)]);
        assert_eq!(
            simplify(&[(1.0, 2.0), (3.0, 4.0)], 1.0).unwrap(),
            vec![(1.0, 2.0), (3.0, 4.0)]
        );
    }

    #[test]
    fn test_colinear_collapses_to_endpoints() {
        let line: Vec<PlanarPoint> = (0..100).map(|i| PlanarPoint::new(i as f64, 2.0 * i as f64)).collect();
        let simplified = simplify(&line, 1e-6).unwrap();
        assert_eq!(simplified, vec![line[0], line[99]]);
    }

    #[test]
    fn test_peak_is_kept() {
        let line = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert_eq!(simplify(&line, 0.5).unwrap(), line.to_vec());
        assert_eq!(simplify(&line, 1.0).unwrap(), vec![(0.0, 0.0), (2.0, 0.0)]);
    }

    #[test]
    fn test_known_polyline() {
        let line = [
            (0.0, 0.0),
            (1.0, 0.1),
            (2.0, -0.1),
            (3.0, 5.0),
            (4.0, 6.0),
            (5.0, 7.0),
            (6.0, 8.1),
            (7.0, 9.0),
            (8.0, 9.0),
            (9.0, 9.0),
        ];
        let simplified = simplify(&line, 1.0).unwrap();
        assert_eq!(
            simplified,
            vec![(0.0, 0.0), (2.0, -0.1), (3.0, 5.0), (7.0, 9.0), (9.0, 9.0)]
        );
        assert_eq!(simplify_indices(&line, 1.0).unwrap(), vec![0, 2, 3, 7, 9]);
    }

    #[test]
    fn test_closed_loop_keeps_far_point() {
        // Start and end coincide, so the chord is degenerate
        let lap = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
        let simplified = simplify(&lap, 0.5).unwrap();
        assert_eq!(simplified.first(), Some(&(0.0, 0.0)));
        assert!(simplified.contains(&(1.0, 1.0)));
        assert_eq!(simplified.last(), Some(&(0.0, 0.0)));
    }

    #[test]
    fn test_geo_points_keep_metadata() {
        let track = [
            GeoPoint::new(53.70, -1.90).with_elevation(100.0),
            GeoPoint::new(53.71, -1.90).with_elevation(120.0),
            GeoPoint::new(53.72, -1.90).with_elevation(140.0),
        ];
        let simplified = simplify(&track, 0.0002).unwrap();
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[1].elevation, Some(140.0));
    }

    #[test]
    fn test_long_zigzag_keeps_every_vertex() {
        let zigzag: Vec<(f64, f64)> = (0..10_000)
            .map(|i| (i as f64, if i % 2 == 0 { 0.0 } else { 10.0 }))
            .collect();
        let simplified = simplify(&zigzag, 1.0).unwrap();
        assert_eq!(simplified.len(), zigzag.len());
    }

    fn polyline() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..60)
    }

    proptest! {
        #[test]
        fn prop_subsequence_with_endpoints(points in polyline(), tolerance in 0.01f64..50.0) {
            let indices = simplify_indices(&points, tolerance).unwrap();
            prop_assert!(indices.len() <= points.len());
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            if !points.is_empty() {
                prop_assert_eq!(indices.first().copied(), Some(0));
                prop_assert_eq!(indices.last().copied(), Some(points.len() - 1));
            }
        }

        #[test]
        fn prop_idempotent(points in polyline(), tolerance in 0.01f64..50.0) {
            let once = simplify(&points, tolerance).unwrap();
            let twice = simplify(&once, tolerance).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_second_pass_at_larger_tolerance(points in polyline(), tolerance in 0.01f64..50.0, factor in 1.0f64..4.0) {
            // Re-simplifying at a tolerance >= the first one matches simplifying the original
            let larger = tolerance * factor;
            let once = simplify(&points, tolerance).unwrap();
            prop_assert_eq!(simplify(&once, larger).unwrap(), simplify(&points, larger).unwrap());
        }
    }
}
