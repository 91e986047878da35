//! Track summaries for the route map.
//!
//! Distance and elevation gain are measured over every recorded point;
//! only the coordinate list handed to the map is simplified.

use crate::{path_length, simplify, GeoError, GeoPoint, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kilometers to statute miles.
pub const KM_TO_MILES: f64 = 0.621371;

/// Meters to feet.
pub const METERS_TO_FEET: f64 = 3.28084;

/// Default decimal places kept in rendered coordinates (~1 m).
pub const COORDINATE_DECIMALS: usize = 5;

/// Decimal places of published track distances.
pub const DISTANCE_DECIMALS: usize = 2;

/// Decimal places of published elevation gains.
pub const ELEVATION_DECIMALS: usize = 0;

/// Summary of one recorded track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Date of the first timestamped point
    pub start_date: Option<NaiveDate>,
    /// Total distance over all points in kilometers
    pub distance_km: f64,
    /// Sum of climbs between consecutive points in meters
    pub elevation_gain_m: f64,
    /// Simplified `[lat, lon]` pairs, rounded for display
    pub coordinates: Vec<[f64; 2]>,
}

impl TrackSummary {
    pub fn distance_miles(&self) -> f64 {
        self.distance_km * KM_TO_MILES
    }

    pub fn elevation_feet(&self) -> f64 {
        self.elevation_gain_m * METERS_TO_FEET
    }
}

/// Summarise a track, simplifying its coordinates with `tolerance` (degrees).
///
/// # Errors
/// [`GeoError::EmptyTrack`] for a track with no points, or
/// [`GeoError::InvalidTolerance`] for a non-positive tolerance.
pub fn summarize_track(points: &[GeoPoint], tolerance: f64) -> Result<TrackSummary> {
    summarize_track_with_decimals(points, tolerance, COORDINATE_DECIMALS)
}

/// [`summarize_track`] with coordinates rounded to `decimals` places.
pub fn summarize_track_with_decimals(points: &[GeoPoint], tolerance: f64, decimals: usize) -> Result<TrackSummary> {
    if points.is_empty() {
        return Err(GeoError::EmptyTrack);
    }

    let simplified = simplify(points, tolerance)?;
    let coordinates = simplified
        .iter()
        .map(|p| {
            [
                round_to(p.latitude, decimals),
                round_to(p.longitude, decimals),
            ]
        })
        .collect();

    let start_date = points
        .iter()
        .find_map(|p| p.timestamp)
        .map(|t| t.date_naive());

    Ok(TrackSummary {
        start_date,
        distance_km: path_length(points),
        elevation_gain_m: elevation_gain(points),
        coordinates,
    })
}

/// Total climb in meters; pairs missing an elevation are skipped.
pub fn elevation_gain(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .filter_map(|pair| match (pair[0].elevation, pair[1].elevation) {
            (Some(from), Some(to)) if to > from => Some(to - from),
            _ => None,
        })
        .sum()
}

/// A track as published to the map: identified, dated, and in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTrack {
    pub id: u64,
    pub date: Option<NaiveDate>,
    /// Miles, rounded to [`DISTANCE_DECIMALS`]
    pub distance_miles: f64,
    /// Feet, rounded to [`ELEVATION_DECIMALS`]
    pub elevation_feet: f64,
    pub coordinates: Vec<[f64; 2]>,
}

impl MapTrack {
    pub fn new(id: u64, summary: TrackSummary) -> Self {
        Self {
            id,
            date: summary.start_date,
            distance_miles: round_to(summary.distance_miles(), DISTANCE_DECIMALS),
            elevation_feet: round_to(summary.elevation_feet(), ELEVATION_DECIMALS),
            coordinates: summary.coordinates,
        }
    }
}

/// Totals across every track of a [`TrackCollection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionTotals {
    pub total_tracks: usize,
    pub total_distance_miles: f64,
    pub total_elevation_feet: f64,
}

/// Every track for the map, oldest first, with running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCollection {
    pub tracks: Vec<MapTrack>,
    pub summary: CollectionTotals,
}

impl TrackCollection {
    /// Sort `tracks` by date and total their published figures.
    ///
    /// Undated tracks sort first; tracks on the same date keep their input
    /// order. Totals are sums of the already rounded per-track values.
    pub fn new(mut tracks: Vec<MapTrack>) -> Self {
        tracks.sort_by_key(|t| t.date);

        let distance: f64 = tracks.iter().map(|t| t.distance_miles).sum();
        let elevation: f64 = tracks.iter().map(|t| t.elevation_feet).sum();

        let summary = CollectionTotals {
            total_tracks: tracks.len(),
            total_distance_miles: round_to(distance, DISTANCE_DECIMALS),
            total_elevation_feet: round_to(elevation, ELEVATION_DECIMALS),
        };

        Self { tracks, summary }
    }
}

/// Round `value` to `decimals` decimal places.
///
/// Rounds the exact binary value: `53.7025` is stored slightly above the
/// tie and goes up, while an exact tie such as `2.5` goes to even.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn climb() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(53.700000, -1.900000).with_elevation(100.0),
            GeoPoint::new(53.700500, -1.900000).with_elevation(110.0),
            GeoPoint::new(53.701000, -1.900000).with_elevation(105.0),
            GeoPoint::new(53.701500, -1.899000).with_elevation(125.0),
            GeoPoint::new(53.702000, -1.899000),
            GeoPoint::new(53.702500, -1.899000).with_elevation(140.0),
        ]
    }

    #[test]
    fn test_empty_track() {
        assert!(matches!(summarize_track(&[], 0.0002), Err(GeoError::EmptyTrack)));
    }

    #[test]
    fn test_invalid_tolerance() {
        assert!(matches!(
            summarize_track(&climb(), 0.0),
            Err(GeoError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_elevation_gain_skips_missing() {
        // +10, -5 (ignored), +20, gap, gap
        assert!((elevation_gain(&climb()) - 30.0).abs() < 1e-9);
        assert_eq!(elevation_gain(&[GeoPoint::new(0.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_summary_uses_all_points_for_distance() {
        let points = climb();
        let summary = summarize_track(&points, 0.0002).unwrap();

        assert!((summary.distance_km - path_length(&points)).abs() < 1e-12);
        assert!(summary.coordinates.len() < points.len());
        assert_eq!(summary.coordinates.first(), Some(&[53.7, -1.9]));
        assert_eq!(summary.coordinates.last(), Some(&[53.7025, -1.899]));
    }

    #[test]
    fn test_start_date_from_first_timestamp() {
        let mut points = climb();
        assert_eq!(summarize_track(&points, 0.0002).unwrap().start_date, None);

        let time = Utc.with_ymd_and_hms(2023, 7, 14, 6, 45, 0).unwrap();
        points[2] = points[2].with_timestamp(time);
        points[4] = points[4].with_timestamp(time + chrono::Duration::days(1));

        let summary = summarize_track(&points, 0.0002).unwrap();
        assert_eq!(summary.start_date, NaiveDate::from_ymd_opt(2023, 7, 14));
    }

    #[test]
    fn test_unit_conversions() {
        let summary = TrackSummary {
            start_date: None,
            distance_km: 10.0,
            elevation_gain_m: 100.0,
            coordinates: vec![],
        };
        assert!((summary.distance_miles() - 6.21371).abs() < 1e-9);
        assert!((summary.elevation_feet() - 328.084).abs() < 1e-9);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(53.637685422, 5), 53.63769);
        assert_eq!(round_to(-1.821496992, 5), -1.8215);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(1234.5, 0), 1234.0);
        assert_eq!(round_to(53.7025, 3), 53.703);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert!(round_to(f64::NAN, 5).is_nan());
    }

    #[test]
    fn test_custom_coordinate_decimals() {
        let summary = summarize_track_with_decimals(&climb(), 0.0002, 3).unwrap();
        assert_eq!(summary.coordinates.first(), Some(&[53.7, -1.9]));
        assert_eq!(summary.coordinates.last(), Some(&[53.703, -1.899]));
    }

    fn map_track(id: u64, date: Option<(i32, u32, u32)>, km: f64, gain_m: f64) -> MapTrack {
        MapTrack::new(
            id,
            TrackSummary {
                start_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                distance_km: km,
                elevation_gain_m: gain_m,
                coordinates: vec![],
            },
        )
    }

    #[test]
    fn test_map_track_rounds_display_units() {
        let track = map_track(1001, None, 42.195, 123.4);
        // 26.218 mi, 404.855 ft
        assert_eq!(track.distance_miles, 26.22);
        assert_eq!(track.elevation_feet, 405.0);
    }

    #[test]
    fn test_collection_orders_by_date_and_totals() {
        let collection = TrackCollection::new(vec![
            map_track(1003, Some((2024, 5, 2)), 10.0, 100.0),
            map_track(1001, Some((2024, 4, 30)), 20.0, 200.0),
            map_track(1002, None, 5.0, 0.0),
        ]);

        let ids: Vec<u64> = collection.tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1002, 1001, 1003]);

        // 3.11 + 12.43 + 6.21 miles, 0 + 656 + 328 feet
        assert_eq!(collection.summary.total_tracks, 3);
        assert!((collection.summary.total_distance_miles - 21.75).abs() < 1e-9);
        assert_eq!(collection.summary.total_elevation_feet, 984.0);
    }

    #[test]
    fn test_collection_serializes_map_layout() {
        let collection = TrackCollection::new(vec![map_track(1001, Some((2024, 4, 30)), 1.0, 1.0)]);
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["tracks"][0]["id"], 1001);
        assert_eq!(json["tracks"][0]["date"], "2024-04-30");
        assert_eq!(json["tracks"][0]["distance_miles"], 0.62);
        assert_eq!(json["summary"]["total_tracks"], 1);
        assert_eq!(json["summary"]["total_elevation_feet"], 3.0);
    }

    #[test]
    fn test_empty_collection() {
        let collection = TrackCollection::new(vec![]);
        assert_eq!(collection.summary.total_tracks, 0);
        assert_eq!(collection.summary.total_distance_miles, 0.0);
    }
}
