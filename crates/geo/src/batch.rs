//! Batch conversions with optional parallelism.
//!
//! Every record is computed independently: one malformed grid reference
//! yields an error entry for that record and never aborts the batch.

use crate::{grid_reference_to_wgs84, simplify, summarize_track_with_decimals, GeoPoint, LatLon, Planar, Result, TrackSummary};
use serde::{Deserialize, Serialize};

/// Input record for batch grid reference conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRefItem {
    /// Record ID
    pub id: i64,
    /// Grid reference, e.g. `"SE 119 157"`
    pub reference: String,
}

/// Outcome of converting a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRefResult {
    /// Record ID
    pub id: i64,
    /// WGS84 position, or the error message for this record
    pub result: std::result::Result<LatLon, String>,
}

impl GridRefResult {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Convert many grid references to rounded WGS84 positions.
///
/// Output order matches input order.
///
/// # Example
/// ```
/// use routemap_geo::{convert_grid_references, GridRefItem};
///
/// let items = vec![
///     GridRefItem { id: 1, reference: "SE 119 157".into() },
///     GridRefItem { id: 2, reference: "SE 1191 15".into() },
/// ];
///
/// let results = convert_grid_references(&items);
/// assert!(results[0].is_ok());
/// assert!(!results[1].is_ok());
/// ```
pub fn convert_grid_references(items: &[GridRefItem]) -> Vec<GridRefResult> {
    tracing::debug!(count = items.len(), "Converting grid references");

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(convert_single).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(convert_single).collect()
    }
}

/// Convert a JSON array of `{id, reference}` records.
///
/// Returns a JSON array of `{id, result: {Ok: ..} | {Err: ..}}`.
///
/// # Errors
/// [`JsonError`](crate::GeoError::JsonError) when the input is not an array of records.
pub fn convert_grid_references_json(items_json: &str) -> Result<String> {
    let items: Vec<GridRefItem> = serde_json::from_str(items_json)?;
    Ok(serde_json::to_string(&convert_grid_references(&items))?)
}

/// Simplify a JSON array of `[lat, lon]` pairs.
///
/// # Errors
/// [`JsonError`](crate::GeoError::JsonError) for unparseable input, or
/// [`InvalidTolerance`](crate::GeoError::InvalidTolerance) for a non-positive tolerance.
pub fn simplify_coordinates_json(coordinates_json: &str, tolerance: f64) -> Result<String> {
    let coordinates: Vec<[f64; 2]> = serde_json::from_str(coordinates_json)?;
    let simplified = simplify(&coordinates, tolerance)?;
    Ok(serde_json::to_string(&simplified)?)
}

/// Simplify many polylines with the same tolerance.
///
/// Fails if the tolerance is invalid; the output order matches the input.
pub fn simplify_many<P>(tracks: &[Vec<P>], tolerance: f64) -> Result<Vec<Vec<P>>>
where
    P: Planar + Clone + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        tracks.par_iter().map(|t| simplify(t, tolerance)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        tracks.iter().map(|t| simplify(t, tolerance)).collect()
    }
}

/// Summarise many tracks, keeping a per-track result.
///
/// Coordinates are rounded to `decimals` places; output order matches the input.
pub fn summarize_tracks(tracks: &[Vec<GeoPoint>], tolerance: f64, decimals: usize) -> Vec<Result<TrackSummary>> {
    tracing::debug!(count = tracks.len(), tolerance, "Summarising tracks");

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        tracks
            .par_iter()
            .map(|t| summarize_track_with_decimals(t, tolerance, decimals))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        tracks
            .iter()
            .map(|t| summarize_track_with_decimals(t, tolerance, decimals))
            .collect()
    }
}

#[inline]
fn convert_single(item: &GridRefItem) -> GridRefResult {
    GridRefResult {
        id: item.id,
        result: grid_reference_to_wgs84(&item.reference).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoError;

    fn create_test_items() -> Vec<GridRefItem> {
        vec![
            GridRefItem { id: 1, reference: "SE 119 157".into() },
            GridRefItem { id: 2, reference: "NN 16671 71259".into() },
            // Odd digit count
            GridRefItem { id: 3, reference: "SE 1191 15".into() },
            // Unknown square
            GridRefItem { id: 4, reference: "ZZ 100 100".into() },
        ]
    }

    #[test]
    fn test_batch_conversion_keeps_order_and_failures() {
        let results = convert_grid_references(&create_test_items());

        assert_eq!(results.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(results[0].result, Ok(LatLon::new(53.63769, -1.8215)));
        assert!(results[1].is_ok());
        assert!(results[2].result.as_ref().unwrap_err().contains("Malformed"));
        assert!(results[3].result.as_ref().unwrap_err().contains("Unknown grid square"));
    }

    #[test]
    fn test_batch_empty() {
        assert!(convert_grid_references(&[]).is_empty());
    }

    #[test]
    fn test_batch_json() {
        let json = convert_grid_references_json(r#"[{"id": 7, "reference": "SE 119 157"}]"#).unwrap();
        let results: Vec<GridRefResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(results[0].id, 7);
        assert_eq!(results[0].result, Ok(LatLon::new(53.63769, -1.8215)));
    }

    #[test]
    fn test_batch_json_rejects_bad_input() {
        let err = convert_grid_references_json("not json").unwrap_err();
        assert!(matches!(err, GeoError::JsonError(_)));
        assert_eq!(err.code(), crate::GeoErrorCode::JsonParsing);
    }

    #[test]
    fn test_simplify_coordinates_json() {
        let json = simplify_coordinates_json("[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]", 0.5).unwrap();
        assert_eq!(json, "[[0.0,0.0],[2.0,0.0]]");

        assert!(matches!(
            simplify_coordinates_json("[[0.0, 0.0]]", 0.0),
            Err(GeoError::InvalidTolerance(_))
        ));
        assert!(matches!(
            simplify_coordinates_json("[[0.0]]", 1.0),
            Err(GeoError::JsonError(_))
        ));
    }

    #[test]
    fn test_simplify_many() {
        let tracks = vec![
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![(0.0, 0.0), (1.0, 5.0), (2.0, 0.0)],
        ];
        let simplified = simplify_many(&tracks, 0.5).unwrap();
        assert_eq!(simplified[0].len(), 2);
        assert_eq!(simplified[1].len(), 3);
    }

    #[test]
    fn test_simplify_many_rejects_bad_tolerance() {
        let tracks = vec![vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]];
        assert!(matches!(simplify_many(&tracks, -1.0), Err(GeoError::InvalidTolerance(_))));
    }

    #[test]
    fn test_summarize_tracks_isolates_failures() {
        let tracks = vec![
            vec![GeoPoint::new(53.7, -1.9), GeoPoint::new(53.8, -1.9)],
            vec![],
        ];
        let summaries = summarize_tracks(&tracks, 0.0002, 5);
        assert!(summaries[0].is_ok());
        assert!(matches!(summaries[1], Err(GeoError::EmptyTrack)));
    }
}
