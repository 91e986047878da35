//! Coordinate and polyline processing for the route map builds.
//!
//! This crate provides:
//! - Haversine great-circle distances
//! - Douglas-Peucker polyline simplification
//! - Ordnance Survey grid reference decoding
//! - OSGB36 National Grid to WGS84 conversion (inverse Transverse Mercator + Helmert)
//! - Track summaries (distance, elevation gain, simplified coordinates)
//! - Batch processing with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use routemap_geo::{grid_reference_to_wgs84, haversine_distance, GeoPoint};
//!
//! let london = GeoPoint::new(51.5074, -0.1278);
//! let paris = GeoPoint::new(48.8566, 2.3522);
//! let distance_km = haversine_distance(&london, &paris);
//! assert!((distance_km - 343.5).abs() < 1.0);
//!
//! let ben_nevis = grid_reference_to_wgs84("NN 16671 71259").unwrap();
//! assert!((ben_nevis.latitude - 56.7969).abs() < 0.001);
//! ```

mod error;
mod haversine;
mod point;

pub mod batch;
pub mod datum;
pub mod grid_ref;
pub mod simplify;
pub mod track;

#[cfg(feature = "wasm")]
mod wasm;

pub use batch::{convert_grid_references, summarize_tracks, GridRefItem, GridRefResult};
pub use datum::{grid_reference_to_wgs84, osgb36_to_wgs84, to_wgs84};
pub use error::{GeoError, GeoErrorCode, Result};
pub use grid_ref::{decode, GridReference};
pub use haversine::{haversine_distance, haversine_distance_meters, path_length, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use point::{EastingNorthing, GeoPoint, LatLon, Planar, PlanarPoint};
pub use simplify::{perpendicular_distance, simplify, simplify_indices};
pub use track::{
    summarize_track, summarize_track_with_decimals, CollectionTotals, MapTrack, TrackCollection, TrackSummary,
};
