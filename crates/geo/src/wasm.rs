//! WASM bindings for the geo crate.
//!
//! These bindings let the map pages call the engine from JavaScript.

use crate::batch::{convert_grid_references_json, simplify_coordinates_json};
use crate::{grid_reference_to_wgs84, haversine_distance, GeoError, GeoPoint};
use wasm_bindgen::prelude::*;

/// Distance between two points in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let from = GeoPoint::new(lat1, lon1);
    let to = GeoPoint::new(lat2, lon2);
    haversine_distance(&from, &to)
}

/// Convert a grid reference to `{"latitude": .., "longitude": ..}`.
#[wasm_bindgen]
pub fn grid_to_wgs84(reference: &str) -> Result<String, JsValue> {
    let ll = grid_reference_to_wgs84(reference).map_err(to_js_error)?;
    serde_json::to_string(&ll).map_err(|e| to_js_error(e.into()))
}

/// Convert a JSON array of `{id, reference}` records.
///
/// Returns a JSON array of `{id, result: {Ok: ..} | {Err: ..}}`.
#[wasm_bindgen]
pub fn grid_batch_to_wgs84(items_json: &str) -> Result<String, JsValue> {
    convert_grid_references_json(items_json).map_err(to_js_error)
}

/// Simplify a JSON array of `[lat, lon]` pairs.
#[wasm_bindgen]
pub fn simplify_coordinates(coordinates_json: &str, tolerance: f64) -> Result<String, JsValue> {
    simplify_coordinates_json(coordinates_json, tolerance).map_err(to_js_error)
}

fn to_js_error(e: GeoError) -> JsValue {
    JsValue::from_str(&format!("[{}] {}", e.code() as u32, e))
}
