//! Distance command - great-circle distance between two points

use crate::Format;
use anyhow::Result;
use owo_colors::OwoColorize;
use routemap_geo::{haversine_distance, GeoPoint};

/// Run distance command
pub fn run(from: (f64, f64), to: (f64, f64), format: Format) -> Result<()> {
    let from = GeoPoint::from(from);
    let to = GeoPoint::from(to);

    if !from.is_valid() || !to.is_valid() {
        tracing::warn!(?from, ?to, "Coordinates outside latitude/longitude range");
    }

    let km = haversine_distance(&from, &to);

    match format {
        Format::Json => println!("{}", serde_json::json!({ "distance_km": km })),
        Format::Text => println!("{} km", format!("{km:.3}").bold()),
    }

    Ok(())
}
