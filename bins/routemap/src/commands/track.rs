//! Track command - distance, elevation gain and simplified coordinates
//!
//! One input prints its summary. Several inputs (or `--output`) build the
//! map's track collection: one entry per track, oldest first, plus totals.

use super::read_json;
use crate::config::TrackConfig;
use crate::Format;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use routemap_geo::{summarize_track_with_decimals, summarize_tracks, GeoPoint, MapTrack, TrackCollection};
use std::path::{Path, PathBuf};

/// Run track command
pub fn run(inputs: &[PathBuf], output: Option<&Path>, settings: &TrackConfig, format: Format) -> Result<()> {
    match inputs {
        [input] if output.is_none() => summarize_one(input, settings, format),
        _ => {
            let collection = build_collection(inputs, settings)?;
            write_collection(&collection, output, format)
        }
    }
}

fn summarize_one(input: &Path, settings: &TrackConfig, format: Format) -> Result<()> {
    let points: Vec<GeoPoint> = read_json(input)?;

    let summary = routemap_telemetry::timed("summarize_track", || {
        summarize_track_with_decimals(&points, settings.tolerance, settings.decimals)
    })
    .with_context(|| format!("Failed to summarise {}", input.display()))?;

    tracing::info!(
        points = points.len(),
        simplified = summary.coordinates.len(),
        "Track summarised"
    );

    match format {
        Format::Json => println!("{}", serde_json::to_string(&summary)?),
        Format::Text => {
            let date = summary
                .start_date
                .map_or_else(|| "unknown date".to_string(), |d| d.to_string());
            println!("{}", input.display().bold());
            println!("  Date:      {}", date);
            println!("  Distance:  {:.2} mi ({:.2} km)", summary.distance_miles(), summary.distance_km);
            println!("  Elevation: {:.0} ft ({:.0} m)", summary.elevation_feet(), summary.elevation_gain_m);
            println!("  Points:    {} -> {}", points.len(), summary.coordinates.len().green());
        }
    }

    Ok(())
}

/// Summarise every input into a collection, skipping tracks that fail
///
/// Fails only when no track could be summarised.
pub fn build_collection(inputs: &[PathBuf], settings: &TrackConfig) -> Result<TrackCollection> {
    let tracks = inputs
        .iter()
        .map(|path| read_json::<Vec<GeoPoint>>(path))
        .collect::<Result<Vec<_>>>()?;

    let summaries = routemap_telemetry::timed("summarize_tracks", || {
        summarize_tracks(&tracks, settings.tolerance, settings.decimals)
    });

    let mut published = Vec::with_capacity(inputs.len());
    let mut first_error = None;
    for (index, (path, summary)) in inputs.iter().zip(summaries).enumerate() {
        match summary {
            Ok(summary) => published.push(MapTrack::new(track_id(path, index), summary)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping track");
                first_error.get_or_insert(e);
            }
        }
    }

    if published.is_empty() {
        if let Some(e) = first_error {
            return Err(e).context("No track could be summarised");
        }
    }

    let collection = TrackCollection::new(published);
    tracing::info!(
        tracks = collection.summary.total_tracks,
        skipped = inputs.len() - collection.summary.total_tracks,
        "Track collection built"
    );
    Ok(collection)
}

/// Numeric file stems (`1001.json`) are the track id; otherwise the 1-based position
fn track_id(path: &Path, index: usize) -> u64 {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
        .unwrap_or(index as u64 + 1)
}

fn write_collection(collection: &TrackCollection, output: Option<&Path>, format: Format) -> Result<()> {
    let json = serde_json::to_string(collection)?;

    let Some(path) = output else {
        println!("{json}");
        return Ok(());
    };

    std::fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;

    let totals = &collection.summary;
    match format {
        Format::Json => println!("{}", serde_json::to_string(totals)?),
        Format::Text => {
            println!("Generated {}", path.display());
            println!(
                "  {} tracks, {:.1} miles, {:.0} ft elevation",
                totals.total_tracks.green().bold(),
                totals.total_distance_miles,
                totals.total_elevation_feet
            );
        }
    }

    Ok(())
}
