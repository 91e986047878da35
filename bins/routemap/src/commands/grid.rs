//! Grid command - convert OS grid references to WGS84

use crate::Format;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use routemap_geo::{decode, to_wgs84};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct GridOutput<'a> {
    reference: &'a str,
    easting: f64,
    northing: f64,
    latitude: f64,
    longitude: f64,
}

/// Run grid command
///
/// Every reference is attempted; the command fails afterwards if any did.
pub fn run(references: &[String], format: Format) -> Result<()> {
    let mut outputs = Vec::with_capacity(references.len());
    let mut failures = 0usize;

    for reference in references {
        let converted = decode(reference).and_then(|en| to_wgs84(&en).map(|ll| (en, ll)));
        match converted {
            Ok((en, ll)) => outputs.push(GridOutput {
                reference: reference.as_str(),
                easting: en.easting,
                northing: en.northing,
                latitude: ll.latitude,
                longitude: ll.longitude,
            }),
            Err(e) => {
                failures += 1;
                tracing::warn!(reference = %reference, error = %e, "Could not convert grid reference");
            }
        }
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&outputs)?),
        Format::Text => {
            for out in &outputs {
                println!(
                    "{:<16} E {:>9} N {:>9}  ->  {}, {}",
                    out.reference.bold(),
                    out.easting,
                    out.northing,
                    out.latitude.green(),
                    out.longitude.green()
                );
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} grid references could not be converted", references.len());
    }
    Ok(())
}
