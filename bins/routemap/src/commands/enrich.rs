//! Enrich command - attach WGS84 lat/lon to records carrying a grid reference
//!
//! The document is either a bare array of records or an object holding
//! the array under `records_key`. Records whose reference cannot be
//! converted are logged and left untouched.

use super::read_json;
use crate::config::GridConfig;
use crate::Format;
use anyhow::{anyhow, Context, Result};
use owo_colors::OwoColorize;
use routemap_geo::{convert_grid_references, GridRefItem};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Counts from one enrichment pass
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichStats {
    pub records: usize,
    pub with_reference: usize,
    pub converted: usize,
}

/// Run enrich command
pub fn run(input: &Path, output: Option<&Path>, settings: &GridConfig, format: Format) -> Result<()> {
    let mut document: Value = read_json(input)?;
    let stats = enrich_document(&mut document, settings)?;

    let output = output.unwrap_or(input);
    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    match format {
        Format::Json => println!("{}", serde_json::to_string(&stats)?),
        Format::Text => {
            println!(
                "Enriched {}/{} records with lat/lon",
                stats.converted.green().bold(),
                stats.records
            );
            println!("Written to {}", output.display());
        }
    }

    Ok(())
}

/// Add `lat`/`lon` fields to every record whose reference converts
pub fn enrich_document(document: &mut Value, settings: &GridConfig) -> Result<EnrichStats> {
    let records = records_mut(document, &settings.records_key)?;

    let items: Vec<GridRefItem> = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            record
                .get(&settings.reference_field)
                .and_then(Value::as_str)
                .filter(|r| !r.trim().is_empty())
                .map(|reference| GridRefItem {
                    id: i as i64,
                    reference: reference.to_string(),
                })
        })
        .collect();

    let mut stats = EnrichStats {
        records: records.len(),
        with_reference: items.len(),
        converted: 0,
    };

    for (item, result) in items.iter().zip(convert_grid_references(&items)) {
        match result.result {
            Ok(ll) => {
                if let Some(record) = records[item.id as usize].as_object_mut() {
                    record.insert("lat".to_string(), ll.latitude.into());
                    record.insert("lon".to_string(), ll.longitude.into());
                    stats.converted += 1;
                }
            }
            Err(e) => {
                tracing::warn!(record = item.id, reference = %item.reference, error = %e, "Could not convert grid reference");
            }
        }
    }

    tracing::info!(
        records = stats.records,
        with_reference = stats.with_reference,
        converted = stats.converted,
        "Enrichment complete"
    );

    Ok(stats)
}

fn records_mut<'a>(document: &'a mut Value, records_key: &str) -> Result<&'a mut Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(map) => map
            .get_mut(records_key)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| anyhow!("Document has no {records_key:?} array")),
        _ => Err(anyhow!("Expected a JSON array or object of records")),
    }
}
